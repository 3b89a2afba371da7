// src/rf/converters.rs
//! Elementary converters between adjacent reference frames.
//!
//! Each converter handles exactly one ordered pair of frames. `Ok(None)`
//! reports an address with no counterpart in the target frame, such as a
//! point in the wedge removed around a pentagon.

use super::address::Address;
use crate::coords::vertex::{projtri_to_quad, projtri_to_vertex, quad_to_vertex, vertex_to_projtri};
use crate::grid::Idgg;
use crate::hierarchy::{
  q2di_to_z3_string, q2di_to_z7_string, q2di_to_zorder_string, z3_int_to_string, z3_string_to_int, z3_string_to_q2di,
  z7_int_to_string, z7_string_to_int, z7_string_to_q2di, zorder_int_to_string, zorder_string_to_int,
  zorder_string_to_q2di,
};
use crate::types::{AddressType, DgError, DgResult, Vec2d};

/// State shared by the converters of one grid.
#[derive(Debug, Clone)]
pub(crate) struct FrameContext {
  pub idgg: Idgg,
  pub z3_invalid_digit: u8,
}

pub(crate) type Converter = fn(&FrameContext, &Address) -> DgResult<Option<Address>>;

fn mismatch(addr: &Address, expected: AddressType) -> DgError {
  DgError::InvalidAddress(format!(
    "converter expected a {expected:?} address, got {:?}",
    addr.address_type()
  ))
}

fn geo_to_projtri(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Geo(g) = a else { return Err(mismatch(a, AddressType::Geo)) };
  Ok(Some(Address::ProjTri(ctx.idgg.isea().forward(g))))
}

fn projtri_to_geo(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::ProjTri(p) = a else { return Err(mismatch(a, AddressType::ProjTri)) };
  ctx.idgg.isea().inverse(p).map(|g| Some(Address::Geo(g)))
}

fn projtri_to_vertex2dd(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::ProjTri(p) = a else { return Err(mismatch(a, AddressType::ProjTri)) };
  projtri_to_vertex(p).map(|v| Some(Address::Vertex2dd(v)))
}

fn vertex2dd_to_projtri(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Vertex2dd(v) = a else { return Err(mismatch(a, AddressType::Vertex2dd)) };
  if !v.keep {
    return Ok(None);
  }
  Ok(vertex_to_projtri(v)?.map(Address::ProjTri))
}

fn projtri_to_q2dd(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::ProjTri(p) = a else { return Err(mismatch(a, AddressType::ProjTri)) };
  Ok(Some(Address::Q2dd(projtri_to_quad(p))))
}

fn q2dd_to_vertex2dd(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2dd(q) = a else { return Err(mismatch(a, AddressType::Q2dd)) };
  quad_to_vertex(q).map(|v| Some(Address::Vertex2dd(v)))
}

fn q2dd_to_q2di(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2dd(q) = a else { return Err(mismatch(a, AddressType::Q2dd)) };
  ctx.idgg.quantify(q).map(|c| Some(Address::Q2di(c)))
}

fn q2di_to_q2dd(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2di(c) = a else { return Err(mismatch(a, AddressType::Q2di)) };
  if !ctx.idgg.is_valid(c) {
    return Err(DgError::InvalidAddress(format!(
      "{c} is not a cell at resolution {}",
      ctx.idgg.res()
    )));
  }
  Ok(Some(Address::Q2dd(ctx.idgg.q2di_to_q2dd(c))))
}

/// Origin of each quad frame in the unfolded plane. Quads 1-5 climb along the
/// far-corner direction, each type 1 quad sits one edge right of the type 0
/// quad above it and the polar frames sit on their shared corners.
fn plane_origin(quad: u8) -> Vec2d {
  let far = Vec2d::new(0.5, crate::constants::M_SQRT3_2);
  match quad {
    0 => Vec2d::new(-0.5, far.y),
    1..=5 => {
      let k = f64::from(quad - 1);
      Vec2d::new(k * far.x, k * far.y)
    }
    6..=10 => {
      let k = f64::from(quad - 6);
      Vec2d::new(1.0 + k * far.x, k * far.y)
    }
    _ => Vec2d::new(1.0, 0.0),
  }
}

fn q2dd_to_plane(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2dd(q) = a else { return Err(mismatch(a, AddressType::Q2dd)) };
  let o = plane_origin(q.quad);
  Ok(Some(Address::Plane(Vec2d::new(o.x + q.pos.x, o.y + q.pos.y))))
}

fn q2di_to_seqnum(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2di(c) = a else { return Err(mismatch(a, AddressType::Q2di)) };
  ctx.idgg.seqnum(c).map(|n| Some(Address::Seqnum(n)))
}

fn seqnum_to_q2di(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Seqnum(n) = a else { return Err(mismatch(a, AddressType::Seqnum)) };
  ctx.idgg.from_seqnum(*n).map(|c| Some(Address::Q2di(c)))
}

fn q2di_to_zorder_str(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2di(c) = a else { return Err(mismatch(a, AddressType::Q2di)) };
  q2di_to_zorder_string(&ctx.idgg, c).map(|s| Some(Address::ZorderString(s)))
}

fn zorder_str_to_q2di(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::ZorderString(s) = a else { return Err(mismatch(a, AddressType::ZorderString)) };
  zorder_string_to_q2di(&ctx.idgg, s).map(|c| Some(Address::Q2di(c)))
}

fn zorder_str_to_int(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::ZorderString(s) = a else { return Err(mismatch(a, AddressType::ZorderString)) };
  zorder_string_to_int(s).map(|z| Some(Address::Zorder(z)))
}

fn zorder_int_to_str(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Zorder(z) = a else { return Err(mismatch(a, AddressType::Zorder)) };
  zorder_int_to_string(*z, ctx.idgg.res()).map(|s| Some(Address::ZorderString(s)))
}

fn q2di_to_z3_str(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2di(c) = a else { return Err(mismatch(a, AddressType::Q2di)) };
  q2di_to_z3_string(&ctx.idgg, c).map(|s| Some(Address::Z3String(s)))
}

fn z3_str_to_q2di(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Z3String(s) = a else { return Err(mismatch(a, AddressType::Z3String)) };
  z3_string_to_q2di(&ctx.idgg, s).map(|c| Some(Address::Q2di(c)))
}

fn z3_str_to_int(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Z3String(s) = a else { return Err(mismatch(a, AddressType::Z3String)) };
  z3_string_to_int(s, ctx.z3_invalid_digit).map(|z| Some(Address::Z3(z)))
}

fn z3_int_to_str(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Z3(z) = a else { return Err(mismatch(a, AddressType::Z3)) };
  z3_int_to_string(*z, ctx.idgg.res()).map(|s| Some(Address::Z3String(s)))
}

fn q2di_to_z7_str(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Q2di(c) = a else { return Err(mismatch(a, AddressType::Q2di)) };
  q2di_to_z7_string(&ctx.idgg, c).map(|s| Some(Address::Z7String(s)))
}

fn z7_str_to_q2di(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Z7String(s) = a else { return Err(mismatch(a, AddressType::Z7String)) };
  z7_string_to_q2di(&ctx.idgg, s).map(|c| Some(Address::Q2di(c)))
}

fn z7_str_to_int(_: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Z7String(s) = a else { return Err(mismatch(a, AddressType::Z7String)) };
  z7_string_to_int(s).map(|z| Some(Address::Z7(z)))
}

fn z7_int_to_str(ctx: &FrameContext, a: &Address) -> DgResult<Option<Address>> {
  let Address::Z7(z) = a else { return Err(mismatch(a, AddressType::Z7)) };
  z7_int_to_string(*z, ctx.idgg.res()).map(|s| Some(Address::Z7String(s)))
}

/// Every elementary converter, as `(from, to, converter)`.
#[rustfmt::skip]
pub(crate) static ELEMENTARY: [(AddressType, AddressType, Converter); 23] = [
  (AddressType::Geo, AddressType::ProjTri, geo_to_projtri),
  (AddressType::ProjTri, AddressType::Geo, projtri_to_geo),
  (AddressType::ProjTri, AddressType::Vertex2dd, projtri_to_vertex2dd),
  (AddressType::Vertex2dd, AddressType::ProjTri, vertex2dd_to_projtri),
  (AddressType::ProjTri, AddressType::Q2dd, projtri_to_q2dd),
  (AddressType::Q2dd, AddressType::Vertex2dd, q2dd_to_vertex2dd),
  (AddressType::Q2dd, AddressType::Q2di, q2dd_to_q2di),
  (AddressType::Q2di, AddressType::Q2dd, q2di_to_q2dd),
  (AddressType::Q2dd, AddressType::Plane, q2dd_to_plane),
  (AddressType::Q2di, AddressType::Seqnum, q2di_to_seqnum),
  (AddressType::Seqnum, AddressType::Q2di, seqnum_to_q2di),
  (AddressType::Q2di, AddressType::ZorderString, q2di_to_zorder_str),
  (AddressType::ZorderString, AddressType::Q2di, zorder_str_to_q2di),
  (AddressType::ZorderString, AddressType::Zorder, zorder_str_to_int),
  (AddressType::Zorder, AddressType::ZorderString, zorder_int_to_str),
  (AddressType::Q2di, AddressType::Z3String, q2di_to_z3_str),
  (AddressType::Z3String, AddressType::Q2di, z3_str_to_q2di),
  (AddressType::Z3String, AddressType::Z3, z3_str_to_int),
  (AddressType::Z3, AddressType::Z3String, z3_int_to_str),
  (AddressType::Q2di, AddressType::Z7String, q2di_to_z7_str),
  (AddressType::Z7String, AddressType::Q2di, z7_str_to_q2di),
  (AddressType::Z7String, AddressType::Z7, z7_str_to_int),
  (AddressType::Z7, AddressType::Z7String, z7_int_to_str),
];
