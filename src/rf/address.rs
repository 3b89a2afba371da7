// src/rf/address.rs
//! A coordinate in any of the conversion graph's reference frames.

use std::fmt;

use crate::types::{AddressType, DgError, DgResult, LatLng, ProjTriCoord, Q2DDCoord, Q2DICoord, Vec2d, VertexCoord};

/// Decimal places used for continuous coordinates in address labels.
pub const LABEL_PRECISION: usize = 7;

/// One address, tagged with its reference frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Address {
  Geo(LatLng),
  ProjTri(ProjTriCoord),
  Vertex2dd(VertexCoord),
  Q2dd(Q2DDCoord),
  Q2di(Q2DICoord),
  Plane(Vec2d),
  Seqnum(u64),
  Zorder(u64),
  ZorderString(String),
  Z3(u64),
  Z3String(String),
  Z7(u64),
  Z7String(String),
}

impl Address {
  /// The frame this address belongs to.
  pub fn address_type(&self) -> AddressType {
    match self {
      Address::Geo(_) => AddressType::Geo,
      Address::ProjTri(_) => AddressType::ProjTri,
      Address::Vertex2dd(_) => AddressType::Vertex2dd,
      Address::Q2dd(_) => AddressType::Q2dd,
      Address::Q2di(_) => AddressType::Q2di,
      Address::Plane(_) => AddressType::Plane,
      Address::Seqnum(_) => AddressType::Seqnum,
      Address::Zorder(_) => AddressType::Zorder,
      Address::ZorderString(_) => AddressType::ZorderString,
      Address::Z3(_) => AddressType::Z3,
      Address::Z3String(_) => AddressType::Z3String,
      Address::Z7(_) => AddressType::Z7,
      Address::Z7String(_) => AddressType::Z7String,
    }
  }

  /// Parses a label in the form written by [`Address`]'s `Display`.
  ///
  /// Continuous frames other than `Geo` are output-only and cannot be parsed.
  pub fn parse(ty: AddressType, s: &str) -> DgResult<Address> {
    let s = s.trim();
    let bad = || DgError::InvalidAddress(format!("\"{s}\" is not a {ty:?} address"));
    let fields: Vec<&str> = s.split_whitespace().collect();
    let hex = |v: &str| u64::from_str_radix(v, 16).map_err(|_| bad());
    match ty {
      AddressType::Geo => match fields.as_slice() {
        [lng, lat] => {
          let lng: f64 = lng.parse().map_err(|_| bad())?;
          let lat: f64 = lat.parse().map_err(|_| bad())?;
          Ok(Address::Geo(LatLng::from_degrees(lat, lng)))
        }
        _ => Err(bad()),
      },
      AddressType::Q2di => match fields.as_slice() {
        [q, i, j] => Ok(Address::Q2di(Q2DICoord::new(
          q.parse().map_err(|_| bad())?,
          i.parse().map_err(|_| bad())?,
          j.parse().map_err(|_| bad())?,
        ))),
        _ => Err(bad()),
      },
      AddressType::Seqnum => s.parse().map(Address::Seqnum).map_err(|_| bad()),
      AddressType::Zorder => hex(s).map(Address::Zorder),
      AddressType::Z3 => hex(s).map(Address::Z3),
      AddressType::Z7 => hex(s).map(Address::Z7),
      AddressType::ZorderString => Ok(Address::ZorderString(s.to_string())),
      AddressType::Z3String => Ok(Address::Z3String(s.to_string())),
      AddressType::Z7String => Ok(Address::Z7String(s.to_string())),
      AddressType::ProjTri | AddressType::Vertex2dd | AddressType::Q2dd | AddressType::Plane => Err(bad()),
    }
  }
}

impl fmt::Display for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let p = LABEL_PRECISION;
    match self {
      Address::Geo(g) => write!(f, "{:.p$} {:.p$}", g.lng_degrees(), g.lat_degrees()),
      Address::ProjTri(t) => write!(f, "{} {:.p$} {:.p$}", t.tri, t.pos.x, t.pos.y),
      Address::Vertex2dd(v) => write!(
        f,
        "{} {} {} {:.p$} {:.p$}",
        u8::from(v.keep),
        v.vert,
        v.tri,
        v.pos.x,
        v.pos.y
      ),
      Address::Q2dd(q) => write!(f, "{} {:.p$} {:.p$}", q.quad, q.pos.x, q.pos.y),
      Address::Q2di(q) => write!(f, "{} {} {}", q.quad, q.coord.i, q.coord.j),
      Address::Plane(v) => write!(f, "{:.p$} {:.p$}", v.x, v.y),
      Address::Seqnum(n) => write!(f, "{n}"),
      Address::Zorder(z) => write!(f, "{z:x}"),
      Address::Z3(z) | Address::Z7(z) => write!(f, "{z:016x}"),
      Address::ZorderString(s) | Address::Z3String(s) | Address::Z7String(s) => f.write_str(s),
    }
  }
}
