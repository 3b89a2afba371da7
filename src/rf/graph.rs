// src/rf/graph.rs
//! The reference frame network of one grid.
//!
//! Frames are registered in a fixed arena indexed by [`AddressType::index`].
//! Every reachable ordered pair of frames gets its chain of elementary
//! converters composed once, when the graph is built.

use std::collections::VecDeque;

use tracing::debug;

use super::address::Address;
use super::converters::{Converter, FrameContext, ELEMENTARY};
use crate::grid::Idgg;
use crate::hierarchy::check_pure;
use crate::types::{Aperture, AddressType, DgError, DgResult};

const NUM_FRAMES: usize = AddressType::ALL.len();

#[derive(Debug, Clone)]
struct Path {
  hops: Vec<AddressType>,
  steps: Vec<Converter>,
}

/// Whether `idgg` can carry frames of type `ty`.
fn frame_available(idgg: &Idgg, ty: AddressType) -> bool {
  match ty {
    AddressType::Zorder | AddressType::ZorderString => {
      check_pure(idgg, Aperture::Three).is_ok() || check_pure(idgg, Aperture::Four).is_ok()
    }
    AddressType::Z3 | AddressType::Z3String => check_pure(idgg, Aperture::Three).is_ok(),
    AddressType::Z7 | AddressType::Z7String => check_pure(idgg, Aperture::Seven).is_ok(),
    _ => true,
  }
}

#[derive(Debug, Clone)]
pub struct ConversionGraph {
  ctx: FrameContext,
  frames: Vec<AddressType>,
  /// Composed paths, indexed by `from * NUM_FRAMES + to`.
  paths: Vec<Option<Path>>,
}

impl ConversionGraph {
  /// Registers every frame `idgg` supports and composes the paths between
  /// them. `z3_invalid_digit` pads packed Z3 indices.
  pub fn new(idgg: Idgg, z3_invalid_digit: u8) -> DgResult<Self> {
    if z3_invalid_digit > 3 {
      return Err(DgError::Config(format!(
        "z3_invalid_digit {z3_invalid_digit} must be in 0..=3"
      )));
    }
    let frames: Vec<AddressType> = AddressType::ALL
      .into_iter()
      .filter(|&t| frame_available(&idgg, t))
      .collect();
    let mut registered = [false; NUM_FRAMES];
    for t in &frames {
      registered[t.index()] = true;
    }

    let mut adjacent: Vec<Vec<(AddressType, Converter)>> = vec![Vec::new(); NUM_FRAMES];
    for &(from, to, conv) in &ELEMENTARY {
      if registered[from.index()] && registered[to.index()] {
        adjacent[from.index()].push((to, conv));
      }
    }

    let mut paths = vec![None; NUM_FRAMES * NUM_FRAMES];
    for &from in &frames {
      // breadth first, so every path is a shortest chain of elementary steps
      let mut prev: [Option<(AddressType, Converter)>; NUM_FRAMES] = [None; NUM_FRAMES];
      let mut seen = [false; NUM_FRAMES];
      seen[from.index()] = true;
      let mut queue = VecDeque::from([from]);
      while let Some(cur) = queue.pop_front() {
        for &(next, conv) in &adjacent[cur.index()] {
          if !seen[next.index()] {
            seen[next.index()] = true;
            prev[next.index()] = Some((cur, conv));
            queue.push_back(next);
          }
        }
      }

      for &to in frames.iter().filter(|t| seen[t.index()]) {
        let mut hops = vec![to];
        let mut steps = Vec::new();
        let mut cur = to;
        while let Some((p, conv)) = prev[cur.index()] {
          steps.push(conv);
          hops.push(p);
          cur = p;
        }
        hops.reverse();
        steps.reverse();
        paths[from.index() * NUM_FRAMES + to.index()] = Some(Path { hops, steps });
      }
    }

    debug!(
      res = idgg.res(),
      frames = frames.len(),
      paths = paths.iter().flatten().count(),
      "built reference frame network"
    );
    Ok(ConversionGraph {
      ctx: FrameContext { idgg, z3_invalid_digit },
      frames,
      paths,
    })
  }

  #[inline]
  pub fn idgg(&self) -> &Idgg {
    &self.ctx.idgg
  }

  #[inline]
  pub fn z3_invalid_digit(&self) -> u8 {
    self.ctx.z3_invalid_digit
  }

  /// The registered frames, in index order.
  pub fn frames(&self) -> &[AddressType] {
    &self.frames
  }

  pub fn has_frame(&self, ty: AddressType) -> bool {
    self.frames.contains(&ty)
  }

  /// The frames a conversion passes through, both ends included.
  pub fn path(&self, from: AddressType, to: AddressType) -> Option<&[AddressType]> {
    self.paths[from.index() * NUM_FRAMES + to.index()]
      .as_ref()
      .map(|p| p.hops.as_slice())
  }

  /// The composed converter from `from` to `to`.
  pub fn converter(&self, from: AddressType, to: AddressType) -> DgResult<Conversion<'_>> {
    for ty in [from, to] {
      if !self.has_frame(ty) {
        return Err(DgError::Config(format!(
          "no {ty:?} frame for a resolution {} aperture {} grid",
          self.ctx.idgg.res(),
          self.ctx.idgg.aperture()
        )));
      }
    }
    let path = self.paths[from.index() * NUM_FRAMES + to.index()]
      .as_ref()
      .ok_or_else(|| DgError::Config(format!("no conversion from {from:?} to {to:?}")))?;
    Ok(Conversion {
      ctx: &self.ctx,
      from,
      steps: &path.steps,
    })
  }

  /// Converts one address. `Ok(None)` marks an address that has no
  /// counterpart in the target frame.
  pub fn convert(&self, addr: &Address, to: AddressType) -> DgResult<Option<Address>> {
    self.converter(addr.address_type(), to)?.apply(addr)
  }

  /// Converts a batch of addresses of one frame.
  pub fn convert_all(&self, addrs: &[Address], to: AddressType) -> DgResult<Vec<Option<Address>>> {
    let Some(first) = addrs.first() else {
      return Ok(Vec::new());
    };
    let conv = self.converter(first.address_type(), to)?;
    addrs.iter().map(|a| conv.apply(a)).collect()
  }
}

/// A composed converter borrowed from a [`ConversionGraph`].
#[derive(Debug, Clone, Copy)]
pub struct Conversion<'a> {
  ctx: &'a FrameContext,
  from: AddressType,
  steps: &'a [Converter],
}

impl Conversion<'_> {
  pub fn apply(&self, addr: &Address) -> DgResult<Option<Address>> {
    if addr.address_type() != self.from {
      return Err(DgError::InvalidAddress(format!(
        "expected a {:?} address, got {:?}",
        self.from,
        addr.address_type()
      )));
    }
    let mut cur = addr.clone();
    for step in self.steps {
      match step(self.ctx, &cur)? {
        Some(next) => cur = next,
        None => return Ok(None),
      }
    }
    Ok(Some(cur))
  }
}
