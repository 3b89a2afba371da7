// src/hierarchy/zorder.rs
//! Z-order indices for pure aperture 3 and aperture 4 grids.
//!
//! The string form is the two-digit quad number followed by the interleaved
//! radix digits of `i` and `j`. Aperture 4 combines each digit pair into one
//! radix 4 digit `2·dI + dJ`; aperture 3 keeps separate radix 3 digits and a
//! Class II resolution drops its final `j` digit, which the lattice implies.

use super::radix::{from_radix_digits, join_index, split_index, to_radix_digits, PackedLayout};
use super::{check_index_cell, check_pure};
use crate::grid::Idgg;
use crate::types::{Aperture, DgError, DgResult, Q2DICoord};

/// Packed Z-order layout: 2 bits per digit through resolution 30.
pub(crate) const ZORDER_LAYOUT: PackedLayout = PackedLayout {
  digit_bits: 2,
  max_res: 30,
};

/// Final `j` digit of a Class II aperture 3 address, by final `i` digit.
const CLASS_II_J_DIGITS: [u8; 3] = [0, 2, 1];

#[derive(Debug, Clone, Copy)]
struct Radix {
  radix: i64,
  eff_res: usize,
  aperture3: bool,
}

fn radix_of(idgg: &Idgg) -> DgResult<Radix> {
  match idgg.aperture() {
    Aperture::Three if idgg.res() == 0 || check_pure(idgg, Aperture::Three).is_ok() => Ok(Radix {
      radix: 3,
      eff_res: idgg.res().div_ceil(2),
      aperture3: true,
    }),
    Aperture::Four if idgg.res() == 0 || check_pure(idgg, Aperture::Four).is_ok() => Ok(Radix {
      radix: 2,
      eff_res: idgg.res(),
      aperture3: false,
    }),
    ap => Err(DgError::HierNdx(format!(
      "Z-order indexing requires a pure aperture 3 or 4 grid, got aperture {ap} at resolution {}",
      idgg.res()
    ))),
  }
}

/// Z-order string of a cell.
pub fn q2di_to_zorder_string(idgg: &Idgg, addr: &Q2DICoord) -> DgResult<String> {
  let rx = radix_of(idgg)?;
  check_index_cell(idgg, addr)?;
  let di = to_radix_digits(addr.coord.i, rx.radix, rx.eff_res)?;
  let dj = to_radix_digits(addr.coord.j, rx.radix, rx.eff_res)?;

  let mut digits = Vec::with_capacity(2 * rx.eff_res);
  if rx.aperture3 {
    for (a, b) in di.iter().zip(&dj) {
      digits.push(*a);
      digits.push(*b);
    }
    if !idgg.is_class_i() {
      digits.pop();
    }
  } else {
    digits.extend(di.iter().zip(&dj).map(|(a, b)| a * 2 + b));
  }
  Ok(join_index(addr.quad, &digits))
}

/// Cell addressed by a Z-order string.
pub fn zorder_string_to_q2di(idgg: &Idgg, s: &str) -> DgResult<Q2DICoord> {
  let rx = radix_of(idgg)?;
  let (quad, digits) = split_index(s)?;
  if digits.len() != idgg.res() {
    return Err(DgError::InvalidAddress(format!(
      "Z-order index \"{s}\" does not match resolution {}",
      idgg.res()
    )));
  }

  let (mut di, mut dj) = (Vec::with_capacity(rx.eff_res), Vec::with_capacity(rx.eff_res));
  if rx.aperture3 {
    for (n, &d) in digits.iter().enumerate() {
      if d > 2 {
        return Err(DgError::InvalidAddress(format!("Z-order index \"{s}\" has radix 3 digit {d}")));
      }
      if n % 2 == 0 {
        di.push(d);
      } else {
        dj.push(d);
      }
    }
    if !idgg.is_class_i() {
      let last_i = di.last().copied().unwrap_or(0);
      dj.push(CLASS_II_J_DIGITS[last_i as usize]);
    }
  } else {
    for &d in &digits {
      if d > 3 {
        return Err(DgError::InvalidAddress(format!("Z-order index \"{s}\" has radix 4 digit {d}")));
      }
      di.push(d / 2);
      dj.push(d % 2);
    }
  }

  let addr = Q2DICoord::new(quad, from_radix_digits(&di, rx.radix), from_radix_digits(&dj, rx.radix));
  check_index_cell(idgg, &addr)?;
  Ok(addr)
}

/// Packs a Z-order string; unused digits are zero.
pub fn zorder_string_to_int(s: &str) -> DgResult<u64> {
  let (quad, digits) = split_index(s)?;
  ZORDER_LAYOUT.pack(quad, &digits, 0)
}

/// Z-order string of the first `res` digits of a packed index.
pub fn zorder_int_to_string(z: u64, res: usize) -> DgResult<String> {
  let (quad, digits) = ZORDER_LAYOUT.unpack(z, res)?;
  if quad > 11 {
    return Err(DgError::InvalidAddress(format!("Z-order index {z:x} has invalid quad number {quad}")));
  }
  Ok(join_index(quad, &digits))
}

/// Z-order string of the parent one resolution coarser.
pub fn zorder_parent(s: &str) -> DgResult<String> {
  super::drop_last_digit(s)
}

/// Z-order strings of the children in the next finer grid `child`.
pub fn zorder_children(child: &Idgg, s: &str) -> DgResult<Vec<String>> {
  let rx = radix_of(child)?;
  let max_digit = if rx.aperture3 { 2 } else { 3 };
  super::append_valid_digits(s, max_digit, |c| {
    zorder_string_to_q2di(child, c).and_then(|a| q2di_to_zorder_string(child, &a))
  })
}
