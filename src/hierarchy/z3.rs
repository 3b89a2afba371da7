// src/hierarchy/z3.rs
//! Z3 indices for pure aperture 3 grids.
//!
//! Each radix 3 digit pair `(dI, dJ)` of a Class I substrate address maps to
//! two Z3 digits through a fixed table, so that every resolution contributes
//! exactly one digit. Class II resolutions drop the final digit.

use super::radix::{from_radix_digits, join_index, split_index, to_radix_digits, PackedLayout};
use super::{check_index_cell, check_pure};
use crate::grid::Idgg;
use crate::types::{Aperture, DgError, DgResult, Q2DICoord};

/// Packed Z3 layout: 2 bits per digit through resolution 30.
pub(crate) const Z3_LAYOUT: PackedLayout = PackedLayout {
  digit_bits: 2,
  max_res: 30,
};

/// Padding digit for unused resolutions of a packed Z3 index.
pub const DEFAULT_Z3_INVALID_DIGIT: u8 = 3;

/// Z3 digit pair for each radix 3 `(dI, dJ)` pair.
#[rustfmt::skip]
const Z3_DIGITS: [[[u8; 2]; 3]; 3] = [
  [[0, 0], [2, 2], [2, 1]],
  [[0, 1], [0, 2], [2, 0]],
  [[1, 2], [1, 0], [1, 1]],
];

fn check_z3(idgg: &Idgg) -> DgResult<()> {
  if idgg.res() == 0 || (idgg.aperture() == Aperture::Three && check_pure(idgg, Aperture::Three).is_ok()) {
    Ok(())
  } else {
    Err(DgError::HierNdx(format!(
      "Z3 indexing requires a pure aperture 3 grid, got aperture {} at resolution {}",
      idgg.aperture(),
      idgg.res()
    )))
  }
}

fn pair_of(z: [u8; 2]) -> DgResult<(u8, u8)> {
  for (di, row) in Z3_DIGITS.iter().enumerate() {
    if let Some(dj) = row.iter().position(|p| *p == z) {
      return Ok((di as u8, dj as u8));
    }
  }
  Err(DgError::InvalidAddress(format!("invalid Z3 digit pair {}{}", z[0], z[1])))
}

/// Z3 string of a cell.
pub fn q2di_to_z3_string(idgg: &Idgg, addr: &Q2DICoord) -> DgResult<String> {
  check_z3(idgg)?;
  check_index_cell(idgg, addr)?;
  let eff_res = idgg.res().div_ceil(2);
  let di = to_radix_digits(addr.coord.i, 3, eff_res)?;
  let dj = to_radix_digits(addr.coord.j, 3, eff_res)?;

  let mut digits: Vec<u8> = di
    .iter()
    .zip(&dj)
    .flat_map(|(&a, &b)| Z3_DIGITS[a as usize][b as usize])
    .collect();
  if !idgg.is_class_i() {
    digits.pop();
  }
  Ok(join_index(addr.quad, &digits))
}

/// Cell addressed by a Z3 string.
pub fn z3_string_to_q2di(idgg: &Idgg, s: &str) -> DgResult<Q2DICoord> {
  check_z3(idgg)?;
  let (quad, mut digits) = split_index(s)?;
  if digits.len() != idgg.res() {
    return Err(DgError::InvalidAddress(format!(
      "Z3 index \"{s}\" does not match resolution {}",
      idgg.res()
    )));
  }
  if digits.len() % 2 == 1 {
    digits.push(0);
  }

  let mut di = Vec::with_capacity(digits.len() / 2);
  let mut dj = Vec::with_capacity(digits.len() / 2);
  for pair in digits.chunks_exact(2) {
    let (a, b) = pair_of([pair[0], pair[1]])?;
    di.push(a);
    dj.push(b);
  }
  let addr = Q2DICoord::new(quad, from_radix_digits(&di, 3), from_radix_digits(&dj, 3));
  check_index_cell(idgg, &addr)?;
  Ok(addr)
}

/// Packs a Z3 string, filling unused digits with `invalid_digit`.
pub fn z3_string_to_int(s: &str, invalid_digit: u8) -> DgResult<u64> {
  if invalid_digit > 3 {
    return Err(DgError::Config(format!("Z3 invalid digit {invalid_digit} must be in 0..=3")));
  }
  let (quad, digits) = split_index(s)?;
  if let Some(d) = digits.iter().find(|&&d| d > 2) {
    return Err(DgError::InvalidAddress(format!("Z3 index \"{s}\" has digit {d}")));
  }
  Z3_LAYOUT.pack(quad, &digits, invalid_digit)
}

/// Z3 string of the first `res` digits of a packed index.
pub fn z3_int_to_string(z: u64, res: usize) -> DgResult<String> {
  let (quad, digits) = Z3_LAYOUT.unpack(z, res)?;
  if quad > 11 || digits.iter().any(|&d| d > 2) {
    return Err(DgError::InvalidAddress(format!("invalid Z3 index {z:016x} at resolution {res}")));
  }
  Ok(join_index(quad, &digits))
}

/// Z3 string of the parent one resolution coarser.
pub fn z3_parent(s: &str) -> DgResult<String> {
  super::drop_last_digit(s)
}

/// Z3 strings of the children in the next finer grid `child`.
pub fn z3_children(child: &Idgg, s: &str) -> DgResult<Vec<String>> {
  check_z3(child)?;
  super::append_valid_digits(s, 2, |c| z3_string_to_q2di(child, c).and_then(|a| q2di_to_z3_string(child, &a)))
}
