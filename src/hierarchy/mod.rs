// src/hierarchy/mod.rs
#![allow(clippy::module_name_repetitions)]
//! Hierarchical cell indices: Z-order, Z3 and Z7.
//!
//! Every index has a string form (two-digit quad or base cell number followed
//! by one digit per resolution) and a packed 64-bit form. The parent of an
//! index is its string with the last digit dropped.

pub mod radix;
pub mod z3;
pub mod z7;
pub mod zorder;

pub use z3::{
  q2di_to_z3_string, z3_children, z3_int_to_string, z3_parent, z3_string_to_int, z3_string_to_q2di,
  DEFAULT_Z3_INVALID_DIGIT,
};
pub use z7::{
  q2di_to_z7_digits, q2di_to_z7_string, z7_children, z7_digits_to_q2di, z7_int_to_string, z7_parent,
  z7_string_to_int, z7_string_to_q2di,
};
pub use zorder::{
  q2di_to_zorder_string, zorder_children, zorder_int_to_string, zorder_parent, zorder_string_to_int,
  zorder_string_to_q2di,
};

use crate::grid::{Idgg, Sublattice};
use crate::types::{Aperture, DgError, DgResult, Q2DICoord};

/// Checks that every step into `idgg` used aperture `ap`.
pub(crate) fn check_pure(idgg: &Idgg, ap: Aperture) -> DgResult<()> {
  let res = idgg.res();
  if res == 0 {
    return Ok(());
  }
  let counts = match ap {
    Aperture::Three => (res, 0, 0),
    Aperture::Four => (0, res, 0),
    Aperture::Seven => (0, 0, res),
  };
  let pure = Sublattice::new(counts.0, counts.1, counts.2)?;
  if idgg.aperture() == ap && *idgg.lattice() == pure {
    Ok(())
  } else {
    Err(DgError::HierNdx(format!("resolution {res} is not a pure aperture {ap} grid")))
  }
}

pub(crate) fn check_index_cell(idgg: &Idgg, addr: &Q2DICoord) -> DgResult<()> {
  if idgg.is_valid(addr) {
    Ok(())
  } else {
    Err(DgError::InvalidAddress(format!(
      "{addr} is not a cell of resolution {}",
      idgg.res()
    )))
  }
}

pub(crate) fn drop_last_digit(s: &str) -> DgResult<String> {
  let (_, digits) = radix::split_index(s)?;
  if digits.is_empty() {
    return Err(DgError::HierNdx(format!("resolution 0 index \"{s}\" has no parent")));
  }
  Ok(s[..s.len() - 1].to_string())
}

/// Extends `s` by each digit `0..=max_digit` and keeps the candidates that
/// survive `roundtrip` unchanged.
pub(crate) fn append_valid_digits(
  s: &str,
  max_digit: u8,
  roundtrip: impl Fn(&str) -> DgResult<String>,
) -> DgResult<Vec<String>> {
  radix::split_index(s)?;
  Ok(
    (0..=max_digit)
      .map(|d| format!("{s}{d}"))
      .filter(|c| roundtrip(c).is_ok_and(|r| r == *c))
      .collect(),
  )
}

#[cfg(test)]
pub(crate) mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::constants::{DEFAULT_VERT0_LAT, DEFAULT_VERT0_LON};
  use crate::projection::{IcosaPlacement, Isea};
  use crate::types::LatLng;

  fn isea() -> Arc<Isea> {
    Arc::new(Isea::new(IcosaPlacement::new(
      LatLng::from_degrees(DEFAULT_VERT0_LAT, DEFAULT_VERT0_LON),
      0.0,
    )))
  }

  pub(crate) fn grid_with(ap: Aperture, res: usize, counts: (usize, usize, usize)) -> Idgg {
    Idgg::new(res, ap, counts, isea()).unwrap()
  }

  pub(crate) fn pure_grid(ap: Aperture, res: usize) -> Idgg {
    let counts = match ap {
      Aperture::Three => (res, 0, 0),
      Aperture::Four => (0, res, 0),
      Aperture::Seven => (0, 0, res),
    };
    grid_with(ap, res, counts)
  }

  #[test]
  fn test_check_pure() {
    assert!(check_pure(&pure_grid(Aperture::Four, 3), Aperture::Four).is_ok());
    assert!(check_pure(&pure_grid(Aperture::Four, 3), Aperture::Three).is_err());
    assert!(check_pure(&grid_with(Aperture::Four, 3, (1, 2, 0)), Aperture::Four).is_err());
    assert!(check_pure(&pure_grid(Aperture::Seven, 0), Aperture::Three).is_ok());
  }

  #[test]
  fn test_drop_last_digit() {
    assert_eq!(drop_last_digit("0312").unwrap(), "031");
    assert!(matches!(drop_last_digit("03"), Err(DgError::HierNdx(_))));
    assert!(drop_last_digit("3").is_err());
  }
}
