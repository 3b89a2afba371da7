// src/math/extensions.rs

use crate::types::{DgError, DgResult};

/// Integer exponentiation that reports overflow instead of wrapping.
#[inline]
pub(crate) fn _checked_ipow(base: i64, exp: u32) -> DgResult<i64> {
  base
    .checked_pow(exp)
    .ok_or_else(|| DgError::Config(format!("{base}^{exp} overflows the grid coordinate range")))
}
