// src/hierarchy/radix.rs
//! Digit strings and packed 64-bit layouts shared by the hierarchical
//! index encodings.

use crate::types::{DgError, DgResult};

/// Bit offset of the quad (or base cell) number in a packed index.
pub(crate) const QUAD_OFFSET: u32 = 60;
/// 1's in the 4 quad number bits, 0's everywhere else.
pub(crate) const QUAD_MASK: u64 = 15 << QUAD_OFFSET;

/// Layout of a packed hierarchical index: the quad number in bits 60-63 and
/// one fixed-width digit per resolution below it, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PackedLayout {
  pub digit_bits: u32,
  pub max_res: usize,
}

impl PackedLayout {
  #[inline]
  fn digit_mask(&self) -> u64 {
    (1 << self.digit_bits) - 1
  }

  #[inline]
  fn digit_offset(&self, res: usize) -> u32 {
    (self.max_res - res) as u32 * self.digit_bits
  }

  /// Index value with every digit set to `digit`.
  pub fn filled(&self, digit: u8) -> u64 {
    (1..=self.max_res).fold(0u64, |z, r| set_digit(z, self, r, digit))
  }

  /// Gets the resolution `res` digit of `z`, `1 <= res <= max_res`.
  #[inline]
  pub fn get_digit(&self, z: u64, res: usize) -> u8 {
    ((z >> self.digit_offset(res)) & self.digit_mask()) as u8
  }

  /// Packs a quad number and its digits; digits past the last are `fill`.
  pub fn pack(&self, quad: u8, digits: &[u8], fill: u8) -> DgResult<u64> {
    if digits.len() > self.max_res {
      return Err(DgError::Resolution {
        res: digits.len(),
        max: self.max_res,
      });
    }
    let mut z = (self.filled(fill) & !QUAD_MASK) | (u64::from(quad) << QUAD_OFFSET);
    for (r, &d) in digits.iter().enumerate() {
      if u64::from(d) > self.digit_mask() {
        return Err(DgError::InvalidAddress(format!("digit {d} does not fit {} bits", self.digit_bits)));
      }
      z = set_digit(z, self, r + 1, d);
    }
    Ok(z)
  }

  /// Quad number and the first `res` digits of `z`.
  pub fn unpack(&self, z: u64, res: usize) -> DgResult<(u8, Vec<u8>)> {
    if res > self.max_res {
      return Err(DgError::Resolution { res, max: self.max_res });
    }
    let quad = ((z & QUAD_MASK) >> QUAD_OFFSET) as u8;
    let digits = (1..=res).map(|r| self.get_digit(z, r)).collect();
    Ok((quad, digits))
  }
}

#[inline]
fn set_digit(z: u64, layout: &PackedLayout, res: usize, digit: u8) -> u64 {
  let offset = layout.digit_offset(res);
  (z & !(layout.digit_mask() << offset)) | (u64::from(digit) << offset)
}

/// Base `radix` digits of a non-negative `value`, most significant first,
/// left-padded with zeros to `width`.
pub(crate) fn to_radix_digits(value: i64, radix: i64, width: usize) -> DgResult<Vec<u8>> {
  if value < 0 {
    return Err(DgError::InvalidAddress(format!("negative coordinate {value} in radix string")));
  }
  let mut digits = Vec::with_capacity(width);
  let mut v = value;
  while v > 0 {
    digits.push((v % radix) as u8);
    v /= radix;
  }
  if digits.len() > width {
    return Err(DgError::InvalidAddress(format!(
      "coordinate {value} needs more than {width} radix {radix} digits"
    )));
  }
  digits.resize(width, 0);
  digits.reverse();
  Ok(digits)
}

/// Value of a most-significant-first digit sequence.
pub(crate) fn from_radix_digits(digits: &[u8], radix: i64) -> i64 {
  digits.iter().fold(0, |v, &d| v * radix + i64::from(d))
}

/// Splits an index string into its two-digit quad number and its
/// resolution digits.
pub(crate) fn split_index(s: &str) -> DgResult<(u8, Vec<u8>)> {
  let bytes = s.as_bytes();
  if bytes.len() < 2 || !bytes.iter().all(u8::is_ascii_digit) {
    return Err(DgError::InvalidAddress(format!("malformed index string \"{s}\"")));
  }
  let quad = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
  if quad > 11 {
    return Err(DgError::InvalidAddress(format!("index \"{s}\" has invalid quad number {quad}")));
  }
  Ok((quad, bytes[2..].iter().map(|b| b - b'0').collect()))
}

/// Formats a quad number and digits as an index string.
pub(crate) fn join_index(quad: u8, digits: &[u8]) -> String {
  let mut s = format!("{quad:02}");
  s.extend(digits.iter().map(|&d| char::from(b'0' + d)));
  s
}
