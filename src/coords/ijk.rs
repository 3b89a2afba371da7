// src/coords/ijk.rs
//! Three-axis hexagon coordinates and the aperture 3 and 7 lattice steps.
//!
//! The `i`, `j` and `k` axes are 120 degrees apart, so `(1, 1, 1)` is the
//! zero vector. A normalized coordinate has non-negative components, at
//! least one of them zero. `(i, j, k)` sits at the Eisenstein integer
//! `(i - k, j - k)` of the quad frame.

use std::ops::{Add, Sub};

use crate::constants::M_SQRT3_2;
use crate::types::{CoordIJ, CoordIJK, Direction, Vec2d};

/// Unit vectors of the seven lattice digits, indexed by [`Direction`].
#[rustfmt::skip]
pub(crate) static UNIT_VECS: [CoordIJK; 7] = [
  CoordIJK { i: 0, j: 0, k: 0 },
  CoordIJK { i: 0, j: 0, k: 1 },
  CoordIJK { i: 0, j: 1, k: 0 },
  CoordIJK { i: 0, j: 1, k: 1 },
  CoordIJK { i: 1, j: 0, k: 0 },
  CoordIJK { i: 1, j: 0, k: 1 },
  CoordIJK { i: 1, j: 1, k: 0 },
];

impl Add for CoordIJK {
  type Output = CoordIJK;

  fn add(self, o: CoordIJK) -> CoordIJK {
    CoordIJK::new(self.i + o.i, self.j + o.j, self.k + o.k)
  }
}

impl Sub for CoordIJK {
  type Output = CoordIJK;

  fn sub(self, o: CoordIJK) -> CoordIJK {
    CoordIJK::new(self.i - o.i, self.j - o.j, self.k - o.k)
  }
}

/// `n / 7` rounded to the nearest integer; `n / 7` is never a tie.
#[inline]
fn div7_round(n: i64) -> i64 {
  (2 * n + 7).div_euclid(14)
}

impl CoordIJK {
  #[inline]
  pub(crate) fn from_ij(ij: CoordIJ) -> Self {
    CoordIJK::new(ij.i, ij.j, 0).normalized()
  }

  #[inline]
  pub(crate) fn to_ij(self) -> CoordIJ {
    CoordIJ::new(self.i - self.k, self.j - self.k)
  }

  /// The same lattice vector with the smallest non-negative components.
  pub(crate) fn normalized(self) -> Self {
    let CoordIJ { i, j } = self.to_ij();
    let m = i.min(j).min(0);
    CoordIJK::new(i - m, j - m, -m)
  }

  #[inline]
  pub(crate) fn scaled(self, factor: i64) -> Self {
    CoordIJK::new(self.i * factor, self.j * factor, self.k * factor)
  }

  /// The adjacent cell in direction `digit`; the center digit stays put.
  pub(crate) fn neighbor(self, digit: Direction) -> Self {
    match digit {
      Direction::Center | Direction::InvalidDigit => self,
      d => (self + UNIT_VECS[d as usize]).normalized(),
    }
  }

  /// Digit of a unit vector, or [`Direction::InvalidDigit`] for any other
  /// vector.
  pub(crate) fn unit_digit(self) -> Direction {
    let c = self.normalized();
    UNIT_VECS
      .iter()
      .position(|u| *u == c)
      .and_then(|d| Direction::try_from(d as u8).ok())
      .unwrap_or(Direction::InvalidDigit)
  }

  /// Change of basis given by the images of the three unit vectors.
  fn transform(self, i_vec: CoordIJK, j_vec: CoordIJK, k_vec: CoordIJK) -> Self {
    (i_vec.scaled(self.i) + j_vec.scaled(self.j) + k_vec.scaled(self.k)).normalized()
  }

  /// The hexagon of unit center spacing containing the plane point `v`.
  pub(crate) fn containing_hex(v: &Vec2d) -> Self {
    let j = v.y / M_SQRT3_2;
    let i = v.x + j / 2.0;
    // cube coordinates (i, -j, j - i) sum to zero
    let (a, b, c) = (i, -j, j - i);
    let (mut ra, mut rb, rc) = (a.round(), b.round(), c.round());
    let (da, db, dc) = ((ra - a).abs(), (rb - b).abs(), (rc - c).abs());
    if da > db && da > dc {
      ra = -rb - rc;
    } else if db > dc {
      rb = -ra - rc;
    }
    CoordIJK::from_ij(CoordIJ::new(ra as i64, (-rb) as i64))
  }

  /// Parent center on the counter-clockwise aperture 7 lattice.
  pub(crate) fn up_ap7(self) -> Self {
    let CoordIJ { i, j } = self.to_ij();
    CoordIJK::new(div7_round(3 * i - j), div7_round(i + 2 * j), 0).normalized()
  }

  /// Parent center on the clockwise aperture 7 lattice.
  pub(crate) fn up_ap7r(self) -> Self {
    let CoordIJ { i, j } = self.to_ij();
    CoordIJK::new(div7_round(2 * i + j), div7_round(3 * j - i), 0).normalized()
  }

  /// Center of this cell one counter-clockwise aperture 7 step finer.
  pub(crate) fn down_ap7(self) -> Self {
    self.transform(CoordIJK::new(3, 0, 1), CoordIJK::new(1, 3, 0), CoordIJK::new(0, 1, 3))
  }

  pub(crate) fn down_ap7r(self) -> Self {
    self.transform(CoordIJK::new(3, 1, 0), CoordIJK::new(0, 3, 1), CoordIJK::new(1, 0, 3))
  }

  /// Center of this cell one counter-clockwise aperture 3 step finer.
  pub(crate) fn down_ap3(self) -> Self {
    self.transform(CoordIJK::new(2, 0, 1), CoordIJK::new(1, 2, 0), CoordIJK::new(0, 1, 2))
  }

  pub(crate) fn down_ap3r(self) -> Self {
    self.transform(CoordIJK::new(2, 1, 0), CoordIJK::new(0, 2, 1), CoordIJK::new(1, 0, 2))
  }

  pub(crate) fn rotate60_cw(self) -> Self {
    self.transform(CoordIJK::new(1, 0, 1), CoordIJK::new(1, 1, 0), CoordIJK::new(0, 1, 1))
  }
}

impl Direction {
  /// The digit 60 degrees counter-clockwise; the center and invalid digits
  /// are unchanged.
  pub(crate) fn rotate60_ccw(self) -> Direction {
    use Direction::*;
    match self {
      KAxes => IkAxes,
      IkAxes => IAxes,
      IAxes => IjAxes,
      IjAxes => JAxes,
      JAxes => JkAxes,
      JkAxes => KAxes,
      d => d,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plane(c: CoordIJ) -> Vec2d {
    Vec2d::new(c.i as f64 - 0.5 * c.j as f64, c.j as f64 * M_SQRT3_2)
  }

  #[test]
  fn test_normalize() {
    assert_eq!(CoordIJK::new(2, -1, 0).normalized(), CoordIJK::new(3, 0, 1));
    assert_eq!(CoordIJK::new(4, 4, 4).normalized(), CoordIJK::new(0, 0, 0));
    assert_eq!(CoordIJK::from_ij(CoordIJ::new(-2, 1)).to_ij(), CoordIJ::new(-2, 1));
  }

  #[test]
  fn test_unit_digits() {
    for (d, unit) in UNIT_VECS.iter().enumerate() {
      assert_eq!(unit.unit_digit() as usize, d);
    }
    assert_eq!(CoordIJK::new(2, 0, 0).unit_digit(), Direction::InvalidDigit);
    assert_eq!(CoordIJK::new(1, 1, 1).unit_digit(), Direction::Center);
  }

  #[test]
  fn test_containing_hex() {
    for i in -5..=5 {
      for j in -5..=5 {
        let c = CoordIJ::new(i, j);
        let mut v = plane(c);
        v.x += 0.1;
        v.y -= 0.05;
        assert_eq!(CoordIJK::containing_hex(&v).to_ij(), c, "cell ({i}, {j})");
      }
    }
  }

  #[test]
  fn test_ap7_steps_invert() {
    let c = CoordIJK::new(2, 1, 0);
    assert_eq!(c.down_ap7().up_ap7(), c);
    assert_eq!(c.down_ap7r().up_ap7r(), c);
  }

  #[test]
  fn test_down_ap3_scales_by_sqrt3() {
    for c in [CoordIJK::new(1, 0, 0).down_ap3(), CoordIJK::new(1, 0, 0).down_ap3r()] {
      let ij = c.to_ij();
      assert_eq!(ij.i * ij.i - ij.i * ij.j + ij.j * ij.j, 3);
    }
  }

  #[test]
  fn test_rotations() {
    let c = CoordIJK::new(3, 1, 0);
    let six = (0..6).fold(c, |acc, _| acc.rotate60_cw());
    assert_eq!(six, c.normalized());
    let d = (0..6).fold(Direction::JAxes, |acc, _| acc.rotate60_ccw());
    assert_eq!(d, Direction::JAxes);
  }
}
