// src/math/vec2d.rs

use crate::types::Vec2d;

/// Calculates the magnitude of a 2D Cartesian vector.
#[inline]
#[must_use]
pub(crate) fn _v2d_mag(v: &Vec2d) -> f64 {
  (v.x * v.x + v.y * v.y).sqrt()
}

/// Euclidean distance between two points.
#[inline]
#[must_use]
pub(crate) fn _v2d_dist(v1: &Vec2d, v2: &Vec2d) -> f64 {
  let dx = v1.x - v2.x;
  let dy = v1.y - v2.y;
  (dx * dx + dy * dy).sqrt()
}

#[inline]
#[must_use]
pub(crate) fn _v2d_add(v1: &Vec2d, v2: &Vec2d) -> Vec2d {
  Vec2d::new(v1.x + v2.x, v1.y + v2.y)
}

#[inline]
#[must_use]
pub(crate) fn _v2d_sub(v1: &Vec2d, v2: &Vec2d) -> Vec2d {
  Vec2d::new(v1.x - v2.x, v1.y - v2.y)
}

/// Rotates a vector counter-clockwise about the origin by `sixths` multiples
/// of 60 degrees. Negative values rotate clockwise.
#[inline]
#[must_use]
pub(crate) fn _v2d_rotate60(v: &Vec2d, sixths: i32) -> Vec2d {
  let (sin, cos) = ROT60[sixths.rem_euclid(6) as usize];
  Vec2d::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

// (sin, cos) for multiples of 60 degrees; exact zeros keep boundary points on
// their lines.
#[rustfmt::skip]
static ROT60: [(f64, f64); 6] = [
    ( 0.0,                          1.0),
    ( crate::constants::M_SQRT3_2,  0.5),
    ( crate::constants::M_SQRT3_2, -0.5),
    ( 0.0,                         -1.0),
    (-crate::constants::M_SQRT3_2, -0.5),
    (-crate::constants::M_SQRT3_2,  0.5),
];

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  #[test]
  fn test_v2d_mag() {
    let v = Vec2d { x: 3.0, y: 4.0 };
    assert!((_v2d_mag(&v) - 5.0).abs() < f64::EPSILON, "magnitude as expected");
  }

  #[test]
  fn test_rotate60_matches_general_rotation() {
    let v = Vec2d::new(0.3, -0.7);
    for s in -6..=6 {
      let a = _v2d_rotate60(&v, s);
      let (sin, cos) = (f64::from(s) * 60f64.to_radians()).sin_cos();
      let b = Vec2d::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
      assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
      assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
    }
  }

  #[test]
  fn test_rotate60_half_turn_is_exact() {
    let v = Vec2d::new(0.25, 0.5);
    let r = _v2d_rotate60(&v, 3);
    assert_eq!(r, Vec2d::new(-0.25, -0.5));
  }
}
