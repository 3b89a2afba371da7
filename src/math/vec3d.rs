// src/math/vec3d.rs

use crate::types::{LatLng, Vec3d};

/// Calculate the 3D Cartesian coordinate on a unit sphere from latitude and longitude.
#[inline]
pub(crate) fn _geo_to_vec3d(geo: &LatLng, point: &mut Vec3d) {
  let r = geo.lat.cos();

  point.z = geo.lat.sin();
  point.x = geo.lng.cos() * r;
  point.y = geo.lng.sin() * r;
}

/// Latitude and longitude of the direction of a (not necessarily unit) vector.
#[inline]
pub(crate) fn _vec3d_to_geo(point: &Vec3d, geo: &mut LatLng) {
  let r = (point.x * point.x + point.y * point.y).sqrt();
  geo.lat = point.z.atan2(r);
  geo.lng = if r < f64::EPSILON { 0.0 } else { point.y.atan2(point.x) };
}

#[inline]
#[must_use]
pub(crate) fn _vec3d_dot(v1: &Vec3d, v2: &Vec3d) -> f64 {
  v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

#[inline]
#[must_use]
pub(crate) fn _vec3d_cross(v1: &Vec3d, v2: &Vec3d) -> Vec3d {
  Vec3d {
    x: v1.y * v2.z - v1.z * v2.y,
    y: v1.z * v2.x - v1.x * v2.z,
    z: v1.x * v2.y - v1.y * v2.x,
  }
}

/// Spherical linear interpolation between two unit vectors.
#[inline]
#[must_use]
pub(crate) fn _vec3d_slerp(v1: &Vec3d, v2: &Vec3d, t: f64) -> Vec3d {
  let omega = _vec3d_dot(v1, v2).clamp(-1.0, 1.0).acos();
  if omega < f64::EPSILON {
    return *v1;
  }
  let s = omega.sin();
  let a = ((1.0 - t) * omega).sin() / s;
  let b = (t * omega).sin() / s;
  Vec3d {
    x: a * v1.x + b * v2.x,
    y: a * v1.y + b * v2.y,
    z: a * v1.z + b * v2.z,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::{EPSILON_RAD, M_PI_2};

  #[test]
  fn test_geo_vec3d_round_trip() {
    let geo = LatLng::from_degrees(-33.5, 151.25);
    let mut v = Vec3d::default();
    _geo_to_vec3d(&geo, &mut v);
    assert!((_vec3d_dot(&v, &v) - 1.0).abs() < EPSILON_RAD, "point is on the unit sphere");
    let mut back = LatLng::default();
    _vec3d_to_geo(&v, &mut back);
    assert!((back.lat - geo.lat).abs() < 1e-12);
    assert!((back.lng - geo.lng).abs() < 1e-12);
  }

  #[test]
  fn test_north_pole() {
    let mut v = Vec3d::default();
    _geo_to_vec3d(&LatLng { lat: M_PI_2, lng: 0.0 }, &mut v);
    assert!(v.x.abs() < f64::EPSILON && (v.z - 1.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_cross_is_orthogonal() {
    let a = Vec3d { x: 1.0, y: 0.2, z: -0.3 };
    let b = Vec3d { x: -0.4, y: 0.9, z: 0.1 };
    let c = _vec3d_cross(&a, &b);
    assert!(_vec3d_dot(&a, &c).abs() < 1e-12);
    assert!(_vec3d_dot(&b, &c).abs() < 1e-12);
  }

  #[test]
  fn test_slerp_midpoint() {
    let a = Vec3d { x: 1.0, y: 0.0, z: 0.0 };
    let b = Vec3d { x: 0.0, y: 1.0, z: 0.0 };
    let m = _vec3d_slerp(&a, &b, 0.5);
    let h = std::f64::consts::FRAC_1_SQRT_2;
    assert!((m.x - h).abs() < 1e-12 && (m.y - h).abs() < 1e-12);
  }
}
