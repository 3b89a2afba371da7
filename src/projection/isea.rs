// src/projection/isea.rs
//! Snyder icosahedral equal-area projection between the sphere and the
//! unit-edge projected triangles of an icosahedron placement.

use crate::constants::{ISEA_CAP_G_RADS, ISEA_G_RADS, ISEA_R_PRIME, ISEA_THETA_RADS, M_2PI, M_PI, M_PI_180, M_SQRT3, M_SQRT3_2};
use crate::latlng::_pos_angle_rads;
use crate::math::vec3d::{_geo_to_vec3d, _vec3d_cross, _vec3d_dot, _vec3d_to_geo};
use crate::projection::icosa::IcosaPlacement;
use crate::types::{DgError, DgResult, LatLng, ProjTriCoord, Vec2d, Vec3d};

const DEG120: f64 = 120.0 * M_PI_180;
/// Planar direction from the triangle center to corner A.
const CORNER_A_DIR: f64 = 210.0 * M_PI_180;
const MAX_ITERATIONS: usize = 30;
const CONVERGENCE: f64 = 1e-13;

/// Center of the unit-edge projected triangle.
pub(crate) const TRI_CENTER: Vec2d = Vec2d::new(0.5, M_SQRT3_2 / 3.0);

/// ISEA projection bound to one icosahedron placement.
#[derive(Debug, Clone)]
pub struct Isea {
  icosa: IcosaPlacement,
  cot_theta: f64,
  tan_g: f64,
  // planar scale from the Snyder triangle to the unit-edge triangle
  plane_scale: f64,
}

impl Isea {
  pub fn new(icosa: IcosaPlacement) -> Self {
    let tan_g = ISEA_G_RADS.tan();
    Isea {
      icosa,
      cot_theta: 1.0 / ISEA_THETA_RADS.tan(),
      tan_g,
      plane_scale: (1.0 / M_SQRT3) / (ISEA_R_PRIME * tan_g),
    }
  }

  #[inline]
  pub fn icosa(&self) -> &IcosaPlacement {
    &self.icosa
  }

  // angle between the face center-vertex arc and the arc to the triangle edge
  #[inline]
  fn q_of(&self, az: f64) -> f64 {
    (self.tan_g / (az.cos() + az.sin() * self.cot_theta)).atan()
  }

  #[inline]
  fn h_of(az: f64) -> f64 {
    let u = az.sin() * ISEA_CAP_G_RADS.sin() * ISEA_G_RADS.cos() - az.cos() * ISEA_CAP_G_RADS.cos();
    u.clamp(-1.0, 1.0).acos()
  }

  /// Projects a geodetic point onto the projected triangle of the face
  /// containing it.
  pub fn forward(&self, geo: &LatLng) -> ProjTriCoord {
    let mut p = Vec3d::default();
    _geo_to_vec3d(geo, &mut p);
    let tri = self.icosa.nearest_face(&p);
    let (c, e1, e2) = self.icosa.face_frame(tri);

    let cross = _vec3d_cross(c, &p);
    let z = _vec3d_dot(&cross, &cross).sqrt().atan2(_vec3d_dot(c, &p));
    if z < 1e-15 {
      return ProjTriCoord {
        tri: tri as u8,
        pos: TRI_CENTER,
      };
    }

    // clockwise azimuth from corner A, seen from outside the sphere
    let az_total = _pos_angle_rads(-_vec3d_dot(&p, e2).atan2(_vec3d_dot(&p, e1)));
    let k = ((az_total / DEG120).floor() as i32).clamp(0, 2);
    let az = az_total - f64::from(k) * DEG120;

    let q = self.q_of(az);
    let h = Self::h_of(az);
    let area = az + ISEA_CAP_G_RADS + h - M_PI;
    let r2tan2 = ISEA_R_PRIME * ISEA_R_PRIME * self.tan_g * self.tan_g;
    let az_prime = (2.0 * area).atan2(r2tan2 - 2.0 * area * self.cot_theta);
    let d_prime = ISEA_R_PRIME * self.tan_g / (az_prime.cos() + az_prime.sin() * self.cot_theta);
    let rho = d_prime * (z / 2.0).sin() / (q / 2.0).sin() * self.plane_scale;

    let phi = CORNER_A_DIR - (az_prime + f64::from(k) * DEG120);
    ProjTriCoord {
      tri: tri as u8,
      pos: Vec2d::new(TRI_CENTER.x + rho * phi.cos(), TRI_CENTER.y + rho * phi.sin()),
    }
  }

  /// Inverse of [`Isea::forward`]. Points slightly outside the triangle
  /// extend its projection.
  pub fn inverse(&self, p: &ProjTriCoord) -> DgResult<LatLng> {
    let tri = p.tri as usize;
    if tri >= crate::constants::NUM_ICOSA_TRIS {
      return Err(DgError::InvalidAddress(format!("projected triangle {}", p.tri)));
    }
    let (c, e1, e2) = self.icosa.face_frame(tri);

    let dx = p.pos.x - TRI_CENTER.x;
    let dy = p.pos.y - TRI_CENTER.y;
    let rho_plane = dx.hypot(dy);
    let mut out = LatLng::default();
    if rho_plane < 1e-15 {
      _vec3d_to_geo(c, &mut out);
      return Ok(out);
    }

    let az_total_prime = _pos_angle_rads(CORNER_A_DIR - dy.atan2(dx));
    let k = ((az_total_prime / DEG120).floor() as i32).clamp(0, 2);
    let az_prime = az_total_prime - f64::from(k) * DEG120;
    let rho = rho_plane / self.plane_scale;

    let r2tan2 = ISEA_R_PRIME * ISEA_R_PRIME * self.tan_g * self.tan_g;
    let target = r2tan2 * az_prime.sin() / (2.0 * (az_prime.cos() + az_prime.sin() * self.cot_theta));

    // Newton iteration for the spherical azimuth producing `target` area
    let mut az = az_prime;
    for _ in 0..MAX_ITERATIONS {
      let h = Self::h_of(az);
      let f = az + ISEA_CAP_G_RADS + h - M_PI - target;
      let dh = -(az.cos() * ISEA_CAP_G_RADS.sin() * ISEA_G_RADS.cos() + az.sin() * ISEA_CAP_G_RADS.cos()) / h.sin();
      let step = f / (1.0 + dh);
      az -= step;
      if step.abs() < CONVERGENCE {
        break;
      }
    }

    let q = self.q_of(az);
    let d_prime = ISEA_R_PRIME * self.tan_g / (az_prime.cos() + az_prime.sin() * self.cot_theta);
    let f = d_prime / (2.0 * ISEA_R_PRIME * (q / 2.0).sin());
    let z = 2.0 * (rho / (2.0 * ISEA_R_PRIME * f)).clamp(-1.0, 1.0).asin();

    // back to a counter-clockwise angle from the corner A direction
    let alpha = (-(az + f64::from(k) * DEG120)).rem_euclid(M_2PI);
    let (sa, ca) = alpha.sin_cos();
    let (sz, cz) = z.sin_cos();
    let v = Vec3d {
      x: cz * c.x + sz * (ca * e1.x + sa * e2.x),
      y: cz * c.y + sz * (ca * e1.y + sa * e2.y),
      z: cz * c.z + sz * (ca * e1.z + sa * e2.z),
    };
    _vec3d_to_geo(&v, &mut out);
    Ok(out)
  }
}
