// src/projection/gnomonic.rs

use crate::constants::{EPSILON_RAD, M_PI_2};
use crate::latlng::{geo_azimuth_rads, geo_destination, great_circle_distance_rads};
use crate::types::{LatLng, Vec2d};

/// Gnomonic projection about a center point, `x` east and `y` north, scaled
/// by the sphere radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gnomonic {
  center: LatLng,
  radius: f64,
}

impl Gnomonic {
  pub fn new(center: LatLng, radius: f64) -> Self {
    Gnomonic { center, radius }
  }

  #[inline]
  pub fn center(&self) -> LatLng {
    self.center
  }

  /// Returns `None` for points 90 degrees or more from the center, where the
  /// projection is undefined.
  pub fn forward(&self, geo: &LatLng) -> Option<Vec2d> {
    let r = great_circle_distance_rads(&self.center, geo);
    if r < EPSILON_RAD {
      return Some(Vec2d::new(0.0, 0.0));
    }
    if r >= M_PI_2 {
      return None;
    }
    let theta = M_PI_2 - geo_azimuth_rads(&self.center, geo);
    let rho = self.radius * r.tan();
    Some(Vec2d::new(rho * theta.cos(), rho * theta.sin()))
  }

  pub fn inverse(&self, p: &Vec2d) -> LatLng {
    let rho = p.x.hypot(p.y);
    if rho < f64::EPSILON {
      return self.center;
    }
    let r = (rho / self.radius).atan();
    let az = M_PI_2 - p.y.atan2(p.x);
    geo_destination(&self.center, az, r)
  }
}
