// src/latlng.rs

use crate::constants::{DEFAULT_RADIUS_KM, EPSILON_RAD, M_180_PI, M_2PI, M_PI, M_PI_180};
use crate::math::vec3d::{_geo_to_vec3d, _vec3d_slerp, _vec3d_to_geo};
use crate::types::{GeoLoop, LatLng, Vec3d};

/// Normalizes radians to a value between `0.0` and `2 * PI`.
#[inline]
#[must_use]
pub(crate) fn _pos_angle_rads(rads: f64) -> f64 {
  let tmp = rads.rem_euclid(M_2PI);
  // rem_euclid can round up to exactly 2 * PI for tiny negative inputs
  if tmp >= M_2PI {
    0.0
  } else {
    tmp
  }
}

/// Determines if the components of two spherical coordinates are within some
/// threshold distance of each other.
#[inline]
#[must_use]
pub fn geo_almost_equal_threshold(p1: &LatLng, p2: &LatLng, threshold: f64) -> bool {
  (p1.lat - p2.lat).abs() < threshold && (p1.lng - p2.lng).abs() < threshold
}

/// Constrains longitude to the range `[-PI, PI]`.
#[inline]
#[must_use]
pub(crate) fn constrain_lng(mut lng: f64) -> f64 {
  while lng > M_PI {
    lng -= M_2PI;
  }
  while lng < -M_PI {
    lng += M_2PI;
  }
  lng
}

/// Determines the azimuth from p1 to p2 in radians, clockwise from north.
#[inline]
#[must_use]
pub fn geo_azimuth_rads(p1: &LatLng, p2: &LatLng) -> f64 {
  let dlng = p2.lng - p1.lng;
  (dlng.sin() * p2.lat.cos()).atan2(p1.lat.cos() * p2.lat.sin() - p1.lat.sin() * p2.lat.cos() * dlng.cos())
}

/// Returns the point `distance` radians from `origin` along azimuth `az`
/// (radians clockwise from north).
///
/// The result is `origin` moved along the great circle spanned by `origin`
/// and its local tangent `cos(az)·north + sin(az)·east`. At a pole the
/// north and east tangents follow the meridian of `origin.lng`.
pub fn geo_destination(origin: &LatLng, az: f64, distance: f64) -> LatLng {
  if distance < EPSILON_RAD {
    return *origin;
  }
  let mut p = Vec3d::default();
  _geo_to_vec3d(origin, &mut p);
  let (sin_lat, cos_lat) = origin.lat.sin_cos();
  let (sin_lng, cos_lng) = origin.lng.sin_cos();
  let north = Vec3d {
    x: -sin_lat * cos_lng,
    y: -sin_lat * sin_lng,
    z: cos_lat,
  };
  let east = Vec3d {
    x: -sin_lng,
    y: cos_lng,
    z: 0.0,
  };
  let (sin_az, cos_az) = az.sin_cos();
  let (sin_d, cos_d) = distance.sin_cos();
  let t = |p: f64, n: f64, e: f64| p * cos_d + (n * cos_az + e * sin_az) * sin_d;
  let v = Vec3d {
    x: t(p.x, north.x, east.x),
    y: t(p.y, north.y, east.y),
    z: t(p.z, north.z, east.z),
  };
  let mut out = LatLng::default();
  _vec3d_to_geo(&v, &mut out);
  out
}

/// The great circle distance in radians between two spherical coordinates.
///
/// This function uses the Haversine formula.
/// For math details, see:
///     https://en.wikipedia.org/wiki/Haversine_formula
pub fn great_circle_distance_rads(a: &LatLng, b: &LatLng) -> f64 {
  let sin_lat_half = ((b.lat - a.lat) * 0.5).sin();
  let sin_lng_half = ((b.lng - a.lng) * 0.5).sin();
  let h = sin_lat_half * sin_lat_half + a.lat.cos() * b.lat.cos() * sin_lng_half * sin_lng_half;
  let h = h.clamp(0.0, 1.0);
  2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// The great circle distance in kilometers between two spherical coordinates,
/// on a sphere of the given radius.
pub fn great_circle_distance_km(a: &LatLng, b: &LatLng, radius_km: f64) -> f64 {
  great_circle_distance_rads(a, b) * radius_km
}

/// Converts degrees to radians.
pub fn degs_to_rads(degrees: f64) -> f64 {
  degrees * M_PI_180
}

/// Converts radians to degrees.
pub fn rads_to_degs(radians: f64) -> f64 {
  radians * M_180_PI
}

/// The point diametrically opposite `p`.
#[inline]
#[must_use]
pub fn antipode(p: &LatLng) -> LatLng {
  LatLng {
    lat: -p.lat,
    lng: constrain_lng(p.lng + M_PI),
  }
}

/// Surface area of the sphere in square kilometers.
#[inline]
pub fn sphere_area_km2(radius_km: f64) -> f64 {
  4.0 * M_PI * radius_km * radius_km
}

/// Earth surface area for the default authalic radius.
#[inline]
pub fn earth_area_km2() -> f64 {
  sphere_area_km2(DEFAULT_RADIUS_KM)
}

/// Inserts great-circle points so that no edge of the closed loop spans more
/// than `max_arc` radians. A non-positive `max_arc` returns a copy.
pub fn densify_loop(geoloop: &GeoLoop, max_arc: f64) -> GeoLoop {
  let n = geoloop.verts.len();
  if max_arc <= 0.0 || n < 2 {
    return geoloop.clone();
  }

  let mut verts = Vec::with_capacity(n);
  for idx in 0..n {
    let a = geoloop.verts[idx];
    let b = geoloop.verts[(idx + 1) % n];
    verts.push(a);

    let dist = great_circle_distance_rads(&a, &b);
    let segments = (dist / max_arc).ceil() as usize;
    if segments <= 1 {
      continue;
    }

    let mut va = Vec3d::default();
    let mut vb = Vec3d::default();
    _geo_to_vec3d(&a, &mut va);
    _geo_to_vec3d(&b, &mut vb);
    for s in 1..segments {
      let t = s as f64 / segments as f64;
      let v = _vec3d_slerp(&va, &vb, t);
      let mut g = LatLng::default();
      _vec3d_to_geo(&v, &mut g);
      verts.push(g);
    }
  }
  GeoLoop { verts }
}
