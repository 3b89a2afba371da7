// src/projection/icosa.rs

use crate::constants::{ICOSA_EDGE_RADS, M_PI, NUM_ICOSA_TRIS, NUM_ICOSA_VERTS};
use crate::coords::vertex::TRI_VERTS;
use crate::latlng::{antipode, geo_destination};
use crate::math::vec3d::{_geo_to_vec3d, _vec3d_cross, _vec3d_dot, _vec3d_to_geo};
use crate::types::{LatLng, Vec3d};

const RING_STEP: f64 = 72.0 * crate::constants::M_PI_180;
const RING_OFFSET: f64 = 36.0 * crate::constants::M_PI_180;

/// An icosahedron inscribed in the sphere, fixed by the position of vertex 0
/// and the azimuth from vertex 0 to vertex 1.
#[derive(Debug, Clone, PartialEq)]
pub struct IcosaPlacement {
  vert0: LatLng,
  azimuth: f64,
  verts: [LatLng; NUM_ICOSA_VERTS],
  vert_vecs: [Vec3d; NUM_ICOSA_VERTS],
  face_centers: [Vec3d; NUM_ICOSA_TRIS],
  // tangent unit vectors at each face center: toward corner A, and 90
  // degrees counter-clockwise from it seen from outside
  face_e1: [Vec3d; NUM_ICOSA_TRIS],
  face_e2: [Vec3d; NUM_ICOSA_TRIS],
}

impl IcosaPlacement {
  /// Places the icosahedron. `azimuth` is in radians, clockwise from north.
  pub fn new(vert0: LatLng, azimuth: f64) -> Self {
    let verts_cw = Self::ring_vertices(&vert0, azimuth, 1.0);
    let verts = if Self::is_face0_ccw(&verts_cw) {
      verts_cw
    } else {
      Self::ring_vertices(&vert0, azimuth, -1.0)
    };

    let mut vert_vecs = [Vec3d::default(); NUM_ICOSA_VERTS];
    for (v, vec) in verts.iter().zip(vert_vecs.iter_mut()) {
      _geo_to_vec3d(v, vec);
    }

    let mut face_centers = [Vec3d::default(); NUM_ICOSA_TRIS];
    for (t, center) in face_centers.iter_mut().enumerate() {
      let [a, b, c] = TRI_VERTS[t];
      let (a, b, c) = (vert_vecs[a as usize], vert_vecs[b as usize], vert_vecs[c as usize]);
      let sum = Vec3d {
        x: a.x + b.x + c.x,
        y: a.y + b.y + c.y,
        z: a.z + b.z + c.z,
      };
      let len = _vec3d_dot(&sum, &sum).sqrt();
      *center = Vec3d {
        x: sum.x / len,
        y: sum.y / len,
        z: sum.z / len,
      };
    }

    let mut face_e1 = [Vec3d::default(); NUM_ICOSA_TRIS];
    let mut face_e2 = [Vec3d::default(); NUM_ICOSA_TRIS];
    for t in 0..NUM_ICOSA_TRIS {
      let c = &face_centers[t];
      let a = &vert_vecs[TRI_VERTS[t][0] as usize];
      let d = _vec3d_dot(a, c);
      let tangent = Vec3d {
        x: a.x - d * c.x,
        y: a.y - d * c.y,
        z: a.z - d * c.z,
      };
      let len = _vec3d_dot(&tangent, &tangent).sqrt();
      face_e1[t] = Vec3d {
        x: tangent.x / len,
        y: tangent.y / len,
        z: tangent.z / len,
      };
      face_e2[t] = _vec3d_cross(c, &face_e1[t]);
    }

    IcosaPlacement {
      vert0,
      azimuth,
      verts,
      vert_vecs,
      face_centers,
      face_e1,
      face_e2,
    }
  }

  // `sense` is +1 to step the rings clockwise from vertex 1, -1 for counter-clockwise.
  fn ring_vertices(vert0: &LatLng, azimuth: f64, sense: f64) -> [LatLng; NUM_ICOSA_VERTS] {
    let mut verts = [LatLng::default(); NUM_ICOSA_VERTS];
    verts[0] = *vert0;
    for k in 1..=5 {
      let az = azimuth + sense * RING_STEP * (k - 1) as f64;
      verts[k] = geo_destination(vert0, az, ICOSA_EDGE_RADS);
    }
    for k in 6..=10 {
      let az = azimuth + sense * (RING_OFFSET + RING_STEP * (k - 6) as f64);
      verts[k] = geo_destination(vert0, az, M_PI - ICOSA_EDGE_RADS);
    }
    verts[11] = antipode(vert0);
    verts
  }

  // Face 0 runs v1, v2, v0; it must turn counter-clockwise seen from outside.
  fn is_face0_ccw(verts: &[LatLng; NUM_ICOSA_VERTS]) -> bool {
    let mut a = Vec3d::default();
    let mut b = Vec3d::default();
    let mut c = Vec3d::default();
    _geo_to_vec3d(&verts[1], &mut a);
    _geo_to_vec3d(&verts[2], &mut b);
    _geo_to_vec3d(&verts[0], &mut c);
    _vec3d_dot(&a, &_vec3d_cross(&b, &c)) > 0.0
  }

  #[inline]
  pub fn vert0(&self) -> LatLng {
    self.vert0
  }

  /// Azimuth from vertex 0 to vertex 1, radians.
  #[inline]
  pub fn azimuth(&self) -> f64 {
    self.azimuth
  }

  #[inline]
  pub fn vertex(&self, v: usize) -> LatLng {
    self.verts[v]
  }

  pub fn face_center(&self, t: usize) -> LatLng {
    let mut g = LatLng::default();
    _vec3d_to_geo(&self.face_centers[t], &mut g);
    g
  }

  /// Face whose center is closest to the unit vector `p`; the face
  /// triangles are exactly the Voronoi regions of their centers.
  pub(crate) fn nearest_face(&self, p: &Vec3d) -> usize {
    let mut best = 0;
    let mut best_dot = f64::MIN;
    for (t, c) in self.face_centers.iter().enumerate() {
      let d = _vec3d_dot(p, c);
      if d > best_dot {
        best_dot = d;
        best = t;
      }
    }
    best
  }

  /// Center and tangent frame of face `t`.
  #[inline]
  pub(crate) fn face_frame(&self, t: usize) -> (&Vec3d, &Vec3d, &Vec3d) {
    (&self.face_centers[t], &self.face_e1[t], &self.face_e2[t])
  }
}
