// src/coords/vertex.rs

use crate::constants::{M_SQRT3, M_SQRT3_2, SUBTRI_TOLERANCE};
use crate::math::vec2d::{_v2d_add, _v2d_rotate60, _v2d_sub};
use crate::types::{DgError, DgResult, ProjTriCoord, Q2DDCoord, Vec2d, VertexCoord};

const H: f64 = 0.5;
const S: f64 = M_SQRT3_2;

/// Placement of a projected triangle inside its quad.
///
/// A triangle point `p` lands in the quad frame at `rot(p, 60 * rot) - offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TriPlacement {
  pub quad: u8,
  /// 0 for the triangle above the quad diagonal, 1 for the one below it.
  pub subtri: u8,
  pub offset: Vec2d,
  pub rot: i32,
}

const fn tri(quad: u8, subtri: u8, x: f64, y: f64, rot: i32) -> TriPlacement {
  TriPlacement {
    quad,
    subtri,
    offset: Vec2d { x, y },
    rot,
  }
}

#[rustfmt::skip]
pub(crate) static TRI_TABLE: [TriPlacement; 20] = [
    tri(1, 0, 0.0, 0.0, 1), tri(2, 0, 0.0, 0.0, 1), tri(3, 0, 0.0, 0.0, 1),
    tri(4, 0, 0.0, 0.0, 1), tri(5, 0, 0.0, 0.0, 1),
    tri(1, 1, -H, -S, 4),   tri(2, 1, -H, -S, 4),   tri(3, 1, -H, -S, 4),
    tri(4, 1, -H, -S, 4),   tri(5, 1, -H, -S, 4),
    tri(6, 0, 0.0, 0.0, 1), tri(7, 0, 0.0, 0.0, 1), tri(8, 0, 0.0, 0.0, 1),
    tri(9, 0, 0.0, 0.0, 1), tri(10, 0, 0.0, 0.0, 1),
    tri(6, 1, -H, -S, 4),   tri(7, 1, -H, -S, 4),   tri(8, 1, -H, -S, 4),
    tri(9, 1, -H, -S, 4),   tri(10, 1, -H, -S, 4),
];

/// Icosahedron vertices at the A `(0, 0)`, B `(1, 0)` and C `(1/2, sqrt(3)/2)`
/// corners of each projected triangle.
#[rustfmt::skip]
pub(crate) static TRI_VERTS: [[u8; 3]; 20] = [
    [1, 2, 0],  [2, 3, 0],  [3, 4, 0],  [4, 5, 0],  [5, 1, 0],
    [2, 1, 6],  [3, 2, 7],  [4, 3, 8],  [5, 4, 9],  [1, 5, 10],
    [6, 7, 2],  [7, 8, 3],  [8, 9, 4],  [9, 10, 5], [10, 6, 1],
    [7, 6, 11], [8, 7, 11], [9, 8, 11], [10, 9, 11], [6, 10, 11],
];

/// One sub-triangle of a vertex frame: the projected triangle it belongs to
/// and its placement, `p = rot(v + offset, -60 * rot)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VertSlot {
  pub tri: u8,
  pub offset: Vec2d,
  pub rot: i32,
}

const fn slot(tri: u8, x: f64, y: f64, rot: i32) -> Option<VertSlot> {
  Some(VertSlot {
    tri,
    offset: Vec2d { x, y },
    rot,
  })
}

/// Sub-triangle slots around every icosahedron vertex, indexed by the region
/// returned from [`classify_subtriangle`]. `None` marks the wedge removed
/// around each pentagon.
#[rustfmt::skip]
pub(crate) static VERT_TABLE: [[Option<VertSlot>; 6]; 12] = [
    // vertex 0
    [slot(1, -H, -S, 3),  slot(0, -1.0, 0.0, 2), slot(4, -H, S, 1),     None,
     slot(3, 1.0, 0.0, -1), slot(2, H, -S, -2)],
    // vertices 1 - 5
    [slot(0, 0.0, 0.0, 1), slot(5, -H, -S, 4),  slot(14, -H, S, 1),    None,
     slot(9, 0.0, 0.0, 3), slot(4, 1.0, 0.0, 0)],
    [slot(1, 0.0, 0.0, 1), slot(6, -H, -S, 4),  slot(10, -H, S, 1),    None,
     slot(5, 0.0, 0.0, 3), slot(0, 1.0, 0.0, 0)],
    [slot(2, 0.0, 0.0, 1), slot(7, -H, -S, 4),  slot(11, -H, S, 1),    None,
     slot(6, 0.0, 0.0, 3), slot(1, 1.0, 0.0, 0)],
    [slot(3, 0.0, 0.0, 1), slot(8, -H, -S, 4),  slot(12, -H, S, 1),    None,
     slot(7, 0.0, 0.0, 3), slot(2, 1.0, 0.0, 0)],
    [slot(4, 0.0, 0.0, 1), slot(9, -H, -S, 4),  slot(13, -H, S, 1),    None,
     slot(8, 0.0, 0.0, 3), slot(3, 1.0, 0.0, 0)],
    // vertices 6 - 10
    [slot(10, 0.0, 0.0, 1), slot(15, -H, -S, 4), slot(19, 0.0, 0.0, -1), slot(14, -H, S, 2),
     None,                  slot(5, H, -S, 4)],
    [slot(11, 0.0, 0.0, 1), slot(16, -H, -S, 4), slot(15, 0.0, 0.0, -1), slot(10, -H, S, 2),
     None,                  slot(6, H, -S, 4)],
    [slot(12, 0.0, 0.0, 1), slot(17, -H, -S, 4), slot(16, 0.0, 0.0, -1), slot(11, -H, S, 2),
     None,                  slot(7, H, -S, 4)],
    [slot(13, 0.0, 0.0, 1), slot(18, -H, -S, 4), slot(17, 0.0, 0.0, -1), slot(12, -H, S, 2),
     None,                  slot(8, H, -S, 4)],
    [slot(14, 0.0, 0.0, 1), slot(19, -H, -S, 4), slot(18, 0.0, 0.0, -1), slot(13, -H, S, 2),
     None,                  slot(9, H, -S, 4)],
    // vertex 11
    [slot(17, -H, -S, 3), slot(18, -1.0, 0.0, 2), slot(19, -H, S, 1),   slot(15, H, S, 0),
     None,                   slot(16, H, -S, -2)],
];

/// Triangle number of a vertex-frame point in the removed pentagon wedge.
pub(crate) const NO_TRI: u8 = 20;

/// Counter-clockwise start of each classification region, in sixths of a turn.
/// Regions are half-open, closed at their counter-clockwise end.
static REGION_START: [i32; 6] = [1, 0, 5, 4, 3, 2];

/// Projected triangle covering one half of a quad.
#[inline]
pub(crate) fn quad_tri(quad: u8, subtri: u8) -> u8 {
  match (quad, subtri) {
    (1..=5, 0) => quad - 1,
    (1..=5, _) => quad + 4,
    (_, 0) => quad + 4,
    _ => quad + 9,
  }
}

/// Classifies a vertex-frame point into one of the six sub-triangles around
/// the origin. The branch order decides points on the dividing lines.
pub fn classify_subtriangle(pos: &Vec2d) -> DgResult<usize> {
  let x = pos.x;
  let y = pos.y;
  let xs = M_SQRT3 * x;
  let tol = SUBTRI_TOLERANCE;

  if y >= -xs - tol && y > xs + tol {
    Ok(0)
  } else if (y.abs() <= tol && x.abs() <= tol) || (y <= xs + tol && y >= -tol) {
    Ok(1)
  } else if y < -tol && y > -xs + tol {
    Ok(2)
  } else if y <= -xs + tol && y < xs - tol {
    Ok(3)
  } else if y >= xs - tol && y < -tol {
    Ok(4)
  } else if y >= -tol && y < -xs - tol {
    Ok(5)
  } else {
    Err(DgError::CoordinateRange {
      context: "classify_subtriangle",
      coord: format!("({x}, {y})"),
    })
  }
}

/// Start angle of a classification region, in sixths of a turn.
#[inline]
pub(crate) fn region_start(region: usize) -> i32 {
  REGION_START[region]
}

/// Moves a point from a quad frame onto the projected triangle covering its
/// half of the quad. Points beyond the quad edges extend that triangle's plane.
pub fn quad_to_projtri(q2dd: &Q2DDCoord) -> ProjTriCoord {
  let b = q2dd.pos.y / S;
  let a = q2dd.pos.x + b / 2.0;
  let subtri = if b >= a { 0 } else { 1 };
  let t = quad_tri(q2dd.quad, subtri);
  let place = &TRI_TABLE[t as usize];
  let pos = _v2d_rotate60(&_v2d_add(&q2dd.pos, &place.offset), -place.rot);
  ProjTriCoord { tri: t, pos }
}

/// Places a projected triangle point in its quad frame.
pub fn projtri_to_quad(p: &ProjTriCoord) -> Q2DDCoord {
  let place = &TRI_TABLE[p.tri as usize];
  let pos = _v2d_sub(&_v2d_rotate60(&p.pos, place.rot), &place.offset);
  Q2DDCoord { quad: place.quad, pos }
}

/// Re-expresses a projected triangle point in the frame of the vertex at the
/// origin of the triangle's quad.
pub fn projtri_to_vertex(p: &ProjTriCoord) -> DgResult<VertexCoord> {
  if usize::from(p.tri) >= TRI_TABLE.len() {
    return Err(DgError::InvalidAddress(format!("projected triangle {}", p.tri)));
  }
  let q = projtri_to_quad(p);
  Ok(VertexCoord {
    vert: q.quad,
    tri: p.tri,
    keep: true,
    pos: q.pos,
  })
}

/// Projects a vertex-frame point back onto the projected triangle containing
/// it. Returns `None` for points in the removed pentagon wedge.
pub fn vertex_to_projtri(v: &VertexCoord) -> DgResult<Option<ProjTriCoord>> {
  let region = classify_subtriangle(&v.pos)?;
  Ok(VERT_TABLE[v.vert as usize][region].map(|s| ProjTriCoord {
    tri: s.tri,
    pos: _v2d_rotate60(&_v2d_add(&v.pos, &s.offset), -s.rot),
  }))
}

/// Expresses a quad-frame point in the frame of the icosahedron vertex at the
/// quad's origin. Every quad frame is the frame of its origin vertex, so only
/// the sub-triangle holding the point is looked up.
pub fn quad_to_vertex(q2dd: &Q2DDCoord) -> DgResult<VertexCoord> {
  if q2dd.quad > 11 {
    return Err(DgError::InvalidAddress(format!("quad {} out of range", q2dd.quad)));
  }
  let region = classify_subtriangle(&q2dd.pos)?;
  let slot = VERT_TABLE[q2dd.quad as usize][region];
  Ok(VertexCoord {
    vert: q2dd.quad,
    tri: slot.map_or(NO_TRI, |s| s.tri),
    keep: slot.is_some(),
    pos: q2dd.pos,
  })
}
