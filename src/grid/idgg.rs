// src/grid/idgg.rs
//! A single resolution of the icosahedral hexagon grid.
//!
//! Cells are addressed in the Q2DI frame: quads 0 and 11 hold one pentagon
//! each, quads 1-10 hold an `N' x N'` block of substrate points of which only
//! the points of the resolution's [`Sublattice`] are cells.

use std::sync::Arc;

use crate::constants::{MAX_DGG_RES, M_PI, M_PI_180, QUANTIFY_NUDGE};
use crate::coords::quad::{in_quad_range, remap_overage};
use crate::coords::vertex::{projtri_to_quad, quad_to_vertex, region_start, vertex_to_projtri, VERT_TABLE};
use crate::grid::lattice::{eis_add, eis_to_plane, plane_to_eis, Sublattice};
use crate::math::vec2d::{_v2d_mag, _v2d_rotate60};
use crate::projection::Isea;
use crate::types::{Aperture, CoordIJ, DgError, DgResult, GeoLoop, LatLng, Q2DDCoord, Q2DICoord, Vec2d};

/// Distance below which a cell center is taken to sit on an icosahedron vertex.
const VERTEX_TOLERANCE: f64 = 1e-9;
/// Scale applied to cell vertices when they decide which coarser cells a
/// cell overlaps; keeps them clear of the coarser cell edges.
pub(crate) const VERTEX_SHRINK: f64 = 0.99;

#[derive(Debug, Clone)]
pub struct Idgg {
  res: usize,
  aperture: Aperture,
  lattice: Sublattice,
  n_cells: u64,
  isea: Arc<Isea>,
}

impl Idgg {
  /// Builds the grid reached after `n3`, `n4` and `n7` steps of aperture 3, 4
  /// and 7. `aperture` is the aperture of the step into this resolution.
  pub fn new(res: usize, aperture: Aperture, counts: (usize, usize, usize), isea: Arc<Isea>) -> DgResult<Self> {
    if res > MAX_DGG_RES {
      return Err(DgError::Resolution { res, max: MAX_DGG_RES });
    }
    let (n3, n4, n7) = counts;
    let lattice = Sublattice::new(n3, n4, n7)?;
    let size = lattice.size() as u128;
    let n_cells = (10 * size * size / lattice.norm() as u128 + 2)
      .try_into()
      .map_err(|_| DgError::Config(format!("resolution {res} has too many cells to count")))?;
    Ok(Idgg {
      res,
      aperture,
      lattice,
      n_cells,
      isea,
    })
  }

  #[inline]
  pub fn res(&self) -> usize {
    self.res
  }

  #[inline]
  pub fn aperture(&self) -> Aperture {
    self.aperture
  }

  #[inline]
  pub fn lattice(&self) -> &Sublattice {
    &self.lattice
  }

  #[inline]
  pub fn isea(&self) -> &Isea {
    &self.isea
  }

  #[inline]
  pub fn n_cells(&self) -> u64 {
    self.n_cells
  }

  #[inline]
  pub fn max_i(&self) -> i64 {
    self.lattice.max_i()
  }

  #[inline]
  pub fn max_j(&self) -> i64 {
    self.lattice.max_j()
  }

  /// True when the hexagons of this resolution are aligned with the quad axes.
  #[inline]
  pub fn is_class_i(&self) -> bool {
    self.lattice.is_class_i()
  }

  /// True when no cell straddles a quad edge. Hexagons centered on the
  /// edges always do, so clipping must check the cells past each edge.
  #[inline]
  pub fn is_congruent(&self) -> bool {
    false
  }

  /// Returns true if `addr` names a cell of this grid.
  pub fn is_valid(&self, addr: &Q2DICoord) -> bool {
    match addr.quad {
      0 | 11 => addr.coord.i == 0 && addr.coord.j == 0,
      1..=10 => in_quad_range(&addr.coord, self.max_i(), self.max_j()) && self.lattice.is_lattice_point(&addr.coord),
      _ => false,
    }
  }

  fn check_valid(&self, addr: &Q2DICoord) -> DgResult<()> {
    if self.is_valid(addr) {
      Ok(())
    } else {
      Err(DgError::InvalidAddress(format!("{addr} is not a cell at resolution {}", self.res)))
    }
  }

  // ---- continuous frames ----

  /// Projects a geodetic point into the quad frame of the triangle holding it.
  pub fn geo_to_q2dd(&self, geo: &LatLng) -> Q2DDCoord {
    projtri_to_quad(&self.isea.forward(geo))
  }

  /// Unprojects a quad-frame point. Returns `None` for points in the wedge
  /// removed around a pentagon.
  pub fn q2dd_to_geo(&self, q2dd: &Q2DDCoord) -> DgResult<Option<LatLng>> {
    let v = quad_to_vertex(q2dd)?;
    if !v.keep {
      return Ok(None);
    }
    match vertex_to_projtri(&v)? {
      Some(p) => self.isea.inverse(&p).map(Some),
      None => Ok(None),
    }
  }

  /// Center of a cell in its quad frame.
  pub fn q2di_to_q2dd(&self, addr: &Q2DICoord) -> Q2DDCoord {
    match addr.quad {
      0 | 11 => Q2DDCoord::new(addr.quad, 0.0, 0.0),
      q => {
        let n = self.lattice.size() as f64;
        let p = eis_to_plane(addr.coord.i as f64, addr.coord.j as f64);
        Q2DDCoord::new(q, p.x / n, p.y / n)
      }
    }
  }

  // ---- quantification ----

  /// Nearest lattice point to a quad-frame position, without remapping.
  pub(crate) fn snap(&self, pos: &Vec2d) -> CoordIJ {
    let n = self.lattice.size() as f64;
    let (i, j) = plane_to_eis(&Vec2d::new(pos.x * n, pos.y * n));
    self.lattice.quantize(i, j)
  }

  /// Cell containing a quad-frame point.
  ///
  /// A point whose nearest lattice point falls outside the quad's band is
  /// nudged toward the quad interior once; the result is then moved onto the
  /// neighboring quad that owns it.
  pub fn quantify(&self, q2dd: &Q2DDCoord) -> DgResult<Q2DICoord> {
    match q2dd.quad {
      0 | 11 => {
        // the polar frames own one cell; anything else belongs to quads 1-10
        if _v2d_mag(&q2dd.pos) * self.lattice.size() as f64 <= 0.5 * (self.lattice.norm() as f64).sqrt() {
          return Ok(Q2DICoord::new(q2dd.quad, 0, 0));
        }
        let geo = self.q2dd_to_geo(q2dd)?.ok_or_else(|| DgError::CoordinateRange {
          context: "quantify",
          coord: format!("{} ({}, {})", q2dd.quad, q2dd.pos.x, q2dd.pos.y),
        })?;
        return self.geo_to_q2di(&geo);
      }
      1..=10 => {}
      q => return Err(DgError::InvalidAddress(format!("quad {q} out of range"))),
    }

    let te = self.lattice.size();
    let (lo, hi) = if self.aperture == Aperture::Seven { (-2, te + 2) } else { (0, te) };
    let out_low = |c: &CoordIJ| c.i < lo || c.j < lo;
    let out_high = |c: &CoordIJ| c.i > hi || c.j > hi;

    let mut coord = self.snap(&q2dd.pos);
    let nudge = if out_low(&coord) {
      Some(QUANTIFY_NUDGE)
    } else if out_high(&coord) {
      Some(-QUANTIFY_NUDGE)
    } else {
      None
    };
    if let Some(d) = nudge {
      coord = self.snap(&Vec2d::new(q2dd.pos.x + d, q2dd.pos.y + d));
      if out_low(&coord) || out_high(&coord) {
        return Err(DgError::CoordinateRange {
          context: "quantify",
          coord: Q2DICoord { quad: q2dd.quad, coord }.to_string(),
        });
      }
    }

    remap_overage(&Q2DICoord { quad: q2dd.quad, coord }, self.max_i(), self.max_j())
  }

  pub fn geo_to_q2di(&self, geo: &LatLng) -> DgResult<Q2DICoord> {
    self.quantify(&self.geo_to_q2dd(geo))
  }

  pub fn cell_center(&self, addr: &Q2DICoord) -> DgResult<LatLng> {
    self.check_valid(addr)?;
    self.q2dd_to_geo(&self.q2di_to_q2dd(addr))?.ok_or_else(|| DgError::CoordinateRange {
      context: "cell_center",
      coord: addr.to_string(),
    })
  }

  // ---- points near a cell, possibly across quad edges ----

  /// Moves a point given in the frame of `quad`, possibly past its edges, onto
  /// the quad and triangle that hold it. `center` is the center of the cell the
  /// point was derived from, in the same frame: points in a removed pentagon
  /// wedge fold across whichever wedge edge is closer to it, and are dropped
  /// when the cell is the pentagon itself.
  pub(crate) fn fold_to_quad(&self, quad: u8, pos: &Vec2d, center: &Vec2d) -> DgResult<Option<Q2DDCoord>> {
    let mut v = quad_to_vertex(&Q2DDCoord { quad, pos: *pos })?;
    if !v.keep {
      // the quad frame is the frame of the wedge's vertex
      let c = *center;
      if _v2d_mag(&c) < VERTEX_TOLERANCE {
        return Ok(None);
      }
      let gap = VERT_TABLE[v.vert as usize]
        .iter()
        .position(Option::is_none)
        .unwrap_or(0);
      let low = f64::from(region_start(gap)) * 60.0 * M_PI_180;
      let angle = c.y.atan2(c.x);
      let sixths = if ang_dist(angle, low) <= ang_dist(angle, low + 60.0 * M_PI_180) { 1 } else { -1 };
      v.pos = _v2d_rotate60(&v.pos, sixths);
      v.keep = true;
    }
    Ok(vertex_to_projtri(&v)?.map(|p| projtri_to_quad(&p)))
  }

  fn point_to_geo(&self, quad: u8, pos: &Vec2d, center: &Vec2d) -> DgResult<Option<LatLng>> {
    match self.fold_to_quad(quad, pos, center)? {
      Some(q) => self.q2dd_to_geo(&q),
      None => Ok(None),
    }
  }

  fn offset_pos(&self, center: &Vec2d, off: (f64, f64), scale: f64) -> Vec2d {
    let n = self.lattice.size() as f64;
    let p = eis_to_plane(off.0, off.1);
    Vec2d::new(center.x + scale * p.x / n, center.y + scale * p.y / n)
  }

  // ---- cell geometry ----

  /// Cell vertices in the cell's own quad frame, counter-clockwise. Vertices
  /// may lie past the quad edges; a pentagon's vertex in the removed wedge is
  /// left out.
  pub fn cell_boundary_q2dd(&self, addr: &Q2DICoord) -> DgResult<Vec<Q2DDCoord>> {
    self.check_valid(addr)?;
    let c = self.q2di_to_q2dd(addr);
    let mut verts = Vec::with_capacity(6);
    for k in 0..6 {
      let p = self.offset_pos(&c.pos, self.lattice.vertex_offset(k), 1.0);
      if self.is_pentagon(addr) && !quad_to_vertex(&Q2DDCoord { quad: addr.quad, pos: p })?.keep {
        continue;
      }
      verts.push(Q2DDCoord { quad: addr.quad, pos: p });
    }
    Ok(verts)
  }

  /// Cell boundary as a geodetic loop, with `densify` extra points on every edge.
  pub fn cell_boundary(&self, addr: &Q2DICoord, densify: usize) -> DgResult<GeoLoop> {
    self.check_valid(addr)?;
    let c = self.q2di_to_q2dd(addr);
    let corners: Vec<Vec2d> = (0..6)
      .map(|k| self.offset_pos(&c.pos, self.lattice.vertex_offset(k), 1.0))
      .collect();
    let mut verts = Vec::with_capacity(6 * (densify + 1));
    for k in 0..6 {
      let (a, b) = (corners[k], corners[(k + 1) % 6]);
      for s in 0..=densify {
        let t = s as f64 / (densify + 1) as f64;
        let p = Vec2d::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        if let Some(g) = self.point_to_geo(addr.quad, &p, &c.pos)? {
          verts.push(g);
        }
      }
    }
    Ok(GeoLoop::new(verts))
  }

  /// Hexagon vertices around the substrate point `coord` of an equatorial
  /// quad, in that quad's frame. `coord` need not be a cell of the quad.
  pub(crate) fn hex_vertices(&self, quad: u8, coord: &CoordIJ) -> [Vec2d; 6] {
    let c = self.q2di_to_q2dd(&Q2DICoord { quad, coord: *coord });
    std::array::from_fn(|k| self.offset_pos(&c.pos, self.lattice.vertex_offset(k), 1.0))
  }

  /// Cell vertices pulled slightly toward the cell center, as geodetic points.
  pub(crate) fn shrunk_vertices(&self, addr: &Q2DICoord) -> DgResult<Vec<LatLng>> {
    let c = self.q2di_to_q2dd(addr);
    let mut out = Vec::with_capacity(6);
    for k in 0..6 {
      let p = self.offset_pos(&c.pos, self.lattice.vertex_offset(k), VERTEX_SHRINK);
      if let Some(g) = self.point_to_geo(addr.quad, &p, &c.pos)? {
        out.push(g);
      }
    }
    Ok(out)
  }

  /// True for the twelve cells centered on icosahedron vertices.
  pub fn is_pentagon(&self, addr: &Q2DICoord) -> bool {
    matches!(addr.quad, 0 | 11) || (addr.coord.i == 0 && addr.coord.j == 0)
  }

  // ---- adjacency ----

  fn push_unique(out: &mut Vec<Q2DICoord>, addr: Q2DICoord, own: &Q2DICoord) {
    if addr != *own && !out.contains(&addr) {
      out.push(addr);
    }
  }

  /// Cell reached from `addr` by the substrate step `off`.
  fn step(&self, addr: &Q2DICoord, center: &Q2DDCoord, off: &CoordIJ) -> DgResult<Option<Q2DICoord>> {
    if !matches!(addr.quad, 0 | 11) {
      let n = eis_add(&addr.coord, off);
      if let Ok(r) = remap_overage(&Q2DICoord { quad: addr.quad, coord: n }, self.max_i(), self.max_j()) {
        return Ok(Some(r));
      }
    }
    let p = self.offset_pos(&center.pos, (off.i as f64, off.j as f64), 1.0);
    match self.fold_to_quad(addr.quad, &p, &center.pos)? {
      Some(q) => self.quantify(&q).map(Some),
      None => Ok(None),
    }
  }

  /// The cells sharing an edge with `addr`, counter-clockwise. Pentagons have five.
  pub fn neighbors(&self, addr: &Q2DICoord) -> DgResult<Vec<Q2DICoord>> {
    self.check_valid(addr)?;
    let center = self.q2di_to_q2dd(addr);
    let mut out = Vec::with_capacity(6);
    for k in 0..6 {
      let off = self.lattice.neighbor_offset(k);
      if let Some(n) = self.step(addr, &center, &off)? {
        Self::push_unique(&mut out, n, addr);
      }
    }
    Ok(out)
  }

  /// The six cells two steps away across each vertex of `addr`.
  pub fn neighbors_ring2(&self, addr: &Q2DICoord) -> DgResult<Vec<Q2DICoord>> {
    self.check_valid(addr)?;
    let center = self.q2di_to_q2dd(addr);
    let mut out = Vec::with_capacity(6);
    for k in 0..6 {
      let off = eis_add(&self.lattice.neighbor_offset(k), &self.lattice.neighbor_offset(k + 1));
      if let Some(n) = self.step(addr, &center, &off)? {
        Self::push_unique(&mut out, n, addr);
      }
    }
    Ok(out)
  }

  // ---- enumeration ----

  /// 1-based position of `addr` in enumeration order.
  pub fn seqnum(&self, addr: &Q2DICoord) -> DgResult<u64> {
    self.check_valid(addr)?;
    Ok(match addr.quad {
      0 => 1,
      11 => self.n_cells,
      q => {
        let l = &self.lattice;
        let (i, j) = (addr.coord.i, addr.coord.j);
        let in_quad = i * l.cells_per_row() + (j - l.row_offset(i)) / l.norm();
        (2 + i64::from(q - 1) * l.cells_per_quad() + in_quad) as u64
      }
    })
  }

  pub fn from_seqnum(&self, seqnum: u64) -> DgResult<Q2DICoord> {
    if seqnum == 0 || seqnum > self.n_cells {
      return Err(DgError::InvalidAddress(format!(
        "sequence number {seqnum} outside 1..={} at resolution {}",
        self.n_cells, self.res
      )));
    }
    if seqnum == 1 {
      return Ok(Q2DICoord::new(0, 0, 0));
    }
    if seqnum == self.n_cells {
      return Ok(Q2DICoord::new(11, 0, 0));
    }
    let l = &self.lattice;
    let t = (seqnum - 2) as i64;
    let quad = (t / l.cells_per_quad() + 1) as u8;
    let r = t % l.cells_per_quad();
    let i = r / l.cells_per_row();
    let j = l.row_offset(i) + (r % l.cells_per_row()) * l.norm();
    Ok(Q2DICoord::new(quad, i, j))
  }

  /// Cell following `addr` in enumeration order.
  pub fn next_cell(&self, addr: &Q2DICoord) -> Option<Q2DICoord> {
    match addr.quad {
      0 => Some(Q2DICoord::new(1, 0, 0)),
      1..=10 => {
        let l = &self.lattice;
        let j = addr.coord.j + l.norm();
        if j <= l.max_j() {
          return Some(Q2DICoord::new(addr.quad, addr.coord.i, j));
        }
        let i = addr.coord.i + 1;
        if i <= l.max_i() {
          Some(Q2DICoord::new(addr.quad, i, l.row_offset(i)))
        } else if addr.quad == 10 {
          Some(Q2DICoord::new(11, 0, 0))
        } else {
          Some(Q2DICoord::new(addr.quad + 1, 0, 0))
        }
      }
      _ => None,
    }
  }

  /// Every cell of the grid in enumeration order.
  pub fn cells(&self) -> Cells<'_> {
    Cells {
      grid: self,
      next: Some(Q2DICoord::new(0, 0, 0)),
    }
  }
}

fn ang_dist(a: f64, b: f64) -> f64 {
  let d = (a - b).rem_euclid(2.0 * M_PI);
  d.min(2.0 * M_PI - d)
}

/// Iterator over the cells of one grid; see [`Idgg::cells`].
#[derive(Debug, Clone)]
pub struct Cells<'a> {
  grid: &'a Idgg,
  next: Option<Q2DICoord>,
}

impl Iterator for Cells<'_> {
  type Item = Q2DICoord;

  fn next(&mut self) -> Option<Q2DICoord> {
    let cur = self.next?;
    self.next = self.grid.next_cell(&cur);
    Some(cur)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::{DEFAULT_VERT0_LAT, DEFAULT_VERT0_LON};
  use crate::latlng::great_circle_distance_rads;
  use crate::projection::IcosaPlacement;

  fn isea() -> Arc<Isea> {
    Arc::new(Isea::new(IcosaPlacement::new(
      LatLng::from_degrees(DEFAULT_VERT0_LAT, DEFAULT_VERT0_LON),
      0.0,
    )))
  }

  fn grid(ap: Aperture, counts: (usize, usize, usize)) -> Idgg {
    Idgg::new(counts.0 + counts.1 + counts.2, ap, counts, isea()).unwrap()
  }

  #[test]
  fn test_res0_has_twelve_cells() {
    let g = grid(Aperture::Four, (0, 0, 0));
    assert_eq!(g.n_cells(), 12);
    assert_eq!(g.cells().count(), 12);
  }

  #[test]
  fn test_cells_match_seqnums() {
    for (ap, counts) in [(Aperture::Four, (0, 2, 0)), (Aperture::Three, (3, 0, 0)), (Aperture::Seven, (0, 0, 1))] {
      let g = grid(ap, counts);
      let mut n = 0;
      for (k, c) in g.cells().enumerate() {
        assert!(g.is_valid(&c));
        assert_eq!(g.seqnum(&c).unwrap(), k as u64 + 1);
        assert_eq!(g.from_seqnum(k as u64 + 1).unwrap(), c);
        n += 1;
      }
      assert_eq!(n, g.n_cells());
    }
  }

  #[test]
  fn test_center_round_trip() {
    let g = grid(Aperture::Three, (3, 0, 0));
    for c in g.cells() {
      let geo = g.cell_center(&c).unwrap();
      assert_eq!(g.geo_to_q2di(&geo).unwrap(), c, "cell {c}");
    }
  }

  #[test]
  fn test_neighbor_counts() {
    let g = grid(Aperture::Four, (0, 2, 0));
    for c in g.cells() {
      let n = g.neighbors(&c).unwrap();
      let expected = if g.is_pentagon(&c) { 5 } else { 6 };
      assert_eq!(n.len(), expected, "cell {c}");
      for m in &n {
        assert!(g.is_valid(m));
      }
    }
  }

  #[test]
  fn test_neighbors_are_symmetric() {
    let g = grid(Aperture::Three, (1, 1, 0));
    for c in g.cells() {
      for n in g.neighbors(&c).unwrap() {
        assert!(g.neighbors(&n).unwrap().contains(&c), "{n} should neighbor {c}");
      }
    }
  }

  #[test]
  fn test_boundary_surrounds_center() {
    let g = grid(Aperture::Seven, (0, 0, 2));
    for c in g.cells() {
      let center = g.cell_center(&c).unwrap();
      let b = g.cell_boundary(&c, 0).unwrap();
      let expected = if g.is_pentagon(&c) { 5 } else { 6 };
      assert_eq!(b.verts.len(), expected, "cell {c}");
      let dists: Vec<f64> = b.verts.iter().map(|v| great_circle_distance_rads(&center, v)).collect();
      let mean = dists.iter().sum::<f64>() / dists.len() as f64;
      for d in dists {
        assert!((d - mean).abs() < 0.3 * mean, "cell {c}");
      }
    }
  }

  #[test]
  fn test_vertex0_is_quad0() {
    let g = grid(Aperture::Four, (0, 3, 0));
    let north = g.geo_to_q2di(&LatLng::from_degrees(DEFAULT_VERT0_LAT, DEFAULT_VERT0_LON)).unwrap();
    assert_eq!(north, Q2DICoord::new(0, 0, 0));
  }

  #[test]
  fn test_invalid_seqnum() {
    let g = grid(Aperture::Four, (0, 1, 0));
    assert!(g.from_seqnum(0).is_err());
    assert!(g.from_seqnum(g.n_cells() + 1).is_err());
  }
}
