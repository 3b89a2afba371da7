// src/regions/clip.rs
//! Clip features split by quad.
//!
//! Each polygon is intersected with the boundary of every quad it touches
//! in a gnomonic projection centered on that quad, where the quad edges are
//! straight. The pieces are stored in the quad's own frame, scaled by the
//! clipper scale factor, alongside a bounding box of candidate cells.
//! Points go straight to the cell containing them.

use std::collections::BTreeMap;

use geo::{Area, BooleanOps, BoundingRect, Coord, LineString, Polygon, Rect};
use tracing::debug;

use super::source::{merge_attributes, Attributes, RegionFeature, RegionSource};
use crate::config::GenConfig;
use crate::constants::{CLIP_NUDGE, MAX_CLIP_COORD, M_SQRT3_2};
use crate::coords::quad::remap_overage;
use crate::grid::{Idgg, Sublattice};
use crate::latlng::densify_loop;
use crate::projection::Gnomonic;
use crate::types::{Aperture, CoordIJ, DgError, DgResult, GeoLoop, GeoPolygon, LatLng, Q2DDCoord, Q2DICoord, Vec2d};

/// Quad frame corners, counter-clockwise from the origin.
const QUAD_CORNERS: [Vec2d; 4] = [
  Vec2d::new(0.0, 0.0),
  Vec2d::new(1.0, 0.0),
  Vec2d::new(0.5, M_SQRT3_2),
  Vec2d::new(-0.5, M_SQRT3_2),
];

const QUAD_CENTER: Vec2d = Vec2d::new(0.25, M_SQRT3_2 / 2.0);

/// Options of the clipping pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSettings {
  /// Factor applied to projected coordinates before intersection.
  pub scale: f64,
  /// Maximum polygon edge length before projection, radians. 0 disables.
  pub geodetic_densify: f64,
  pub use_holes: bool,
  /// Collect attributes from every feature a cell meets instead of
  /// stopping at the first.
  pub build_attributes: bool,
}

impl ClipSettings {
  pub fn from_config(cfg: &GenConfig) -> Self {
    ClipSettings {
      scale: cfg.clipper_scale_factor,
      geodetic_densify: cfg.geodetic_densify.to_radians(),
      use_holes: cfg.clip_using_holes,
      build_attributes: cfg.build_attributes,
    }
  }
}

/// One clipped polygon piece in the scaled quad frame.
#[derive(Debug, Clone)]
pub(crate) struct ClipPolygon {
  pub(crate) shape: Polygon<f64>,
  pub(crate) bounds: Rect<f64>,
  pub(crate) attributes: Attributes,
}

/// The clip features falling in one quad.
#[derive(Debug, Clone)]
pub struct QuadClip {
  quad: u8,
  gnomonic: Gnomonic,
  /// Nudged quad boundary in the scaled gnomonic plane.
  boundary: Polygon<f64>,
  pub(crate) polygons: Vec<ClipPolygon>,
  pub(crate) points: BTreeMap<CoordIJ, Attributes>,
  used: bool,
  /// Extent of the polygon pieces in the scaled quad frame.
  pub(crate) min: Vec2d,
  pub(crate) max: Vec2d,
  /// Candidate cell box.
  lower_left: CoordIJ,
  upper_right: CoordIJ,
  over_i: bool,
  over_j: bool,
}

impl QuadClip {
  fn new(idgg: &Idgg, quad: u8, scale: f64) -> DgResult<Self> {
    let mut clip = QuadClip {
      quad,
      gnomonic: Gnomonic::new(LatLng::default(), 1.0),
      boundary: Polygon::new(LineString::new(Vec::new()), Vec::new()),
      polygons: Vec::new(),
      points: BTreeMap::new(),
      used: false,
      min: Vec2d::new(f64::MAX, f64::MAX),
      max: Vec2d::new(f64::MIN, f64::MIN),
      lower_left: CoordIJ::new(idgg.max_i(), idgg.max_j()),
      upper_right: CoordIJ::new(0, 0),
      over_i: false,
      over_j: false,
    };
    if quad == 0 || quad == 11 {
      return Ok(clip);
    }

    let center = idgg
      .q2dd_to_geo(&Q2DDCoord { quad, pos: QUAD_CENTER })?
      .ok_or(DgError::Projection { quad })?;
    clip.gnomonic = Gnomonic::new(center, 1.0);

    let mut ring = Vec::with_capacity(QUAD_CORNERS.len());
    for corner in QUAD_CORNERS {
      let (dx, dy) = (QUAD_CENTER.x - corner.x, QUAD_CENTER.y - corner.y);
      let len = dx.hypot(dy);
      let pos = Vec2d::new(corner.x + dx / len * CLIP_NUDGE, corner.y + dy / len * CLIP_NUDGE);
      let geo = idgg
        .q2dd_to_geo(&Q2DDCoord { quad, pos })?
        .ok_or(DgError::NudgeFailure { quad })?;
      let p = clip.gnomonic.forward(&geo).ok_or(DgError::Projection { quad })?;
      ring.push(scaled(&p, scale)?);
    }
    clip.boundary = Polygon::new(LineString::from(ring), Vec::new());
    Ok(clip)
  }

  #[inline]
  pub fn quad(&self) -> u8 {
    self.quad
  }

  /// True once any feature landed in this quad.
  #[inline]
  pub fn is_used(&self) -> bool {
    self.used
  }

  pub fn num_polygons(&self) -> usize {
    self.polygons.len()
  }

  pub fn num_points(&self) -> usize {
    self.points.len()
  }

  /// Inclusive candidate cell box, `None` for an unused quad.
  pub fn candidate_box(&self) -> Option<(CoordIJ, CoordIJ)> {
    self.used.then_some((self.lower_left, self.upper_right))
  }

  /// Whether the candidate box reached past the `i` and `j` edges.
  pub fn overage_flags(&self) -> (bool, bool) {
    (self.over_i, self.over_j)
  }

  pub(crate) fn in_box(&self, coord: &CoordIJ) -> bool {
    if self.quad == 0 || self.quad == 11 {
      return self.used;
    }
    self.used
      && coord.i >= self.lower_left.i
      && coord.i <= self.upper_right.i
      && coord.j >= self.lower_left.j
      && coord.j <= self.upper_right.j
  }

  fn expand_box(&mut self, c: &CoordIJ) {
    self.lower_left.i = self.lower_left.i.min(c.i);
    self.lower_left.j = self.lower_left.j.min(c.j);
    self.upper_right.i = self.upper_right.i.max(c.i);
    self.upper_right.j = self.upper_right.j.max(c.j);
  }

  /// Widens the candidate box by `skip` lattice steps, clamped to the quad.
  /// Reaching past the far edges sets the overage flags.
  fn pad_box(&mut self, skip: i64, max_i: i64, max_j: i64) {
    self.lower_left.i = (self.lower_left.i - skip).max(0);
    self.lower_left.j = (self.lower_left.j - skip).max(0);
    if self.upper_right.i <= max_i {
      self.upper_right.i += skip;
    }
    if self.upper_right.j <= max_j {
      self.upper_right.j += skip;
    }
    if self.upper_right.i > max_i {
      self.over_i = true;
      self.upper_right.i = max_i;
    }
    if self.upper_right.j > max_j {
      self.over_j = true;
      self.upper_right.j = max_j;
    }
  }
}

fn scaled(p: &Vec2d, scale: f64) -> DgResult<Coord<f64>> {
  let c = Coord {
    x: p.x * scale,
    y: p.y * scale,
  };
  if c.x.abs() > MAX_CLIP_COORD || c.y.abs() > MAX_CLIP_COORD {
    return Err(DgError::ClipRange(format!(
      "projected point ({}, {}) is out of range; lower clipper_scale_factor",
      p.x, p.y
    )));
  }
  Ok(c)
}

/// Clip features of all twelve quads, plus the cells each quad receives
/// from its neighbours across the quad edges.
#[derive(Debug, Clone)]
pub struct ClipRegions {
  pub(crate) idgg: Idgg,
  pub(crate) settings: ClipSettings,
  pub(crate) quads: Vec<QuadClip>,
  pub(crate) overage: Vec<BTreeMap<CoordIJ, Attributes>>,
  finished: bool,
}

impl ClipRegions {
  pub fn new(idgg: &Idgg, settings: ClipSettings) -> DgResult<Self> {
    if !(settings.scale > 0.0 && settings.scale.is_finite()) {
      return Err(DgError::Config(format!(
        "clipper_scale_factor {} must be positive",
        settings.scale
      )));
    }
    let quads = (0..12u8)
      .map(|q| QuadClip::new(idgg, q, settings.scale))
      .collect::<DgResult<Vec<_>>>()?;
    Ok(ClipRegions {
      idgg: idgg.clone(),
      settings,
      quads,
      overage: vec![BTreeMap::new(); 12],
      finished: false,
    })
  }

  #[inline]
  pub fn settings(&self) -> &ClipSettings {
    &self.settings
  }

  pub fn quad(&self, quad: u8) -> &QuadClip {
    &self.quads[usize::from(quad)]
  }

  /// Overage cells still waiting to be visited in `quad`.
  pub fn overage(&self, quad: u8) -> &BTreeMap<CoordIJ, Attributes> {
    &self.overage[usize::from(quad)]
  }

  pub fn pending_overage(&self) -> usize {
    self.overage.iter().map(BTreeMap::len).sum()
  }

  pub fn add_feature(&mut self, feature: &RegionFeature) -> DgResult<()> {
    match feature {
      RegionFeature::Polygon { polygon, attributes } => self.add_polygon(polygon, attributes),
      RegionFeature::Point { point, attributes } => self.add_point(point, attributes),
    }
  }

  /// Reads every feature of `source`. Returns the number read.
  pub fn add_source(&mut self, source: &mut dyn RegionSource) -> DgResult<usize> {
    let mut n = 0;
    while let Some(feature) = source.next_feature()? {
      self.add_feature(&feature)?;
      n += 1;
    }
    debug!(source = source.name(), features = n, "read clip features");
    Ok(n)
  }

  pub fn add_point(&mut self, point: &LatLng, attributes: &Attributes) -> DgResult<()> {
    let addr = self.idgg.geo_to_q2di(point)?;
    let clip = &mut self.quads[usize::from(addr.quad)];
    let slot = clip.points.entry(addr.coord).or_default();
    merge_attributes(slot, attributes);
    clip.used = true;
    clip.expand_box(&addr.coord);
    Ok(())
  }

  /// Splits a polygon among the quads its vertices fall in.
  pub fn add_polygon(&mut self, polygon: &GeoPolygon, attributes: &Attributes) -> DgResult<()> {
    let max_arc = self.settings.geodetic_densify;
    let exterior = densify_loop(&polygon.geoloop, max_arc);
    let holes: Vec<GeoLoop> = if self.settings.use_holes {
      polygon.holes.iter().map(|h| densify_loop(h, max_arc)).collect()
    } else {
      Vec::new()
    };

    let mut touched = [false; 12];
    for v in &exterior.verts {
      touched[usize::from(self.idgg.geo_to_q2dd(v).quad)] = true;
    }
    for quad in 1..=10u8 {
      if touched[usize::from(quad)] {
        self.clip_to_quad(quad, &exterior, &holes, attributes)?;
      }
    }
    Ok(())
  }

  fn clip_to_quad(&mut self, quad: u8, exterior: &GeoLoop, holes: &[GeoLoop], attributes: &Attributes) -> DgResult<()> {
    let scale = self.settings.scale;
    let clip = &self.quads[usize::from(quad)];
    let project = |l: &GeoLoop| -> DgResult<LineString<f64>> {
      l.verts
        .iter()
        .map(|v| {
          let p = clip.gnomonic.forward(v).ok_or(DgError::Projection { quad })?;
          scaled(&p, scale)
        })
        .collect::<DgResult<Vec<_>>>()
        .map(LineString::from)
    };
    let subject = Polygon::new(project(exterior)?, holes.iter().map(project).collect::<DgResult<_>>()?);
    let pieces = subject.intersection(&clip.boundary);

    let mut added = 0;
    for piece in pieces {
      if piece.unsigned_area() <= 0.0 {
        continue;
      }
      let shape = Polygon::new(
        self.to_quad_frame(quad, piece.exterior())?,
        piece
          .interiors()
          .iter()
          .map(|r| self.to_quad_frame(quad, r))
          .collect::<DgResult<_>>()?,
      );
      let Some(bounds) = shape.bounding_rect() else {
        continue;
      };
      self.quads[usize::from(quad)].polygons.push(ClipPolygon {
        shape,
        bounds,
        attributes: attributes.clone(),
      });
      added += 1;
    }
    if added > 0 {
      self.quads[usize::from(quad)].used = true;
    }
    debug!(quad, pieces = added, "clipped polygon to quad");
    Ok(())
  }

  /// Maps a ring from the scaled gnomonic plane of `quad` into its scaled
  /// quad frame, growing the quad's extent and candidate box.
  fn to_quad_frame(&mut self, quad: u8, ring: &LineString<f64>) -> DgResult<LineString<f64>> {
    let scale = self.settings.scale;
    let clip = &mut self.quads[usize::from(quad)];
    let mut out = Vec::with_capacity(ring.0.len());
    for c in &ring.0 {
      let geo = clip.gnomonic.inverse(&Vec2d::new(c.x / scale, c.y / scale));
      let q2dd = self.idgg.geo_to_q2dd(&geo);
      if q2dd.quad != quad {
        return Err(DgError::NudgeFailure { quad });
      }
      let p = scaled(&q2dd.pos, scale)?;
      clip.min = Vec2d::new(clip.min.x.min(p.x), clip.min.y.min(p.y));
      clip.max = Vec2d::new(clip.max.x.max(p.x), clip.max.y.max(p.y));
      let cell = self.idgg.snap(&q2dd.pos);
      clip.expand_box(&cell);
      out.push(p);
    }
    Ok(LineString::from(out))
  }

  /// Pads every candidate box and pushes the cells past each quad edge that
  /// meet the quad's features onto the neighbour owning them. Call once,
  /// after the last feature.
  pub fn finish(&mut self) -> DgResult<()> {
    if self.finished {
      return Ok(());
    }
    self.finished = true;

    let lattice = *self.idgg.lattice();
    let (max_i, max_j) = (self.idgg.max_i(), self.idgg.max_j());
    let skip = lattice_skip(&self.idgg);

    for quad in 1..=10u8 {
      let q = usize::from(quad);
      if !self.quads[q].used {
        continue;
      }
      self.quads[q].pad_box(skip, max_i, max_j);
      let (ll, ur) = (self.quads[q].lower_left, self.quads[q].upper_right);
      let (over_i, over_j) = self.quads[q].overage_flags();

      let mut strip = Vec::new();
      if over_j {
        strip.extend((ll.i..=ur.i).map(|i| CoordIJ::new(i, max_j + 1)));
      }
      if over_i {
        let last_j = if over_j && ur.j == max_j { max_j + 1 } else { ur.j };
        strip.extend((ll.j..=last_j).map(|j| CoordIJ::new(max_i + 1, j)));
      }

      let mut pushed = 0;
      for coord in strip.iter().filter(|c| lattice.is_lattice_point(c)) {
        let mut attrs = Attributes::new();
        if !self.quads[q].test_cell(&self.idgg, coord, &self.settings, &mut attrs)? {
          continue;
        }
        let dest = remap_overage(&Q2DICoord { quad, coord: *coord }, max_i, max_j)?;
        merge_attributes(self.overage[usize::from(dest.quad)].entry(dest.coord).or_default(), &attrs);
        pushed += 1;
      }
      debug!(
        quad,
        lower_left = %self.quads[q].lower_left,
        upper_right = %self.quads[q].upper_right,
        over_i,
        over_j,
        overage = pushed,
        "prepared quad clip box"
      );
    }
    Ok(())
  }

  /// Row-major walk over the lattice points of `quad`'s candidate box.
  pub fn scan(&self, quad: u8) -> BoxScan {
    let clip = self.quad(quad);
    let (lo, hi) = match clip.candidate_box() {
      Some(_) if quad == 0 || quad == 11 => (CoordIJ::new(0, 0), CoordIJ::new(0, 0)),
      Some(b) => b,
      // empty box
      None => (CoordIJ::new(1, 1), CoordIJ::new(0, 0)),
    };
    BoxScan {
      lattice: *self.idgg.lattice(),
      lo,
      hi,
      cur: lo,
    }
  }
}

/// Lattice steps added around each candidate box.
fn lattice_skip(idgg: &Idgg) -> i64 {
  let base = if idgg.aperture() == Aperture::Three { 3 } else { 1 };
  let spacing = (idgg.lattice().norm() as f64).sqrt().ceil() as i64;
  base * spacing.max(1)
}

/// Iterator returned by [`ClipRegions::scan`].
#[derive(Debug, Clone)]
pub struct BoxScan {
  lattice: Sublattice,
  lo: CoordIJ,
  hi: CoordIJ,
  cur: CoordIJ,
}

impl Iterator for BoxScan {
  type Item = CoordIJ;

  fn next(&mut self) -> Option<CoordIJ> {
    while self.cur.i <= self.hi.i {
      if self.cur.j > self.hi.j {
        self.cur = CoordIJ::new(self.cur.i + 1, self.lo.j);
        continue;
      }
      let c = self.cur;
      self.cur.j += 1;
      if self.lattice.is_lattice_point(&c) {
        return Some(c);
      }
    }
    None
  }
}
