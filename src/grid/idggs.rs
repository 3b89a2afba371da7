// src/grid/idggs.rs
//! Multi-resolution grid systems sharing one icosahedron placement.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::aperture::{ApertureSequence, ApertureSpec};
use crate::constants::{M_PI, REGION_CENTER_AZIMUTH_POINT, REGION_CENTER_VERT0};
use crate::grid::idgg::Idgg;
use crate::grid::stats::GridStats;
use crate::latlng::geo_azimuth_rads;
use crate::projection::{Gnomonic, IcosaPlacement, Isea};
use crate::types::{Aperture, DgError, DgResult, HierNdxSystem, LatLng, ProjectionType, Q2DICoord, Topology, Vec2d};

/// Construction parameters of an [`Idggs`].
#[derive(Debug, Clone, PartialEq)]
pub struct IdggsParams {
  pub vert0: LatLng,
  /// Azimuth from vertex 0 to vertex 1, degrees clockwise from north.
  pub azimuth_degs: f64,
  pub apertures: ApertureSpec,
  pub max_res: usize,
  pub topology: Topology,
  pub projection: ProjectionType,
  pub superfund: bool,
  pub hier_ndx: HierNdxSystem,
  pub radius_km: f64,
}

/// Ordered grids for resolutions `0..=max_res`.
#[derive(Debug, Clone)]
pub struct Idggs {
  params: IdggsParams,
  seq: ApertureSequence,
  isea: Arc<Isea>,
  grids: Vec<Idgg>,
  stats: Vec<GridStats>,
}

impl Idggs {
  pub fn new(params: IdggsParams) -> DgResult<Self> {
    if params.topology != Topology::Hexagon {
      return Err(DgError::Config(format!(
        "dggs_topology {:?} is not supported; only HEXAGON grids are generated",
        params.topology
      )));
    }
    if params.projection != ProjectionType::Isea {
      return Err(DgError::Config(format!("dggs_proj {:?} is not supported", params.projection)));
    }
    if params.superfund && params.apertures != (ApertureSpec::Mixed43 { num_ap4: 2 }) {
      return Err(DgError::Config(
        "Superfund grid requires dggs_aperture_type of MIXED43 and dggs_num_aperture_4_res of 2".into(),
      ));
    }

    let seq = params.apertures.to_sequence(params.max_res)?;
    check_hier_ndx(params.hier_ndx, &seq)?;

    let icosa = IcosaPlacement::new(params.vert0, params.azimuth_degs.to_radians());
    let isea = Arc::new(Isea::new(icosa));

    let first = seq.get_aperture(1).unwrap_or(Aperture::Four);
    let mut grids = Vec::with_capacity(params.max_res + 1);
    let mut stats = Vec::with_capacity(params.max_res + 1);
    let mut scale = 1.0;
    for res in 0..=params.max_res {
      let aperture = if res == 0 { first } else { seq.get_aperture(res)? };
      if res > 0 {
        scale *= aperture.scale_factor();
      }
      let grid = Idgg::new(res, aperture, seq.counts_through(res), Arc::clone(&isea))?;
      let s = GridStats::new(res, grid.n_cells(), scale, params.radius_km);
      debug!(
        res,
        n_cells = s.n_cells,
        area_km2 = s.cell_area_km2,
        dist_km = s.cell_dist_km,
        "built grid"
      );
      grids.push(grid);
      stats.push(s);
    }

    Ok(Idggs {
      params,
      seq,
      isea,
      grids,
      stats,
    })
  }

  #[inline]
  pub fn params(&self) -> &IdggsParams {
    &self.params
  }

  #[inline]
  pub fn max_res(&self) -> usize {
    self.params.max_res
  }

  #[inline]
  pub fn aperture_sequence(&self) -> &ApertureSequence {
    &self.seq
  }

  #[inline]
  pub fn isea(&self) -> &Isea {
    &self.isea
  }

  #[inline]
  pub fn is_superfund(&self) -> bool {
    self.params.superfund
  }

  #[inline]
  pub fn is_mixed43(&self) -> bool {
    matches!(self.params.apertures, ApertureSpec::Mixed43 { .. })
  }

  #[inline]
  pub fn is_ap_seq(&self) -> bool {
    matches!(self.params.apertures, ApertureSpec::Sequence(_))
  }

  pub fn num_ap4(&self) -> usize {
    match self.params.apertures {
      ApertureSpec::Mixed43 { num_ap4 } => num_ap4,
      _ => 0,
    }
  }

  pub fn idgg(&self, res: usize) -> DgResult<&Idgg> {
    self.grids.get(res).ok_or(DgError::Resolution {
      res,
      max: self.params.max_res,
    })
  }

  pub fn stats(&self, res: usize) -> DgResult<&GridStats> {
    self.stats.get(res).ok_or(DgError::Resolution {
      res,
      max: self.params.max_res,
    })
  }

  #[inline]
  pub fn all_stats(&self) -> &[GridStats] {
    &self.stats
  }

  /// Cells at `res - 1` overlapped by `addr`.
  pub fn parents(&self, res: usize, addr: &Q2DICoord) -> DgResult<Vec<Q2DICoord>> {
    if res == 0 {
      return Err(DgError::Resolution { res, max: self.params.max_res });
    }
    let grid = self.idgg(res)?;
    let parent = self.idgg(res - 1)?;

    let mut points = vec![grid.cell_center(addr)?];
    points.extend(grid.shrunk_vertices(addr)?);
    let mut out = Vec::with_capacity(points.len());
    for p in &points {
      let q = parent.geo_to_q2di(p)?;
      if !out.contains(&q) {
        out.push(q);
      }
    }
    Ok(out)
  }

  /// The child at `res + 1` sharing the center of `addr`.
  pub fn interior_child(&self, res: usize, addr: &Q2DICoord) -> DgResult<Q2DICoord> {
    let grid = self.idgg(res)?;
    let child = self.idgg(res + 1)?;
    child.geo_to_q2di(&grid.cell_center(addr)?)
  }

  /// Children at `res + 1` straddling the boundary of `addr`.
  pub fn boundary_children(&self, res: usize, addr: &Q2DICoord) -> DgResult<Vec<Q2DICoord>> {
    let center = self.interior_child(res, addr)?;
    self.idgg(res + 1)?.neighbors(&center)
  }

  /// The second ring of boundary children, present only for an aperture 7 step.
  pub fn boundary2_children(&self, res: usize, addr: &Q2DICoord) -> DgResult<Vec<Q2DICoord>> {
    let child = self.idgg(res + 1)?;
    if child.aperture() != Aperture::Seven {
      return Ok(Vec::new());
    }
    let center = self.interior_child(res, addr)?;
    child.neighbors_ring2(&center)
  }

  pub fn all_children(&self, res: usize, addr: &Q2DICoord) -> DgResult<Vec<Q2DICoord>> {
    let mut out = vec![self.interior_child(res, addr)?];
    for c in self.boundary_children(res, addr)?.into_iter().chain(self.boundary2_children(res, addr)?) {
      if !out.contains(&c) {
        out.push(c);
      }
    }
    Ok(out)
  }
}

fn check_hier_ndx(ndx: HierNdxSystem, seq: &ApertureSequence) -> DgResult<()> {
  let pure = seq.pure_aperture();
  let ok = match ndx {
    HierNdxSystem::None => true,
    HierNdxSystem::Z3 => pure == Some(Aperture::Three),
    HierNdxSystem::Z7 => pure == Some(Aperture::Seven),
    HierNdxSystem::ZOrder => matches!(pure, Some(Aperture::Three | Aperture::Four)),
  };
  if ok {
    Ok(())
  } else {
    Err(DgError::HierNdx(format!("{ndx:?} indexing is not available for aperture sequence {seq}")))
  }
}

/// A seeded random icosahedron placement: vertex 0 uniform on the sphere and
/// a uniform azimuth in degrees.
pub fn random_placement(rng: &mut StdRng) -> (LatLng, f64) {
  let lng = rng.gen_range(-M_PI..M_PI);
  let lat = rng.gen_range(-1.0f64..1.0).asin();
  let azimuth = rng.gen_range(0.0..360.0);
  (LatLng { lat, lng }, azimuth)
}

/// Random placement for a given seed.
pub fn seeded_placement(seed: u64) -> (LatLng, f64) {
  random_placement(&mut StdRng::seed_from_u64(seed))
}

/// Placement that keeps a region centered on one icosahedron face: vertex 0
/// and the azimuth point are fixed gnomonic offsets about `center`.
pub fn region_center_placement(center: &LatLng, radius_km: f64) -> (LatLng, f64) {
  let gnom = Gnomonic::new(*center, radius_km * 1000.0);
  let p0 = gnom.inverse(&Vec2d::new(REGION_CENTER_VERT0.0, REGION_CENTER_VERT0.1));
  let p1 = gnom.inverse(&Vec2d::new(REGION_CENTER_AZIMUTH_POINT.0, REGION_CENTER_AZIMUTH_POINT.1));
  (p0, geo_azimuth_rads(&p0, &p1).to_degrees())
}
