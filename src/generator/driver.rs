// src/generator/driver.rs
//! The generation run: clip inputs are gathered, then the twelve quads are
//! walked in order and every accepted cell goes to the sink.

use std::collections::BTreeSet;

use tracing::{debug, info, trace};

use super::sink::{CellSink, GeneratedCell};
use super::superfund::{SfCell, SfVisitor, SUPERFUND_NUM_AP4};
use crate::config::{ClipSubsetType, GenConfig};
use crate::grid::{Idgg, Idggs};
use crate::regions::{Attributes, ClipRegions, ClipSettings, RegionFeature, RegionSource};
use crate::rf::{Address, Conversion, ConversionGraph};
use crate::types::{AddressType, DgError, DgResult, GeoPolygon, Q2DICoord};

/// Progress of a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenState {
  #[default]
  NotStarted,
  PerQuadTraversal {
    quad: u8,
  },
  Done,
}

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenSummary {
  pub res: usize,
  pub tested: u64,
  pub accepted: u64,
}

impl GenSummary {
  /// Accepted share of the tested cells, in percent.
  pub fn acceptance_rate(&self) -> f64 {
    if self.tested == 0 {
      0.0
    } else {
      self.accepted as f64 / self.tested as f64 * 100.0
    }
  }
}

/// One generation run over a grid system.
#[derive(Debug)]
pub struct Generator {
  cfg: GenConfig,
  idggs: Idggs,
  res: usize,
  graph: ConversionGraph,
  regions: Option<ClipRegions>,
  state: GenState,
}

impl Generator {
  /// Validates `cfg` and builds its grid system.
  pub fn new(cfg: GenConfig) -> DgResult<Self> {
    let idggs = cfg.build_idggs()?;
    Self::with_grids(cfg, idggs)
  }

  /// Runs `cfg` on an already built grid system; the finest resolution of
  /// `idggs` is generated.
  pub fn with_grids(cfg: GenConfig, idggs: Idggs) -> DgResult<Self> {
    cfg.validate()?;
    let res = idggs.max_res();
    let idgg = idggs.idgg(res)?.clone();
    let graph = ConversionGraph::new(idgg.clone(), cfg.z3_invalid_digit)?;
    // fail before any work if the output frame is missing
    graph.converter(AddressType::Q2di, cfg.output_address_type)?;

    let regions = match cfg.clip_subset_type {
      ClipSubsetType::WholeEarth | ClipSubsetType::Seqnums => None,
      mode => {
        let mut regions = ClipRegions::new(&idgg, ClipSettings::from_config(&cfg))?;
        if mode == ClipSubsetType::CoarseCells {
          add_coarse_cells(&mut regions, &cfg, &idggs)?;
        } else {
          for feature in cfg.region_features()? {
            let wanted = match feature {
              RegionFeature::Polygon { .. } => mode == ClipSubsetType::Polygons,
              RegionFeature::Point { .. } => mode == ClipSubsetType::Points,
            };
            if wanted {
              regions.add_feature(&feature)?;
            }
          }
        }
        Some(regions)
      }
    };

    Ok(Generator {
      cfg,
      idggs,
      res,
      graph,
      regions,
      state: GenState::NotStarted,
    })
  }

  #[inline]
  pub fn state(&self) -> GenState {
    self.state
  }

  #[inline]
  pub fn res(&self) -> usize {
    self.res
  }

  pub fn config(&self) -> &GenConfig {
    &self.cfg
  }

  pub fn idggs(&self) -> &Idggs {
    &self.idggs
  }

  /// Clip regions of a clipped run.
  pub fn regions(&self) -> Option<&ClipRegions> {
    self.regions.as_ref()
  }

  /// Adds the features of an outside source to a `POLYGONS` or `POINTS`
  /// run. Returns the number of features read.
  pub fn add_source(&mut self, source: &mut dyn RegionSource) -> DgResult<usize> {
    if self.state != GenState::NotStarted {
      return Err(DgError::Config("clip features must be added before generation".into()));
    }
    match (&mut self.regions, self.cfg.clip_subset_type) {
      (Some(regions), ClipSubsetType::Polygons | ClipSubsetType::Points) => regions.add_source(source),
      (_, mode) => Err(DgError::Config(format!("clip_subset_type {mode:?} takes no region sources"))),
    }
  }

  /// Generates every selected cell into `sink`.
  pub fn run(&mut self, sink: &mut dyn CellSink) -> DgResult<GenSummary> {
    if self.state != GenState::NotStarted {
      return Err(DgError::Config("generator has already run".into()));
    }
    let Generator {
      cfg,
      idggs,
      res,
      graph,
      regions,
      state,
    } = self;
    let res = *res;
    let idgg = idggs.idgg(res)?;
    let mut out = Emitter {
      idgg,
      conv: graph.converter(AddressType::Q2di, cfg.output_address_type)?,
      densification: cfg.densification,
      build_attributes: cfg.build_attributes,
      update_frequency: cfg.update_frequency,
      whole_earth: cfg.clip_subset_type == ClipSubsetType::WholeEarth,
      sink,
      tested: 0,
      accepted: 0,
    };
    info!(
      res,
      n_cells = idgg.n_cells(),
      clip = ?cfg.clip_subset_type,
      superfund = cfg.is_superfund(),
      "generating grid"
    );

    match cfg.clip_subset_type {
      ClipSubsetType::WholeEarth if cfg.is_superfund() => {
        for quad in 0..12u8 {
          *state = GenState::PerQuadTraversal { quad };
          let mut visitor = SfEmitter {
            out: &mut out,
            regions: None,
          };
          SfCell::base(quad).depth_first(res, SUPERFUND_NUM_AP4, &mut visitor)?;
        }
      }
      ClipSubsetType::WholeEarth => whole_earth(cfg, &mut out, state)?,
      ClipSubsetType::Seqnums => {
        for s in &cfg.clip_cell_addresses {
          let seqnum: u64 = s.trim().parse().map_err(|_| DgError::Data {
            source_name: "clip_cell_addresses".into(),
            content: s.clone(),
          })?;
          let addr = idgg.from_seqnum(seqnum)?;
          *state = GenState::PerQuadTraversal { quad: addr.quad };
          out.test();
          out.emit(addr, None, Attributes::new())?;
        }
      }
      mode => {
        let regions = regions
          .as_mut()
          .ok_or_else(|| DgError::Config(format!("clip_subset_type {mode:?} has no clip regions")))?;
        if (0..12).all(|q| !regions.quad(q).is_used()) {
          return Err(DgError::Config(format!("clip_subset_type {mode:?} has no clip features")));
        }
        regions.finish()?;
        clipped(cfg.is_superfund(), res, regions, &mut out, state)?;
        info!("acceptance rate is {:.4}%", out.summary(res).acceptance_rate());
      }
    }

    let summary = out.summary(res);
    *state = GenState::Done;
    info!(accepted = summary.accepted, tested = summary.tested, "generation complete");
    Ok(summary)
  }
}

/// Every cell in sequence number order, bounded by the configured range.
fn whole_earth(cfg: &GenConfig, out: &mut Emitter<'_, '_>, state: &mut GenState) -> DgResult<()> {
  let idgg = out.idgg;
  let last = cfg.output_last_seqnum.min(idgg.n_cells());
  let mut seqnum = cfg.output_first_seqnum;
  let mut next = if seqnum <= last {
    Some(idgg.from_seqnum(seqnum)?)
  } else {
    None
  };
  while let Some(addr) = next {
    if seqnum > last {
      break;
    }
    if let GenState::PerQuadTraversal { quad } = *state {
      if quad != addr.quad {
        debug!("...quad {quad} complete.");
      }
    }
    *state = GenState::PerQuadTraversal { quad: addr.quad };
    out.test();
    out.emit(addr, None, Attributes::new())?;
    seqnum += 1;
    next = idgg.next_cell(&addr);
  }
  Ok(())
}

/// The per-quad walk of a clipped run.
fn clipped(
  superfund: bool,
  res: usize,
  regions: &mut ClipRegions,
  out: &mut Emitter<'_, '_>,
  state: &mut GenState,
) -> DgResult<()> {
  for quad in 0..12u8 {
    *state = GenState::PerQuadTraversal { quad };
    if regions.overage(quad).is_empty() && !regions.quad(quad).is_used() {
      info!("* No intersections in quad {quad}.");
      continue;
    }
    info!("* Testing quad {quad}...");

    if superfund {
      let mut visitor = SfEmitter {
        out: &mut *out,
        regions: Some(&mut *regions),
      };
      SfCell::base(quad).depth_first(res, SUPERFUND_NUM_AP4, &mut visitor)?;
    } else {
      // row-major box scan, with overage cells taken in order as they come up
      let mut scan = regions.scan(quad).peekable();
      loop {
        let coord = match (scan.peek().copied(), regions.next_overage(quad)) {
          (None, None) => break,
          (Some(s), Some(o)) if o < s => o,
          (Some(s), Some(o)) if o == s => {
            scan.next();
            o
          }
          (Some(s), _) => {
            scan.next();
            s
          }
          (None, Some(o)) => o,
        };
        out.test();
        if let Some(attrs) = regions.evaluate(quad, &coord)? {
          out.emit(Q2DICoord { quad, coord }, None, attrs)?;
          if quad == 0 || quad == 11 {
            break;
          }
        }
      }
    }
    debug!("...quad {quad} complete.");
  }

  if let Some((quad, coord)) = (0..12u8).find_map(|q| regions.next_overage(q).map(|c| (q, c))) {
    return Err(DgError::CoordinateRange {
      context: "unvisited overage cell",
      coord: Q2DICoord { quad, coord }.to_string(),
    });
  }
  Ok(())
}

/// Reads the coarse cells, deduplicated and in sequence number order, as
/// clip polygons.
fn add_coarse_cells(regions: &mut ClipRegions, cfg: &GenConfig, idggs: &Idggs) -> DgResult<()> {
  if cfg.clip_cell_res == 0 {
    return Err(DgError::Config("clip_cell_res must be at least 1".into()));
  }
  let coarse = idggs.idgg(cfg.clip_cell_res)?;
  let graph = ConversionGraph::new(coarse.clone(), cfg.z3_invalid_digit)?;
  let conv = graph.converter(cfg.input_address_type, AddressType::Seqnum)?;

  let mut seqnums = BTreeSet::new();
  for s in &cfg.clip_cell_addresses {
    let bad = || DgError::Data {
      source_name: "clip_cell_addresses".into(),
      content: s.clone(),
    };
    match conv.apply(&Address::parse(cfg.input_address_type, s)?)? {
      Some(Address::Seqnum(n)) => seqnums.insert(n),
      _ => return Err(bad()),
    };
  }

  for n in &seqnums {
    let addr = coarse.from_seqnum(*n)?;
    let polygon = GeoPolygon {
      geoloop: coarse.cell_boundary(&addr, cfg.clip_cell_densification)?,
      holes: Vec::new(),
    };
    regions.add_polygon(&polygon, &Attributes::new())?;
  }
  debug!(res = cfg.clip_cell_res, cells = seqnums.len(), "read coarse clip cells");
  Ok(())
}

/// Turns accepted addresses into [`GeneratedCell`]s.
struct Emitter<'g, 's> {
  idgg: &'g Idgg,
  conv: Conversion<'g>,
  densification: usize,
  build_attributes: bool,
  update_frequency: u64,
  whole_earth: bool,
  sink: &'s mut dyn CellSink,
  tested: u64,
  accepted: u64,
}

impl Emitter<'_, '_> {
  fn test(&mut self) {
    self.tested += 1;
    if !self.whole_earth && self.update_frequency > 0 && self.tested % self.update_frequency == 0 {
      info!("accepted {} cells / {} tested", self.accepted, self.tested);
    }
  }

  fn emit(&mut self, addr: Q2DICoord, label: Option<String>, attrs: Attributes) -> DgResult<()> {
    let label = match label {
      Some(l) => l,
      None => self
        .conv
        .apply(&Address::Q2di(addr))?
        .ok_or_else(|| DgError::CoordinateRange {
          context: "output address",
          coord: addr.to_string(),
        })?
        .to_string(),
    };
    trace!(%addr, %label, "accepted cell");
    self.sink.accept(GeneratedCell {
      addr,
      label,
      center: self.idgg.cell_center(&addr)?,
      boundary: self.idgg.cell_boundary(&addr, self.densification)?,
      attributes: self.build_attributes.then_some(attrs),
    })?;
    self.accepted += 1;
    if self.whole_earth && self.update_frequency > 0 && self.accepted % self.update_frequency == 0 {
      info!("* generated {} cells", self.accepted);
    }
    Ok(())
  }

  fn summary(&self, res: usize) -> GenSummary {
    GenSummary {
      res,
      tested: self.tested,
      accepted: self.accepted,
    }
  }
}

/// Superfund leaves labelled with their Superfund index.
struct SfEmitter<'a, 'g, 's> {
  out: &'a mut Emitter<'g, 's>,
  regions: Option<&'a mut ClipRegions>,
}

impl SfVisitor for SfEmitter<'_, '_, '_> {
  fn use_tile(&mut self, tile: &SfCell) -> DgResult<bool> {
    let Some(regions) = self.regions.as_deref() else {
      return Ok(true);
    };
    if !regions.overage(tile.quad).is_empty() && (tile.ijk.i, tile.ijk.j) != (1, 1) {
      return Ok(true);
    }
    let Some((lo, hi)) = regions.quad(tile.quad).candidate_box() else {
      return Ok(false);
    };
    let idgg = self.out.idgg;
    let half = |v: i64, max: i64| -> DgResult<(i64, i64)> {
      let mid = (max + 1) / 2;
      match v {
        0 => Ok((0, mid - 1)),
        1 => Ok((mid, max)),
        _ => Err(DgError::Superfund(format!("invalid res 1 tile {:?}", tile.ijk))),
      }
    };
    let (i0, i1) = half(tile.ijk.i, idgg.max_i())?;
    let (j0, j1) = half(tile.ijk.j, idgg.max_j())?;
    Ok(lo.i <= i1 && hi.i >= i0 && lo.j <= j1 && hi.j >= j0)
  }

  fn visit(&mut self, leaf: &SfCell) -> DgResult<bool> {
    self.out.test();
    let attrs = match self.regions.as_deref_mut() {
      None => Some(Attributes::new()),
      Some(regions) => regions.evaluate(leaf.quad, &leaf.coord())?,
    };
    match attrs {
      Some(attrs) => {
        self.out.emit(leaf.q2di(), Some(leaf.superfund_index()), attrs)?;
        Ok(true)
      }
      None => Ok(false),
    }
  }
}
