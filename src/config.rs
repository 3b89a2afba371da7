// src/config.rs
//! Generation parameters.
//!
//! [`GenConfig`] mirrors the generator's flat parameter list. Field names and
//! enum spellings follow the parameter names used in configuration files, so
//! a JSON document such as `{"dggs_type": "ISEA4H", "dggs_res_spec": 5}` maps
//! straight onto it. A non-`CUSTOM` `dggs_type` supplies preset values that
//! explicit fields then override.

use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aperture::{ApertureSequence, ApertureSpec};
use crate::constants::{
  DEFAULT_ORIENT_SEED, DEFAULT_RADIUS_KM, DEFAULT_VERT0_AZIMUTH, DEFAULT_VERT0_LAT, DEFAULT_VERT0_LON, MAX_DGG_RES,
};
use crate::generator::superfund::sf_res_to_actual_res;
use crate::grid::{determine_res, region_center_placement, seeded_placement, GridStats, Idgg, Idggs, IdggsParams, ResMetric};
use crate::projection::{IcosaPlacement, Isea};
use crate::regions::RegionFeature;
use crate::types::{
  AddressType, Aperture, DgError, DgResult, GeoLoop, GeoPolygon, HierNdxSystem, LatLng, ProjectionType, Topology,
};

/// Radius of the WGS84 mean sphere.
pub const WGS84_MEAN_RADIUS_KM: f64 = 6371.008_771_4;
/// Default scale from gnomonic metres to clipper integer units.
pub const DEFAULT_CLIPPER_SCALE_FACTOR: f64 = 1_000_000.0;
/// Default number of cells between status lines.
pub const DEFAULT_UPDATE_FREQUENCY: u64 = 100_000;
/// Aperture sequence of the `PLANETRISK` grid.
pub const PLANETRISK_SEQUENCE: &str = "43334777777777777777777";
/// Largest accepted cell edge densification.
pub const MAX_DENSIFICATION: usize = 500;

/// Preset grid systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DggsType {
  #[default]
  Custom,
  /// Mixed 4/3 hexagons with Superfund labels. DGGRID builds this preset on
  /// the FULLER projection; here it uses ISEA.
  Superfund,
  Planetrisk,
  Igeo7,
  Isea3h,
  Isea4h,
  Isea7h,
  Isea43h,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ApertureType {
  #[default]
  Pure,
  Mixed43,
  Sequence,
}

/// How the target resolution is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ResSpecifyType {
  #[default]
  Specified,
  CellArea,
  IntercellDistance,
}

/// How the icosahedron is placed on the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrientSpecifyType {
  #[default]
  Specified,
  Random,
  RegionCenter,
}

/// Which cells a generation run emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ClipSubsetType {
  #[default]
  WholeEarth,
  Polygons,
  Points,
  CoarseCells,
  Seqnums,
}

/// Earth model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Datum {
  #[default]
  Wgs84AuthalicSphere,
  Wgs84MeanSphere,
  CustomSphere,
}

/// A clip polygon with `[lon, lat]` vertices in degrees.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PolygonSpec {
  pub ring: Vec<[f64; 2]>,
  pub holes: Vec<Vec<[f64; 2]>>,
  pub attributes: BTreeMap<String, String>,
}

/// A clip point in degrees.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointSpec {
  pub lon: f64,
  pub lat: f64,
  pub attributes: BTreeMap<String, String>,
}

/// Every parameter of a generation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenConfig {
  pub dggs_type: DggsType,
  pub dggs_topology: Topology,
  pub dggs_proj: ProjectionType,
  pub dggs_aperture_type: ApertureType,
  pub dggs_aperture: Aperture,
  pub dggs_aperture_sequence: ApertureSequence,
  pub dggs_num_aperture_4_res: usize,
  pub dggs_res_specify_type: ResSpecifyType,
  /// Target resolution; the Superfund resolution for `SUPERFUND`.
  pub dggs_res_spec: usize,
  /// Target cell area in km².
  pub dggs_res_specify_area: f64,
  /// Target inter-cell distance in km.
  pub dggs_res_specify_intercell_distance: f64,
  pub dggs_res_specify_rnd_down: bool,
  pub dggs_orient_specify_type: OrientSpecifyType,
  pub dggs_orient_rand_seed: u64,
  pub dggs_vert0_lon: f64,
  pub dggs_vert0_lat: f64,
  pub dggs_vert0_azimuth: f64,
  pub region_center_lon: f64,
  pub region_center_lat: f64,
  pub proj_datum: Datum,
  /// Sphere radius in km, used with `CUSTOM_SPHERE`.
  pub proj_datum_radius: f64,
  pub clip_subset_type: ClipSubsetType,
  pub clip_using_holes: bool,
  pub clip_cell_res: usize,
  pub clip_cell_densification: usize,
  /// Coarse cells (`COARSE_CELLS`) or target cells (`SEQNUMS`).
  pub clip_cell_addresses: Vec<String>,
  pub clip_regions: Vec<PolygonSpec>,
  pub clip_points: Vec<PointSpec>,
  /// Address type of `clip_cell_addresses` in `COARSE_CELLS` mode.
  pub input_address_type: AddressType,
  /// Maximum arc in degrees between clip polygon vertices; 0 disables.
  pub geodetic_densify: f64,
  pub clipper_scale_factor: f64,
  /// Points added along each cell edge of emitted boundaries.
  pub densification: usize,
  pub output_address_type: AddressType,
  pub output_first_seqnum: u64,
  pub output_last_seqnum: u64,
  pub z3_invalid_digit: u8,
  /// Cells tested between status lines; 0 disables them.
  pub update_frequency: u64,
  pub build_attributes: bool,
}

impl Default for GenConfig {
  fn default() -> Self {
    GenConfig {
      dggs_type: DggsType::Custom,
      dggs_topology: Topology::Hexagon,
      dggs_proj: ProjectionType::Isea,
      dggs_aperture_type: ApertureType::Pure,
      dggs_aperture: Aperture::Four,
      dggs_aperture_sequence: ApertureSequence::pure(Aperture::Three, 12),
      dggs_num_aperture_4_res: 0,
      dggs_res_specify_type: ResSpecifyType::Specified,
      dggs_res_spec: 9,
      dggs_res_specify_area: 100.0,
      dggs_res_specify_intercell_distance: 100.0,
      dggs_res_specify_rnd_down: true,
      dggs_orient_specify_type: OrientSpecifyType::Specified,
      dggs_orient_rand_seed: DEFAULT_ORIENT_SEED,
      dggs_vert0_lon: DEFAULT_VERT0_LON,
      dggs_vert0_lat: DEFAULT_VERT0_LAT,
      dggs_vert0_azimuth: DEFAULT_VERT0_AZIMUTH,
      region_center_lon: 0.0,
      region_center_lat: 0.0,
      proj_datum: Datum::Wgs84AuthalicSphere,
      proj_datum_radius: DEFAULT_RADIUS_KM,
      clip_subset_type: ClipSubsetType::WholeEarth,
      clip_using_holes: false,
      clip_cell_res: 1,
      clip_cell_densification: 1,
      clip_cell_addresses: Vec::new(),
      clip_regions: Vec::new(),
      clip_points: Vec::new(),
      input_address_type: AddressType::Seqnum,
      geodetic_densify: 0.0,
      clipper_scale_factor: DEFAULT_CLIPPER_SCALE_FACTOR,
      densification: 0,
      output_address_type: AddressType::Seqnum,
      output_first_seqnum: 1,
      output_last_seqnum: u64::MAX,
      z3_invalid_digit: 3,
      update_frequency: DEFAULT_UPDATE_FREQUENCY,
      build_attributes: false,
    }
  }
}

impl GenConfig {
  /// Default configuration with the values of a preset applied.
  pub fn preset(dggs_type: DggsType) -> Self {
    let mut cfg = GenConfig {
      dggs_type,
      ..GenConfig::default()
    };
    cfg.apply_preset();
    cfg
  }

  /// Overwrites the fields a non-`CUSTOM` `dggs_type` fixes.
  pub fn apply_preset(&mut self) {
    if self.dggs_type == DggsType::Custom {
      return;
    }
    self.dggs_orient_specify_type = OrientSpecifyType::Specified;
    self.dggs_vert0_lon = DEFAULT_VERT0_LON;
    self.dggs_vert0_lat = DEFAULT_VERT0_LAT;
    self.dggs_vert0_azimuth = DEFAULT_VERT0_AZIMUTH;
    self.dggs_res_specify_type = ResSpecifyType::Specified;
    self.dggs_res_spec = 9;
    self.dggs_topology = Topology::Hexagon;
    self.dggs_proj = ProjectionType::Isea;

    match self.dggs_type {
      DggsType::Custom => {}
      // ISEA, not DGGRID's FULLER
      DggsType::Superfund => {
        self.dggs_aperture_type = ApertureType::Mixed43;
        self.dggs_num_aperture_4_res = 2;
      }
      DggsType::Planetrisk => {
        self.dggs_aperture_type = ApertureType::Sequence;
        self.dggs_aperture_sequence = PLANETRISK_SEQUENCE.parse().unwrap_or_default();
        self.dggs_res_spec = 11;
      }
      DggsType::Igeo7 => {
        self.dggs_aperture_type = ApertureType::Pure;
        self.dggs_aperture = Aperture::Seven;
        self.input_address_type = AddressType::Z7;
        self.output_address_type = AddressType::Z7;
      }
      DggsType::Isea3h => self.set_pure(Aperture::Three),
      DggsType::Isea4h => self.set_pure(Aperture::Four),
      DggsType::Isea7h => self.set_pure(Aperture::Seven),
      DggsType::Isea43h => self.dggs_aperture_type = ApertureType::Mixed43,
    }
  }

  fn set_pure(&mut self, ap: Aperture) {
    self.dggs_aperture_type = ApertureType::Pure;
    self.dggs_aperture = ap;
  }

  #[inline]
  pub fn is_superfund(&self) -> bool {
    self.dggs_type == DggsType::Superfund
  }

  /// Checks the parameters that do not need a built grid.
  pub fn validate(&self) -> DgResult<()> {
    if self.dggs_topology != Topology::Hexagon {
      return Err(DgError::Config(format!(
        "dggs_topology {:?} is not supported; only HEXAGON grids are generated",
        self.dggs_topology
      )));
    }
    if self.dggs_proj != ProjectionType::Isea {
      return Err(DgError::Config(format!("dggs_proj {:?} is not supported", self.dggs_proj)));
    }
    if self.is_superfund() {
      if self.dggs_aperture_type != ApertureType::Mixed43 || self.dggs_num_aperture_4_res != 2 {
        return Err(DgError::Config(
          "SUPERFUND requires dggs_aperture_type MIXED43 with dggs_num_aperture_4_res 2".into(),
        ));
      }
      if self.dggs_res_specify_type != ResSpecifyType::Specified {
        return Err(DgError::Config("SUPERFUND requires dggs_res_specify_type SPECIFIED".into()));
      }
    }
    if self.dggs_aperture_type == ApertureType::Sequence && self.dggs_aperture_sequence.is_empty() {
      return Err(DgError::Config("dggs_aperture_sequence is empty".into()));
    }
    if self.dggs_res_specify_type == ResSpecifyType::Specified && self.dggs_res_spec > MAX_DGG_RES {
      return Err(DgError::Resolution {
        res: self.dggs_res_spec,
        max: MAX_DGG_RES,
      });
    }
    let target = match self.dggs_res_specify_type {
      ResSpecifyType::Specified => None,
      ResSpecifyType::CellArea => Some(("dggs_res_specify_area", self.dggs_res_specify_area)),
      ResSpecifyType::IntercellDistance => {
        Some(("dggs_res_specify_intercell_distance", self.dggs_res_specify_intercell_distance))
      }
    };
    if let Some((name, value)) = target {
      if !(value.is_finite() && value > 0.0) {
        return Err(DgError::Config(format!("{name} must be positive, got {value}")));
      }
    }
    if self.proj_datum == Datum::CustomSphere && !(self.proj_datum_radius.is_finite() && self.proj_datum_radius > 0.0) {
      return Err(DgError::Config(format!(
        "proj_datum_radius must be positive, got {}",
        self.proj_datum_radius
      )));
    }
    if !(0.0..=360.0).contains(&self.geodetic_densify) {
      return Err(DgError::Config(format!(
        "geodetic_densify {} must be in 0..=360",
        self.geodetic_densify
      )));
    }
    if self.densification > MAX_DENSIFICATION {
      return Err(DgError::Config(format!(
        "densification {} must be at most {MAX_DENSIFICATION}",
        self.densification
      )));
    }
    if !(self.clipper_scale_factor.is_finite() && self.clipper_scale_factor > 0.0) {
      return Err(DgError::Config(format!(
        "clipper_scale_factor must be positive, got {}",
        self.clipper_scale_factor
      )));
    }
    if self.z3_invalid_digit > 3 {
      return Err(DgError::Config(format!(
        "z3_invalid_digit {} must be in 0..=3",
        self.z3_invalid_digit
      )));
    }
    if self.output_first_seqnum == 0 || self.output_first_seqnum > self.output_last_seqnum {
      return Err(DgError::Config(format!(
        "invalid sequence number range {}..={}",
        self.output_first_seqnum, self.output_last_seqnum
      )));
    }
    match self.clip_subset_type {
      ClipSubsetType::CoarseCells | ClipSubsetType::Seqnums if self.clip_cell_addresses.is_empty() => Err(
        DgError::Config(format!("clip_subset_type {:?} requires clip_cell_addresses", self.clip_subset_type)),
      ),
      ClipSubsetType::CoarseCells if !self.input_address_type.is_discrete() => Err(DgError::Config(format!(
        "input_address_type {:?} does not address cells",
        self.input_address_type
      ))),
      _ => Ok(()),
    }
  }

  pub fn aperture_spec(&self) -> ApertureSpec {
    match self.dggs_aperture_type {
      ApertureType::Pure => ApertureSpec::Pure(self.dggs_aperture),
      ApertureType::Mixed43 => ApertureSpec::Mixed43 {
        num_ap4: self.dggs_num_aperture_4_res,
      },
      ApertureType::Sequence => ApertureSpec::Sequence(self.dggs_aperture_sequence.clone()),
    }
  }

  /// Earth radius in km.
  pub fn radius_km(&self) -> f64 {
    match self.proj_datum {
      Datum::Wgs84AuthalicSphere => DEFAULT_RADIUS_KM,
      Datum::Wgs84MeanSphere => WGS84_MEAN_RADIUS_KM,
      Datum::CustomSphere => self.proj_datum_radius,
    }
  }

  /// Vertex 0 and the azimuth to vertex 1 in degrees.
  pub fn placement(&self) -> (LatLng, f64) {
    match self.dggs_orient_specify_type {
      OrientSpecifyType::Specified => (
        LatLng::from_degrees(self.dggs_vert0_lat, self.dggs_vert0_lon),
        self.dggs_vert0_azimuth,
      ),
      OrientSpecifyType::Random => seeded_placement(self.dggs_orient_rand_seed),
      OrientSpecifyType::RegionCenter => region_center_placement(
        &LatLng::from_degrees(self.region_center_lat, self.region_center_lon),
        self.radius_km(),
      ),
    }
  }

  /// Hierarchical index system implied by the addresses read or written.
  pub fn hier_ndx(&self) -> HierNdxSystem {
    let coarse_input = (self.clip_subset_type == ClipSubsetType::CoarseCells).then_some(self.input_address_type);
    [Some(self.output_address_type), coarse_input]
      .into_iter()
      .flatten()
      .find_map(|ty| match ty {
        AddressType::Zorder | AddressType::ZorderString => Some(HierNdxSystem::ZOrder),
        AddressType::Z3 | AddressType::Z3String => Some(HierNdxSystem::Z3),
        AddressType::Z7 | AddressType::Z7String => Some(HierNdxSystem::Z7),
        _ => None,
      })
      .unwrap_or_default()
  }

  /// Resolution of the generated grid.
  pub fn target_res(&self) -> DgResult<usize> {
    let metric = match self.dggs_res_specify_type {
      ResSpecifyType::Specified if self.is_superfund() => return Ok(sf_res_to_actual_res(self.dggs_res_spec)),
      ResSpecifyType::Specified => return Ok(self.dggs_res_spec),
      ResSpecifyType::CellArea => (ResMetric::CellArea, self.dggs_res_specify_area),
      ResSpecifyType::IntercellDistance => (ResMetric::IntercellDistance, self.dggs_res_specify_intercell_distance),
    };
    let stats = self.candidate_stats()?;
    determine_res(&stats, metric.1, metric.0, self.dggs_res_specify_rnd_down)
  }

  /// Statistics of every resolution the aperture settings can reach.
  fn candidate_stats(&self) -> DgResult<Vec<GridStats>> {
    let spec = self.aperture_spec();
    let max_res = match &spec {
      ApertureSpec::Sequence(seq) => seq.last_res().min(MAX_DGG_RES),
      _ => MAX_DGG_RES,
    };
    let seq = spec.to_sequence(max_res)?;
    let (vert0, azimuth) = self.placement();
    let isea = Arc::new(Isea::new(IcosaPlacement::new(vert0, azimuth.to_radians())));
    let first = seq.get_aperture(1).unwrap_or(Aperture::Four);

    let mut stats = Vec::with_capacity(max_res + 1);
    let mut scale = 1.0;
    for res in 0..=max_res {
      let aperture = if res == 0 { first } else { seq.get_aperture(res)? };
      if res > 0 {
        scale *= aperture.scale_factor();
      }
      // resolutions too fine to count end the scan
      let Ok(grid) = Idgg::new(res, aperture, seq.counts_through(res), Arc::clone(&isea)) else {
        break;
      };
      stats.push(GridStats::new(res, grid.n_cells(), scale, self.radius_km()));
    }
    Ok(stats)
  }

  /// Grid system parameters for a run at `max_res`.
  pub fn idggs_params(&self, max_res: usize) -> IdggsParams {
    let (vert0, azimuth_degs) = self.placement();
    IdggsParams {
      vert0,
      azimuth_degs,
      apertures: self.aperture_spec(),
      max_res,
      topology: self.dggs_topology,
      projection: self.dggs_proj,
      superfund: self.is_superfund(),
      hier_ndx: self.hier_ndx(),
      radius_km: self.radius_km(),
    }
  }

  /// Validates and builds the grid system through the target resolution.
  pub fn build_idggs(&self) -> DgResult<Idggs> {
    self.validate()?;
    let res = self.target_res()?;
    if self.clip_subset_type == ClipSubsetType::CoarseCells && self.clip_cell_res >= res {
      return Err(DgError::Config(format!(
        "clip_cell_res {} must be less than the grid resolution {res}",
        self.clip_cell_res
      )));
    }
    Idggs::new(self.idggs_params(res))
  }

  /// The inline clip polygons and points as region features.
  pub fn region_features(&self) -> DgResult<Vec<RegionFeature>> {
    let ring = |pts: &[[f64; 2]], n: usize| -> DgResult<GeoLoop> {
      if pts.len() < 3 || pts.iter().flatten().any(|v| !v.is_finite()) {
        return Err(DgError::Data {
          source_name: "clip_regions".into(),
          content: format!("polygon {n}: ring of {} vertices", pts.len()),
        });
      }
      Ok(GeoLoop::new(pts.iter().map(|&[lon, lat]| LatLng::from_degrees(lat, lon)).collect()))
    };

    let mut out = Vec::with_capacity(self.clip_regions.len() + self.clip_points.len());
    for (n, p) in self.clip_regions.iter().enumerate() {
      let polygon = GeoPolygon {
        geoloop: ring(&p.ring, n)?,
        holes: p.holes.iter().map(|h| ring(h, n)).collect::<DgResult<_>>()?,
      };
      out.push(RegionFeature::Polygon {
        polygon,
        attributes: p.attributes.clone(),
      });
    }
    for (n, p) in self.clip_points.iter().enumerate() {
      if !(p.lon.is_finite() && p.lat.is_finite()) {
        return Err(DgError::Data {
          source_name: "clip_points".into(),
          content: format!("point {n}: {} {}", p.lon, p.lat),
        });
      }
      out.push(RegionFeature::Point {
        point: LatLng::from_degrees(p.lat, p.lon),
        attributes: p.attributes.clone(),
      });
    }
    Ok(out)
  }

  /// Loads a JSON configuration. Preset values of its `dggs_type` are applied
  /// first; every field present in the document overrides them.
  #[cfg(feature = "cli")]
  pub fn from_json_str(json: &str) -> DgResult<Self> {
    let bad = |e: serde_json::Error| DgError::Config(format!("invalid configuration: {e}"));
    let serde_json::Value::Object(user) = serde_json::from_str(json).map_err(bad)? else {
      return Err(DgError::Config("configuration must be a JSON object".into()));
    };
    let dggs_type = match user.get("dggs_type") {
      Some(v) => DggsType::deserialize(v).map_err(bad)?,
      None => DggsType::Custom,
    };
    let mut merged = serde_json::to_value(GenConfig::preset(dggs_type)).map_err(bad)?;
    if let serde_json::Value::Object(fields) = &mut merged {
      fields.extend(user);
    }
    serde_json::from_value(merged).map_err(bad)
  }

  #[cfg(feature = "cli")]
  pub fn from_json_path(path: impl AsRef<std::path::Path>) -> DgResult<Self> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Self::from_json_str(&text)
  }
}
