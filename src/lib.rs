#![deny(clippy::all)] // Enforce clippy lints
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Often a matter of taste
#![allow(clippy::missing_errors_doc)] // TODO: Add error docs later
#![allow(clippy::cast_possible_truncation)] // Lattice sizes are bounded by MAX_DGG_RES
#![allow(clippy::cast_precision_loss)] // Cell counts stay far below 2^52
#![allow(clippy::cast_sign_loss)] // Coordinates are checked non-negative first
#![allow(clippy::must_use_candidate)] // For functions where side effects are intended
#![allow(clippy::unreadable_literal)] // Projection constants are clearer as published
#![allow(clippy::similar_names)] // Can be common in math-heavy code
#![allow(clippy::wildcard_imports)] // Allow for re-exporting from modules

//! `xs-dggs` generates icosahedral discrete global grids.
//!
//! Hexagon grids of aperture 3, 4, 7, mixed 4/3 or arbitrary aperture
//! sequences are laid on the Snyder equal area projection of an icosahedron
//! and addressed through a network of reference frames: geodetic, quad
//! integer and continuous coordinates, sequence numbers and the Z-order, Z3
//! and Z7 hierarchical indices. A generation run emits the cells of one
//! resolution, either for the whole sphere or clipped to polygons, points
//! or coarser cells.

// Declare modules
pub mod aperture;
pub mod config;
pub mod constants;
pub mod coords;
pub mod generator;
pub mod grid;
pub mod hierarchy;
pub mod latlng;
pub mod math;
pub mod projection;
pub mod regions;
pub mod rf;
pub mod types;

// Re-export key public types and functions for easier use
pub use aperture::{ApertureSequence, ApertureSpec};
pub use config::{
  ApertureType, ClipSubsetType, Datum, DggsType, GenConfig, OrientSpecifyType, PointSpec, PolygonSpec, ResSpecifyType,
};
pub use constants::{DEFAULT_RADIUS_KM, MAX_DGG_RES};
pub use coords::remap_overage;
pub use generator::{
  generate, sf_res_to_actual_res, CellSink, CollectSink, CountSink, GenState, GenSummary, GeneratedCell, Generator,
};
pub use grid::{determine_res, GridStats, Idgg, Idggs, IdggsParams, ResMetric, Sublattice};
pub use latlng::{degs_to_rads, great_circle_distance_km, great_circle_distance_rads, rads_to_degs};
pub use regions::{Attributes, ClipRegions, ClipSettings, RegionFeature, RegionSource, VecRegionSource};
pub use rf::{Address, ConversionGraph};
pub use types::{
  AddressType, Aperture, CoordIJ, CoordIJK, DgError, DgResult, GeoLoop, GeoPolygon, HierNdxSystem, LatLng,
  ProjTriCoord, ProjectionType, Q2DDCoord, Q2DICoord, Topology, Vec2d, VertexCoord,
};
