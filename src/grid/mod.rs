// src/grid/mod.rs
#![allow(clippy::module_name_repetitions)]

pub mod idgg;
pub mod idggs;
pub mod lattice;
pub mod stats;

pub use idgg::{Cells, Idgg};
pub use idggs::{region_center_placement, seeded_placement, Idggs, IdggsParams};
pub use lattice::Sublattice;
pub use stats::{determine_res, GridStats, ResMetric};
