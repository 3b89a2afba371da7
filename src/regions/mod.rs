// src/regions/mod.rs
#![allow(clippy::module_name_repetitions)]

pub mod clip;
pub mod eval;
pub mod source;

pub use clip::{BoxScan, ClipRegions, ClipSettings, QuadClip};
pub use source::{merge_attributes, Attributes, RegionFeature, RegionSource, VecRegionSource};
