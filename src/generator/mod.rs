// src/generator/mod.rs
#![allow(clippy::module_name_repetitions)]

pub mod driver;
pub mod sink;
pub mod superfund;

pub use driver::{GenState, GenSummary, Generator};
pub use sink::{CellSink, CollectSink, CountSink, GeneratedCell};
pub use superfund::{sf_res_to_actual_res, SfCell, SfVisitor};

use crate::config::GenConfig;
use crate::types::DgResult;

/// Builds the grid system of `cfg` and generates it into `sink`.
pub fn generate(cfg: GenConfig, sink: &mut dyn CellSink) -> DgResult<GenSummary> {
  Generator::new(cfg)?.run(sink)
}
