// src/generator/sink.rs
//! Receivers of generated cells.

use crate::regions::Attributes;
use crate::types::{DgResult, GeoLoop, LatLng, Q2DICoord};

/// One accepted cell, in traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCell {
  pub addr: Q2DICoord,
  /// The cell in the output address type, or its Superfund index.
  pub label: String,
  pub center: LatLng,
  pub boundary: GeoLoop,
  /// Fields of the clip features the cell met, when attributes are built.
  pub attributes: Option<Attributes>,
}

/// Output collaborator of a [`Generator`](super::Generator) run.
pub trait CellSink {
  fn accept(&mut self, cell: GeneratedCell) -> DgResult<()>;
}

impl<F> CellSink for F
where
  F: FnMut(GeneratedCell) -> DgResult<()>,
{
  fn accept(&mut self, cell: GeneratedCell) -> DgResult<()> {
    self(cell)
  }
}

/// Keeps every cell.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
  pub cells: Vec<GeneratedCell>,
}

impl CellSink for CollectSink {
  fn accept(&mut self, cell: GeneratedCell) -> DgResult<()> {
    self.cells.push(cell);
    Ok(())
  }
}

/// Counts cells and drops them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountSink {
  pub count: u64,
}

impl CellSink for CountSink {
  fn accept(&mut self, _cell: GeneratedCell) -> DgResult<()> {
    self.count += 1;
    Ok(())
  }
}
