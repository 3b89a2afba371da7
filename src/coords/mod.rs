// src/coords/mod.rs
#![allow(clippy::module_name_repetitions)]

pub mod ijk;
pub mod quad;
pub mod vertex;

pub use quad::{remap_overage, QuadEdgeCells, QUAD_EDGE_TABLE};
pub use vertex::{classify_subtriangle, projtri_to_quad, projtri_to_vertex, quad_to_projtri, quad_to_vertex, vertex_to_projtri};
