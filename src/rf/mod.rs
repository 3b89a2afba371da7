// src/rf/mod.rs
#![allow(clippy::module_name_repetitions)]

pub mod address;
pub mod converters;
pub mod graph;

pub use address::{Address, LABEL_PRECISION};
pub use graph::{Conversion, ConversionGraph};
