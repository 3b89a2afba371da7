// src/projection/mod.rs
#![allow(clippy::module_name_repetitions)]

pub mod gnomonic;
pub mod icosa;
pub mod isea;

pub use gnomonic::Gnomonic;
pub use icosa::IcosaPlacement;
pub use isea::Isea;
