//! Gray atmosphere (single-slab) energy balance model.
//!
//! The model itself lives in [`grayslab_core`]; this crate re-exports it and
//! builds the `grayslab._lib` Python extension when the `python` feature is
//! enabled.

pub use grayslab_core::*;

#[cfg(feature = "python")]
mod python;
