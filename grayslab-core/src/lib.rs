//! Single-slab (gray atmosphere) energy balance model.
//!
//! A surface and one atmospheric layer exchange longwave radiation
//! ($\sigma T^4$) while the surface absorbs shortwave insolation. The two
//! temperatures are integrated forward in time with explicit Euler steps.
//!
//! ```
//! use grayslab_core::integrator::run;
//! use grayslab_core::parameters::SimulationParameters;
//! use grayslab_core::summary::{Summary, SummaryStyle};
//!
//! let result = run(&SimulationParameters::default()).unwrap();
//! assert_eq!(result.trajectory.len(), 60);
//!
//! let lines = Summary::from_result(&result).lines(SummaryStyle::Legacy);
//! assert_eq!(lines[0], "Earth maximum temperature 286.639 K");
//! ```

pub mod chart;
pub mod errors;
pub mod integrator;
pub mod parameters;
pub mod physics;
#[cfg(feature = "python")]
pub mod python;
pub mod summary;
pub mod timeseries;
