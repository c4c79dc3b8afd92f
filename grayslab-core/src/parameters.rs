//! Simulation Parameters
//!
//! Physical and numerical constants for a single run of the single-slab
//! model. Parameters are immutable once a run starts.

use crate::errors::{GraySlabError, GraySlabResult};
use crate::physics::STEFAN_BOLTZMANN;
use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest number of integration steps a run may take.
///
/// The whole trajectory is held in memory, three `f64` per step.
pub const MAX_STEPS: usize = 10_000_000;

// Ratios this close to an integer count as that integer, so that e.g.
// 0.3 / 0.1 gives 3 steps rather than 2.
const STEP_RATIO_TOLERANCE: f64 = 1e-9;

/// Parameters for the single-slab (gray atmosphere) model.
///
/// Any subset of fields can be supplied when deserialising; missing fields
/// take the defaults listed below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParameters {
    /// Integration time step (s).
    /// Default: 60.0
    pub dt: Time,

    /// Length of the simulated period (s).
    /// The number of steps is `floor(duration / dt)`.
    /// Default: 3600.0
    pub duration: Time,

    /// Incoming shortwave flux at the top of the atmosphere ($\text{W/m}^2$).
    /// Default: 1367.0
    pub insolation: FloatValue,

    /// Fraction of insolation reflected (dimensionless, [0, 1)).
    /// Default: 0.3
    pub albedo: FloatValue,

    /// Surface heat capacity ($\text{J/m}^2\text{/K}$).
    /// Default: 850.0
    pub heat_capacity: FloatValue,

    /// Atmosphere layer heat capacity ($\text{J/m}^2\text{/K}$).
    /// Default: 700.0
    pub atmosphere_heat_capacity: FloatValue,

    /// Longwave emissivity of the atmosphere layer (dimensionless, (0, 1]).
    /// Default: 0.75
    pub emissivity: FloatValue,

    /// Stefan-Boltzmann constant ($\text{W/m}^2\text{/K}^4$).
    /// Default: 5.67e-8
    pub stefan_boltzmann: FloatValue,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            dt: 60.0,
            duration: 3600.0,
            insolation: 1367.0,
            albedo: 0.3,
            heat_capacity: 850.0,
            atmosphere_heat_capacity: 700.0,
            emissivity: 0.75,
            stefan_boltzmann: STEFAN_BOLTZMANN,
        }
    }
}

impl SimulationParameters {
    /// Number of integration steps, `floor(duration / dt)`
    ///
    /// Non-finite ratios give zero steps; `validate` rejects them.
    pub fn n_steps(&self) -> usize {
        let ratio = self.step_ratio();
        if ratio.is_finite() && ratio > 0.0 {
            ratio as usize
        } else {
            0
        }
    }

    /// `duration / dt` floored, with near-integer ratios snapped first
    fn step_ratio(&self) -> f64 {
        let ratio = self.duration / self.dt;
        let nearest = ratio.round();
        if (ratio - nearest).abs() <= STEP_RATIO_TOLERANCE * nearest.max(1.0) {
            nearest
        } else {
            ratio.floor()
        }
    }

    /// Time of step `index`
    pub fn time_at(&self, index: usize) -> Time {
        index as Time * self.dt
    }

    /// Check every parameter against the model's physical constraints.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> GraySlabResult<()> {
        positive("dt", self.dt)?;
        check(
            "duration",
            self.duration,
            self.duration.is_finite() && self.duration >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "insolation",
            self.insolation,
            self.insolation.is_finite() && self.insolation >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "albedo",
            self.albedo,
            (0.0..1.0).contains(&self.albedo),
            "must be in [0, 1)",
        )?;
        positive("heat_capacity", self.heat_capacity)?;
        positive("atmosphere_heat_capacity", self.atmosphere_heat_capacity)?;
        check(
            "emissivity",
            self.emissivity,
            self.emissivity > 0.0 && self.emissivity <= 1.0,
            "must be in (0, 1]",
        )?;
        positive("stefan_boltzmann", self.stefan_boltzmann)?;
        let ratio = self.step_ratio();
        check(
            "duration",
            self.duration,
            ratio.is_finite() && ratio <= MAX_STEPS as f64,
            "duration / dt exceeds the maximum number of steps (10 000 000)",
        )?;
        Ok(())
    }

    /// Parse parameters from a TOML document and validate them
    pub fn from_toml_str(content: &str) -> GraySlabResult<Self> {
        let parameters: Self =
            toml::from_str(content).map_err(|e| GraySlabError::Config(e.to_string()))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Read parameters from a TOML file and validate them
    pub fn from_file(path: impl AsRef<Path>) -> GraySlabResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> GraySlabResult<String> {
        toml::to_string(self).map_err(|e| GraySlabError::Config(e.to_string()))
    }
}

fn check(
    name: &'static str,
    value: FloatValue,
    valid: bool,
    reason: &'static str,
) -> GraySlabResult<()> {
    if valid {
        Ok(())
    } else {
        Err(GraySlabError::InvalidParameter {
            name,
            value,
            reason,
        })
    }
}

fn positive(name: &'static str, value: FloatValue) -> GraySlabResult<()> {
    check(
        name,
        value,
        value.is_finite() && value > 0.0,
        "must be finite and positive",
    )
}
