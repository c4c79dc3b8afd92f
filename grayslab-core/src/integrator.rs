//! Radiative-Balance Integrator
//!
//! Advances the coupled surface/atmosphere temperatures with explicit
//! (forward Euler) steps of fixed size.
//!
//! # Step order
//!
//! Each step is sequential, not simultaneous:
//!
//! 1. The surface is updated using the atmosphere temperature from the
//!    previous step.
//! 2. The atmosphere is updated using the surface temperature just computed.
//!
//! Swapping these, or evaluating both fluxes before either update, changes
//! the trajectory.
//!
//! # Stability
//!
//! The $\sigma T^4$ terms make the system stiff once temperatures grow. With a
//! time step that is large relative to $C_s / (4 \sigma T_s^3)$ the solution
//! oscillates or diverges. That is a property of the model and is returned
//! as ordinary output; no step is clamped or rejected.

use crate::errors::GraySlabResult;
use crate::parameters::SimulationParameters;
use crate::physics::{atmosphere_net_flux, surface_net_flux};
use crate::timeseries::{FloatValue, Time, Timeseries};
use log::{debug, trace, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

// Longer runs grow their buffers as they go
const PREALLOCATED_STEPS: usize = 1 << 16;

/// Temperatures of the two bodies (K)
///
/// Both start at zero: the initial condition, not a physical claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub surface_temperature: FloatValue,
    pub atmosphere_temperature: FloatValue,
}

impl SimulationState {
    pub fn is_finite(&self) -> bool {
        self.surface_temperature.is_finite() && self.atmosphere_temperature.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorStatus {
    /// No step has been taken yet
    Initialized,
    /// Some, but not all, steps have been taken
    Running,
    /// All steps have been taken
    Completed,
}

/// Output of a completed run.
///
/// The surface series is sampled after each step at `t_i = i * dt`. The
/// atmosphere series is sampled at the same times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    surface: Timeseries,
    atmosphere: Timeseries,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.surface.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }

    pub fn time_axis(&self) -> &Array1<Time> {
        self.surface.time_axis()
    }

    /// Surface temperature after each step
    pub fn surface(&self) -> &Timeseries {
        &self.surface
    }

    /// Atmosphere temperature after each step
    pub fn atmosphere(&self) -> &Timeseries {
        &self.atmosphere
    }

    /// `(t, T_s)` pairs in time order
    pub fn points(&self) -> impl Iterator<Item = (Time, FloatValue)> + '_ {
        self.surface.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trajectory: Trajectory,
    pub final_state: SimulationState,
}

impl SimulationResult {
    pub fn final_atmosphere_temperature(&self) -> FloatValue {
        self.final_state.atmosphere_temperature
    }

    /// Largest surface temperature over the run, `None` for an empty run
    pub fn max_surface_temperature(&self) -> Option<FloatValue> {
        self.trajectory.surface().max()
    }

    /// Largest atmosphere temperature over the run, `None` for an empty run
    pub fn max_atmosphere_temperature(&self) -> Option<FloatValue> {
        self.trajectory.atmosphere().max()
    }
}

/// Forward Euler integrator for the single-slab model.
///
/// Owns the mutable state for exactly one run.
#[derive(Debug, Clone)]
pub struct RadiativeBalanceIntegrator {
    parameters: SimulationParameters,
    state: SimulationState,
    n_steps: usize,
    time: Vec<Time>,
    surface: Vec<FloatValue>,
    atmosphere: Vec<FloatValue>,
    diverged: bool,
}

impl RadiativeBalanceIntegrator {
    /// Validate `parameters` and set up a run starting from zero temperatures
    pub fn new(parameters: SimulationParameters) -> GraySlabResult<Self> {
        parameters.validate()?;
        Ok(Self::new_unchecked(parameters))
    }

    /// Set up a run without validating the parameters
    ///
    /// Invalid parameters produce meaningless, but well-defined, floating
    /// point output.
    pub fn new_unchecked(parameters: SimulationParameters) -> Self {
        let n_steps = parameters.n_steps();
        let capacity = n_steps.min(PREALLOCATED_STEPS);
        Self {
            parameters,
            state: SimulationState::default(),
            n_steps,
            time: Vec::with_capacity(capacity),
            surface: Vec::with_capacity(capacity),
            atmosphere: Vec::with_capacity(capacity),
            diverged: false,
        }
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn steps_taken(&self) -> usize {
        self.surface.len()
    }

    pub fn status(&self) -> IntegratorStatus {
        let taken = self.steps_taken();
        if taken == self.n_steps {
            IntegratorStatus::Completed
        } else if taken == 0 {
            IntegratorStatus::Initialized
        } else {
            IntegratorStatus::Running
        }
    }

    /// Take one Euler step and record the result.
    ///
    /// Returns `None` once all steps have been taken.
    pub fn step(&mut self) -> Option<SimulationState> {
        if self.status() == IntegratorStatus::Completed {
            return None;
        }
        let index = self.steps_taken();
        let params = &self.parameters;
        let mut state = self.state;

        let flux_surface =
            surface_net_flux(params, state.surface_temperature, state.atmosphere_temperature);
        state.surface_temperature += flux_surface * params.dt / params.heat_capacity;

        let flux_atmosphere =
            atmosphere_net_flux(params, state.surface_temperature, state.atmosphere_temperature);
        state.atmosphere_temperature +=
            flux_atmosphere * params.dt / params.atmosphere_heat_capacity;

        let t = params.time_at(index);
        trace!(
            "step {}: t={} T_s={} T_a={}",
            index,
            t,
            state.surface_temperature,
            state.atmosphere_temperature
        );
        if !self.diverged && !state.is_finite() {
            self.diverged = true;
            warn!(
                "Temperatures became non-finite at step {} (t={} s); dt={} s may be too large for a stable explicit step",
                index, t, params.dt
            );
        }

        self.state = state;
        self.time.push(t);
        self.surface.push(state.surface_temperature);
        self.atmosphere.push(state.atmosphere_temperature);
        Some(state)
    }

    /// Take all remaining steps and return the trajectory
    pub fn run(mut self) -> SimulationResult {
        debug!(
            "Integrating {} steps of {} s from step {}",
            self.n_steps,
            self.parameters.dt,
            self.steps_taken()
        );
        while self.step().is_some() {}
        debug!(
            "Finished: T_s={} K, T_a={} K",
            self.state.surface_temperature, self.state.atmosphere_temperature
        );

        let time = Array1::from_vec(self.time);
        let trajectory = Trajectory {
            surface: Timeseries::from_values(Array1::from_vec(self.surface), time.clone()),
            atmosphere: Timeseries::from_values(Array1::from_vec(self.atmosphere), time),
        };
        SimulationResult {
            trajectory,
            final_state: self.state,
        }
    }
}

/// Validate `parameters` and integrate the model to completion
pub fn run(parameters: &SimulationParameters) -> GraySlabResult<SimulationResult> {
    Ok(RadiativeBalanceIntegrator::new(parameters.clone())?.run())
}
