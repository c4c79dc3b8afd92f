//! Radiative physics of the single-slab model.
//!
//! The surface absorbs shortwave insolation and longwave emission from the
//! atmosphere and loses heat by its own longwave emission:
//!
//! $$ F_s = S (1 - \alpha) + 4 \epsilon \sigma T_a^4 - 4 \sigma T_s^4 $$
//!
//! The atmosphere absorbs a fraction $\epsilon$ of the surface emission and
//! radiates from both of its faces:
//!
//! $$ F_a = \epsilon (\sigma T_s^4 - 2 \sigma T_a^4) $$
//!
//! The factor of 4 on the surface longwave terms is part of this model's
//! formulation and is kept as is.

use crate::parameters::SimulationParameters;
use crate::timeseries::FloatValue;
use num::Float;

/// Stefan-Boltzmann constant
/// unit: W / m^2 / K^4
pub const STEFAN_BOLTZMANN: FloatValue = 5.67e-8;

/// Blackbody emission $\sigma T^4$
pub fn black_body<T: Float>(sigma: T, temperature: T) -> T {
    sigma * temperature.powi(4)
}

/// Net energy flux into the surface (W / m^2)
pub fn surface_net_flux(
    parameters: &SimulationParameters,
    surface_temperature: FloatValue,
    atmosphere_temperature: FloatValue,
) -> FloatValue {
    let sigma = parameters.stefan_boltzmann;
    parameters.insolation * (1.0 - parameters.albedo)
        + 4.0 * parameters.emissivity * black_body(sigma, atmosphere_temperature)
        - 4.0 * black_body(sigma, surface_temperature)
}

/// Net energy flux into the atmosphere layer (W / m^2)
pub fn atmosphere_net_flux(
    parameters: &SimulationParameters,
    surface_temperature: FloatValue,
    atmosphere_temperature: FloatValue,
) -> FloatValue {
    let sigma = parameters.stefan_boltzmann;
    parameters.emissivity
        * (black_body(sigma, surface_temperature)
            - 2.0 * black_body(sigma, atmosphere_temperature))
}
