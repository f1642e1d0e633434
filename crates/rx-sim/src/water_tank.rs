//! Auxiliary cooling water tank.

use crate::error::SimResult;
use crate::params::WaterTankParams;
use rx_core::{Real, clamp_unit, sanitize_dt, saturate_non_negative};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Scalar state of a water tank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterTankState {
    /// Fill level [0, 1]
    pub water: Real,
    /// Inflow aperture [0, 1]
    pub valve: Real,
    /// Thermal energy of the contents
    pub heat: Real,
}

/// Water reservoir with a continuous inflow valve.
///
/// Heat only arrives through the reactor's coupled tick; the tank's own
/// tick fills, boils off and cools.
#[derive(Clone, Debug)]
pub struct WaterTank {
    params: WaterTankParams,
    water: Real,
    valve: Real,
    heat: Real,
}

impl Default for WaterTank {
    fn default() -> Self {
        Self::new()
    }
}

impl WaterTank {
    /// Tank with default parameters in its resting state.
    pub fn new() -> Self {
        Self::from_valid_params(WaterTankParams::default())
    }

    /// Tank with custom parameters in its resting state.
    pub fn with_params(params: WaterTankParams) -> SimResult<Self> {
        params.validate()?;
        Ok(Self::from_valid_params(params))
    }

    /// Tank restored from a state snapshot.
    ///
    /// Out-of-range values are clamped into the tank's invariants.
    pub fn from_state(params: WaterTankParams, state: &WaterTankState) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            water: clamp_unit(state.water),
            valve: clamp_unit(state.valve),
            heat: saturate_non_negative(state.heat),
        })
    }

    fn from_valid_params(params: WaterTankParams) -> Self {
        Self {
            water: params.initial_water,
            valve: params.initial_valve,
            heat: 0.0,
            params,
        }
    }

    pub fn params(&self) -> &WaterTankParams {
        &self.params
    }

    pub fn state(&self) -> WaterTankState {
        WaterTankState {
            water: self.water,
            valve: self.valve,
            heat: self.heat,
        }
    }

    pub fn water(&self) -> Real {
        self.water
    }

    pub fn valve(&self) -> Real {
        self.valve
    }

    pub fn heat(&self) -> Real {
        self.heat
    }

    /// Set the inflow aperture. Out-of-range input is clamped, NaN closes.
    pub fn set_valve(&mut self, fraction: Real) {
        self.valve = clamp_unit(fraction);
        debug!(requested = fraction, valve = self.valve, "tank valve set");
    }

    /// Advance by `dt` seconds: inflow, boil-off, then cooling.
    pub fn tick(&mut self, dt: Real) {
        let dt = sanitize_dt(dt);
        if dt == 0.0 {
            return;
        }
        let p = &self.params;

        let inflow = p.inflow_rate * self.valve * dt;
        let evaporated = (p.boil_off_rate * self.heat * dt).min(self.water);
        self.water = clamp_unit(self.water + inflow - evaporated);

        let cooling = p.ambient_dissipation * dt + p.evaporative_cooling * evaporated;
        self.heat = saturate_non_negative(self.heat - cooling);
    }

    /// Receive heat from a coupled reactor.
    pub(crate) fn absorb_heat(&mut self, amount: Real) {
        if amount.is_nan() || amount < 0.0 {
            warn!(amount, "ignoring invalid heat transfer into tank");
            return;
        }
        self.heat = saturate_non_negative(self.heat + amount);
    }
}
