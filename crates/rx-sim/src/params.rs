//! Rate constants and initial conditions for the reactor and the tank.
//!
//! All rates are per second of simulated time. Values are dimensionless
//! proxies: fuel and water are fractions of capacity, neutrons and heat are
//! unbounded accumulators.

use crate::error::{SimError, SimResult};
use rx_core::{Real, ensure_fraction, ensure_non_negative};
use serde::{Deserialize, Serialize};

/// Reactor dynamics parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorParams {
    /// Fuel charge at session start [0, 1]
    pub initial_fuel: Real,
    /// Fuel added per second while the intake is open
    pub refill_rate: Real,
    /// Fuel consumed per unit neutron population per second
    pub burn_rate: Real,
    /// Neutrons added by a successful ignition, must be positive
    pub ignition_seed: Real,
    /// Chain-reaction growth coefficient at full fuel (scaled by population)
    pub growth_rate: Real,
    /// Fuel sensitivity of growth: the chain term scales with `fuel^fuel_exponent`
    pub fuel_exponent: Real,
    /// Natural absorption/escape coefficient (scaled by population)
    pub decay_rate: Real,
    /// Extra bleed coefficient while venting (scaled by population)
    pub vent_neutron_rate: Real,
    /// Heat released per unit neutron population per second
    pub heat_per_neutron: Real,
    /// Heat lost to the surroundings per second
    pub passive_dissipation: Real,
    /// Extra heat bled per second while venting
    pub vent_heat_rate: Real,
    /// Heat transfer into the tank per unit of (capped) driving difference
    pub coupling_rate: Real,
    /// Waste produced per unit of fuel consumed
    pub waste_ratio: Real,
    /// Upper bound of the waste accumulator
    pub waste_cap: Real,
    /// Fuel intake safety interlock, disabled when `None`
    pub interlock: Option<InterlockParams>,
}

impl Default for ReactorParams {
    fn default() -> Self {
        Self {
            initial_fuel: 0.9,
            refill_rate: 0.05,
            burn_rate: 0.1,
            ignition_seed: 0.1,
            growth_rate: 0.6,
            fuel_exponent: 0.02,
            decay_rate: 0.3,
            vent_neutron_rate: 2.0,
            heat_per_neutron: 1.0,
            passive_dissipation: 0.2,
            vent_heat_rate: 1.0,
            coupling_rate: 2.0,
            waste_ratio: 0.97,
            waste_cap: 10.0,
            interlock: None,
        }
    }
}

impl ReactorParams {
    /// Check every field is finite and in range.
    pub fn validate(&self) -> SimResult<()> {
        ensure_fraction(self.initial_fuel, "initial_fuel")?;
        ensure_non_negative(self.refill_rate, "refill_rate")?;
        ensure_non_negative(self.burn_rate, "burn_rate")?;
        ensure_non_negative(self.ignition_seed, "ignition_seed")?;
        if self.ignition_seed <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "ignition_seed must be positive",
            });
        }
        ensure_non_negative(self.growth_rate, "growth_rate")?;
        ensure_non_negative(self.fuel_exponent, "fuel_exponent")?;
        ensure_non_negative(self.decay_rate, "decay_rate")?;
        ensure_non_negative(self.vent_neutron_rate, "vent_neutron_rate")?;
        ensure_non_negative(self.heat_per_neutron, "heat_per_neutron")?;
        ensure_non_negative(self.passive_dissipation, "passive_dissipation")?;
        ensure_non_negative(self.vent_heat_rate, "vent_heat_rate")?;
        ensure_non_negative(self.coupling_rate, "coupling_rate")?;
        ensure_non_negative(self.waste_ratio, "waste_ratio")?;
        ensure_non_negative(self.waste_cap, "waste_cap")?;
        if let Some(interlock) = &self.interlock {
            interlock.validate()?;
        }
        Ok(())
    }

    /// Fuel fraction above which an ignited core grows when not venting.
    ///
    /// Solves `growth_rate * fuel^fuel_exponent = decay_rate`. Infinite when
    /// even a full core cannot outgrow decay.
    pub fn critical_fuel(&self) -> Real {
        if self.growth_rate <= self.decay_rate {
            return Real::INFINITY;
        }
        if self.decay_rate == 0.0 || self.fuel_exponent == 0.0 {
            return 0.0;
        }
        (self.decay_rate / self.growth_rate).powf(self.fuel_exponent.recip())
    }

    /// Net per-second neutron rate for an ignited, non-venting core.
    pub fn chain_rate(&self, fuel: Real) -> Real {
        self.growth_rate * fuel.max(0.0).powf(self.fuel_exponent) - self.decay_rate
    }
}

/// Thresholds for the fuel intake interlock.
///
/// The intake blocks when heat or neutrons reach their block level and
/// releases only once heat drops below `release_heat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterlockParams {
    pub block_heat: Real,
    pub block_neutrons: Real,
    pub release_heat: Real,
}

impl Default for InterlockParams {
    fn default() -> Self {
        Self {
            block_heat: 3.0,
            block_neutrons: 3.0,
            release_heat: 1.2,
        }
    }
}

impl InterlockParams {
    pub fn validate(&self) -> SimResult<()> {
        ensure_non_negative(self.block_heat, "interlock.block_heat")?;
        ensure_non_negative(self.block_neutrons, "interlock.block_neutrons")?;
        ensure_non_negative(self.release_heat, "interlock.release_heat")?;
        if self.release_heat > self.block_heat {
            return Err(SimError::InvalidArg {
                what: "interlock.release_heat must not exceed block_heat",
            });
        }
        Ok(())
    }
}

/// Water tank parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterTankParams {
    /// Fill level at session start [0, 1]
    pub initial_water: Real,
    /// Inflow valve aperture at session start [0, 1]
    pub initial_valve: Real,
    /// Water added per second at full aperture
    pub inflow_rate: Real,
    /// Water boiled off per unit tank heat per second
    pub boil_off_rate: Real,
    /// Heat lost to ambient per second
    pub ambient_dissipation: Real,
    /// Heat carried away per unit of water boiled off
    pub evaporative_cooling: Real,
}

impl Default for WaterTankParams {
    fn default() -> Self {
        Self {
            initial_water: 0.8,
            initial_valve: 0.0,
            inflow_rate: 0.1,
            boil_off_rate: 0.01,
            ambient_dissipation: 0.05,
            evaporative_cooling: 20.0,
        }
    }
}

impl WaterTankParams {
    pub fn validate(&self) -> SimResult<()> {
        ensure_fraction(self.initial_water, "initial_water")?;
        ensure_fraction(self.initial_valve, "initial_valve")?;
        ensure_non_negative(self.inflow_rate, "inflow_rate")?;
        ensure_non_negative(self.boil_off_rate, "boil_off_rate")?;
        ensure_non_negative(self.ambient_dissipation, "ambient_dissipation")?;
        ensure_non_negative(self.evaporative_cooling, "evaporative_cooling")?;
        Ok(())
    }
}
