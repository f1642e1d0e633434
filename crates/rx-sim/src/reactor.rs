//! Lumped fission core: fuel stock, neutron population and heat.
//!
//! Each tick applies, in order: fuel intake and burn, neutron growth and
//! decay, heat generation and loss, and (coupled ticks only) heat exchange
//! with a [`WaterTank`]. Every update saturates into range; nothing here can
//! fail once the reactor is built.

use crate::coupling::heat_transfer;
use crate::error::SimResult;
use crate::params::ReactorParams;
use crate::water_tank::WaterTank;
use rx_core::{Real, clamp_unit, sanitize_dt, saturate_non_negative};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Upper edge of the nominal neutron band. Above this is the danger regime.
pub const DANGER_NEUTRONS: Real = 2.0;

/// Population below which an unignited core counts as cold. A shrinking
/// ignited population that falls under it is quenched.
const COLD_NEUTRONS: Real = 1e-6;

/// Coarse operating regime derived from the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Not ignited, no meaningful neutron population
    Cold,
    /// Not ignited, residual population still decaying
    Subcritical,
    /// Ignited, population within the nominal band
    Nominal,
    /// Population above [`DANGER_NEUTRONS`]
    Danger,
}

/// Scalar state of a reactor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactorState {
    pub fuel: Real,
    pub fuel_valve_open: bool,
    #[serde(default)]
    pub fuel_valve_blocked: bool,
    pub ignited: bool,
    pub neutrons: Real,
    pub heat: Real,
    pub venting: bool,
    #[serde(default)]
    pub waste: Real,
}

/// Fission reactor core with operator controls.
#[derive(Clone, Debug)]
pub struct Reactor {
    params: ReactorParams,
    fuel: Real,
    fuel_valve_open: bool,
    fuel_valve_blocked: bool,
    ignited: bool,
    neutrons: Real,
    heat: Real,
    venting: bool,
    waste: Real,
}

impl Default for Reactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactor {
    /// Reactor with default parameters in its resting state.
    pub fn new() -> Self {
        Self::from_valid_params(ReactorParams::default())
    }

    /// Reactor with custom parameters in its resting state.
    pub fn with_params(params: ReactorParams) -> SimResult<Self> {
        params.validate()?;
        Ok(Self::from_valid_params(params))
    }

    /// Reactor restored from a state snapshot.
    ///
    /// Out-of-range values are clamped. An ignited snapshot without fuel or
    /// without neutrons comes back unignited, and the interlock flag is
    /// dropped when the parameters carry no interlock.
    pub fn from_state(params: ReactorParams, state: &ReactorState) -> SimResult<Self> {
        params.validate()?;
        let fuel = clamp_unit(state.fuel);
        let neutrons = saturate_non_negative(state.neutrons);
        let waste = saturate_non_negative(state.waste).min(params.waste_cap);
        Ok(Self {
            fuel,
            fuel_valve_open: state.fuel_valve_open,
            fuel_valve_blocked: state.fuel_valve_blocked && params.interlock.is_some(),
            ignited: state.ignited && fuel > 0.0 && neutrons > 0.0,
            neutrons,
            heat: saturate_non_negative(state.heat),
            venting: state.venting,
            waste,
            params,
        })
    }

    fn from_valid_params(params: ReactorParams) -> Self {
        Self {
            fuel: params.initial_fuel,
            fuel_valve_open: false,
            fuel_valve_blocked: false,
            ignited: false,
            neutrons: 0.0,
            heat: 0.0,
            venting: false,
            waste: 0.0,
            params,
        }
    }

    pub fn params(&self) -> &ReactorParams {
        &self.params
    }

    pub fn state(&self) -> ReactorState {
        ReactorState {
            fuel: self.fuel,
            fuel_valve_open: self.fuel_valve_open,
            fuel_valve_blocked: self.fuel_valve_blocked,
            ignited: self.ignited,
            neutrons: self.neutrons,
            heat: self.heat,
            venting: self.venting,
            waste: self.waste,
        }
    }

    pub fn fuel(&self) -> Real {
        self.fuel
    }

    /// Operator valve position. Independent of the interlock.
    pub fn fuel_valve(&self) -> bool {
        self.fuel_valve_open
    }

    pub fn fuel_valve_blocked(&self) -> bool {
        self.fuel_valve_blocked
    }

    /// Whether fuel actually flows in on the next tick.
    pub fn fuel_intake_open(&self) -> bool {
        self.fuel_valve_open && !self.fuel_valve_blocked
    }

    pub fn ignited(&self) -> bool {
        self.ignited
    }

    pub fn neutrons(&self) -> Real {
        self.neutrons
    }

    /// Raw heat accumulator. Any display compression belongs to the caller.
    pub fn heat(&self) -> Real {
        self.heat
    }

    pub fn venting(&self) -> bool {
        self.venting
    }

    pub fn waste(&self) -> Real {
        self.waste
    }

    pub fn regime(&self) -> Regime {
        if self.neutrons > DANGER_NEUTRONS {
            Regime::Danger
        } else if self.ignited {
            Regime::Nominal
        } else if self.neutrons > COLD_NEUTRONS {
            Regime::Subcritical
        } else {
            Regime::Cold
        }
    }

    pub fn toggle_fuel_valve(&mut self) {
        self.fuel_valve_open = !self.fuel_valve_open;
        debug!(open = self.fuel_valve_open, "fuel valve toggled");
    }

    /// Start the chain reaction.
    ///
    /// No-op when already ignited or when the core holds no fuel.
    pub fn ignite(&mut self) {
        if self.ignited {
            debug!("ignition ignored: already ignited");
            return;
        }
        if self.fuel <= 0.0 {
            debug!("ignition refused: no fuel");
            return;
        }
        self.ignited = true;
        self.neutrons = saturate_non_negative(self.neutrons + self.params.ignition_seed);
        debug!(fuel = self.fuel, neutrons = self.neutrons, "ignited");
    }

    /// Open or close the emergency vent. Takes effect on the next tick.
    pub fn vent(&mut self, on: bool) {
        if self.venting != on {
            debug!(on, "vent set");
        }
        self.venting = on;
    }

    /// Advance by `dt` seconds without a coolant tank.
    pub fn tick(&mut self, dt: Real) {
        let dt = step_length(dt);
        if dt == 0.0 {
            return;
        }
        self.advance(dt);
    }

    /// Advance by `dt` seconds, then pass heat into `tank`.
    ///
    /// Only heat moves; neither the tank's valve nor the fuel valve is touched.
    pub fn tick_coupled(&mut self, dt: Real, tank: &mut WaterTank) {
        let dt = step_length(dt);
        if dt == 0.0 {
            return;
        }
        self.advance(dt);

        let q = heat_transfer(
            self.heat,
            tank.heat(),
            tank.water(),
            self.params.coupling_rate,
            dt,
        );
        if q > 0.0 {
            self.heat = saturate_non_negative(self.heat - q);
            tank.absorb_heat(q);
        }
    }

    fn advance(&mut self, dt: Real) {
        let regime_before = self.regime();
        self.update_interlock();
        self.update_fuel(dt);
        self.update_neutrons(dt);
        self.update_heat(dt);

        let regime_after = self.regime();
        if regime_after != regime_before {
            if regime_after == Regime::Danger {
                warn!(neutrons = self.neutrons, heat = self.heat, "entered danger regime");
            } else {
                info!(from = ?regime_before, to = ?regime_after, "regime change");
            }
        }
    }

    fn update_interlock(&mut self) {
        let Some(il) = &self.params.interlock else {
            return;
        };
        if self.heat >= il.block_heat || self.neutrons >= il.block_neutrons {
            if !self.fuel_valve_blocked {
                info!(heat = self.heat, neutrons = self.neutrons, "fuel intake interlock engaged");
            }
            self.fuel_valve_blocked = true;
        } else if self.fuel_valve_blocked && self.heat < il.release_heat {
            info!(heat = self.heat, "fuel intake interlock released");
            self.fuel_valve_blocked = false;
        }
    }

    fn update_fuel(&mut self, dt: Real) {
        let p = &self.params;
        let intake = if self.fuel_intake_open() {
            p.refill_rate * dt
        } else {
            0.0
        };
        let demand = p.burn_rate * self.neutrons * dt;

        let available = self.fuel + intake;
        let consumed = demand.min(available);
        self.fuel = clamp_unit(available - consumed);
        self.waste = saturate_non_negative(self.waste + p.waste_ratio * consumed).min(p.waste_cap);
    }

    fn update_neutrons(&mut self, dt: Real) {
        if self.ignited && self.fuel <= 0.0 {
            self.ignited = false;
            info!(neutrons = self.neutrons, "fuel exhausted, chain reaction stopped");
        }
        let p = &self.params;
        let mut rate = if self.ignited {
            p.chain_rate(self.fuel)
        } else {
            -p.decay_rate
        };
        if self.venting {
            rate -= p.vent_neutron_rate;
        }
        let before = self.neutrons;
        self.neutrons = saturate_non_negative(self.neutrons * (1.0 + rate * dt));

        // A population driven to nothing cannot regrow; drop back to unignited.
        if self.ignited && self.neutrons < COLD_NEUTRONS && self.neutrons < before {
            self.ignited = false;
            info!(venting = self.venting, "chain reaction quenched");
        }
    }

    fn update_heat(&mut self, dt: Real) {
        let p = &self.params;
        let generated = p.heat_per_neutron * self.neutrons * dt;
        let mut lost = p.passive_dissipation * dt;
        if self.venting {
            lost += p.vent_heat_rate * dt;
        }
        self.heat = saturate_non_negative(self.heat + generated - lost);
    }
}

fn step_length(dt: Real) -> Real {
    let step = sanitize_dt(dt);
    if step == 0.0 && dt != 0.0 {
        warn!(dt, "ignoring invalid time step");
    }
    step
}
