//! Driver-owned pairing of a reactor and its cooling tank.

use crate::command::OperatorCommand;
use crate::error::SimResult;
use crate::params::{ReactorParams, WaterTankParams};
use crate::reactor::{Reactor, Regime};
use crate::water_tank::WaterTank;
use rx_core::Real;
use serde::{Deserialize, Serialize};

/// Every scalar a renderer would read after a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    pub fuel: Real,
    pub fuel_valve: bool,
    pub fuel_valve_blocked: bool,
    pub ignited: bool,
    pub neutrons: Real,
    pub reactor_heat: Real,
    pub venting: bool,
    pub waste: Real,
    pub regime: Regime,
    pub water: Real,
    pub valve: Real,
    pub tank_heat: Real,
}

/// Reactor plus tank, stepped together.
///
/// When `coupled` is false the tank still runs its own tick but receives
/// no heat from the reactor.
#[derive(Clone, Debug, Default)]
pub struct Plant {
    pub reactor: Reactor,
    pub tank: WaterTank,
    pub coupled: bool,
}

impl Plant {
    pub fn new(reactor: Reactor, tank: WaterTank, coupled: bool) -> Self {
        Self {
            reactor,
            tank,
            coupled,
        }
    }

    pub fn with_params(
        reactor: ReactorParams,
        tank: WaterTankParams,
        coupled: bool,
    ) -> SimResult<Self> {
        Ok(Self::new(
            Reactor::with_params(reactor)?,
            WaterTank::with_params(tank)?,
            coupled,
        ))
    }

    pub fn apply(&mut self, command: &OperatorCommand) {
        match *command {
            OperatorCommand::ToggleFuelValve => self.reactor.toggle_fuel_valve(),
            OperatorCommand::Ignite => self.reactor.ignite(),
            OperatorCommand::Vent { on } => self.reactor.vent(on),
            OperatorCommand::SetValve { fraction } => self.tank.set_valve(fraction),
        }
    }

    /// Reactor tick (coupled or not), then tank tick.
    pub fn step(&mut self, dt: Real) {
        if self.coupled {
            self.reactor.tick_coupled(dt, &mut self.tank);
        } else {
            self.reactor.tick(dt);
        }
        self.tank.tick(dt);
    }

    pub fn snapshot(&self) -> PlantSnapshot {
        let r = &self.reactor;
        let t = &self.tank;
        PlantSnapshot {
            fuel: r.fuel(),
            fuel_valve: r.fuel_valve(),
            fuel_valve_blocked: r.fuel_valve_blocked(),
            ignited: r.ignited(),
            neutrons: r.neutrons(),
            reactor_heat: r.heat(),
            venting: r.venting(),
            waste: r.waste(),
            regime: r.regime(),
            water: t.water(),
            valve: t.valve(),
            tank_heat: t.heat(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_route_to_components() {
        let mut plant = Plant::default();
        plant.apply(&OperatorCommand::ToggleFuelValve);
        plant.apply(&OperatorCommand::Ignite);
        plant.apply(&OperatorCommand::Vent { on: true });
        plant.apply(&OperatorCommand::SetValve { fraction: 0.3 });

        let s = plant.snapshot();
        assert!(s.fuel_valve);
        assert!(s.ignited);
        assert!(s.venting);
        assert_eq!(s.valve, 0.3);
    }

    #[test]
    fn uncoupled_tank_stays_cold() {
        let mut plant = Plant::default();
        plant.apply(&OperatorCommand::Ignite);
        for _ in 0..600 {
            plant.step(1.0 / 60.0);
        }
        assert!(plant.reactor.heat() > 0.0);
        assert_eq!(plant.tank.heat(), 0.0);
    }

    #[test]
    fn coupled_tank_warms_up() {
        let mut plant = Plant {
            coupled: true,
            ..Default::default()
        };
        plant.apply(&OperatorCommand::Ignite);
        for _ in 0..600 {
            plant.step(1.0 / 60.0);
        }
        assert!(plant.tank.heat() > 0.0);
    }

    #[test]
    fn with_params_validates() {
        let bad = ReactorParams {
            refill_rate: -1.0,
            ..Default::default()
        };
        assert!(Plant::with_params(bad, WaterTankParams::default(), true).is_err());
    }
}
