//! Scenario file schema.

use rx_sim::{OperatorCommand, ReactorParams, ScheduledCommand, SessionOptions, WaterTankParams};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

/// A scripted session: plant parameters, run options and operator commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub reactor: ReactorParams,
    #[serde(default)]
    pub tank: WaterTankParams,
    /// Feed reactor heat into the tank each step
    #[serde(default = "default_coupled")]
    pub coupled: bool,
    #[serde(default)]
    pub session: SessionOptions,
    #[serde(default)]
    pub commands: Vec<ScheduledCommand>,
}

fn default_coupled() -> bool {
    true
}

impl Scenario {
    /// Empty scenario with default parameters and no commands.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            reactor: ReactorParams::default(),
            tank: WaterTankParams::default(),
            coupled: true,
            session: SessionOptions::default(),
            commands: Vec::new(),
        }
    }

    /// Standard startup: open the fuel valve and coolant inflow, ignite after
    /// one second, then a two second vent.
    pub fn startup_template() -> Self {
        Self {
            commands: vec![
                ScheduledCommand::new(0.0, OperatorCommand::ToggleFuelValve),
                ScheduledCommand::new(0.0, OperatorCommand::SetValve { fraction: 1.0 }),
                ScheduledCommand::new(1.0, OperatorCommand::Ignite),
                ScheduledCommand::new(4.0, OperatorCommand::Vent { on: true }),
                ScheduledCommand::new(6.0, OperatorCommand::Vent { on: false }),
            ],
            ..Self::new("Startup")
        }
    }
}
