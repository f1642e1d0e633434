//! Fixed-timestep reactor and cooling tank simulation.
//!
//! Provides:
//! - Reactor core with fuel, neutron and heat dynamics plus operator controls
//! - Water tank with continuous inflow, boil-off and ambient cooling
//! - Reactor → tank heat exchange for coupled ticks
//! - Plant pairing, operator command schedule and a fixed-step session runner
//!
//! Components are plain values owned by the driver. Stepping never fails:
//! every update saturates into range.

pub mod command;
pub mod coupling;
pub mod error;
pub mod params;
pub mod plant;
pub mod reactor;
pub mod sim;
pub mod water_tank;

pub use command::{OperatorCommand, ScheduledCommand};
pub use error::{SimError, SimResult};
pub use params::{InterlockParams, ReactorParams, WaterTankParams};
pub use plant::{Plant, PlantSnapshot};
pub use reactor::{DANGER_NEUTRONS, Reactor, ReactorState, Regime};
pub use sim::{
    SessionOptions, SessionProgress, SessionRecord, SessionStats, run_session,
    run_session_with_progress,
};
pub use water_tank::{WaterTank, WaterTankState};
