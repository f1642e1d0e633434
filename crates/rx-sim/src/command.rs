//! Operator commands and their schedule.

use rx_core::Real;
use serde::{Deserialize, Serialize};

/// One operator action on the plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorCommand {
    ToggleFuelValve,
    Ignite,
    Vent { on: bool },
    SetValve { fraction: Real },
}

/// Command issued once simulated time reaches `at_s`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub at_s: Real,
    #[serde(flatten)]
    pub command: OperatorCommand,
}

impl ScheduledCommand {
    pub fn new(at_s: Real, command: OperatorCommand) -> Self {
        Self { at_s, command }
    }
}

/// Whether a schedule is sorted by time with finite, non-negative times.
pub fn schedule_is_ordered(schedule: &[ScheduledCommand]) -> bool {
    schedule.iter().all(|c| c.at_s.is_finite() && c.at_s >= 0.0)
        && schedule.windows(2).all(|w| w[0].at_s <= w[1].at_s)
}
