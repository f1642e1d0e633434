//! Fixed-step session runner and result recording.

use crate::command::{ScheduledCommand, schedule_is_ordered};
use crate::error::{SimError, SimResult};
use crate::plant::{Plant, PlantSnapshot};
use crate::reactor::Regime;
use rx_core::Real;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::{debug, trace};

/// Slack when comparing command times against the step clock.
const SCHEDULE_EPS: Real = 1e-9;

/// Options for a session run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Fixed time step (seconds)
    pub dt: Real,
    /// Final simulation time (seconds)
    pub t_end: Real,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            t_end: 60.0,
            max_steps: 1_000_000,
            record_every: 6,
        }
    }
}

impl SessionOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Progress report emitted after every recorded step.
#[derive(Clone, Debug, Default)]
pub struct SessionProgress {
    pub step: usize,
    pub sim_time_s: Real,
    pub t_end_s: Real,
    pub fraction_complete: Real,
}

/// Running extremes over every step, not only recorded ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub steps: usize,
    pub commands_applied: usize,
    pub peak_neutrons: Real,
    pub peak_reactor_heat: Real,
    pub peak_tank_heat: Real,
    pub danger_time_s: Real,
}

impl SessionStats {
    fn observe(&mut self, s: &PlantSnapshot, dt: Real) {
        self.peak_neutrons = self.peak_neutrons.max(s.neutrons);
        self.peak_reactor_heat = self.peak_reactor_heat.max(s.reactor_heat);
        self.peak_tank_heat = self.peak_tank_heat.max(s.tank_heat);
        if s.regime == Regime::Danger {
            self.danger_time_s += dt;
        }
    }
}

/// Record of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Time points (seconds)
    pub t: Vec<Real>,
    /// Plant snapshots
    pub x: Vec<PlantSnapshot>,
    pub stats: SessionStats,
}

impl SessionRecord {
    pub fn last(&self) -> Option<&PlantSnapshot> {
        self.x.last()
    }

    /// One row per recorded point.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(
            "time_s,fuel,fuel_valve,fuel_valve_blocked,ignited,neutrons,reactor_heat,venting,waste,regime,water,valve,tank_heat\n",
        );
        for (t, s) in self.t.iter().zip(&self.x) {
            // Writing into a String cannot fail.
            let _ = writeln!(
                csv,
                "{},{},{},{},{},{},{},{},{},{:?},{},{},{}",
                t,
                s.fuel,
                s.fuel_valve,
                s.fuel_valve_blocked,
                s.ignited,
                s.neutrons,
                s.reactor_heat,
                s.venting,
                s.waste,
                s.regime,
                s.water,
                s.valve,
                s.tank_heat
            );
        }
        csv
    }
}

/// Run a scripted session at a fixed step.
pub fn run_session(
    plant: &mut Plant,
    opts: &SessionOptions,
    schedule: &[ScheduledCommand],
) -> SimResult<SessionRecord> {
    run_session_with_progress(plant, opts, schedule, None)
}

/// Run a scripted session, reporting progress after each recorded step.
///
/// Commands due at or before the start of a step are applied before that
/// step runs, and commands at t = 0 are applied before the initial record
/// even when no step runs. The final state is always recorded.
pub fn run_session_with_progress(
    plant: &mut Plant,
    opts: &SessionOptions,
    schedule: &[ScheduledCommand],
    mut progress: Option<&mut dyn FnMut(&SessionProgress)>,
) -> SimResult<SessionRecord> {
    opts.validate()?;
    if !schedule_is_ordered(schedule) {
        return Err(SimError::InvalidArg {
            what: "command schedule must be time-ordered with non-negative times",
        });
    }

    let mut t = 0.0;
    let mut step = 0;
    let mut next_cmd = 0;
    let mut stats = SessionStats::default();

    // The initial record reflects commands issued at t = 0.
    apply_due(plant, schedule, &mut next_cmd, t, &mut stats);
    let initial = plant.snapshot();
    stats.observe(&initial, 0.0);
    let mut t_record = vec![t];
    let mut x_record = vec![initial];

    while t < opts.t_end && step < opts.max_steps {
        apply_due(plant, schedule, &mut next_cmd, t, &mut stats);

        plant.step(opts.dt);
        step += 1;
        t = step as Real * opts.dt;

        let snapshot = plant.snapshot();
        stats.observe(&snapshot, opts.dt);
        trace!(step, t, neutrons = snapshot.neutrons, heat = snapshot.reactor_heat, "step");

        if step % opts.record_every == 0 {
            t_record.push(t);
            x_record.push(snapshot);
            if let Some(cb) = progress.as_deref_mut() {
                cb(&SessionProgress {
                    step,
                    sim_time_s: t,
                    t_end_s: opts.t_end,
                    fraction_complete: if opts.t_end > 0.0 {
                        (t / opts.t_end).min(1.0)
                    } else {
                        1.0
                    },
                });
            }
        }
    }

    if step % opts.record_every != 0 {
        t_record.push(t);
        x_record.push(plant.snapshot());
    }
    stats.steps = step;
    debug!(steps = step, t, "session finished");

    Ok(SessionRecord {
        t: t_record,
        x: x_record,
        stats,
    })
}

/// Apply every command due at or before `t`, advancing `next_cmd`.
fn apply_due(
    plant: &mut Plant,
    schedule: &[ScheduledCommand],
    next_cmd: &mut usize,
    t: Real,
    stats: &mut SessionStats,
) {
    while let Some(cmd) = schedule.get(*next_cmd) {
        if cmd.at_s > t + SCHEDULE_EPS {
            break;
        }
        debug!(t, command = ?cmd.command, "applying command");
        plant.apply(&cmd.command);
        stats.commands_applied += 1;
        *next_cmd += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_defaults() {
        let opts = SessionOptions::default();
        assert_eq!(opts.dt, 1.0 / 60.0);
        assert_eq!(opts.t_end, 60.0);
        assert_eq!(opts.max_steps, 1_000_000);
        assert_eq!(opts.record_every, 6);
        opts.validate().unwrap();
    }

    #[test]
    fn session_options_invalid() {
        let bad = [
            SessionOptions {
                dt: 0.0,
                ..Default::default()
            },
            SessionOptions {
                dt: f64::NAN,
                ..Default::default()
            },
            SessionOptions {
                t_end: -1.0,
                ..Default::default()
            },
            SessionOptions {
                max_steps: 0,
                ..Default::default()
            },
            SessionOptions {
                record_every: 0,
                ..Default::default()
            },
        ];
        for opts in &bad {
            assert!(opts.validate().is_err(), "{opts:?}");
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut plant = Plant::default();
        let opts = SessionOptions {
            dt: 0.1,
            t_end: 0.5,
            record_every: 1,
            ..Default::default()
        };
        let record = run_session(&mut plant, &opts, &[]).unwrap();
        let csv = record.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("time_s,fuel"));
        assert_eq!(lines.len(), record.t.len() + 1);
        assert!(lines[1].contains("Cold"));
    }
}
