//! Scenario validation logic.

use crate::schema::{LATEST_VERSION, Scenario};
use rx_sim::{OperatorCommand, SimError};
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {section} parameters: {source}")]
    InvalidParams {
        section: &'static str,
        #[source]
        source: SimError,
    },

    #[error("Command {index} at {at_s} s is scheduled before the previous command")]
    Unordered { index: usize, at_s: f64 },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: format!("{:?}", scenario.name),
            reason: "must not be empty".to_string(),
        });
    }

    scenario
        .reactor
        .validate()
        .map_err(|source| ValidationError::InvalidParams {
            section: "reactor",
            source,
        })?;
    scenario
        .tank
        .validate()
        .map_err(|source| ValidationError::InvalidParams {
            section: "tank",
            source,
        })?;
    scenario
        .session
        .validate()
        .map_err(|source| ValidationError::InvalidParams {
            section: "session",
            source,
        })?;

    let mut prev = 0.0;
    for (index, cmd) in scenario.commands.iter().enumerate() {
        if !cmd.at_s.is_finite() || cmd.at_s < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("commands[{index}].at_s"),
                value: cmd.at_s.to_string(),
                reason: "must be non-negative and finite".to_string(),
            });
        }
        if cmd.at_s < prev {
            return Err(ValidationError::Unordered {
                index,
                at_s: cmd.at_s,
            });
        }
        prev = cmd.at_s;

        // Out-of-range fractions clamp at run time like interactive input.
        match cmd.command {
            OperatorCommand::SetValve { fraction } if !fraction.is_finite() => {
                return Err(ValidationError::InvalidValue {
                    field: format!("commands[{index}].fraction"),
                    value: fraction.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
            OperatorCommand::SetValve { fraction } if !(0.0..=1.0).contains(&fraction) => {
                warn!(index, fraction, "valve fraction outside [0, 1] will be clamped");
            }
            _ => {}
        }

        if cmd.at_s >= scenario.session.t_end {
            warn!(
                index,
                at_s = cmd.at_s,
                t_end = scenario.session.t_end,
                "command scheduled at or after session end will not fire"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_sim::{ReactorParams, ScheduledCommand};

    #[test]
    fn template_validates() {
        validate_scenario(&Scenario::startup_template()).unwrap();
    }

    #[test]
    fn future_version_rejected() {
        let scenario = Scenario {
            version: LATEST_VERSION + 1,
            ..Scenario::new("future")
        };
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn blank_name_rejected() {
        let scenario = Scenario::new("  ");
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn bad_reactor_params_name_the_section() {
        let scenario = Scenario {
            reactor: ReactorParams {
                burn_rate: -1.0,
                ..Default::default()
            },
            ..Scenario::new("bad")
        };
        match validate_scenario(&scenario) {
            Err(ValidationError::InvalidParams { section, .. }) => assert_eq!(section, "reactor"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unordered_commands_rejected() {
        let mut scenario = Scenario::new("unordered");
        scenario.commands = vec![
            ScheduledCommand::new(2.0, OperatorCommand::Ignite),
            ScheduledCommand::new(1.0, OperatorCommand::ToggleFuelValve),
        ];
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::Unordered { index: 1, .. })
        ));
    }

    #[test]
    fn out_of_range_valve_is_accepted() {
        let mut scenario = Scenario::new("valve");
        scenario.commands = vec![
            ScheduledCommand::new(0.0, OperatorCommand::SetValve { fraction: 1.5 }),
            ScheduledCommand::new(0.5, OperatorCommand::SetValve { fraction: -0.25 }),
        ];
        validate_scenario(&scenario).unwrap();
    }

    #[test]
    fn nan_valve_fraction_rejected() {
        let mut scenario = Scenario::new("valve");
        scenario.commands = vec![ScheduledCommand::new(
            0.0,
            OperatorCommand::SetValve {
                fraction: f64::NAN,
            },
        )];
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn nan_command_time_rejected() {
        let mut scenario = Scenario::new("nan");
        scenario.commands = vec![ScheduledCommand::new(f64::NAN, OperatorCommand::Ignite)];
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
