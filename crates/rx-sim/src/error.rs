//! Error types for simulation configuration and session runs.
//!
//! Stepping a component never fails; these only surface while building
//! components from parameters or running a scripted session.

use thiserror::Error;

/// Errors encountered while configuring or driving a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] rx_core::CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
