//! Core domain errors.

use thiserror::Error;

use crate::status::RunState;

/// Core domain errors for busyrun.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Transition not allowed by the run state machine.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: RunState, to: RunState },
}
