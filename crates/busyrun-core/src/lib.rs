//! busyrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - An async runtime
//! - Presentation or dialog layers
//! - Logging setup
//!
//! Everything here describes a single wrapped task invocation and the
//! state machine it moves through.

pub mod error;
pub mod event;
pub mod ids;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use error::CoreError;
pub use event::{RunEvent, RunEventKind};
pub use ids::RunLabel;
pub use status::{RunState, TimerState};
pub use task::{RunOptions, TaskRun};
