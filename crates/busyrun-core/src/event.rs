//! Run lifecycle events for tracking what the controller did and when.

use crate::ids::RunLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A lifecycle event emitted during a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEvent {
    /// Run this event belongs to.
    pub label: RunLabel,
    /// Type of event.
    pub kind: RunEventKind,
    /// Milliseconds since the run started.
    pub elapsed_ms: u64,
}

impl RunEvent {
    /// Create a new run event.
    pub fn new(label: RunLabel, kind: RunEventKind, elapsed: Duration) -> Self {
        Self {
            label,
            kind,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, RunEventKind::Completed | RunEventKind::Failed { .. })
    }
}

/// Type of run event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEventKind {
    /// Task invoked, show-delay timer armed.
    Started { started_at: DateTime<Utc> },
    /// Show-delay timer cancelled before firing.
    ShowTimerCancelled,
    /// Busy indicator displayed.
    IndicatorShown,
    /// Indicator kept up to honor the minimum visible duration.
    MinVisibleWait { remaining_ms: u64 },
    /// Busy indicator removed.
    IndicatorHidden,
    /// Failure routed to the user-facing error reporter.
    ErrorReported,
    /// Task succeeded.
    Completed,
    /// Task failed.
    Failed { error: String },
}
