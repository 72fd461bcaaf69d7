//! State enums for a run and its show-delay timer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a single wrapped invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Run created, task not yet started.
    #[default]
    Pending,
    /// Task in flight, indicator not shown.
    Running,
    /// Task in flight (or finishing its minimum-visible wait) with the indicator up.
    IndicatorVisible,
    /// Task settled successfully.
    Completed,
    /// Task settled with an error.
    Failed,
}

impl RunState {
    /// Returns true if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the run is still active (not terminal).
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Pending, Running)
                | (Running, IndicatorVisible)
                | (Running, Completed)
                | (Running, Failed)
                | (IndicatorVisible, Completed)
                | (IndicatorVisible, Failed)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::IndicatorVisible => "indicator_visible",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// State of the show-delay timer owned by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerState {
    /// Not started yet.
    #[default]
    Idle,
    /// Counting down.
    Armed,
    /// Elapsed while the task was still running.
    Fired,
    /// Cancelled before it could fire.
    Cancelled,
}

impl TimerState {
    /// Returns true if the timer can still fire.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Idle | Self::Armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RunState::Completed.is_terminal());
        assert!(RunState::Failed.is_terminal());
        assert!(RunState::Running.is_active());
        assert!(RunState::IndicatorVisible.is_active());
    }

    #[test]
    fn test_no_transition_leaves_terminal() {
        let all = [
            RunState::Pending,
            RunState::Running,
            RunState::IndicatorVisible,
            RunState::Completed,
            RunState::Failed,
        ];
        for terminal in [RunState::Completed, RunState::Failed] {
            for next in all {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_indicator_only_from_running() {
        assert!(RunState::Running.can_transition_to(RunState::IndicatorVisible));
        assert!(!RunState::Pending.can_transition_to(RunState::IndicatorVisible));
        assert!(!RunState::IndicatorVisible.can_transition_to(RunState::IndicatorVisible));
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&RunState::IndicatorVisible).unwrap();
        assert_eq!(json, "\"INDICATOR_VISIBLE\"");
    }
}
