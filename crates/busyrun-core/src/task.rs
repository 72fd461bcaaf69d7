//! TaskRun and per-run options.

use crate::{CoreError, RunLabel, RunState, TimerState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Caller-facing options for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Skip the user-facing error report when the task fails.
    pub suppress_error_dialog: bool,
}

impl RunOptions {
    /// Builder method to suppress the error dialog.
    pub fn suppress_error_dialog(mut self) -> Self {
        self.suppress_error_dialog = true;
        self
    }
}

/// One invocation of the progress wrapper.
///
/// A `TaskRun` only tracks bookkeeping; the caller supplies the current
/// instant so the type stays independent of any runtime clock.
#[derive(Debug, Clone)]
pub struct TaskRun {
    label: RunLabel,
    state: RunState,
    show_timer: TimerState,
    indicator_shown_at: Option<Instant>,
    suppress_error_report: bool,
    started_at: DateTime<Utc>,
}

impl TaskRun {
    /// Create a new run in the `Pending` state.
    pub fn new(label: RunLabel, options: RunOptions) -> Self {
        Self {
            label,
            state: RunState::Pending,
            show_timer: TimerState::Idle,
            indicator_shown_at: None,
            suppress_error_report: options.suppress_error_dialog,
            started_at: Utc::now(),
        }
    }

    pub fn label(&self) -> &RunLabel {
        &self.label
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn show_timer(&self) -> TimerState {
        self.show_timer
    }

    pub fn indicator_shown_at(&self) -> Option<Instant> {
        self.indicator_shown_at
    }

    pub fn suppress_error_report(&self) -> bool {
        self.suppress_error_report
    }

    /// Wall-clock time the run was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Check if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move to `next` if the state machine allows it.
    pub fn transition(&mut self, next: RunState) -> Result<(), CoreError> {
        if !self.state.can_transition_to(next) {
            return Err(CoreError::InvalidStateTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// `Pending -> Running`, arming the show-delay timer.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.transition(RunState::Running)?;
        self.show_timer = TimerState::Armed;
        Ok(())
    }

    /// Record that the show-delay timer fired while the task was running.
    pub fn show_timer_fired(&mut self) {
        if self.show_timer == TimerState::Armed {
            self.show_timer = TimerState::Fired;
        }
    }

    /// Cancel the show-delay timer. Returns true if it was still armed.
    pub fn cancel_show_timer(&mut self) -> bool {
        if self.show_timer.is_pending() {
            self.show_timer = TimerState::Cancelled;
            true
        } else {
            false
        }
    }

    /// `Running -> IndicatorVisible`, recording the display instant.
    pub fn indicator_shown(&mut self, at: Instant) -> Result<(), CoreError> {
        self.transition(RunState::IndicatorVisible)?;
        self.show_timer_fired();
        self.indicator_shown_at = Some(at);
        Ok(())
    }

    /// How long the indicator has been up at `now`.
    pub fn visible_for(&self, now: Instant) -> Option<Duration> {
        self.indicator_shown_at
            .map(|shown| now.saturating_duration_since(shown))
    }

    /// Time still owed to reach `min_visible`, if the indicator is up and
    /// has been visible for less than that.
    pub fn remaining_min_visible(&self, now: Instant, min_visible: Duration) -> Option<Duration> {
        let visible = self.visible_for(now)?;
        min_visible.checked_sub(visible).filter(|d| !d.is_zero())
    }

    /// Terminal transition to `Completed`. Cancels the timer first.
    pub fn complete(&mut self) -> Result<(), CoreError> {
        self.finish(RunState::Completed)
    }

    /// Terminal transition to `Failed`. Cancels the timer first.
    pub fn fail(&mut self) -> Result<(), CoreError> {
        self.finish(RunState::Failed)
    }

    fn finish(&mut self, terminal: RunState) -> Result<(), CoreError> {
        if !self.state.can_transition_to(terminal) {
            return Err(CoreError::InvalidStateTransition {
                from: self.state,
                to: terminal,
            });
        }
        self.cancel_show_timer();
        self.state = terminal;
        Ok(())
    }
}
