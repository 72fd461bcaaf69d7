//! Presentation and error-reporting sinks driven by the controller.
//!
//! This module defines the traits the controller depends on and provides
//! channel-backed implementations that forward every side effect to a
//! receiver.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use busyrun_core::RunLabel;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::trace;

use crate::error::PresentationError;

/// Opaque handle to one displayed indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorHandle(u64);

impl IndicatorHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for IndicatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "indicator-{}", self.0)
    }
}

/// Surface that can display and remove a busy indicator.
///
/// Both calls are expected to return promptly; the controller never awaits
/// the presenter.
pub trait IndicatorPresenter: Send + Sync {
    /// Display an indicator for `label` and return a handle to it.
    fn show_indicator(&self, label: &RunLabel) -> Result<IndicatorHandle, PresentationError>;

    /// Remove a previously displayed indicator.
    fn hide_indicator(&self, handle: IndicatorHandle) -> Result<(), PresentationError>;
}

/// A failed run as seen by the user-facing error reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub label: RunLabel,
    /// Normalized error text, see [`crate::to_log_format`].
    pub message: String,
}

/// Sink for user-visible failure reports (an error dialog, a toast...).
pub trait ErrorReporter: Send + Sync {
    /// Called at most once per failed run.
    fn report_error(&self, report: &FailureReport);
}

/// Side effect observed by a [`ChannelPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorSignal {
    Shown {
        handle: IndicatorHandle,
        label: RunLabel,
        at: Instant,
    },
    Hidden {
        handle: IndicatorHandle,
        at: Instant,
    },
}

/// A presenter that forwards show/hide calls to a channel.
///
/// Handles are unique per presenter; hiding an unknown or already hidden
/// handle is an error.
pub struct ChannelPresenter {
    signal_tx: mpsc::UnboundedSender<IndicatorSignal>,
    next_id: AtomicU64,
    visible: Mutex<HashSet<IndicatorHandle>>,
}

impl ChannelPresenter {
    /// Create a new presenter with a signal receiver.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<IndicatorSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                signal_tx: tx,
                next_id: AtomicU64::new(1),
                visible: Mutex::new(HashSet::new()),
            },
            rx,
        )
    }

    /// Number of indicators currently visible.
    pub fn visible_count(&self) -> usize {
        self.visible.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl IndicatorPresenter for ChannelPresenter {
    fn show_indicator(&self, label: &RunLabel) -> Result<IndicatorHandle, PresentationError> {
        let handle = IndicatorHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.visible
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(handle);
        trace!(label = %label, handle = %handle, "Indicator shown");
        // Receiver might be dropped
        self.signal_tx
            .send(IndicatorSignal::Shown {
                handle,
                label: label.clone(),
                at: Instant::now(),
            })
            .ok();
        Ok(handle)
    }

    fn hide_indicator(&self, handle: IndicatorHandle) -> Result<(), PresentationError> {
        let removed = self
            .visible
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&handle);
        if !removed {
            return Err(PresentationError::UnknownHandle(handle));
        }
        trace!(handle = %handle, "Indicator hidden");
        self.signal_tx
            .send(IndicatorSignal::Hidden {
                handle,
                at: Instant::now(),
            })
            .ok();
        Ok(())
    }
}

/// An error reporter that forwards reports to a channel.
pub struct ChannelReporter {
    report_tx: mpsc::UnboundedSender<FailureReport>,
}

impl ChannelReporter {
    /// Create a new reporter with a report receiver.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FailureReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { report_tx: tx }, rx)
    }
}

impl ErrorReporter for ChannelReporter {
    fn report_error(&self, report: &FailureReport) {
        trace!(label = %report.label, "Forwarding failure report");
        self.report_tx.send(report.clone()).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_presenter_show_hide() {
        let (presenter, mut rx) = ChannelPresenter::new();
        let label = RunLabel::new("test", "1");

        let handle = presenter.show_indicator(&label).unwrap();
        assert_eq!(presenter.visible_count(), 1);
        presenter.hide_indicator(handle).unwrap();
        assert_eq!(presenter.visible_count(), 0);

        match rx.try_recv().unwrap() {
            IndicatorSignal::Shown { handle: h, label: l, .. } => {
                assert_eq!(h, handle);
                assert_eq!(l, label);
            }
            other => panic!("Expected Shown, got {:?}", other),
        }
        assert!(matches!(
            rx.try_recv().unwrap(),
            IndicatorSignal::Hidden { handle: h, .. } if h == handle
        ));
    }

    #[tokio::test]
    async fn test_channel_presenter_rejects_double_hide() {
        let (presenter, _rx) = ChannelPresenter::new();
        let handle = presenter.show_indicator(&RunLabel::new("test", "1")).unwrap();
        presenter.hide_indicator(handle).unwrap();

        let result = presenter.hide_indicator(handle);
        assert!(matches!(result, Err(PresentationError::UnknownHandle(h)) if h == handle));
    }

    #[tokio::test]
    async fn test_handles_are_unique() {
        let (presenter, _rx) = ChannelPresenter::new();
        let a = presenter.show_indicator(&RunLabel::new("a", "1")).unwrap();
        let b = presenter.show_indicator(&RunLabel::new("b", "1")).unwrap();
        assert_ne!(a, b);
        assert_eq!(presenter.visible_count(), 2);
    }

    #[test]
    fn test_channel_reporter_forwards() {
        let (reporter, mut rx) = ChannelReporter::new();
        let report = FailureReport {
            label: RunLabel::new("test", "1"),
            message: "boom".to_string(),
        };
        reporter.report_error(&report);
        assert_eq!(rx.try_recv().unwrap(), report);
    }
}
