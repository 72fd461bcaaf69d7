//! Terminal implementations of the presentation and error-reporting sinks.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use busyrun_core::RunLabel;
use busyrun_progress::{
    ErrorReporter, FailureReport, IndicatorHandle, IndicatorPresenter, PresentationError,
};

/// Prints a busy line on stderr while an indicator is up.
pub struct TerminalPresenter {
    next_id: AtomicU64,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPresenter for TerminalPresenter {
    fn show_indicator(&self, label: &RunLabel) -> Result<IndicatorHandle, PresentationError> {
        let handle = IndicatorHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut err = std::io::stderr().lock();
        writeln!(err, "[{}] Working on {}...", handle, label)?;
        err.flush()?;
        Ok(handle)
    }

    fn hide_indicator(&self, handle: IndicatorHandle) -> Result<(), PresentationError> {
        let mut err = std::io::stderr().lock();
        writeln!(err, "[{}] Done.", handle)?;
        err.flush()?;
        Ok(())
    }
}

/// Stands in for the error dialog: prints the failure to stderr.
pub struct TerminalReporter;

impl ErrorReporter for TerminalReporter {
    fn report_error(&self, report: &FailureReport) {
        eprintln!("Something went wrong ({}): {}", report.label, report.message);
    }
}
