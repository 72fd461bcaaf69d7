//! The progress controller.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use busyrun_core::{CoreError, RunEvent, RunEventKind, RunLabel, RunOptions, TaskRun};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::config::ProgressConfig;
use crate::indicator::IndicatorGuard;
use crate::log_format::to_log_format;
use crate::sink::{ErrorReporter, FailureReport, IndicatorPresenter};

/// Everything a controller needs from the outside world.
pub struct ControllerContext {
    pub presenter: Arc<dyn IndicatorPresenter>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub config: ProgressConfig,
    /// Optional lifecycle event stream.
    pub events: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl ControllerContext {
    /// Create a context with default timing and no event stream.
    pub fn new(presenter: Arc<dyn IndicatorPresenter>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            presenter,
            reporter,
            config: ProgressConfig::default(),
            events: None,
        }
    }

    pub fn with_config(mut self, config: ProgressConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish lifecycle events of every run to `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<RunEvent>) -> Self {
        self.events = Some(events);
        self
    }
}

/// Runs async tasks behind a delayed, minimum-duration busy indicator.
///
/// Cheap to clone; every call to [`run`](Self::run) owns its own timers and
/// indicator, so concurrent runs do not interfere.
#[derive(Clone)]
pub struct ProgressController {
    ctx: Arc<ControllerContext>,
}

impl ProgressController {
    pub fn new(ctx: ControllerContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.ctx.config
    }

    /// Run `task` with [`RunOptions::default`].
    pub async fn run_default<T, E, F, Fut>(
        &self,
        name: &str,
        id_for_logging: &str,
        task: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error,
    {
        self.run(name, id_for_logging, task, RunOptions::default())
            .await
    }

    /// Run `task` to completion, returning its outcome unchanged.
    ///
    /// The task is invoked exactly once. If it is still running after the
    /// show delay, an indicator is displayed; on success the indicator is
    /// kept up until it has been visible for the minimum duration, on
    /// failure it is removed immediately. The indicator is always gone by
    /// the time this returns.
    pub async fn run<T, E, F, Fut>(
        &self,
        name: &str,
        id_for_logging: &str,
        task: F,
        options: RunOptions,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error,
    {
        let started = Instant::now();
        let mut run = TaskRun::new(RunLabel::new(name, id_for_logging), options);
        let started_ok = run.start();
        note_bookkeeping(&run, started_ok);

        info!(label = %run.label(), started_at = %run.started_at(), "Starting task");
        self.emit(
            &run,
            started,
            RunEventKind::Started {
                started_at: run.started_at(),
            },
        );

        let mut indicator: Option<IndicatorGuard> = None;
        let outcome = {
            let task_fut = task();
            let show_timer = time::sleep(self.ctx.config.show_delay);
            tokio::pin!(task_fut);
            tokio::pin!(show_timer);

            // A task settling on the same tick as the timer wins.
            tokio::select! {
                biased;
                outcome = &mut task_fut => outcome,
                () = &mut show_timer => {
                    indicator = self.show_indicator(&mut run, started);
                    task_fut.await
                }
            }
        };

        if run.cancel_show_timer() {
            debug!(label = %run.label(), "Show timer cancelled");
            self.emit(&run, started, RunEventKind::ShowTimerCancelled);
        }

        match outcome {
            Ok(value) => {
                info!(label = %run.label(), "Task completed successfully");

                if let Some(guard) = indicator.take() {
                    let now = Instant::now().into_std();
                    if let Some(remaining) =
                        run.remaining_min_visible(now, self.ctx.config.min_visible)
                    {
                        let remaining_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
                        info!(
                            label = %run.label(),
                            remaining_ms,
                            "Indicator shown for less than the minimum, keeping it up"
                        );
                        self.emit(&run, started, RunEventKind::MinVisibleWait { remaining_ms });
                        time::sleep(remaining).await;
                    }
                    self.hide_indicator(&run, started, guard);
                }

                let completed = run.complete();
                note_bookkeeping(&run, completed);
                self.emit(&run, started, RunEventKind::Completed);
                Ok(value)
            }
            Err(err) => {
                let formatted = to_log_format(&err);
                error!(label = %run.label(), error = %formatted, "Task failed");

                if let Some(guard) = indicator.take() {
                    self.hide_indicator(&run, started, guard);
                }

                if !run.suppress_error_report() {
                    info!(label = %run.label(), "Showing error dialog");
                    self.ctx.reporter.report_error(&FailureReport {
                        label: run.label().clone(),
                        message: formatted.clone(),
                    });
                    self.emit(&run, started, RunEventKind::ErrorReported);
                }

                let failed = run.fail();
                note_bookkeeping(&run, failed);
                self.emit(&run, started, RunEventKind::Failed { error: formatted });
                Err(err)
            }
        }
    }

    fn show_indicator(&self, run: &mut TaskRun, started: Instant) -> Option<IndicatorGuard> {
        info!(label = %run.label(), "Creating indicator");
        match IndicatorGuard::acquire(self.ctx.presenter.clone(), run.label()) {
            Ok(guard) => {
                debug!(label = %run.label(), handle = ?guard.handle(), "Indicator visible");
                let shown = run.indicator_shown(guard.shown_at().into_std());
                note_bookkeeping(run, shown);
                self.emit(run, started, RunEventKind::IndicatorShown);
                Some(guard)
            }
            Err(e) => {
                warn!(label = %run.label(), error = %e, "Failed to show indicator");
                run.show_timer_fired();
                None
            }
        }
    }

    fn hide_indicator(&self, run: &TaskRun, started: Instant, guard: IndicatorGuard) {
        match guard.release() {
            Ok(()) => self.emit(run, started, RunEventKind::IndicatorHidden),
            Err(e) => warn!(label = %run.label(), error = %e, "Failed to hide indicator"),
        }
    }

    fn emit(&self, run: &TaskRun, started: Instant, kind: RunEventKind) {
        if let Some(events) = &self.ctx.events {
            // Receiver might be dropped
            events
                .send(RunEvent::new(run.label().clone(), kind, started.elapsed()))
                .ok();
        }
    }
}

/// State machine violations never affect the task's outcome.
fn note_bookkeeping(run: &TaskRun, result: Result<(), CoreError>) {
    if let Err(e) = result {
        warn!(label = %run.label(), error = %e, "Run bookkeeping rejected");
    }
}
