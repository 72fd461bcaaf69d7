//! Progress controller for long-running tasks.
//!
//! Wraps an async unit of work and drives a busy indicator around it:
//! the indicator appears only if the work outlasts a show delay, stays up
//! for a minimum visible duration once shown, and is always removed before
//! the task's outcome reaches the caller. Failures are logged and, unless
//! suppressed, routed to an error reporter.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use busyrun_core::RunOptions;
//! use busyrun_progress::{ChannelPresenter, ChannelReporter, ControllerContext, ProgressController};
//!
//! async fn export() -> Result<u32, std::io::Error> {
//!     let (presenter, _signals) = ChannelPresenter::new();
//!     let (reporter, _reports) = ChannelReporter::new();
//!     let controller = ProgressController::new(ControllerContext::new(
//!         Arc::new(presenter),
//!         Arc::new(reporter),
//!     ));
//!
//!     controller
//!         .run("export", "conversation-1", || async { Ok(42) }, RunOptions::default())
//!         .await
//! }
//! ```

mod config;
mod controller;
mod error;
mod indicator;
mod log_format;
mod sink;

pub use config::{ProgressConfig, MIN_VISIBLE_ENV, SHOW_DELAY_ENV};
pub use controller::{ControllerContext, ProgressController};
pub use error::PresentationError;
pub use indicator::IndicatorGuard;
pub use log_format::to_log_format;
pub use sink::{
    ChannelPresenter, ChannelReporter, ErrorReporter, FailureReport, IndicatorHandle,
    IndicatorPresenter, IndicatorSignal,
};
