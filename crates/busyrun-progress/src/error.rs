//! Error types for the presentation side of the controller.

use thiserror::Error;

use crate::sink::IndicatorHandle;

/// Errors a presenter may return. None of them are fatal to a run.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// The presentation surface is not available.
    #[error("Presentation surface unavailable: {0}")]
    Unavailable(String),

    /// The handle does not refer to a visible indicator.
    #[error("Unknown indicator handle: {0}")]
    UnknownHandle(IndicatorHandle),

    /// Writing to the presentation surface failed.
    #[error("Presentation I/O error: {0}")]
    Io(#[from] std::io::Error),
}
