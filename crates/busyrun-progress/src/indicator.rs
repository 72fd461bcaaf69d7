//! Scoped ownership of a displayed indicator.

use std::sync::Arc;

use busyrun_core::RunLabel;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::PresentationError;
use crate::sink::{IndicatorHandle, IndicatorPresenter};

/// Owns one visible indicator and hides it when released or dropped.
///
/// The controller releases the guard explicitly on every normal exit path.
/// `Drop` covers the rest: a panicking task or a run future dropped
/// mid-flight still takes the indicator down.
pub struct IndicatorGuard {
    presenter: Arc<dyn IndicatorPresenter>,
    handle: Option<IndicatorHandle>,
    label: RunLabel,
    shown_at: Instant,
}

impl IndicatorGuard {
    /// Show an indicator for `label`.
    pub fn acquire(
        presenter: Arc<dyn IndicatorPresenter>,
        label: &RunLabel,
    ) -> Result<Self, PresentationError> {
        let handle = presenter.show_indicator(label)?;
        Ok(Self {
            presenter,
            handle: Some(handle),
            label: label.clone(),
            shown_at: Instant::now(),
        })
    }

    /// When the indicator became visible.
    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }

    pub fn handle(&self) -> Option<IndicatorHandle> {
        self.handle
    }

    /// Hide the indicator now.
    pub fn release(mut self) -> Result<(), PresentationError> {
        match self.handle.take() {
            Some(handle) => self.presenter.hide_indicator(handle),
            None => Ok(()),
        }
    }
}

impl Drop for IndicatorGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(label = %self.label, handle = %handle, "Releasing indicator on drop");
            if let Err(e) = self.presenter.hide_indicator(handle) {
                warn!(label = %self.label, error = %e, "Failed to hide indicator");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ChannelPresenter, IndicatorSignal};

    #[tokio::test]
    async fn test_release_hides_once() {
        let (presenter, mut rx) = ChannelPresenter::new();
        let presenter = Arc::new(presenter);
        let guard = IndicatorGuard::acquire(presenter.clone(), &RunLabel::new("test", "1")).unwrap();
        assert_eq!(presenter.visible_count(), 1);

        guard.release().unwrap();
        assert_eq!(presenter.visible_count(), 0);

        assert!(matches!(rx.try_recv().unwrap(), IndicatorSignal::Shown { .. }));
        assert!(matches!(rx.try_recv().unwrap(), IndicatorSignal::Hidden { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_drop_hides() {
        let (presenter, _rx) = ChannelPresenter::new();
        let presenter = Arc::new(presenter);
        {
            let _guard =
                IndicatorGuard::acquire(presenter.clone(), &RunLabel::new("test", "1")).unwrap();
            assert_eq!(presenter.visible_count(), 1);
        }
        assert_eq!(presenter.visible_count(), 0);
    }
}
