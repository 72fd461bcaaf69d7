//! Sticker-pack sync shim.
//!
//! Linked devices tell the primary device when a sticker pack is installed
//! or removed by queueing a sync message. The primary device never sends
//! these.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use busyrun_progress::to_log_format;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors raised while queueing a sync message.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Sync queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("Failed to encode sync message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Role of this device in the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    Primary,
    Linked,
}

/// A single sticker-pack install/uninstall operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerPackOperation {
    pub pack_id: String,
    pub pack_key: String,
    pub installed: bool,
}

/// Message handed to the sync queue.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncMessage {
    pub kind: &'static str,
    pub payload: serde_json::Value,
}

/// Outcome of a sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Queued,
    SkippedPrimary,
}

/// Outbound queue for sync messages.
#[async_trait]
pub trait SyncQueue: Send + Sync {
    async fn add(&self, message: SyncMessage) -> Result<(), SyncError>;
}

/// Queue one sticker-pack sync message, skipping primary devices.
pub async fn queue_sticker_pack_sync(
    queue: &dyn SyncQueue,
    device: DeviceRole,
    operation: &StickerPackOperation,
) -> Result<SyncOutcome, SyncError> {
    if device == DeviceRole::Primary {
        warn!(pack_id = %operation.pack_id, "We are primary device; not sending sticker pack sync");
        return Ok(SyncOutcome::SkippedPrimary);
    }

    let message = SyncMessage {
        kind: "sticker_pack_sync",
        payload: serde_json::to_value(vec![operation])?,
    };
    queue.add(message).await?;
    info!(pack_id = %operation.pack_id, installed = operation.installed, "Queued sticker pack sync");
    Ok(SyncOutcome::Queued)
}

/// Fire-and-forget variant: failures are logged, never returned.
pub async fn send_sticker_pack_sync(
    queue: &dyn SyncQueue,
    device: DeviceRole,
    operation: &StickerPackOperation,
) {
    if let Err(e) = queue_sticker_pack_sync(queue, device, operation).await {
        error!(
            pack_id = %operation.pack_id,
            error = %to_log_format(&e),
            "Failed to queue sticker pack sync"
        );
    }
}

/// In-process queue with artificial latency, used by the CLI.
pub struct SimulatedQueue {
    latency: Duration,
    fail: bool,
    sent: Mutex<Vec<SyncMessage>>,
}

impl SimulatedQueue {
    pub fn new(latency: Duration, fail: bool) -> Self {
        Self {
            latency,
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<SyncMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SyncQueue for SimulatedQueue {
    async fn add(&self, message: SyncMessage) -> Result<(), SyncError> {
        tokio::time::sleep(self.latency).await;
        if self.fail {
            return Err(SyncError::QueueUnavailable(
                "simulated queue failure".to_string(),
            ));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        Ok(())
    }
}
