//! Log-backed notifier.

use super::{HostError, Notification, Notifier};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes notifications to the `autopurge::notify` log target.
#[derive(Debug, Default)]
pub struct LogNotifier {
    sent: AtomicU64,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn create(&self, notification: Notification) -> Result<(), HostError> {
        let id = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(
            target: "autopurge::notify",
            id,
            title = %notification.title,
            icon = notification.icon.as_deref().unwrap_or("-"),
            "{}",
            notification.message
        );
        Ok(())
    }
}
