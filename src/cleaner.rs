//! Browsing-data purge executor.
//!
//! Turns the current settings into a removal request for the host's
//! browsing-data primitive. One purge runs at a time.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, debug, info, warn};

use crate::config::ConfigStore;
use crate::error::CleanupError;
use crate::host::{BrowsingData, Notification, Notifier, RemovalReport, RemovalRequest};
use crate::metrics;
use crate::telemetry::{PurgeTimer, spans};

/// What caused a purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeTrigger {
    Startup,
    Alarm,
    AllWindowsClosed,
    ActionClicked,
}

impl PurgeTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Alarm => "alarm",
            Self::AllWindowsClosed => "all_windows_closed",
            Self::ActionClicked => "action_clicked",
        }
    }
}

impl fmt::Display for PurgeTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Purging is switched off in the settings.
    Disabled,
    Completed(RemovalReport),
}

pub struct DataCleaner {
    store: Arc<ConfigStore>,
    data: Arc<dyn BrowsingData>,
    notifier: Option<Arc<dyn Notifier>>,
    running: tokio::sync::Mutex<()>,
    last_purge: Mutex<Option<DateTime<Utc>>>,
}

impl DataCleaner {
    pub fn new(
        store: Arc<ConfigStore>,
        data: Arc<dyn BrowsingData>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            store,
            data,
            notifier,
            running: tokio::sync::Mutex::new(()),
            last_purge: Mutex::new(None),
        }
    }

    /// When the last purge completed.
    pub fn last_purge(&self) -> Option<DateTime<Utc>> {
        *self.last_purge.lock()
    }

    /// Remove browsing data according to the current settings.
    pub async fn purge(&self, trigger: PurgeTrigger) -> Result<PurgeOutcome, CleanupError> {
        async move {
            let _running = self.running.lock().await;
            // Settings are read under the lock so a queued purge sees reloads.
            let settings = match self.store.settings() {
                Ok(settings) => settings,
                Err(e) => return Err(CleanupError::from(e)),
            };
            let timer = PurgeTimer::new(trigger.as_str());

            if !settings.enabled {
                debug!("Purging disabled, skipping");
                timer.finish("disabled");
                return Ok(PurgeOutcome::Disabled);
            }

            let now = Utc::now();
            let request = RemovalRequest {
                since: settings.time_range.cutoff(now),
                data_types: settings.data_types.clone(),
            };
            debug!(since = ?request.since, data_types = ?request.data_types, "Removing browsing data");

            let report = match self.data.remove(&request).await {
                Ok(report) => report,
                Err(e) => {
                    timer.finish("failed");
                    return Err(CleanupError::Host(e));
                }
            };
            timer.finish("completed");

            for (data_type, count) in &report.removed {
                metrics::record_removed(data_type.as_str(), *count);
            }
            *self.last_purge.lock() = Some(now);
            info!(removed = report.total(), "Browsing data cleared");

            if settings.notifications.on_cleanup {
                self.notify_cleared(&report).await;
            }
            Ok(PurgeOutcome::Completed(report))
        }
        .instrument(spans::purge(trigger.as_str()))
        .await
    }

    async fn notify_cleared(&self, report: &RemovalReport) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let notification = Notification {
            title: "Browsing data cleared".to_string(),
            message: format!("Removed {} items", report.total()),
            icon: None,
        };
        if let Err(e) = notifier.create(notification).await {
            warn!(error = %e, "Failed to send cleanup notification");
        }
    }
}
