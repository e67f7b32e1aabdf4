//! Event listener registration and dispatch.
//!
//! `EventHandler` subscribes to every host event kind at once, then runs one
//! listener task per subscription. It also owns the one-shot startup purge
//! check.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, warn};

use crate::cleaner::{DataCleaner, PurgeOutcome, PurgeTrigger};
use crate::config::ConfigStore;
use crate::error::{ListenerRegistrationError, StartupCleanupError};
use crate::host::{EventKind, EventSource, HostEvent};
use crate::metrics;
use crate::telemetry::spans;

/// Name of the periodic purge alarm.
pub const PURGE_ALARM: &str = "autopurge-interval";

/// Whether this process still owes its cold-start check.
///
/// Created by the bootstrapper and consumed exactly once.
#[derive(Debug)]
pub struct StartupState {
    pending: AtomicBool,
}

impl StartupState {
    pub fn cold() -> Self {
        Self {
            pending: AtomicBool::new(true),
        }
    }

    /// Consume the cold-start flag. Only the first call returns `true`.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Result of [`EventHandler::run_startup_cleanup_if_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupCleanup {
    /// The cold-start check already ran in this process.
    AlreadyHandled,
    NotDue,
    Purged(PurgeOutcome),
    /// The check or the purge failed; the error was logged.
    Failed,
}

pub struct EventHandler {
    store: Arc<ConfigStore>,
    cleaner: Arc<DataCleaner>,
    source: Arc<dyn EventSource>,
    startup: StartupState,
    registered: AtomicBool,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

impl EventHandler {
    pub fn new(
        store: Arc<ConfigStore>,
        cleaner: Arc<DataCleaner>,
        source: Arc<dyn EventSource>,
        startup: StartupState,
    ) -> Self {
        Self {
            store,
            cleaner,
            source,
            startup,
            registered: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Attach listeners for every host event kind and arm the purge alarm.
    ///
    /// All subscriptions are acquired before any listener starts; on failure
    /// the acquired ones are dropped and nothing keeps listening. Must run
    /// inside a tokio runtime and only after settings are loaded.
    pub fn register_all(self: &Arc<Self>) -> Result<(), ListenerRegistrationError> {
        if self.registered.swap(true, Ordering::AcqRel) {
            return Err(ListenerRegistrationError::AlreadyRegistered);
        }

        let subscriptions = match self.subscribe_all() {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                self.registered.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let mut listeners = self.listeners.lock();
        for (kind, rx) in subscriptions {
            let handler = Arc::clone(self);
            let handle = tokio::spawn(
                async move { handler.listen(kind, rx).await }
                    .instrument(spans::listener(kind.as_str())),
            );
            listeners.push(handle);
        }
        metrics::set_listeners(listeners.len());
        info!(listeners = listeners.len(), "Event listeners registered");
        Ok(())
    }

    fn subscribe_all(
        &self,
    ) -> Result<Vec<(EventKind, mpsc::UnboundedReceiver<HostEvent>)>, ListenerRegistrationError>
    {
        let settings = self.store.settings()?;

        let mut subscriptions = Vec::with_capacity(EventKind::ALL.len());
        for kind in EventKind::ALL {
            let rx = self
                .source
                .subscribe(kind)
                .map_err(|source| ListenerRegistrationError::Subscribe { kind, source })?;
            debug!(kind = %kind, "Subscribed");
            subscriptions.push((kind, rx));
        }

        if let Some(period) = alarm_period(settings.enabled, settings.triggers.interval_minutes) {
            self.source
                .schedule_alarm(PURGE_ALARM, period)
                .map_err(ListenerRegistrationError::Alarm)?;
            debug!(period_secs = period.as_secs(), "Purge alarm scheduled");
        }
        Ok(subscriptions)
    }

    async fn listen(&self, kind: EventKind, mut rx: mpsc::UnboundedReceiver<HostEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle(event).await;
        }
        debug!(kind = %kind, "Event source closed, listener stopping");
    }

    /// Dispatch one host event.
    pub async fn handle(&self, event: HostEvent) {
        let settings = match self.store.settings() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, event = ?event, "Ignoring event");
                return;
            }
        };

        let trigger = match &event {
            HostEvent::AllWindowsClosed if settings.triggers.on_all_windows_closed => {
                PurgeTrigger::AllWindowsClosed
            }
            HostEvent::ActionClicked if settings.triggers.on_action_click => {
                PurgeTrigger::ActionClicked
            }
            HostEvent::Alarm(name) if name == PURGE_ALARM => PurgeTrigger::Alarm,
            HostEvent::SettingsChanged => {
                self.reload().await;
                return;
            }
            _ => {
                debug!(event = ?event, "No purge configured for event");
                return;
            }
        };

        if let Err(e) = self.cleaner.purge(trigger).await {
            error!(trigger = %trigger, error = %e, code = e.error_code(), "Purge failed");
        }
    }

    async fn reload(&self) {
        let settings = match self.store.load().await {
            Ok(settings) => settings,
            Err(e) => {
                error!(error = %e, "Failed to reload settings, keeping previous");
                return;
            }
        };
        info!("Settings reloaded");
        self.store.log_settings();

        match alarm_period(settings.enabled, settings.triggers.interval_minutes) {
            Some(period) => {
                if let Err(e) = self.source.schedule_alarm(PURGE_ALARM, period) {
                    error!(error = %e, "Failed to reschedule purge alarm");
                }
            }
            None => {
                if self.source.clear_alarm(PURGE_ALARM) {
                    debug!("Purge alarm cleared");
                }
            }
        }
    }

    /// Run the cold-start purge if one is owed.
    ///
    /// Never fails: errors are logged and reported as [`StartupCleanup::Failed`].
    pub async fn run_startup_cleanup_if_due(&self) -> StartupCleanup {
        if !self.startup.take() {
            debug!("Startup check already handled");
            return StartupCleanup::AlreadyHandled;
        }

        match self.startup_cleanup().await {
            Ok(Some(outcome)) => StartupCleanup::Purged(outcome),
            Ok(None) => {
                debug!("No startup purge due");
                StartupCleanup::NotDue
            }
            Err(e) => {
                error!(error = %e, "Startup purge failed");
                StartupCleanup::Failed
            }
        }
    }

    async fn startup_cleanup(&self) -> Result<Option<PurgeOutcome>, StartupCleanupError> {
        let settings = self.store.settings()?;
        if !(settings.enabled && settings.triggers.on_startup) {
            return Ok(None);
        }
        info!("Running startup purge");
        Ok(Some(self.cleaner.purge(PurgeTrigger::Startup).await?))
    }
}

fn alarm_period(enabled: bool, interval_minutes: Option<u64>) -> Option<Duration> {
    match interval_minutes {
        Some(minutes) if enabled && minutes > 0 => {
            minutes.checked_mul(60).map(Duration::from_secs)
        }
        _ => None,
    }
}
