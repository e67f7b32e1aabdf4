//! Host runtime capabilities.
//!
//! The extension never talks to a browser directly. Everything it needs from
//! its runtime (persisted settings, the browsing-data removal primitive, event
//! subscriptions, alarms and notifications) comes through the traits below.
//! [`LocalHost`] implements them against the local filesystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::DataType;

pub mod bus;
pub mod local;
pub mod notify;
pub mod profile;
pub mod storage;

pub use bus::EventBus;
pub use local::LocalHost;
pub use notify::LogNotifier;
pub use profile::ProfileData;
pub use storage::FileSettingsStorage;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capability not supported: {0}")]
    Unsupported(&'static str),
    #[error("host channel closed")]
    Closed,
    #[error("rejected by host: {0}")]
    Rejected(String),
}

/// Manifest-derived identity of the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub icon: Option<String>,
}

/// Events the host can deliver to subscribed listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The last browser window was closed.
    AllWindowsClosed,
    /// The toolbar action was clicked.
    ActionClicked,
    /// The persisted settings record changed.
    SettingsChanged,
    /// A named alarm fired.
    Alarm(String),
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::AllWindowsClosed => EventKind::AllWindowsClosed,
            Self::ActionClicked => EventKind::ActionClicked,
            Self::SettingsChanged => EventKind::SettingsChanged,
            Self::Alarm(_) => EventKind::Alarm,
        }
    }
}

/// Subscription key for [`HostEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    AllWindowsClosed,
    ActionClicked,
    SettingsChanged,
    Alarm,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::AllWindowsClosed,
        EventKind::ActionClicked,
        EventKind::SettingsChanged,
        EventKind::Alarm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllWindowsClosed => "all_windows_closed",
            Self::ActionClicked => "action_clicked",
            Self::SettingsChanged => "settings_changed",
            Self::Alarm => "alarm",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a browsing-data removal should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    /// Remove data modified at or after this instant; `None` removes everything.
    pub since: Option<DateTime<Utc>>,
    pub data_types: Vec<DataType>,
}

/// Items removed per data type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: BTreeMap<DataType, usize>,
}

impl RemovalReport {
    pub fn total(&self) -> usize {
        self.removed.values().sum()
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: Option<String>,
}

/// Persisted settings record.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Read the raw record. `Ok(None)` means nothing has been persisted yet.
    async fn read(&self) -> Result<Option<String>, std::io::Error>;
}

/// The browsing-data removal primitive.
#[async_trait]
pub trait BrowsingData: Send + Sync {
    async fn remove(&self, request: &RemovalRequest) -> Result<RemovalReport, HostError>;
}

/// Event subscriptions and alarms.
pub trait EventSource: Send + Sync {
    /// Attach a listener channel for one event kind.
    fn subscribe(&self, kind: EventKind) -> Result<mpsc::UnboundedReceiver<HostEvent>, HostError>;

    /// Create or replace a periodic alarm delivering [`HostEvent::Alarm`].
    fn schedule_alarm(&self, name: &str, period: Duration) -> Result<(), HostError>;

    /// Cancel an alarm. Returns whether one was scheduled.
    fn clear_alarm(&self, name: &str) -> bool;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<(), HostError>;
}

/// Everything the extension consumes from its runtime.
pub trait Host: Send + Sync {
    fn manifest(&self) -> &Manifest;

    fn settings_storage(&self) -> Arc<dyn SettingsStorage>;

    fn browsing_data(&self) -> Arc<dyn BrowsingData>;

    fn events(&self) -> Arc<dyn EventSource>;

    /// Notification capability. Hosts without one return `None`.
    fn notifier(&self) -> Option<Arc<dyn Notifier>>;
}
