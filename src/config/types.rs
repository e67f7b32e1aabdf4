//! Persisted purge settings.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::defaults::{default_data_types, default_true};
use super::validation::ValidationError;

/// Errors raised while loading persisted settings.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Browsing data categories a purge can remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Cache,
    Cookies,
    History,
    Downloads,
    FormData,
    LocalStorage,
    IndexedDb,
    Passwords,
    ServiceWorkers,
}

impl DataType {
    pub const ALL: [DataType; 9] = [
        DataType::Cache,
        DataType::Cookies,
        DataType::History,
        DataType::Downloads,
        DataType::FormData,
        DataType::LocalStorage,
        DataType::IndexedDb,
        DataType::Passwords,
        DataType::ServiceWorkers,
    ];

    /// Static label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Cookies => "cookies",
            Self::History => "history",
            Self::Downloads => "downloads",
            Self::FormData => "form_data",
            Self::LocalStorage => "local_storage",
            Self::IndexedDb => "indexed_db",
            Self::Passwords => "passwords",
            Self::ServiceWorkers => "service_workers",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far back a purge reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    LastHour,
    LastDay,
    LastWeek,
    LastFourWeeks,
    #[default]
    AllTime,
}

impl TimeRange {
    /// Earliest modification time that is removed, or `None` for everything.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let span = match self {
            Self::LastHour => Duration::hours(1),
            Self::LastDay => Duration::days(1),
            Self::LastWeek => Duration::weeks(1),
            Self::LastFourWeeks => Duration::weeks(4),
            Self::AllTime => return None,
        };
        Some(now - span)
    }
}

/// Persisted purge settings.
///
/// Every key is optional; a missing record deserializes to [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Master switch. When false every purge is skipped.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Categories removed by a purge.
    #[serde(default = "default_data_types")]
    pub data_types: Vec<DataType>,
    /// How far back a purge reaches.
    #[serde(default)]
    pub time_range: TimeRange,
    /// Events that trigger a purge.
    #[serde(default)]
    pub triggers: TriggerConfig,
    /// User-facing notifications.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            data_types: default_data_types(),
            time_range: TimeRange::default(),
            triggers: TriggerConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Settings {
    /// Parse a settings record from TOML.
    pub fn parse(content: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(content)?)
    }
}

/// Events that trigger a purge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Purge once per cold start.
    #[serde(default = "default_true")]
    pub on_startup: bool,
    /// Purge when the host reports that every window was closed.
    #[serde(default)]
    pub on_all_windows_closed: bool,
    /// Purge when the toolbar action is clicked.
    #[serde(default = "default_true")]
    pub on_action_click: bool,
    /// Periodic purge, in minutes.
    #[serde(default)]
    pub interval_minutes: Option<u64>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            on_all_windows_closed: false,
            on_action_click: true,
            interval_minutes: None,
        }
    }
}

/// User-facing notification preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Notify after a successful purge.
    #[serde(default)]
    pub on_cleanup: bool,
}
