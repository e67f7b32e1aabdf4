//! Shared settings store.
//!
//! One instance is created per process and handed to the cleaner and the
//! event handler by `Arc`, so every component observes the same settings.

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::types::{ConfigLoadError, Settings};
use super::validation::validate;
use crate::host::SettingsStorage;

/// Settings were read before the first successful [`ConfigStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("settings have not been loaded")]
pub struct SettingsNotLoaded;

pub struct ConfigStore {
    storage: Arc<dyn SettingsStorage>,
    current: RwLock<Option<Arc<Settings>>>,
}

impl ConfigStore {
    /// Wire the store to its backing storage. Performs no I/O.
    pub fn new(storage: Arc<dyn SettingsStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Read, parse and validate the persisted record, then replace the
    /// in-memory settings.
    ///
    /// A missing record loads the defaults. On error the previously loaded
    /// settings, if any, stay in place.
    pub async fn load(&self) -> Result<Arc<Settings>, ConfigLoadError> {
        let settings = match self.storage.read().await? {
            Some(content) => Settings::parse(&content)?,
            None => {
                debug!("No persisted settings, using defaults");
                Settings::default()
            }
        };
        validate(&settings).map_err(ConfigLoadError::Invalid)?;

        let settings = Arc::new(settings);
        *self.current.write() = Some(Arc::clone(&settings));
        Ok(settings)
    }

    /// Currently loaded settings.
    pub fn settings(&self) -> Result<Arc<Settings>, SettingsNotLoaded> {
        self.current.read().clone().ok_or(SettingsNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// JSON rendering of the loaded settings, for diagnostics only.
    pub fn describe(&self) -> String {
        match self.current.read().as_deref() {
            Some(settings) => serde_json::to_string(settings)
                .unwrap_or_else(|e| format!("<unprintable settings: {e}>")),
            None => "<not loaded>".to_string(),
        }
    }

    /// Log the loaded settings.
    pub fn log_settings(&self) {
        let Ok(settings) = self.settings() else {
            debug!("Settings not loaded yet");
            return;
        };
        info!(
            enabled = settings.enabled,
            data_types = ?settings.data_types,
            time_range = ?settings.time_range,
            on_startup = settings.triggers.on_startup,
            on_all_windows_closed = settings.triggers.on_all_windows_closed,
            on_action_click = settings.triggers.on_action_click,
            interval_minutes = ?settings.triggers.interval_minutes,
            notify_on_cleanup = settings.notifications.on_cleanup,
            "Current settings"
        );
    }
}
