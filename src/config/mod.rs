//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Persisted purge settings (Settings, DataType, TimeRange, TriggerConfig)
//! - [`host`]: Local host runtime configuration (HostConfig, ExtensionConfig)
//! - [`store`]: The shared settings store consumed by the cleaner and the event handler
//! - [`validation`]: Settings validation run on every load
//! - [`defaults`]: Default value functions for serde

mod defaults;
mod host;
mod store;
mod types;
mod validation;

pub use host::{ExtensionConfig, HostConfig, HostConfigError};
pub use store::{ConfigStore, SettingsNotLoaded};
pub use types::{
    ConfigLoadError, DataType, NotificationConfig, Settings, TimeRange, TriggerConfig,
};
pub use validation::{ValidationError, validate};
