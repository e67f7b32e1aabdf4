//! Local host runtime configuration.
//!
//! This is the daemon's own config file, not the persisted purge settings:
//! it tells the local host where the browser profile and the settings record
//! live, and which optional capabilities to expose.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_extension_icon, default_extension_name, default_extension_version,
    default_profile_dir, default_settings_path, default_true,
};

/// Host configuration errors.
#[derive(Debug, Error)]
pub enum HostConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Local host configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Path to the persisted settings record (TOML).
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
    /// Browser profile directory holding one sub-directory per data type.
    #[serde(default = "default_profile_dir")]
    pub profile_dir: String,
    /// Whether the host exposes a notification capability.
    #[serde(default = "default_true")]
    pub notifications: bool,
    /// Prometheus metrics HTTP port (absent or 0 disables the endpoint).
    #[serde(default)]
    pub metrics_port: Option<u16>,
    /// Manifest-derived identity.
    #[serde(default)]
    pub extension: ExtensionConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            profile_dir: default_profile_dir(),
            notifications: true,
            metrics_port: None,
            extension: ExtensionConfig::default(),
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HostConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: HostConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Extension identity, used for diagnostic labelling and notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionConfig {
    #[serde(default = "default_extension_name")]
    pub name: String,
    #[serde(default = "default_extension_version")]
    pub version: String,
    /// Icon shown on notifications.
    #[serde(default = "default_extension_icon")]
    pub icon: Option<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            name: default_extension_name(),
            version: default_extension_version(),
            icon: default_extension_icon(),
        }
    }
}
