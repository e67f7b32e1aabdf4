//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use super::types::DataType;

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Settings Defaults
// =============================================================================

pub fn default_data_types() -> Vec<DataType> {
    vec![
        DataType::Cache,
        DataType::Cookies,
        DataType::History,
        DataType::Downloads,
        DataType::FormData,
    ]
}

// =============================================================================
// Host Defaults
// =============================================================================

pub fn default_settings_path() -> String {
    "settings.toml".to_string()
}

pub fn default_profile_dir() -> String {
    "profile".to_string()
}

pub fn default_extension_name() -> String {
    "Browsing Data Auto Purge".to_string()
}

pub fn default_extension_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub fn default_extension_icon() -> Option<String> {
    Some("img/icon48.png".to_string())
}
