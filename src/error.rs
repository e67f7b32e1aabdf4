//! Unified error handling for autopurge.
//!
//! Only [`BootstrapError`] ever reaches the bootstrap failure boundary.
//! Purge failures are reported where they happen and never abort the process.

use crate::config::{ConfigLoadError, SettingsNotLoaded};
use crate::host::{EventKind, HostError};
use thiserror::Error;

// ============================================================================
// Bootstrap Errors (top-level failure boundary)
// ============================================================================

/// Errors that abort the bootstrap sequence.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to load settings")]
    ConfigLoad(#[from] ConfigLoadError),

    #[error("failed to register event listeners")]
    ListenerRegistration(#[from] ListenerRegistrationError),
}

impl BootstrapError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigLoad(_) => "config_load",
            Self::ListenerRegistration(_) => "listener_registration",
        }
    }
}

// ============================================================================
// Listener Registration Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ListenerRegistrationError {
    #[error("event listeners are already registered")]
    AlreadyRegistered,

    #[error("failed to subscribe to {kind} events")]
    Subscribe {
        kind: EventKind,
        #[source]
        source: HostError,
    },

    #[error("failed to schedule purge alarm")]
    Alarm(#[source] HostError),

    #[error(transparent)]
    NotLoaded(#[from] SettingsNotLoaded),
}

// ============================================================================
// Cleanup Errors
// ============================================================================

/// A purge attempt failed.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error(transparent)]
    NotLoaded(#[from] SettingsNotLoaded),

    #[error("browsing data removal failed")]
    Host(#[from] HostError),
}

impl CleanupError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotLoaded(_) => "not_loaded",
            Self::Host(_) => "host_error",
        }
    }
}

/// The startup purge check failed. Caught inside the event handler.
#[derive(Debug, Error)]
pub enum StartupCleanupError {
    #[error(transparent)]
    NotLoaded(#[from] SettingsNotLoaded),

    #[error("startup purge failed")]
    Purge(#[from] CleanupError),
}

/// Render an error and every cause beneath it.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_walks_every_source() {
        let error = BootstrapError::from(ConfigLoadError::from(std::io::Error::other(
            "disk full",
        )));
        let chain = error_chain(&error);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], "failed to load settings");
        assert_eq!(chain[1], "failed to read settings: disk full");
        assert_eq!(chain[2], "disk full");
    }

    #[test]
    fn debug_rendering_keeps_the_failing_value() {
        let error = BootstrapError::from(ListenerRegistrationError::Alarm(
            HostError::Unsupported("alarms"),
        ));
        let details = format!("{error:?}");
        assert!(details.contains("Alarm"));
        assert!(details.contains("Unsupported(\"alarms\")"));
    }

    #[test]
    fn error_codes_are_stable() {
        let error = BootstrapError::from(ListenerRegistrationError::AlreadyRegistered);
        assert_eq!(error.error_code(), "listener_registration");
        assert_eq!(
            CleanupError::from(SettingsNotLoaded).error_code(),
            "not_loaded"
        );
    }

    #[test]
    fn subscribe_error_names_the_kind() {
        let error = ListenerRegistrationError::Subscribe {
            kind: EventKind::ActionClicked,
            source: HostError::Closed,
        };
        assert_eq!(error.to_string(), "failed to subscribe to action_clicked events");
    }
}
