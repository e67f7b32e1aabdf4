//! autopurge - browsing data auto-purge.
//!
//! Startup controller for a browsing-data purge extension, plus a local host
//! runtime. [`Bootstrapper::initialize`] wires the settings store, the data
//! cleaner and the event handler, loads settings, registers listeners and
//! runs the cold-start purge check, in that order.

pub mod bootstrap;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod http;
pub mod metrics;
pub mod telemetry;

pub use bootstrap::{BootstrapOutcome, Bootstrapper, Components};
pub use cleaner::{DataCleaner, PurgeOutcome, PurgeTrigger};
pub use config::{ConfigLoadError, ConfigStore, HostConfig, Settings};
pub use error::{BootstrapError, CleanupError, ListenerRegistrationError, StartupCleanupError};
pub use events::{EventHandler, StartupCleanup, StartupState};
pub use host::{Host, LocalHost};
