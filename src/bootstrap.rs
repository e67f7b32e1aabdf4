//! Startup sequencing and the top-level failure boundary.
//!
//! The sequence is strictly ordered: wire components, load settings, register
//! listeners, then run the startup purge check. Any error before the startup
//! check lands in [`Bootstrapper::report_failure`] and leaves the process
//! inert: no listeners and no purges.

use std::sync::Arc;
use tracing::{Instrument, debug, error, info, warn};

use crate::cleaner::DataCleaner;
use crate::config::ConfigStore;
use crate::error::{BootstrapError, error_chain};
use crate::events::{EventHandler, StartupCleanup, StartupState};
use crate::host::{Host, Notification};
use crate::metrics;
use crate::telemetry::spans;

const BANNER_WIDTH: usize = 50;

/// Components kept alive after a successful bootstrap.
pub struct Components {
    pub store: Arc<ConfigStore>,
    pub cleaner: Arc<DataCleaner>,
    pub events: Arc<EventHandler>,
    pub startup: StartupCleanup,
}

pub enum BootstrapOutcome {
    Success(Components),
    Failure(BootstrapError),
}

impl BootstrapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

pub struct Bootstrapper {
    host: Arc<dyn Host>,
}

impl Bootstrapper {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    /// Run the bootstrap sequence. Consumes the bootstrapper, so it runs at
    /// most once.
    pub async fn initialize(self) -> BootstrapOutcome {
        let manifest = self.host.manifest();
        let span = spans::bootstrap(&manifest.name, &manifest.version);

        async move {
            banner(&format!("Starting {}...", self.host.manifest().name));

            match self.run(StartupState::cold()).await {
                Ok(components) => {
                    metrics::record_bootstrap("success");
                    BootstrapOutcome::Success(components)
                }
                Err(e) => {
                    metrics::record_bootstrap(e.error_code());
                    self.report_failure(&e).await;
                    BootstrapOutcome::Failure(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, startup: StartupState) -> Result<Components, BootstrapError> {
        debug!("Creating components");
        let store = Arc::new(ConfigStore::new(self.host.settings_storage()));
        let cleaner = Arc::new(DataCleaner::new(
            Arc::clone(&store),
            self.host.browsing_data(),
            self.host.notifier(),
        ));
        let events = Arc::new(EventHandler::new(
            Arc::clone(&store),
            Arc::clone(&cleaner),
            self.host.events(),
            startup,
        ));
        debug!("Components created");

        debug!("Loading settings");
        store.load().await?;
        store.log_settings();
        debug!("Settings loaded");

        debug!("Registering event listeners");
        events.register_all()?;
        debug!("Event listeners registered");

        banner("Initialization complete");

        debug!("Checking startup purge");
        let startup = events.run_startup_cleanup_if_due().await;
        debug!(result = ?startup, "Startup purge check complete");

        Ok(Components {
            store,
            cleaner,
            events,
            startup,
        })
    }

    async fn report_failure(&self, e: &BootstrapError) {
        let rule = "=".repeat(BANNER_WIDTH);
        error!("{rule}");
        error!(error = %e, code = e.error_code(), "Initialization failed");
        for cause in error_chain(e).iter().skip(1) {
            error!(cause = %cause, "Caused by");
        }
        error!(details = ?e, "Error details");
        error!("{rule}");

        let Some(notifier) = self.host.notifier() else {
            debug!("No notification capability, skipping failure notification");
            return;
        };
        let manifest = self.host.manifest();
        let notification = Notification {
            title: "Extension error".to_string(),
            message: format!("{} failed to initialize", manifest.name),
            icon: manifest.icon.clone(),
        };
        if let Err(notify_error) = notifier.create(notification).await {
            warn!(error = %notify_error, "Failed to send failure notification");
        }
    }
}

fn banner(message: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    info!("{rule}");
    info!("{message}");
    info!("{rule}");
}
