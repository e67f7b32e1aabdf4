//! autopurge - browsing data auto-purge daemon.
//!
//! Runs the extension bootstrap against the local host runtime and keeps the
//! process alive until Ctrl-C, whether or not initialization succeeded.

use autopurge::host::{EventBus, HostEvent};
use autopurge::{BootstrapOutcome, Bootstrapper, HostConfig, LocalHost, http, metrics};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "autopurge.toml".to_string());

    let config = HostConfig::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        extension = %config.extension.name,
        version = %config.extension.version,
        profile = %config.profile_dir,
        settings = %config.settings_path,
        "Script loaded"
    );

    // Convention: metrics_port = 0 disables the HTTP endpoint.
    match config.metrics_port {
        Some(port) if port != 0 => {
            metrics::init();
            tokio::spawn(http::run_http_server(port));
        }
        _ => info!("Metrics disabled"),
    }

    let host = Arc::new(LocalHost::from_config(&config));
    spawn_signal_forwarding(host.bus());

    let outcome = Bootstrapper::new(host.clone()).initialize().await;
    let _components = match outcome {
        BootstrapOutcome::Success(components) => Some(components),
        BootstrapOutcome::Failure(_) => {
            warn!("Running without listeners until restarted");
            None
        }
    };

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}

/// Map Unix signals onto host events: SIGHUP reloads settings, SIGUSR1 acts
/// as a toolbar click, SIGUSR2 as the last window closing.
#[cfg(unix)]
fn spawn_signal_forwarding(bus: Arc<EventBus>) {
    use tokio::signal::unix::{SignalKind, signal};

    let forwards = [
        (SignalKind::hangup(), HostEvent::SettingsChanged),
        (SignalKind::user_defined1(), HostEvent::ActionClicked),
        (SignalKind::user_defined2(), HostEvent::AllWindowsClosed),
    ];
    for (kind, event) in forwards {
        let mut stream = match signal(kind) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, event = ?event, "Failed to install signal handler");
                continue;
            }
        };
        let bus = Arc::clone(&bus);
        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                let delivered = bus.publish(event.clone());
                info!(event = ?event, delivered, "Signal forwarded");
            }
        });
    }
}

#[cfg(not(unix))]
fn spawn_signal_forwarding(_bus: Arc<EventBus>) {}
