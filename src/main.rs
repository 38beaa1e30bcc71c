//! Travel planner API relay.
//!
//! Receives requests from the travel-planning front-end, forwards each one to a
//! single third-party provider with the relay's own credentials, and returns the
//! provider's JSON.
//!
//! ```text
//!     Browser ──▶ CORS ──▶ route table ──▶ provider client ──▶ flight search
//!        ▲                                       │              places
//!        │                                       │              image generation
//!        └──────────── JSON body / {"error"} ◀───┘              object storage
//! ```

use travel_relay::config;
use travel_relay::lifecycle::{self, Shutdown};
use travel_relay::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init_logging(&config.observability);
    tracing::info!("travel-relay v{} starting", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = std::env::var(config::CONFIG_PATH_VAR) {
        tracing::info!(path = %path, "Configuration file loaded");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let (server, listener) = lifecycle::prepare(config).await?;

    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
