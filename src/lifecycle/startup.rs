//! Startup orchestration.
//!
//! # Responsibilities
//! - Report configuration gaps that will make routes fail
//! - Initialize provider clients and the HTTP server in order
//! - Bind the listener last (traffic only when ready)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::upstream::{UpstreamError, Upstreams};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize providers: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Names of provider credentials that are not set.
pub fn missing_credentials(config: &RelayConfig) -> Vec<&'static str> {
    let providers = &config.providers;
    let mut missing = Vec::new();
    if providers.serpapi.api_key.is_empty() {
        missing.push("SERPAPI_API_KEY");
    }
    if providers.google_maps.api_key.is_empty() {
        missing.push("GOOGLE_MAPS_API_KEY");
    }
    if providers.openai.api_key.is_empty() {
        missing.push("OPENAI_API_KEY");
    }
    if providers.storage.bucket.is_empty() {
        missing.push("AWS_BUCKET_NAME");
    }
    if providers.storage.region.is_empty() {
        missing.push("AWS_REGION");
    }
    missing
}

/// Build everything needed to serve, returning the server and its bound listener.
pub async fn prepare(config: RelayConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    for name in missing_credentials(&config) {
        tracing::warn!(setting = name, "Provider setting missing; dependent routes will fail");
    }

    let upstreams = Upstreams::from_config(&config).await?;

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address: address.clone(), source })?;

    tracing::info!(
        address = %address,
        allowed_origins = ?config.cors.allowed_origins,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        "Configuration loaded"
    );

    Ok((HttpServer::new(config, upstreams), listener))
}
