//! Upstream provider subsystem.
//!
//! # Data Flow
//! ```text
//! routing target (validated input)
//!     → serpapi.rs / places.rs / openai.rs / storage.rs
//!     → client.rs (shared reqwest client, status + JSON handling)
//!     → provider API
//!     → serde_json::Value or UpstreamError
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound call per relayed request, never retried
//! - Provider keys come from configuration only; caller-supplied keys are dropped
//! - Error messages never carry request URLs (they embed the keys)

pub mod client;
pub mod data_url;
pub mod openai;
pub mod places;
pub mod serpapi;
pub mod storage;

use std::sync::Arc;

use thiserror::Error;

use crate::config::RelayConfig;

pub use data_url::{decode_image_payload, DecodedImage};
pub use openai::ImageGenerationClient;
pub use places::PlacesClient;
pub use serpapi::SerpApiClient;
pub use storage::{ObjectStore, S3Store, StoredObject};

/// Failure talking to a provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection or TLS failure. The URL is stripped before wrapping.
    #[error("{}", transport_message(.0))]
    Transport(reqwest::Error),

    /// The provider did not answer within the outbound timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// Non-2xx response; `message` is the provider's own text when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Malformed upstream response: {0}")]
    Decode(String),

    #[error("Upstream response missing '{0}'")]
    MissingField(&'static str),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl UpstreamError {
    /// Wrap a transport error without leaking the request URL.
    pub fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return UpstreamError::Timeout;
        }
        UpstreamError::Transport(err.without_url())
    }
}

/// reqwest's message followed by its causes, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
fn transport_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// All provider clients, shared by every request.
#[derive(Clone)]
pub struct Upstreams {
    pub serpapi: SerpApiClient,
    pub places: PlacesClient,
    pub images: ImageGenerationClient,
    pub storage: Option<Arc<dyn ObjectStore>>,
}

impl Upstreams {
    /// Build provider clients with an explicit object store.
    pub fn new(
        config: &RelayConfig,
        storage: Option<Arc<dyn ObjectStore>>,
    ) -> Result<Self, UpstreamError> {
        let http = client::create_client(&config.timeouts)?;
        let providers = &config.providers;

        Ok(Self {
            serpapi: SerpApiClient::new(http.clone(), &providers.serpapi),
            places: PlacesClient::new(http.clone(), &providers.google_maps),
            images: ImageGenerationClient::new(http, &providers.openai),
            storage,
        })
    }

    /// Build provider clients, connecting S3 when storage is configured.
    pub async fn from_config(config: &RelayConfig) -> Result<Self, UpstreamError> {
        let storage_config = &config.providers.storage;
        let storage = if storage_config.is_configured() {
            let store = S3Store::from_config(storage_config).await?;
            Some(Arc::new(store) as Arc<dyn ObjectStore>)
        } else {
            tracing::warn!("Object storage not configured; /upload-image will fail");
            None
        };

        Self::new(config, storage)
    }

    /// The configured object store, or an error naming what is missing.
    pub fn object_store(&self) -> Result<&Arc<dyn ObjectStore>, UpstreamError> {
        self.storage
            .as_ref()
            .ok_or(UpstreamError::NotConfigured("object storage"))
    }
}
