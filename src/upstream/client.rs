//! Shared HTTP client and response relay rules.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::config::TimeoutConfig;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

/// Create the outbound client shared by all providers.
pub fn create_client(config: &TimeoutConfig) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(Duration::from_secs(config.upstream_secs))
        .connect_timeout(Duration::from_secs(config.connect_secs))
        .user_agent(concat!("travel-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(UpstreamError::transport)
}

/// Send a prepared request and return its JSON body.
///
/// `provider` labels logs and metrics.
pub async fn send_json(provider: &'static str, request: RequestBuilder) -> Result<Value, UpstreamError> {
    let result = match request.send().await {
        Ok(response) => read_json(response).await,
        Err(e) => Err(UpstreamError::transport(e)),
    };

    match &result {
        Ok(_) => metrics::record_upstream(provider, "ok"),
        Err(e) => {
            tracing::warn!(provider, error = %e, "Upstream call failed");
            metrics::record_upstream(provider, outcome_label(e));
        }
    }

    result
}

async fn read_json(response: Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    let body = response.bytes().await.map_err(UpstreamError::transport)?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        });
    }

    serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Prefer the provider's own explanation over a bare status line.
fn error_message(status: u16, body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let provider_message = parsed.as_ref().and_then(|value| {
        value
            .get("error")
            .and_then(|error| error.as_str().or_else(|| error.get("message")?.as_str()))
            .or_else(|| value.get("error_message")?.as_str())
            .map(str::to_string)
    });

    provider_message.unwrap_or_else(|| format!("Request failed with status code {status}"))
}

fn outcome_label(err: &UpstreamError) -> &'static str {
    match err {
        UpstreamError::Timeout => "timeout",
        UpstreamError::Transport(_) => "transport",
        UpstreamError::Status { .. } => "status",
        UpstreamError::Decode(_) | UpstreamError::MissingField(_) => "decode",
        _ => "error",
    }
}
