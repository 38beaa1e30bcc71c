//! Response shaping.
//!
//! # Responsibilities
//! - Map relay failures to HTTP status codes
//! - Render every failure as `{"error": "<message>"}`
//!
//! # Design Decisions
//! - Error detail not meant for callers stays in `source` and is only logged
//! - Provider error text is surfaced for the search/places routes

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal outcome of a request that did not succeed.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid route")]
    InvalidRoute,

    #[error("Missing '{0}' parameter")]
    MissingParameter(&'static str),

    /// Missing input reported with a route-specific message.
    #[error("{0}")]
    MissingInput(&'static str),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// Failure reported to the caller with a fixed message.
    #[error("{message}")]
    Failed {
        message: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Upstream request timed out")]
    Timeout(Duration),
}

impl RelayError {
    pub fn failed(message: &'static str, source: impl Into<BoxError>) -> Self {
        RelayError::Failed { message, source: source.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRoute => StatusCode::NOT_FOUND,
            RelayError::MissingParameter(_) | RelayError::MissingInput(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Upstream(_) | RelayError::Failed { .. } | RelayError::Timeout(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}
