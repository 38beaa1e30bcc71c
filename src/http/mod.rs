//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → middleware/cors.rs (preflight answer, CORS headers)
//!     → request.rs (query parsing, bounded body read)
//!     → [routing table decides the provider call]
//!     → response.rs (JSON body or {"error": ...})
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{QueryParams, X_REQUEST_ID};
pub use response::{ErrorBody, RelayError};
pub use server::{AppState, HttpServer};
