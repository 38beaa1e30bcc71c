//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay handler and provider clients produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows from the request-id layer into every relay log line
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
