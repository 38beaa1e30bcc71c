//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → table.rs (exact lookup in the static route table)
//!     → dispatch.rs (extract input, check required keys, call provider)
//!     → serde_json::Value or RelayError
//! ```
//!
//! # Design Decisions
//! - Routes are a static table, immutable at runtime
//! - Exact match on method and path; no prefixes, no patterns
//! - Missing parameters short-circuit before any provider call
//! - Error shaping is decided per route, in one place

pub mod dispatch;
pub mod table;

pub use dispatch::RouteInput;
pub use table::{Input, Route, RouteTable, Target, ROUTES};
