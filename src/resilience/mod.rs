//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Relay request:
//!     → timeouts.rs (deadline over body read + provider call)
//!     → provider client (connect/total timeout on the single outbound call)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No retries: a failed provider call fails the request

pub mod timeouts;

pub use timeouts::with_deadline;
