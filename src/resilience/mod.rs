//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to remote operation:
//!     → circuit_breaker.rs (reject if open, otherwise run the work)
//!     → on failure: count it, open the circuit at the threshold
//!     → reset timer closes the circuit after the timeout
//! ```
//!
//! # Design Decisions
//! - Binary open/closed breaker with a fixed timeout
//! - Retries are the caller's responsibility

pub mod circuit_breaker;

pub use circuit_breaker::{Breaker, BreakerState, ResetHandle, Sender, Snapshot};
