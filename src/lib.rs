//! Lightweight circuit breaker.
//!
//! A [`Breaker`] wraps calls to an unreliable remote operation, counts
//! consecutive failures and, once a threshold is reached, rejects further
//! calls until a reset timer closes the circuit again.
//!
//! ```no_run
//! use fuse::Breaker;
//!
//! let breaker = Breaker::new();
//! breaker.set_max_failure_count(3);
//! breaker.set_reset_timeout(5);
//!
//! let ok = breaker.send(&|| {
//!     // call the remote here
//!     true
//! });
//! assert!(ok);
//! ```

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::schema::FuseConfig;
pub use resilience::{Breaker, BreakerState, ResetHandle, Sender, Snapshot};
