//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers with debug enabled produce:
//!     → tracing events (configuration, rejections, state changes)
//!     → logging.rs subscriber (stdout, plain or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event
//! - Library code never installs a subscriber on its own

pub mod logging;
