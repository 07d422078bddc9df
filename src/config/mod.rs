//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → FuseConfig
//!     → Breaker::from_config / logging::init
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Non-positive breaker settings are not errors; they fall back to defaults

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::BreakerConfig;
pub use schema::FuseConfig;
pub use schema::ObservabilityConfig;
