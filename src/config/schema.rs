//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::circuit_breaker::{effective_max_failure_count, effective_reset_timeout};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FuseConfig {
    /// Breaker settings.
    pub breaker: BreakerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens (0 = default of 3).
    pub max_failure_count: u32,

    /// Seconds the circuit stays open (0 = default of 5).
    pub reset_timeout_secs: u64,

    /// Emit trace events for configuration and state changes.
    pub debug: bool,
}

impl BreakerConfig {
    pub fn effective_max_failure_count(&self) -> u32 {
        effective_max_failure_count(self.max_failure_count)
    }

    pub fn effective_reset_timeout(&self) -> Duration {
        effective_reset_timeout(self.reset_timeout_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
