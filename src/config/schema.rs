//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the config file.

use serde::{Deserialize, Serialize};

use crate::rules::{MatchMode, RuleDefinition, RuleError, RuleTable};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// How rule patterns are anchored.
    pub matching: MatchingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Custom rule table. Empty means the built-in rules.
    pub rules: Vec<RuleDefinition>,
}

impl AppConfig {
    /// Build the rule table this configuration describes.
    pub fn rule_table(&self) -> Result<RuleTable, RuleError> {
        if self.rules.is_empty() {
            RuleTable::defaults(self.matching.mode)
        } else {
            RuleTable::new(&self.rules, self.matching.mode)
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Pattern matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MatchingConfig {
    /// `prefix` ignores text after the pattern, `full` rejects it.
    pub mode: MatchMode,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
