//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every rule compiled once)
//!     → AppConfig (validated, immutable)
//!     → AppConfig::rule_table() builds the table handed to the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so an empty file (or none) is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::ListenerConfig;
pub use schema::MatchingConfig;
pub use schema::ObservabilityConfig;
pub use schema::TimeoutConfig;
