//! Rule table subsystem.
//!
//! # Data Flow
//! ```text
//! RuleDefinition[] (built-in defaults or [[rules]] from the config file)
//!     → table.rs (compile patterns, anchor per MatchMode, validate)
//!     → RuleTable (validated, immutable)
//!     → shared via Arc with the query handler
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Order is priority: first match wins
//! - Capture count must equal argument count; checked before serving
//! - Matching is literal: case-sensitive, no trimming

pub mod defaults;
pub mod table;

pub use table::{ArgType, ArgumentSpec, MatchMode, Rule, RuleDefinition, RuleError, RuleTable};
