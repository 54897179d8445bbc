//! Natural-language query to function-call dispatcher.
//!
//! Matches a query against an ordered table of regular-expression rules and
//! returns the first matching rule's function name with its captured,
//! type-coerced arguments.

pub mod config;
pub mod encoding;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rules;

pub use config::AppConfig;
pub use engine::{ArgValue, FunctionCall, ResolveError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rules::{MatchMode, RuleTable};
