//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Query handler produces:
//!     → logging.rs (structured log events, request ID in every handler event)
//!     → metrics.rs (outcome counters, resolve latency)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Client errors (no match, bad input) are debug events, not warnings
//! - Metrics are optional and off by default

pub mod logging;
pub mod metrics;
