//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Build rule table → Metrics → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: rules first, listener last (traffic only when ready)
//! - A bad rule table stops the process before it binds

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
