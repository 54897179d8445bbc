//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, CORS, timeout)
//!     → handler.rs (extract `q`, call the engine)
//!     → response.rs (success payload or error mapping)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::AppState;
pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody, ExecuteResponse};
pub use server::HttpServer;
