//! Response shapes and error mapping.
//!
//! # Responsibilities
//! - Define the success payload of `/execute`
//! - Map every failure to a fixed status code and message
//!
//! # Design Decisions
//! - `arguments` is a JSON document inside a JSON string, kept for
//!   compatibility with existing clients
//! - Error bodies are `{"detail": "<message>"}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::engine::{FunctionCall, ResolveError};
use crate::encoding::to_wire_json;
use crate::observability::metrics::Outcome;

/// Successful `/execute` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub name: String,
    pub arguments: String,
}

impl ExecuteResponse {
    pub fn from_call(call: FunctionCall) -> Result<Self, ApiError> {
        let arguments = to_wire_json(&call.arguments).map_err(|e| {
            tracing::error!(function = %call.name, error = %e, "Failed to encode arguments");
            ApiError::Internal
        })?;

        Ok(Self {
            name: call.name,
            arguments,
        })
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Failures surfaced to callers of `/execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// `q` absent or empty.
    MissingQuery,
    /// The query string could not be decoded.
    InvalidQueryString(String),
    /// A rule matched but an argument did not coerce.
    TypeMismatch,
    /// No rule matched.
    NoMatch,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery | ApiError::InvalidQueryString(_) | ApiError::TypeMismatch => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoMatch => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MissingQuery => "Missing query parameter 'q'".to_string(),
            ApiError::InvalidQueryString(reason) => reason.clone(),
            ApiError::TypeMismatch => "Parameter type mismatch".to_string(),
            ApiError::NoMatch => "No matching function found for the query".to_string(),
            ApiError::Internal => "Internal Server Error".to_string(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ApiError::MissingQuery => Outcome::MissingQuery,
            ApiError::InvalidQueryString(_) => Outcome::InvalidQuery,
            ApiError::TypeMismatch => Outcome::TypeMismatch,
            ApiError::NoMatch => Outcome::NoMatch,
            ApiError::Internal => Outcome::Error,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NoMatch => ApiError::NoMatch,
            ResolveError::TypeMismatch { .. } => ApiError::TypeMismatch,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
