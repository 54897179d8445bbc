//! The `/execute` endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::http::request::request_id;
use crate::http::response::{ApiError, ExecuteResponse};
use crate::observability::metrics::{self, Outcome};
use crate::rules::RuleTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleTable>,
}

/// Query string of `/execute`.
#[derive(Debug, Deserialize)]
pub struct ExecuteParams {
    pub q: Option<String>,
}

/// Resolve `q` to a function call.
pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<ExecuteParams>, QueryRejection>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let request_id = request_id(&headers);

    let result = resolve_query(&state.rules, params);
    match &result {
        Ok(response) => {
            tracing::info!(request_id = %request_id, function = %response.name, "Query resolved");
            metrics::record_request(Outcome::Resolved);
        }
        Err(e) => {
            tracing::debug!(request_id = %request_id, status = %e.status(), reason = %e.message(), "Query rejected");
            metrics::record_request(e.outcome());
        }
    }

    result.map(Json)
}

fn resolve_query(
    rules: &RuleTable,
    params: Result<Query<ExecuteParams>, QueryRejection>,
) -> Result<ExecuteResponse, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidQueryString(e.body_text()))?;

    let query = match params.q {
        Some(q) if !q.is_empty() => q,
        _ => return Err(ApiError::MissingQuery),
    };

    let start = Instant::now();
    let resolved = rules.resolve(&query);
    metrics::record_resolve(start);

    ExecuteResponse::from_call(resolved?)
}
