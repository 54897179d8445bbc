//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/execute` handler
//! - Wire up middleware (request ID, tracing, CORS, timeout)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handler::{execute, AppState};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::rules::RuleTable;

/// HTTP server for the query endpoint.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `rules`.
    pub fn new(config: AppConfig, rules: RuleTable) -> Self {
        let state = AppState {
            rules: Arc::new(rules),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/execute", get(execute))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(permissive_cors())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained first.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Any origin, method and header, with credentials.
///
/// Wildcards cannot be combined with credentials, so the request's own
/// values are echoed back instead.
fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method, StatusCode};
    use tower::ServiceExt;

    use crate::http::response::{ErrorBody, ExecuteResponse};
    use crate::rules::{ArgType, ArgumentSpec, MatchMode, RuleDefinition};

    fn router() -> Router {
        let config = AppConfig::default();
        let rules = RuleTable::defaults(MatchMode::Prefix).unwrap();
        HttpServer::new(config, rules).router()
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        send(router(), uri).await
    }

    async fn send(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let res = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_execute_success() {
        let (status, body) = get("/execute?q=What+is+the+status+of+ticket+83742%3F").await;
        assert_eq!(status, StatusCode::OK);

        let body: ExecuteResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.name, "get_ticket_status");
        assert_eq!(body.arguments, r#"{"ticket_id": 83742}"#);
    }

    #[tokio::test]
    async fn test_execute_missing_query() {
        for uri in ["/execute", "/execute?q=", "/execute?other=1"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");

            let body: ErrorBody = serde_json::from_slice(&body).unwrap();
            assert_eq!(body.detail, "Missing query parameter 'q'");
        }
    }

    #[tokio::test]
    async fn test_execute_no_match() {
        let (status, body) = get("/execute?q=Make%20me%20a%20sandwich.").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.detail, "No matching function found for the query");
    }

    #[tokio::test]
    async fn test_execute_type_mismatch() {
        let rules = RuleTable::new(
            &[RuleDefinition::new(
                r"What is the status of ticket (\w+)\?",
                "get_ticket_status",
                vec![ArgumentSpec::new("ticket_id", ArgType::Integer)],
            )],
            MatchMode::Prefix,
        )
        .unwrap();
        let router = HttpServer::new(AppConfig::default(), rules).router();

        let (status, body) = send(router, "/execute?q=What+is+the+status+of+ticket+ABC%3F").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.detail, "Parameter type mismatch");
    }

    #[tokio::test]
    async fn test_execute_large_integer() {
        let (status, body) =
            get("/execute?q=What+is+the+status+of+ticket+99999999999999999999%3F").await;
        assert_eq!(status, StatusCode::OK);

        let body: ExecuteResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.arguments, r#"{"ticket_id": 99999999999999999999}"#);
    }

    #[tokio::test]
    async fn test_request_id_generated_and_preserved() {
        let res = router()
            .oneshot(Request::builder().uri("/execute").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(res.headers().contains_key(X_REQUEST_ID));

        let res = router()
            .oneshot(
                Request::builder()
                    .uri("/execute")
                    .header(X_REQUEST_ID, "client-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()[X_REQUEST_ID], "client-id");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let res = router()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/execute")
                    .header(header::ORIGIN, "https://app.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(res.status().is_success());
        let headers = res.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example.com");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (status, _) = get("/other").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
