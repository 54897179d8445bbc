//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the rule table from validated configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener last
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds only after everything else is ready

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::rules::RuleError;

/// Errors that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid rule table: {0}")]
    Rules(#[from] RuleError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Prepare a server and its bound listener from `config`.
pub async fn prepare(config: AppConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let rules = config.rule_table()?;
    tracing::info!(
        rules = rules.len(),
        mode = ?rules.mode(),
        "Rule table compiled"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| StartupError::Bind { address, source })?;
    tracing::info!(address = %local_addr, "Listening for connections");

    Ok((HttpServer::new(config, rules), listener))
}
