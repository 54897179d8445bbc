//! Query dispatch service.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /execute?q=...
//!     ─────────────────▶ ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!                        │ http server  │───▶│   handler    │───▶│    engine    │
//!                        │ (middleware) │    │ (q → result) │    │  resolve()   │
//!                        └──────────────┘    └──────┬───────┘    └──────┬───────┘
//!                                                   │                   │
//!     ◀─────────────────  {"name", "arguments"}  ◀──┘            ┌──────▼───────┐
//!                         or {"detail"} + 400/404                │  rule table  │
//!                                                                │ (immutable)  │
//!                                                                └──────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use query_dispatch::config::validation::validate_config;
use query_dispatch::config::{load_config, AppConfig, ConfigError};
use query_dispatch::lifecycle::{signals, startup, Shutdown};
use query_dispatch::observability::logging;

#[derive(Parser)]
#[command(name = "query-dispatch")]
#[command(about = "Resolve natural-language queries to function calls over HTTP", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability.log_level);

    tracing::info!("query-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        match_mode = ?config.matching.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let (server, listener) = startup::prepare(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
