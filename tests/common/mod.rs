//! Shared utilities for integration testing.

use std::net::SocketAddr;

use query_dispatch::config::AppConfig;
use query_dispatch::lifecycle::{startup, Shutdown};

/// A server running on an ephemeral port. Dropping it does not stop the
/// server; call [`TestServer::stop`].
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// Trigger graceful shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// Start a server for `config`, bound to 127.0.0.1 on a free port.
pub async fn start_server(mut config: AppConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".into();

    let (server, listener) = startup::prepare(config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, server_shutdown));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// HTTP client without connection pooling or system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
