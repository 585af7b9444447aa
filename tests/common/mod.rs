//! Shared utilities for integration tests.

use classroom_bridge::{BridgeConfig, HttpServer};
use tokio::net::TcpListener;

/// Spawn a bridge on an ephemeral port and return its base URL.
pub async fn spawn_bridge() -> String {
    spawn_bridge_with(BridgeConfig::default()).await
}

#[allow(dead_code)]
pub async fn spawn_bridge_with(config: BridgeConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    format!("http://{addr}")
}

/// A client without connection pooling, so each test drives fresh connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
