//! HTTP server setup.
//!
//! # Responsibilities
//! - Assemble the shared application state (collaborators, hub, session)
//! - Register all API routes on the bridge router
//! - Feed every request through a single Axum catch-all into the router
//! - Bind the server to a listener and run until shutdown
//!
//! # Design Decisions
//! - Axum handles the wire protocol only; matching, middleware, and error
//!   containment all live in the crate's own router and pipeline
//! - State is a bundle of Arcs so handlers share one hub, one session, one
//!   provider set across all connections

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
};
use tokio::net::TcpListener;

use crate::broadcast::BroadcastHub;
use crate::classroom::{
    InMemoryRecords, NotificationSink, PromptLibrary, StaticPromptLibrary, StudentRecords,
    TracingNotifier,
};
use crate::config::BridgeConfig;
use crate::live_demo::LiveDemoSession;
use crate::routing::Router as BridgeRouter;

/// Application state shared by every pipeline step and handler.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn StudentRecords>,
    pub prompts: Arc<dyn PromptLibrary>,
    pub notifier: Arc<dyn NotificationSink>,
    pub hub: Arc<BroadcastHub>,
    pub live_demo: Arc<LiveDemoSession>,
    pub config: Arc<BridgeConfig>,
}

impl AppState {
    /// Build state with the in-memory providers seeded from config.
    pub fn from_config(config: BridgeConfig) -> Self {
        let hub = Arc::new(BroadcastHub::new());
        Self {
            records: Arc::new(InMemoryRecords::seeded(&config.classroom)),
            prompts: Arc::new(StaticPromptLibrary::built_in()),
            notifier: Arc::new(TracingNotifier),
            live_demo: Arc::new(LiveDemoSession::new(Arc::clone(&hub))),
            hub,
            config: Arc::new(config),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let hub = Arc::new(BroadcastHub::new());
        Self {
            records: Arc::new(InMemoryRecords::empty()),
            prompts: Arc::new(StaticPromptLibrary::built_in()),
            notifier: Arc::new(TracingNotifier),
            live_demo: Arc::new(LiveDemoSession::new(Arc::clone(&hub))),
            hub,
            config: Arc::new(BridgeConfig::default()),
        }
    }
}

/// HTTP server for the classroom bridge.
pub struct HttpServer {
    router: axum::Router,
}

impl HttpServer {
    /// Create a server with in-memory providers seeded from the config.
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_state(AppState::from_config(config))
    }

    /// Create a server over pre-built state (used to swap in real providers
    /// or test doubles).
    pub fn with_state(state: AppState) -> Self {
        let mut bridge_router = BridgeRouter::new(state);
        crate::api::register_routes(&mut bridge_router);

        let shared = Arc::new(bridge_router);
        let router = axum::Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(shared);

        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every request funnels through here into the bridge's own router.
async fn dispatch(
    State(router): State<Arc<BridgeRouter>>,
    request: Request<Body>,
) -> Response {
    router.handle(request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}
