//! Classroom bridge entry point.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classroom_bridge::config::loader::load_config;
use classroom_bridge::{BridgeConfig, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "classroom-bridge", about = "HTTP bridge for shared classroom session state")]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classroom_bridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        class_name = %config.classroom.class_name,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
