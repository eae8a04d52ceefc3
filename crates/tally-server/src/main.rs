#![doc = include_str!("../README.md")]

mod config;
mod routes;
mod telemetry;

use clap::Parser;
use config::{CliArgs, ServerConfig};
use routes::{AppState, Backend};
use tally::{FileStore, MemoryStore};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    telemetry::init_telemetry()?;

    let backend = if config.in_memory {
        tracing::warn!("Running with in-memory counters; sequences reset on restart");
        Backend::Memory(MemoryStore::new())
    } else {
        Backend::File(FileStore::open(&config.data_path).await?)
    };

    let app = routes::router(AppState::new(backend));
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    tracing::info!(
        "Starting sequence service on {} (snapshot: {})",
        config.server_addr,
        if config.in_memory {
            "none".to_owned()
        } else {
            config.data_path.display().to_string()
        }
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shut down successfully");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
