use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{Collections, create_app};
use common::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting back office API");

    let collections = Collections::open(&config.storage.data_dir);
    collections.bootstrap(&config.bootstrap).await?;
    info!(
        "Collections ready in {}",
        config.storage.data_dir.display()
    );

    let app = create_app(&collections, &config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
