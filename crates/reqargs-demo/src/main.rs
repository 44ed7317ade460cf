//! # reqargs-demo: Binary Entry Point
//!
//! Starts the catalog service. Binds to `PORT` (default 8080).

use anyhow::Context;
use reqargs_demo::config::AppConfig;
use reqargs_demo::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let port = config.port;
    tracing::info!(page_size = config.default_page_size, "configuration loaded");

    let app = reqargs_demo::app(AppState::new(config)).context("building routes")?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("reqargs demo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
