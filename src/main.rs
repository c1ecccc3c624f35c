use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dividend_catalog::{config::AppConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dividend_catalog=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate()?;
    tracing::info!("Starting Dividend Catalog in {:?} mode", config.environment);

    let bind_addr = config.bind_addr();
    let state = AppState::from_config(config).await?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Dividend Catalog listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
