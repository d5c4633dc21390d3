use anyhow::Context;
use stay_quote_engine::config::AppConfig;
use stay_quote_engine::server::{self, AppState};
use stay_quote_engine::source::source_for;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let source = source_for(&config.catalog);
    info!(origin = %source.describe(), "loading catalog");
    let catalog = source
        .load()
        .await
        .with_context(|| format!("failed to load catalog from {}", source.describe()))?;

    let state = AppState::new(catalog, config.engine.clone(), &config.server);
    server::serve(&config.server, state)
        .await
        .context("quote service stopped")?;

    Ok(())
}
