use anyhow::Context;
use database::Database;
use http_api::AppState;
use postfeed_core::AppConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = AppConfig::resolve_path();
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        "Starting {} with config {}",
        config.app_name,
        config_path.display()
    );

    let db = Database::connect(&config.database)
        .await
        .context("failed to open database")?;
    let state = AppState::new(Arc::new(db.clone()), &config).context("invalid feed settings")?;

    http_api::serve(&config.server, Arc::new(state))
        .await
        .context("server error")?;

    db.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
