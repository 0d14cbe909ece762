use anyhow::Result;
use puno_explorer::{AppState, ExplorerConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = ExplorerConfig::load()?;
    telemetry::init(&config.logging, config.server.debug)?;

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env file loaded: {}", e),
    }
    tracing::info!(
        "Starting puno-explorer {} for region {}",
        puno_explorer::VERSION,
        config.region.name
    );

    let state = AppState::from_config(&config)?;
    web::run(&config.server, state).await
}
