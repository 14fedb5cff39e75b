use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use reel_night::api::{create_router, AppState};
use reel_night::config::Config;
use reel_night::store::{InMemoryStore, SeedDocument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = match &config.seed_file {
        Some(path) => InMemoryStore::from_seed(SeedDocument::from_file(path)?),
        None => InMemoryStore::new(),
    };

    let state = AppState::with_store(Arc::new(store), config.reel_settings());
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
