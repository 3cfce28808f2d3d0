use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use propcast::api::AppState;
use propcast::cache::Cache;
use propcast::config::PropcastConfig;
use propcast::properties::PropertyStore;
use propcast::weather::{OpenMeteoClient, WeatherEnricher};
use propcast::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = PropcastConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let cache = Cache::open(&config.cache.location).with_context(|| {
        format!("Failed to open cache database at {}", config.cache.location)
    })?;

    let client = OpenMeteoClient::new(config.weather.base_url.clone(), config.request_timeout())?;
    let enricher = WeatherEnricher::new(
        Arc::new(client),
        cache,
        config.cache_ttl(),
        config.weather.max_concurrent_fetches,
    );

    let store = PropertyStore::from_file(&config.properties.data_file)?;

    let state = Arc::new(AppState { store, enricher });
    web::run(config.server.port, state).await
}
