//! Weather enrichment: provider client, dispatch strategy and merge

use async_trait::async_trait;

use crate::models::{Coordinate, CurrentWeather};

pub mod enrich;
pub mod open_meteo;

pub use enrich::WeatherEnricher;
pub use open_meteo::OpenMeteoClient;

/// A source of current-weather observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the observation for one coordinate.
    ///
    /// Never fails: transport errors, timeouts, non-2xx responses and
    /// malformed payloads all resolve to the canonical unknown
    /// observation, so a broken provider degrades the quality of the
    /// result rather than its availability.
    async fn fetch_one(&self, coord: &Coordinate) -> CurrentWeather;

    /// Fetch observations for several coordinates in one request,
    /// positionally aligned with `coords`. Errors surface here so the
    /// dispatcher can fall back to per-coordinate fetches.
    async fn fetch_batch(&self, coords: &[Coordinate]) -> anyhow::Result<Vec<CurrentWeather>>;
}
