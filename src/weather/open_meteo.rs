//! Open-Meteo forecast API client

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::models::{Coordinate, CurrentWeather};
use crate::weather::WeatherProvider;

/// Variables requested from the forecast endpoint.
const CURRENT_VARIABLES: &str = "temperature_2m,relative_humidity_2m,weather_code";

/// Client for the Open-Meteo current-weather API (no API key required).
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Build a client with a per-request timeout so one hanging
    /// coordinate cannot stall an entire enrichment call.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn forecast_url(&self, latitudes: &str, longitudes: &str) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&current={}",
            self.base_url.trim_end_matches('/'),
            latitudes,
            longitudes,
            CURRENT_VARIABLES
        )
    }

    /// One request for one or more coordinates. The observation order
    /// matches the request order, which callers rely on when they read
    /// results back by index.
    async fn request_current(&self, coords: &[Coordinate]) -> Result<Vec<CurrentWeather>> {
        let latitudes = coords
            .iter()
            .map(Coordinate::lat_key)
            .collect::<Vec<_>>()
            .join(",");
        let longitudes = coords
            .iter()
            .map(Coordinate::lng_key)
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .http
            .get(self.forecast_url(&latitudes, &longitudes))
            .send()
            .await
            .context("Forecast request failed")?
            .error_for_status()
            .context("Forecast request returned an error status")?;

        let body: openmeteo::ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo forecast response")?;

        let observations = body.into_observations();
        if observations.len() != coords.len() {
            bail!(
                "OpenMeteo returned {} observations for {} coordinates",
                observations.len(),
                coords.len()
            );
        }
        Ok(observations)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_one(&self, coord: &Coordinate) -> CurrentWeather {
        match self.request_current(std::slice::from_ref(coord)).await {
            Ok(mut observations) => observations.pop().unwrap_or_else(CurrentWeather::unknown),
            Err(e) => {
                warn!(
                    "Weather fetch failed for {}: {:#}",
                    coord.normalized_key(),
                    e
                );
                CurrentWeather::unknown()
            }
        }
    }

    async fn fetch_batch(&self, coords: &[Coordinate]) -> Result<Vec<CurrentWeather>> {
        self.request_current(coords).await
    }
}

/// `OpenMeteo` API response structures and conversion utilities
mod openmeteo {
    use serde::Deserialize;

    use crate::models::CurrentWeather;

    /// Current weather response from the `OpenMeteo` forecast endpoint
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentSection>,
    }

    /// The provider answers a single-coordinate query with one object
    /// and a multi-coordinate query with a positionally aligned array.
    /// The shape is resolved here, once; downstream code only ever sees
    /// an ordered list.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum CurrentSection {
        Single(CurrentData),
        Batch(Vec<CurrentData>),
    }

    /// Current weather data from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: Option<f64>,
        #[serde(rename = "relative_humidity_2m")]
        pub humidity: Option<f64>,
        pub weather_code: Option<i32>,
    }

    impl From<CurrentData> for CurrentWeather {
        fn from(data: CurrentData) -> Self {
            CurrentWeather {
                temperature: data.temperature,
                humidity: data.humidity,
                weather_code: data.weather_code,
            }
        }
    }

    impl ForecastResponse {
        /// Flatten both response shapes into an ordered observation list.
        #[must_use]
        pub fn into_observations(self) -> Vec<CurrentWeather> {
            match self.current {
                Some(CurrentSection::Single(data)) => vec![data.into()],
                Some(CurrentSection::Batch(items)) => {
                    items.into_iter().map(Into::into).collect()
                }
                None => Vec::new(),
            }
        }
    }
}
