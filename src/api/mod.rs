//! HTTP API for the property listing

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CurrentWeather, EnrichedProperty, Property};
use crate::properties::{PropertyStore, WeatherFilter};
use crate::weather::WeatherEnricher;

/// Shared state for API handlers.
pub struct AppState {
    pub store: PropertyStore,
    pub enricher: WeatherEnricher,
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// 1-based page number
    pub page: Option<usize>,
    /// Case-insensitive search over name, city and state
    pub search_text: Option<String>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_min: Option<f64>,
    pub humidity_max: Option<f64>,
    /// Comma-separated WMO weather codes
    pub weather_codes: Option<String>,
}

impl ListingQuery {
    fn weather_filter(&self) -> WeatherFilter {
        WeatherFilter {
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            humidity_min: self.humidity_min,
            humidity_max: self.humidity_max,
            weather_codes: parse_weather_codes(self.weather_codes.as_deref()),
        }
    }
}

/// Lenient code-list parsing: entries that are not integers are ignored.
fn parse_weather_codes(raw: Option<&str>) -> Vec<i32> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

/// One listing in the response: the property, its observation and a
/// derived description when the weather code is known.
#[derive(Debug, Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub weather: CurrentWeather,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_description: Option<&'static str>,
}

impl From<EnrichedProperty> for PropertyView {
    fn from(enriched: EnrichedProperty) -> Self {
        let weather_description = enriched.weather.description();
        Self {
            property: enriched.property,
            weather: enriched.weather,
            weather_description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub page: usize,
    pub count: usize,
    pub results: Vec<PropertyView>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/properties", get(get_properties))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn get_properties(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Json<ListingResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let properties = state.store.page(page, query.search_text.as_deref());
    debug!("Page {} matched {} properties", page, properties.len());

    if properties.is_empty() {
        return Json(ListingResponse {
            page,
            count: 0,
            results: Vec::new(),
        });
    }

    let enriched = state.enricher.enrich(&properties).await;
    let filtered = query.weather_filter().apply(enriched);

    let results: Vec<PropertyView> = filtered.into_iter().map(Into::into).collect();
    Json(ListingResponse {
        page,
        count: results.len(),
        results,
    })
}
