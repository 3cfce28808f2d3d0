//! Property store and listing filters
//!
//! The store is deliberately simple plumbing around the enrichment
//! engine: a flat JSON listing file loaded at startup, searched and
//! paged in memory.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{EnrichedProperty, Property};

/// Listing page size.
pub const PAGE_SIZE: usize = 20;

/// In-memory property listing loaded from a JSON file at startup.
pub struct PropertyStore {
    properties: Vec<Property>,
}

impl PropertyStore {
    /// Load the listing data file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read property data file: {}", path.display()))?;
        let properties: Vec<Property> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse property data file: {}", path.display()))?;
        info!("Loaded {} properties from {}", properties.len(), path.display());
        Ok(Self::from_properties(properties))
    }

    /// Build a store from an already materialized list. Newest listings
    /// are served first.
    #[must_use]
    pub fn from_properties(mut properties: Vec<Property>) -> Self {
        properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { properties }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// One page of listings matching an optional search text, in
    /// newest-first order. `page` is 1-based.
    #[must_use]
    pub fn page(&self, page: usize, search_text: Option<&str>) -> Vec<Property> {
        let page = page.max(1);
        let query = search_text
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.properties
            .iter()
            .filter(|property| match &query {
                Some(q) => matches_search(property, q),
                None => true,
            })
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .cloned()
            .collect()
    }
}

/// Case-insensitive substring match over name, city and state.
fn matches_search(property: &Property, query: &str) -> bool {
    [
        Some(property.name.as_str()),
        property.city.as_deref(),
        property.state.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(query))
}

/// Weather criteria applied to an enriched listing page.
#[derive(Debug, Clone, Default)]
pub struct WeatherFilter {
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_min: Option<f64>,
    pub humidity_max: Option<f64>,
    pub weather_codes: Vec<i32>,
}

impl WeatherFilter {
    /// Whether an enriched property satisfies the filter.
    ///
    /// Unknown values pass the numeric range checks: a range only
    /// constrains readings the provider actually delivered. An unknown
    /// weather code fails a non-empty code set, since the caller asked
    /// for specific conditions.
    #[must_use]
    pub fn matches(&self, enriched: &EnrichedProperty) -> bool {
        let weather = &enriched.weather;

        if let Some(temperature) = weather.temperature {
            if self.temp_min.is_some_and(|min| temperature < min) {
                return false;
            }
            if self.temp_max.is_some_and(|max| temperature > max) {
                return false;
            }
        }

        if let Some(humidity) = weather.humidity {
            if self.humidity_min.is_some_and(|min| humidity < min) {
                return false;
            }
            if self.humidity_max.is_some_and(|max| humidity > max) {
                return false;
            }
        }

        if !self.weather_codes.is_empty() {
            match weather.weather_code {
                Some(code) if self.weather_codes.contains(&code) => {}
                _ => return false,
            }
        }

        true
    }

    /// Apply the filter to a whole enriched page.
    #[must_use]
    pub fn apply(&self, enriched: Vec<EnrichedProperty>) -> Vec<EnrichedProperty> {
        enriched.into_iter().filter(|e| self.matches(e)).collect()
    }
}
