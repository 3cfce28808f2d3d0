//! Property listing models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CurrentWeather;

/// A property as stored in the listing data file.
///
/// Coordinates are optional: a listing without a usable position is
/// served normally, just without weather data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Latitude in decimal degrees
    pub lat: Option<f64>,
    /// Longitude in decimal degrees
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A property joined with the current weather at its location.
///
/// Produced by the merge stage for one request; has no lifecycle of
/// its own beyond the response it is serialized into.
#[derive(Debug, Clone)]
pub struct EnrichedProperty {
    pub property: Property,
    pub weather: CurrentWeather,
}
