//! Coordinate model, normalization and deduplication

use serde::{Deserialize, Serialize};

use crate::models::Property;

/// Fractional digits kept when normalizing coordinates for cache and
/// dedup keys. Six digits is roughly 10cm of position, well below the
/// forecast grid resolution, so float noise never fans out into
/// distinct keys.
pub const KEY_PRECISION: usize = 6;

/// A (latitude, longitude) pair identifying a point for weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Extract the coordinate of a property, if it carries a usable one.
    /// Missing or non-finite components count as absent.
    #[must_use]
    pub fn from_property(property: &Property) -> Option<Self> {
        match (property.lat, property.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Self::new(lat, lng))
            }
            _ => None,
        }
    }

    /// Latitude rendered at fixed precision for keys and query strings.
    #[must_use]
    pub fn lat_key(&self) -> String {
        format!("{:.*}", KEY_PRECISION, self.latitude)
    }

    /// Longitude rendered at fixed precision for keys and query strings.
    #[must_use]
    pub fn lng_key(&self) -> String {
        format!("{:.*}", KEY_PRECISION, self.longitude)
    }

    /// Normalized dedup key. Deterministic and total for every finite
    /// coordinate pair.
    #[must_use]
    pub fn normalized_key(&self) -> String {
        format!("{}:{}", self.lat_key(), self.lng_key())
    }

    /// Cache key for a single-coordinate weather entry.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("weather:{}", self.normalized_key())
    }
}

/// Reduce a property list to the distinct coordinates that need a cache
/// or network lookup, keyed by normalized key, preserving first-seen
/// order. Properties without a usable coordinate are simply skipped;
/// they get the unknown observation at merge time.
#[must_use]
pub fn dedup_coordinates(properties: &[Property]) -> Vec<(String, Coordinate)> {
    let mut seen = std::collections::HashSet::new();
    let mut distinct = Vec::new();
    for property in properties {
        if let Some(coord) = Coordinate::from_property(property) {
            let key = coord.normalized_key();
            if seen.insert(key.clone()) {
                distinct.push((key, coord));
            }
        }
    }
    distinct
}
