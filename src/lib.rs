//! Propcast - property listings enriched with live weather
//!
//! This library provides the core functionality for coordinate
//! deduplication, cached weather lookup against the Open-Meteo API,
//! and the listing API that serves enriched, filterable property pages.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod properties;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::Cache;
pub use config::PropcastConfig;
pub use error::PropcastError;
pub use models::{Coordinate, CurrentWeather, EnrichedProperty, Property};
pub use properties::{PropertyStore, WeatherFilter};
pub use weather::{OpenMeteoClient, WeatherEnricher, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PropcastError>;
