//! Current weather observation model

use serde::{Deserialize, Serialize};

/// A current-weather observation for one coordinate.
///
/// Every field is independently optional: `None` means the provider did
/// not report the value, which is distinct from a zero reading. The
/// all-`None` value is the canonical unknown observation, returned
/// whenever a fetch fails or a property has no usable coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Air temperature at 2m in Celsius
    pub temperature: Option<f64>,
    /// Relative humidity at 2m in percent
    pub humidity: Option<f64>,
    /// WMO weather interpretation code
    pub weather_code: Option<i32>,
}

impl CurrentWeather {
    /// The canonical unknown observation.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            temperature: None,
            humidity: None,
            weather_code: None,
        }
    }

    /// Whether every field is unavailable.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.weather_code.is_none()
    }

    /// Human-readable description of the weather code, when present.
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        self.weather_code.map(weather_code_to_description)
    }
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
