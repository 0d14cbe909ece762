//! Current weather snapshot

use serde::{Deserialize, Serialize};

/// Current conditions at a coordinate, already converted to display units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Localized, capitalized description (e.g. "Cielo claro")
    pub description: String,
    /// Temperature in Celsius
    pub temperature: i64,
    /// Apparent temperature in Celsius
    pub feels_like: i64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in km/h, one decimal
    pub wind_speed: f64,
    /// Provider icon code (e.g. "01d")
    pub icon: String,
}

impl WeatherSnapshot {
    /// Convert wind speed from m/s to km/h, one decimal
    #[must_use]
    pub fn ms_to_kmh(speed_ms: f64) -> f64 {
        super::round_to(speed_ms * 3.6, 1)
    }

    /// Upper-case the first character, leaving the rest untouched
    #[must_use]
    pub fn capitalize(text: &str) -> String {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
