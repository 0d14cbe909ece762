//! Coordinate value type

use serde::{Deserialize, Serialize};

use crate::{ExplorerError, Result};

/// Geographic coordinate in decimal degrees.
///
/// Serialized as a `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks. See [`Coordinate::validate`].
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check both components are finite and within the WGS84 ranges
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ExplorerError::validation(format!(
                "Latitude must be between -90 and 90, got: {}",
                self.latitude
            )));
        }

        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ExplorerError::validation(format!(
                "Longitude must be between -180 and 180, got: {}",
                self.longitude
            )));
        }

        Ok(())
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Cache key for this coordinate under the given namespace
    #[must_use]
    pub fn cache_key(&self, namespace: &str) -> String {
        let (lat, lon) = self.rounded(4);
        format!("{namespace}:{lat:.4}:{lon:.4}")
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.latitude, coordinate.longitude]
    }
}
