//! Point-to-point driving directions

use serde::Serialize;

use super::Coordinate;
use crate::{ExplorerError, Result};

/// Raw directions request; every component is optional until validated
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionsRequest {
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,
}

impl DirectionsRequest {
    /// Both endpoints, or a validation error when any component is missing
    pub fn endpoints(&self) -> Result<(Coordinate, Coordinate)> {
        match (self.start_lat, self.start_lon, self.end_lat, self.end_lon) {
            (Some(start_lat), Some(start_lon), Some(end_lat), Some(end_lon)) => Ok((
                Coordinate::new(start_lat, start_lon),
                Coordinate::new(end_lat, end_lon),
            )),
            _ => Err(ExplorerError::validation("Missing location parameters")),
        }
    }
}

/// Reshaped routing provider answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directions {
    /// Route geometry as GeoJSON `[lon, lat]` pairs, as the provider sent them
    pub route: Vec<[f64; 2]>,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    #[serde(rename = "duration")]
    pub duration_min: i64,
}
