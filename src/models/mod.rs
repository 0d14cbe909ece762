//! Data models for the explorer service
//!
//! This module contains the core domain models organized by concern:
//! - Location: the coordinate value type
//! - POI: categories, points of interest and ranked routes
//! - Weather: current conditions snapshot
//! - Directions: routing request and reshaped answer

pub mod directions;
pub mod location;
pub mod poi;
pub mod weather;

// Re-export all public types for convenient access
pub use directions::{Directions, DirectionsRequest};
pub use location::Coordinate;
pub use poi::{Category, PointOfInterest, RankedRoute, UnknownCategory};
pub use weather::WeatherSnapshot;

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let multiplier = 10_f64.powi(places);
    (value * multiplier).round() / multiplier
}
