//! `PunoExplorer` - points of interest, weather and directions for Puno
//!
//! This library fetches categorized points of interest from OpenStreetMap,
//! current weather from OpenWeatherMap and driving routes from OSRM, caches
//! provider answers in bounded TTL tiers, and serves ranked results over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod models;
pub mod pois;
pub mod ranking;
pub mod routing;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::TtlCache;
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use models::{
    Category, Coordinate, Directions, DirectionsRequest, PointOfInterest, RankedRoute,
    WeatherSnapshot,
};
pub use pois::PoiFetcher;
pub use routing::DirectionsClient;
pub use weather::WeatherFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ExplorerError>;
