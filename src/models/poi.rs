//! Points of interest and their ranked form

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Placeholder used when a POI has no street address
pub const UNKNOWN_ADDRESS: &str = "No address";

/// Closed set of POI categories the service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hotel,
    Restaurant,
    Attraction,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Hotel, Category::Restaurant, Category::Attraction];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hotel => "hotel",
            Category::Restaurant => "restaurant",
            Category::Attraction => "attraction",
        }
    }

    /// OpenStreetMap `(key, value)` tags selecting this category
    #[must_use]
    pub fn tag_selectors(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Hotel => &[("tourism", "hotel"), ("amenity", "hotel")],
            Category::Restaurant => &[("amenity", "restaurant")],
            Category::Attraction => &[
                ("tourism", "attraction"),
                ("tourism", "museum"),
                ("tourism", "viewpoint"),
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for category names outside the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A named place built from a map-data element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    #[serde(rename = "location")]
    pub coordinate: Coordinate,
    pub address: String,
    #[serde(rename = "type")]
    pub category: Category,
    /// Synthetic rating in `[3.5, 5.0]`; the map provider has no ratings
    pub rating: f64,
    pub description: String,
    pub phone: String,
    pub website: String,
    pub opening_hours: String,
}

/// A POI together with its distance from the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRoute {
    pub poi: PointOfInterest,
    /// Great-circle distance in km, rounded to 2 decimals
    #[serde(rename = "distance")]
    pub distance_km: f64,
}
