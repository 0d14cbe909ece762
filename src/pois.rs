//! Points of interest from the Overpass API
//!
//! Raw OpenStreetMap elements are normalized into [`PointOfInterest`] values:
//! nodes keep their coordinate, ways are placed at the mean of their member
//! nodes, unnamed elements are dropped and every POI gets a synthetic rating.
//! Results are kept per category in the long-lived POI cache tier.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::RngExt;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::TtlCache;
use crate::config::{ExplorerConfig, OverpassConfig};
use crate::http::provider_client;
use crate::models::poi::UNKNOWN_ADDRESS;
use crate::models::{Category, Coordinate, PointOfInterest, round_to};
use crate::{ExplorerError, Result};

/// Shared, immutable POI list as stored in the cache
pub type PoiList = Arc<Vec<PointOfInterest>>;

pub const MIN_RATING: f64 = 3.5;
pub const MAX_RATING: f64 = 5.0;

/// Fetches and caches POIs for the configured region
pub struct PoiFetcher {
    client: ClientWithMiddleware,
    endpoint: String,
    area_name: String,
    // bound on the whole attempt chain, retries included
    deadline: Duration,
    cache: TtlCache<PoiList>,
}

impl PoiFetcher {
    /// Create a fetcher around an existing cache tier
    pub fn new(config: &OverpassConfig, area_name: &str, cache: TtlCache<PoiList>) -> Result<Self> {
        Ok(Self {
            client: provider_client(config.timeout(), config.max_retries)?,
            endpoint: config.url.clone(),
            area_name: area_name.to_string(),
            deadline: config.timeout(),
            cache,
        })
    }

    /// Create a fetcher with its own POI cache tier sized from configuration
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        let cache = TtlCache::new(
            "pois",
            Duration::from_secs(config.cache.poi_ttl_seconds),
            config.cache.poi_capacity,
        );
        Self::new(&config.overpass, &config.region.name, cache)
    }

    /// POIs for a category name.
    ///
    /// Unknown categories and provider failures both yield an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_pois(&self, category: &str) -> PoiList {
        match category.parse::<Category>() {
            Ok(category) => self.fetch_category(category).await,
            Err(_) => {
                warn!("Invalid category requested: {}", category);
                PoiList::default()
            }
        }
    }

    /// POIs for a known category, served from cache while fresh
    pub async fn fetch_category(&self, category: Category) -> PoiList {
        let cache_key = format!("pois_{category}");
        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!("Serving {} POIs for {} from cache", cached.len(), category);
            return cached;
        }

        let start_time = Instant::now();
        let result = tokio::time::timeout(self.deadline, self.query_elements(category))
            .await
            .unwrap_or_else(|_| {
                Err(ExplorerError::upstream(format!(
                    "Overpass API did not answer within {}s",
                    self.deadline.as_secs()
                )))
            });
        match result {
            Ok(elements) => {
                let total = elements.len();
                let pois = Arc::new(normalize_elements(elements, category));
                info!(
                    "Fetched {} {} POIs from {} elements in {:.3}s",
                    pois.len(),
                    category,
                    total,
                    start_time.elapsed().as_secs_f64()
                );
                self.cache.put(&cache_key, Arc::clone(&pois)).await;
                pois
            }
            Err(e) => {
                error!("Failed to fetch POIs from Overpass API: {}", e);
                PoiList::default()
            }
        }
    }

    async fn query_elements(&self, category: Category) -> Result<Vec<Value>> {
        let query = build_query(category, &self.area_name);
        let url = Url::parse_with_params(&self.endpoint, &[("data", query.as_str())])
            .map_err(|e| ExplorerError::config(format!("Invalid Overpass URL: {e}")))?;

        debug!("Querying Overpass for {}", category);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body: overpass::Response = response.json().await?;
        Ok(body.elements)
    }
}

/// Overpass QL query selecting nodes and ways of a category inside the named area
#[must_use]
pub fn build_query(category: Category, area_name: &str) -> String {
    let area = area_name.replace('"', "\\\"");
    let mut query = format!("[out:json][timeout:25];\narea[\"name\"=\"{area}\"]->.searchArea;\n(\n");
    for (key, value) in category.tag_selectors() {
        for kind in ["node", "way"] {
            let _ = writeln!(query, "  {kind}[\"{key}\"=\"{value}\"](area.searchArea);");
        }
    }
    query.push_str(");\nout body;\n>;\nout skel qt;\n");
    query
}

/// Turn raw Overpass elements into POIs.
///
/// Malformed elements are skipped individually; duplicates (same kind and id)
/// are kept once.
#[must_use]
pub fn normalize_elements(elements: Vec<Value>, category: Category) -> Vec<PointOfInterest> {
    let parsed: Vec<overpass::Element> = elements
        .into_iter()
        .filter_map(|raw| match serde_json::from_value(raw) {
            Ok(element) => Some(element),
            Err(e) => {
                warn!("Skipping malformed Overpass element: {}", e);
                None
            }
        })
        .collect();

    let node_index: HashMap<i64, Coordinate> = parsed
        .iter()
        .filter_map(|element| match element {
            overpass::Element::Node { id, lat, lon, .. } => Some((*id, Coordinate::new(*lat, *lon))),
            _ => None,
        })
        .collect();

    let mut seen = HashSet::new();
    let mut pois = Vec::new();
    for element in &parsed {
        let Some(identity) = element.identity() else {
            continue;
        };
        if !seen.insert(identity) {
            continue;
        }

        match element_to_poi(element, &node_index, category) {
            Ok(Some(poi)) => pois.push(poi),
            Ok(None) => {}
            Err(e) => warn!("Skipping {:?} element {}: {}", identity.0, identity.1, e),
        }
    }
    pois
}

fn element_to_poi(
    element: &overpass::Element,
    node_index: &HashMap<i64, Coordinate>,
    category: Category,
) -> Result<Option<PointOfInterest>> {
    let (coordinate, tags) = match element {
        overpass::Element::Node { lat, lon, tags, .. } => (Coordinate::new(*lat, *lon), tags),
        overpass::Element::Way { id, nodes, tags } => match way_centroid(nodes, node_index) {
            Some(coordinate) => (coordinate, tags),
            None => {
                debug!("Way {} has no resolvable nodes", id);
                return Ok(None);
            }
        },
        overpass::Element::Other => return Ok(None),
    };

    let Some(name) = tag(tags, "name") else {
        return Ok(None);
    };
    coordinate.validate()?;

    Ok(Some(PointOfInterest {
        name: name.to_string(),
        coordinate,
        address: address(tags),
        category,
        rating: synthetic_rating(),
        description: tag(tags, "description").unwrap_or_default().to_string(),
        phone: tag(tags, "phone").unwrap_or_default().to_string(),
        website: tag(tags, "website").unwrap_or_default().to_string(),
        opening_hours: tag(tags, "opening_hours").unwrap_or_default().to_string(),
    }))
}

/// Mean of the member node coordinates that appear in the same response
fn way_centroid(nodes: &[i64], node_index: &HashMap<i64, Coordinate>) -> Option<Coordinate> {
    let resolved: Vec<&Coordinate> = nodes.iter().filter_map(|id| node_index.get(id)).collect();
    if resolved.is_empty() {
        return None;
    }

    let count = resolved.len() as f64;
    let latitude = resolved.iter().map(|c| c.latitude).sum::<f64>() / count;
    let longitude = resolved.iter().map(|c| c.longitude).sum::<f64>() / count;
    Some(Coordinate::new(latitude, longitude))
}

fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn address(tags: &HashMap<String, String>) -> String {
    match (tag(tags, "addr:street"), tag(tags, "addr:housenumber")) {
        (Some(street), Some(number)) => format!("{street} {number}"),
        (Some(street), None) => street.to_string(),
        _ => UNKNOWN_ADDRESS.to_string(),
    }
}

/// Placeholder rating in `[3.5, 5.0]`, one decimal
fn synthetic_rating() -> f64 {
    let rating: f64 = rand::rng().random_range(MIN_RATING..=MAX_RATING);
    round_to(rating, 1).clamp(MIN_RATING, MAX_RATING)
}

/// Overpass API response structures
mod overpass {
    use std::collections::HashMap;

    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    pub struct Response {
        #[serde(default)]
        pub elements: Vec<Value>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Kind {
        Node,
        Way,
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    pub enum Element {
        Node {
            id: i64,
            lat: f64,
            lon: f64,
            #[serde(default)]
            tags: HashMap<String, String>,
        },
        Way {
            id: i64,
            #[serde(default)]
            nodes: Vec<i64>,
            #[serde(default)]
            tags: HashMap<String, String>,
        },
        #[serde(other)]
        Other,
    }

    impl Element {
        pub fn identity(&self) -> Option<(Kind, i64)> {
            match self {
                Element::Node { id, .. } => Some((Kind::Node, *id)),
                Element::Way { id, .. } => Some((Kind::Way, *id)),
                Element::Other => None,
            }
        }
    }
}
