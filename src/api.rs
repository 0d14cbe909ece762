//! HTTP handlers
//!
//! Each handler returns either its JSON payload or an [`ExplorerError`]; the
//! error's status code comes from [`ExplorerError::status_code`].

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::config::ExplorerConfig;
use crate::models::{Coordinate, Directions, DirectionsRequest, RankedRoute, WeatherSnapshot};
use crate::pois::PoiFetcher;
use crate::ranking::rank_pois;
use crate::routing::DirectionsClient;
use crate::weather::WeatherFetcher;
use crate::{ExplorerError, Result};

/// Shared handler state; the two cache tiers live inside the fetchers
#[derive(Clone)]
pub struct AppState {
    pub pois: Arc<PoiFetcher>,
    pub weather: Arc<WeatherFetcher>,
    pub directions: Arc<DirectionsClient>,
    /// Used when a request carries no (or an unparseable) location
    pub region_center: Coordinate,
    pub static_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl AppState {
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        Ok(Self {
            pois: Arc::new(PoiFetcher::from_config(config)?),
            weather: Arc::new(WeatherFetcher::from_config(config)?),
            directions: Arc::new(DirectionsClient::new(&config.routing)?),
            region_center: config.region.center(),
            static_dir: PathBuf::from(&config.server.static_dir),
            templates_dir: PathBuf::from(&config.server.templates_dir),
        })
    }
}

/// `lat`/`lon`/`rating` query parameters, kept raw so bad numbers fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub rating: Option<String>,
}

impl LocationParams {
    fn coordinate(&self, fallback: Coordinate) -> Coordinate {
        Coordinate::new(
            parse_number(self.lat.as_deref()).unwrap_or(fallback.latitude),
            parse_number(self.lon.as_deref()).unwrap_or(fallback.longitude),
        )
    }

    /// Infinite thresholds are kept: `inf` matches nothing, `-inf` everything
    fn min_rating(&self) -> f64 {
        self.rating
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| !v.is_nan())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectionsParams {
    pub start_lat: Option<String>,
    pub start_lon: Option<String>,
    pub end_lat: Option<String>,
    pub end_lon: Option<String>,
}

impl From<&DirectionsParams> for DirectionsRequest {
    fn from(params: &DirectionsParams) -> Self {
        Self {
            start_lat: parse_number(params.start_lat.as_deref()),
            start_lon: parse_number(params.start_lon.as_deref()),
            end_lat: parse_number(params.end_lat.as_deref()),
            end_lon: parse_number(params.end_lon.as_deref()),
        }
    }
}

/// Finite number or nothing
fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/pois/{category}", get(get_pois))
        .route("/weather", get(get_weather))
        .route("/directions", get(get_directions))
}

async fn index(State(state): State<AppState>) -> Response {
    let path = state.templates_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("Failed to render {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load page").into_response()
        }
    }
}

async fn get_pois(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<LocationParams>,
) -> Json<Vec<RankedRoute>> {
    let user = params.coordinate(state.region_center);
    let pois = state.pois.fetch_pois(&category).await;
    Json(rank_pois(&user, &pois, params.min_rating()))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Result<Json<WeatherSnapshot>> {
    state
        .weather
        .fetch_weather(params.coordinate(state.region_center))
        .await
        .map(Json)
        .ok_or_else(|| ExplorerError::upstream("Weather information unavailable"))
}

async fn get_directions(
    State(state): State<AppState>,
    Query(params): Query<DirectionsParams>,
) -> Result<Json<Directions>> {
    let request = DirectionsRequest::from(&params);
    state.directions.get_directions(&request).await.map(Json)
}

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Resource not found"})),
    )
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal server error: {}", self);
        } else {
            warn!("Request failed with {}: {}", status, self);
        }
        (status, Json(json!({"error": self.user_message()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(Some("-15.5"), Some(-15.5))]
    #[case(Some(" 4.5 "), Some(4.5))]
    #[case(Some("abc"), None)]
    #[case(Some("NaN"), None)]
    #[case(Some("inf"), None)]
    #[case(None, None)]
    fn test_parse_number(#[case] raw: Option<&str>, #[case] expected: Option<f64>) {
        assert_eq!(parse_number(raw), expected);
    }

    #[test]
    fn test_location_params_fall_back_per_component() {
        let center = Coordinate::new(-15.8403, -70.0217);
        let params = LocationParams {
            lat: Some("-15.9".to_string()),
            lon: Some("west".to_string()),
            rating: None,
        };
        assert_eq!(params.coordinate(center), Coordinate::new(-15.9, -70.0217));
        assert_eq!(params.min_rating(), 0.0);
    }

    #[test]
    fn test_unparseable_direction_component_counts_as_missing() {
        let params = DirectionsParams {
            start_lat: Some("-15.84".to_string()),
            start_lon: Some("-70.02".to_string()),
            end_lat: Some("x".to_string()),
            end_lon: Some("-70.01".to_string()),
        };
        let request = DirectionsRequest::from(&params);
        assert!(request.end_lat.is_none());
        assert!(request.endpoints().is_err());
    }

    #[rstest]
    #[case(Some("4.5"), 4.5)]
    #[case(Some("inf"), f64::INFINITY)]
    #[case(Some("-inf"), f64::NEG_INFINITY)]
    #[case(Some("nan"), 0.0)]
    #[case(Some("high"), 0.0)]
    #[case(None, 0.0)]
    fn test_min_rating(#[case] raw: Option<&str>, #[case] expected: f64) {
        let params = LocationParams {
            rating: raw.map(str::to_string),
            ..LocationParams::default()
        };
        assert_eq!(params.min_rating(), expected);
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = ExplorerError::internal("secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }
}
