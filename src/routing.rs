//! Driving directions from an OSRM routing server

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::config::RoutingConfig;
use crate::http::provider_client;
use crate::models::{Coordinate, Directions, DirectionsRequest, round_to};
use crate::{ExplorerError, Result};

/// Driving directions from an OSRM server
pub struct DirectionsClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl DirectionsClient {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        Ok(Self {
            client: provider_client(config.timeout(), 0)?,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Route between the two endpoints of `request`.
    ///
    /// Missing components fail with a validation error before any network call.
    #[instrument(skip(self))]
    pub async fn get_directions(&self, request: &DirectionsRequest) -> Result<Directions> {
        let (start, end) = request.endpoints()?;

        let response = self.get_route_call(&start, &end).await.map_err(|e| {
            error!("Failed to fetch directions: {}", e);
            e
        })?;

        if response.code != "Ok" {
            debug!("Routing provider answered with code {}", response.code);
            return Err(ExplorerError::not_found("No route found"));
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ExplorerError::not_found("No route found"))?;

        Ok(Directions {
            route: route.geometry.coordinates,
            distance_km: round_to(route.distance / 1000.0, 2),
            duration_min: (route.duration / 60.0).round() as i64,
        })
    }

    async fn get_route_call(&self, start: &Coordinate, end: &Coordinate) -> Result<ApiResponse> {
        debug!("Calling the routing API");
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url, start.longitude, start.latitude, end.longitude, end.latitude
        );
        let response = self.client.get(url).send().await?;
        let status = response.status();

        // OSRM reports "NoRoute" and friends with a 4xx status and a JSON body
        match response.json::<ApiResponse>().await {
            Ok(body) if status.is_success() || body.code != "Ok" => Ok(body),
            Ok(_) => Err(ExplorerError::upstream(format!(
                "Routing API request failed with status: {status}"
            ))),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(ExplorerError::upstream(format!(
                "Routing API request failed with status: {status}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    geometry: Geometry,
    /// meters
    distance: f64,
    /// seconds
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: String,
    #[serde(default)]
    routes: Vec<RouteResponse>,
}
