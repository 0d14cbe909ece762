//! Current conditions from OpenWeatherMap

use std::time::{Duration, Instant};

use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, error, instrument, warn};

use crate::cache::TtlCache;
use crate::config::{ExplorerConfig, WeatherConfig};
use crate::http::provider_client;
use crate::models::{Coordinate, WeatherSnapshot};
use crate::{ExplorerError, Result};

/// Current conditions from OpenWeatherMap, cached per rounded coordinate
pub struct WeatherFetcher {
    client: ClientWithMiddleware,
    endpoint: String,
    api_key: Option<String>,
    language: String,
    cache: TtlCache<WeatherSnapshot>,
}

impl WeatherFetcher {
    /// Create a fetcher around an existing cache tier.
    ///
    /// A missing API key is reported here, once; every later call returns `None`.
    pub fn new(config: &WeatherConfig, cache: TtlCache<WeatherSnapshot>) -> Result<Self> {
        if config.api_key.is_none() {
            error!("OpenWeatherMap API key not configured; weather will be unavailable");
        }

        Ok(Self {
            client: provider_client(config.timeout(), 0)?,
            endpoint: config.url.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            cache,
        })
    }

    /// Create a fetcher with its own weather cache tier sized from configuration
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        let cache = TtlCache::new(
            "weather",
            Duration::from_secs(config.cache.weather_ttl_seconds),
            config.cache.weather_capacity,
        );
        Self::new(&config.weather, cache)
    }

    /// Current weather at a coordinate, or `None` when unavailable
    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    pub async fn fetch_weather(&self, coordinate: Coordinate) -> Option<WeatherSnapshot> {
        let api_key = self.api_key.as_deref()?;

        let cache_key = coordinate.cache_key("weather");
        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!("Serving weather from cache");
            return Some(cached);
        }

        let start_time = Instant::now();
        match self.request(coordinate, api_key).await {
            Ok(snapshot) => {
                debug!(
                    "Retrieved current weather in {:.3}s",
                    start_time.elapsed().as_secs_f64()
                );
                self.cache.put(&cache_key, snapshot.clone()).await;
                Some(snapshot)
            }
            Err(e) => {
                error!("Failed to fetch weather data: {}", e);
                None
            }
        }
    }

    async fn request(&self, coordinate: Coordinate, api_key: &str) -> Result<WeatherSnapshot> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
                ("lang", self.language.clone()),
            ],
        )
        .map_err(|e| ExplorerError::config(format!("Invalid weather URL: {e}")))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.as_u16() == 401 {
            warn!("Weather API rejected the configured key (HTTP 401)");
        }
        let body: openweathermap::CurrentResponse = response.error_for_status()?.json().await?;
        body.into_snapshot()
    }
}

/// OpenWeatherMap current-weather response structures
mod openweathermap {
    use serde::Deserialize;

    use crate::models::WeatherSnapshot;
    use crate::{ExplorerError, Result};

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub weather: Vec<Condition>,
        pub main: MainData,
        pub wind: WindData,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindData {
        /// m/s with metric units
        pub speed: f64,
    }

    impl CurrentResponse {
        pub fn into_snapshot(self) -> Result<WeatherSnapshot> {
            let condition = self
                .weather
                .into_iter()
                .next()
                .ok_or_else(|| ExplorerError::upstream_data("Weather response has no conditions"))?;

            Ok(WeatherSnapshot {
                description: WeatherSnapshot::capitalize(&condition.description),
                temperature: self.main.temp.round() as i64,
                feels_like: self.main.feels_like.round() as i64,
                humidity: self.main.humidity,
                wind_speed: WeatherSnapshot::ms_to_kmh(self.wind.speed),
                icon: condition.icon,
            })
        }
    }
}
