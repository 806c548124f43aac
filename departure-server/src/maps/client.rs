//! Maps HTTP client.
//!
//! Provides async methods for querying the Distance Matrix and Directions
//! APIs. Handles authentication, concurrency limiting, and conversion to
//! domain types.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{DepartureTime, RouteQuery, TravelEstimate};

use super::convert::{RouteSummary, estimate_from_element, single_element, summarize_directions};
use super::error::MapsError;
use super::types::{DirectionsResponse, DistanceMatrixResponse, MatrixElement};

/// Default base URL for the maps web services.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Traffic model sent with every request.
const TRAFFIC_MODEL: &str = "best_guess";

/// Configuration for the maps client.
#[derive(Clone)]
pub struct MapsConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_concurrent", &self.max_concurrent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Maps API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MapsClient {
    /// Create a new maps client with the given configuration.
    ///
    /// Fails with [`MapsError::NotConfigured`] when the API key is blank.
    pub fn new(config: MapsConfig) -> Result<Self, MapsError> {
        let api_key = config.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(MapsError::NotConfigured(
                "maps API key is not set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the raw distance matrix for one origin and one destination.
    pub async fn distance_matrix(
        &self,
        route: &RouteQuery,
        departure: DepartureTime,
    ) -> Result<DistanceMatrixResponse, MapsError> {
        let query = [
            ("origins", route.origin.to_query_value()),
            ("destinations", route.destination.to_query_value()),
            ("departure_time", departure.to_query_value()),
            ("traffic_model", TRAFFIC_MODEL.to_string()),
        ];

        self.get_json("distancematrix/json", &query).await
    }

    /// Fetch the matrix element for a route, checking both status levels.
    pub async fn matrix_element(
        &self,
        route: &RouteQuery,
        departure: DepartureTime,
    ) -> Result<MatrixElement, MapsError> {
        let response = self.distance_matrix(route, departure).await?;
        single_element(response)
    }

    /// Estimate travel time for a route leaving at `departure`.
    ///
    /// Uses the traffic-adjusted duration when the service provides one.
    pub async fn estimate(
        &self,
        route: &RouteQuery,
        departure: DepartureTime,
    ) -> Result<TravelEstimate, MapsError> {
        let element = self.matrix_element(route, departure).await?;
        let estimate = estimate_from_element(&element)?;

        debug!(
            origin = %route.origin,
            destination = %route.destination,
            departure = %departure,
            duration_secs = estimate.duration_secs,
            traffic_adjusted = estimate.traffic_adjusted,
            "Travel time estimated"
        );

        Ok(estimate)
    }

    /// Fetch the raw directions response.
    pub async fn directions(
        &self,
        route: &RouteQuery,
        departure: Option<DepartureTime>,
    ) -> Result<DirectionsResponse, MapsError> {
        let mut query = vec![
            ("origin", route.origin.to_query_value()),
            ("destination", route.destination.to_query_value()),
            ("traffic_model", TRAFFIC_MODEL.to_string()),
        ];
        if let Some(departure) = departure {
            query.push(("departure_time", departure.to_query_value()));
        }

        self.get_json("directions/json", &query).await
    }

    /// Fetch a display-ready summary of the route.
    ///
    /// Missing or malformed turn-by-turn steps do not fail the call; see
    /// [`super::Steps`].
    pub async fn summarize(
        &self,
        route: &RouteQuery,
        departure: Option<DepartureTime>,
    ) -> Result<RouteSummary, MapsError> {
        let response = self.directions(route, departure).await?;
        summarize_directions(response)
    }

    /// GET `{base_url}/{endpoint}` with the API key appended and decode JSON.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, MapsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MapsError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| MapsError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
