//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, LatLng, Place, RouteQuery};
use crate::maps::Steps;

/// Request for current route information.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteRequest {
    /// Origin address (ignored when `origin_coords` is given)
    pub origin: Option<String>,

    /// Destination address (ignored when `destination_coords` is given)
    pub destination: Option<String>,

    /// Origin coordinates
    pub origin_coords: Option<LatLng>,

    /// Destination coordinates
    pub destination_coords: Option<LatLng>,
}

impl RouteRequest {
    /// Resolve both ends into a route query.
    pub fn route_query(&self) -> Result<RouteQuery, DomainError> {
        let origin = Place::resolve(self.origin.as_deref(), self.origin_coords)?;
        let destination = Place::resolve(self.destination.as_deref(), self.destination_coords)?;
        Ok(RouteQuery::new(origin, destination))
    }
}

/// Request for a departure recommendation.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub route: RouteRequest,

    /// Target arrival, local time "YYYY-MM-DDTHH:MM"
    pub arrival_time: String,

    /// IANA zone for `arrival_time` (defaults to server setting)
    pub time_zone: Option<String>,

    /// How far back to search (hours)
    pub max_search_hours: Option<u32>,

    /// Spacing between candidate departures (minutes)
    pub step_minutes: Option<u32>,

    /// Safety margin before the deadline (minutes)
    pub buffer_minutes: Option<u32>,
}

/// Current route information.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Origin as given by the caller
    pub origin: Option<String>,

    /// Destination as given by the caller
    pub destination: Option<String>,

    /// Display distance
    pub distance: String,

    /// Display duration without traffic
    pub duration: String,

    /// Display duration with traffic
    pub duration_in_traffic: String,

    /// Always "Now (real-time estimate)"
    pub suggested_departure: String,

    /// Route label
    pub summary: String,

    /// Turn-by-turn instructions (HTML fragments)
    pub steps: Steps,
}

/// Departure recommendation.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance: String,
    pub duration: String,
    pub duration_in_traffic: String,

    /// Recommended departure in the request's zone (RFC 3339)
    pub recommended_departure_iso: String,

    /// Recommended departure as Unix epoch seconds
    pub recommended_departure_epoch: i64,

    /// Predicted arrival in the request's zone (RFC 3339)
    pub estimated_arrival_iso: String,

    /// Number of candidate departures queried
    pub candidates_evaluated: usize,

    pub summary: String,
    pub steps: Steps,
}

/// Liveness response for `/`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
