//! Travel-time estimates and maps-service status codes.

use std::fmt;

use serde::Deserialize;

/// Status code reported by the maps service, either for the whole response
/// or for a single origin/destination element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OracleStatus {
    Ok,
    /// Origin or destination could not be geocoded.
    NotFound,
    /// No route between origin and destination.
    ZeroResults,
    OverQueryLimit,
    OverDailyLimit,
    RequestDenied,
    InvalidRequest,
    MaxElementsExceeded,
    MaxRouteLengthExceeded,
    MaxWaypointsExceeded,
    UnknownError,
    #[serde(other)]
    Unrecognized,
}

impl OracleStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, OracleStatus::Ok)
    }

    /// The service answered but found no usable route.
    pub fn is_no_route(&self) -> bool {
        matches!(self, OracleStatus::NotFound | OracleStatus::ZeroResults)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            OracleStatus::OverQueryLimit | OracleStatus::OverDailyLimit
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OracleStatus::Ok => "OK",
            OracleStatus::NotFound => "NOT_FOUND",
            OracleStatus::ZeroResults => "ZERO_RESULTS",
            OracleStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            OracleStatus::OverDailyLimit => "OVER_DAILY_LIMIT",
            OracleStatus::RequestDenied => "REQUEST_DENIED",
            OracleStatus::InvalidRequest => "INVALID_REQUEST",
            OracleStatus::MaxElementsExceeded => "MAX_ELEMENTS_EXCEEDED",
            OracleStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            OracleStatus::MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
            OracleStatus::UnknownError => "UNKNOWN_ERROR",
            OracleStatus::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl fmt::Display for OracleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted travel time for one origin/destination/departure triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelEstimate {
    /// Travel time in whole seconds.
    pub duration_secs: i64,

    /// Whether `duration_secs` accounts for predicted traffic.
    pub traffic_adjusted: bool,

    /// Display distance (e.g. "12.3 km").
    pub distance_text: Option<String>,

    /// Display duration without traffic.
    pub duration_text: Option<String>,

    /// Display duration with traffic.
    pub duration_in_traffic_text: Option<String>,
}

impl TravelEstimate {
    /// A bare estimate with no display texts.
    pub fn from_secs(duration_secs: i64, traffic_adjusted: bool) -> Self {
        Self {
            duration_secs,
            traffic_adjusted,
            distance_text: None,
            duration_text: None,
            duration_in_traffic_text: None,
        }
    }

    /// Travel time as a duration, or `None` when out of range.
    pub fn duration(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_seconds(self.duration_secs)
    }
}
