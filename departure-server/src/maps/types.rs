//! Maps API response DTOs.
//!
//! These types map directly to the Distance Matrix and Directions JSON
//! responses. They use `Option` liberally because the service omits
//! fields (e.g. `duration_in_traffic` without a departure time, or
//! everything but `status` on an error element).

use serde::Deserialize;

use crate::domain::OracleStatus;

/// A display text paired with its numeric value (metres or seconds).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: i64,
}

/// Response from `distancematrix/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Top-level status for the whole request.
    pub status: OracleStatus,

    /// Human-readable detail when `status` is not OK.
    pub error_message: Option<String>,

    #[serde(default)]
    pub origin_addresses: Vec<String>,

    #[serde(default)]
    pub destination_addresses: Vec<String>,

    /// One row per origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// One origin's results, one element per destination.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// Result for a single origin/destination pair.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixElement {
    pub status: OracleStatus,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    /// Only present when a departure time was given and traffic data exists.
    pub duration_in_traffic: Option<TextValue>,
}

/// Response from `directions/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: OracleStatus,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    /// Short label such as "I-95 N".
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

/// A leg between two waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsLeg {
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub duration_in_traffic: Option<TextValue>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,

    /// Kept raw: steps are parsed best-effort so a malformed step list
    /// does not fail the whole response.
    pub steps: Option<serde_json::Value>,
}

/// A single maneuver.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsStep {
    /// HTML-formatted instruction, e.g. "Turn <b>left</b> onto Main St".
    pub html_instructions: Option<String>,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
}
