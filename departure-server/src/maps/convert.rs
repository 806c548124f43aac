//! Conversion from maps DTOs to domain types.
//!
//! Essential data (durations, distances, the first route and leg) must be
//! present or conversion fails. Turn-by-turn steps are presentation-only
//! and are parsed best-effort into [`Steps`].

use chrono::TimeDelta;
use serde::{Serialize, Serializer};

use crate::domain::TravelEstimate;

use super::error::MapsError;
use super::types::{
    DirectionsLeg, DirectionsResponse, DirectionsRoute, DirectionsStep, DistanceMatrixResponse,
    MatrixElement,
};

/// Turn-by-turn instructions for a route.
///
/// Serializes as a JSON array in both cases; `Unavailable` becomes `[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Steps {
    /// Instructions in route order. May be empty for a route with no steps.
    Parsed(Vec<String>),
    /// The step payload could not be read; the reason is kept for logs.
    Unavailable(String),
}

impl Steps {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Steps::Parsed(steps) => steps,
            Steps::Unavailable(_) => &[],
        }
    }

}

impl Serialize for Steps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

/// Display-ready description of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub distance_text: String,
    pub duration_text: String,
    /// Falls back to `duration_text` when the service has no traffic data.
    pub duration_in_traffic_text: String,
    /// Route label such as "NH 48"; empty when the service gives none.
    pub summary: String,
    pub steps: Steps,
}

/// Pick the single element out of a one-origin, one-destination matrix.
pub fn single_element(response: DistanceMatrixResponse) -> Result<MatrixElement, MapsError> {
    if !response.status.is_ok() {
        return Err(MapsError::Status {
            status: response.status,
            message: response.error_message,
        });
    }

    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or(MapsError::MissingField("rows[0].elements[0]"))?;

    if !element.status.is_ok() {
        return Err(MapsError::Element {
            status: element.status,
        });
    }

    Ok(element)
}

/// Turn a matrix element into an estimate, preferring the traffic-adjusted
/// duration.
pub fn estimate_from_element(element: &MatrixElement) -> Result<TravelEstimate, MapsError> {
    let (secs, traffic_adjusted) = match (&element.duration_in_traffic, &element.duration) {
        (Some(traffic), _) => (traffic.value, true),
        (None, Some(baseline)) => (baseline.value, false),
        (None, None) => return Err(MapsError::MissingField("duration")),
    };

    if secs < 0 || TimeDelta::try_seconds(secs).is_none() {
        return Err(MapsError::InvalidDuration(secs));
    }

    Ok(TravelEstimate {
        duration_secs: secs,
        traffic_adjusted,
        distance_text: element.distance.as_ref().map(|d| d.text.clone()),
        duration_text: element.duration.as_ref().map(|d| d.text.clone()),
        duration_in_traffic_text: element.duration_in_traffic.as_ref().map(|d| d.text.clone()),
    })
}

/// Build a route summary from a directions response.
pub fn summarize_directions(response: DirectionsResponse) -> Result<RouteSummary, MapsError> {
    if !response.status.is_ok() {
        return Err(MapsError::Status {
            status: response.status,
            message: response.error_message,
        });
    }

    let route = response
        .routes
        .first()
        .ok_or(MapsError::MissingField("routes[0]"))?;
    let leg = route
        .legs
        .first()
        .ok_or(MapsError::MissingField("routes[0].legs[0]"))?;

    let distance_text = leg
        .distance
        .as_ref()
        .map(|d| d.text.clone())
        .ok_or(MapsError::MissingField("distance"))?;
    let duration_text = leg
        .duration
        .as_ref()
        .map(|d| d.text.clone())
        .ok_or(MapsError::MissingField("duration"))?;
    let duration_in_traffic_text = leg
        .duration_in_traffic
        .as_ref()
        .map(|d| d.text.clone())
        .unwrap_or_else(|| duration_text.clone());

    Ok(RouteSummary {
        distance_text,
        duration_text,
        duration_in_traffic_text,
        summary: route.summary.clone(),
        steps: extract_steps(route),
    })
}

/// Collect the instructions of every step of every leg, in order.
pub fn extract_steps(route: &DirectionsRoute) -> Steps {
    let mut steps = Vec::new();

    for (idx, leg) in route.legs.iter().enumerate() {
        match leg_steps(leg) {
            Ok(leg_steps) => steps.extend(
                leg_steps
                    .into_iter()
                    .map(|s| s.html_instructions.unwrap_or_default()),
            ),
            Err(e) => return Steps::Unavailable(format!("leg {idx}: {e}")),
        }
    }

    Steps::Parsed(steps)
}

fn leg_steps(leg: &DirectionsLeg) -> Result<Vec<DirectionsStep>, serde_json::Error> {
    match &leg.steps {
        Some(raw) => serde_json::from_value(raw.clone()),
        None => Ok(Vec::new()),
    }
}
