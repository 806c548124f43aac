//! Maps service client.
//!
//! This module provides an HTTP client for the Distance Matrix and
//! Directions web services, the sole source of travel durations.
//!
//! Key characteristics of the service:
//! - Responses carry a top-level `status` and, for the matrix, a per-element
//!   `status`; HTTP 200 does not mean success
//! - `duration_in_traffic` is only returned for requests with a departure
//!   time and may be absent even then
//! - Departure times are Unix epoch seconds or the literal `now`

mod client;
mod convert;
mod error;
mod types;

pub use client::{MapsClient, MapsConfig};
pub use convert::{RouteSummary, Steps, estimate_from_element, extract_steps, single_element};
pub use error::MapsError;
pub use types::{
    DirectionsLeg, DirectionsResponse, DirectionsRoute, DirectionsStep, DistanceMatrixResponse,
    MatrixElement, MatrixRow, TextValue,
};
