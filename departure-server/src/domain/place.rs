//! Places and route queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create a coordinate pair, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

/// An origin or destination the maps service understands.
///
/// # Examples
///
/// ```
/// use departure_server::domain::{LatLng, Place};
///
/// // Coordinates win over the address when both are given.
/// let coords = LatLng::new(12.97, 77.59).unwrap();
/// let place = Place::resolve(Some("MG Road"), Some(coords)).unwrap();
/// assert_eq!(place.to_string(), "12.97,77.59");
///
/// let place = Place::resolve(Some("MG Road"), None).unwrap();
/// assert_eq!(place.to_string(), "MG Road");
///
/// assert!(Place::resolve(Some("   "), None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    /// Free-text address, geocoded by the maps service.
    Address(String),
    /// Exact coordinates.
    Coordinates(LatLng),
}

impl Place {
    /// Build a place from the optional parts of a request.
    ///
    /// Coordinates are preferred when present; otherwise the trimmed
    /// address is used. Having neither is an error.
    pub fn resolve(address: Option<&str>, coords: Option<LatLng>) -> Result<Self, DomainError> {
        if let Some(coords) = coords {
            let coords = LatLng::new(coords.lat, coords.lng)?;
            return Ok(Place::Coordinates(coords));
        }

        match address.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(Place::Address(text.to_string())),
            _ => Err(DomainError::EmptyPlace),
        }
    }

    /// The value sent in `origins`/`destinations` query parameters.
    pub fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Address(text) => f.write_str(text),
            Place::Coordinates(c) => write!(f, "{},{}", c.lat, c.lng),
        }
    }
}

/// Origin and destination of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: Place,
    pub destination: Place,
}

impl RouteQuery {
    pub fn new(origin: Place, destination: Place) -> Self {
        Self {
            origin,
            destination,
        }
    }
}
