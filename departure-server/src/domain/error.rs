//! Domain error types.
//!
//! These errors represent invalid caller input in the domain layer.
//! They are distinct from maps-service and transport errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Neither an address nor coordinates were supplied
    #[error("place must have an address or coordinates")]
    EmptyPlace,

    /// Coordinates are not finite or out of range
    #[error("invalid coordinates: {lat},{lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// Zone name is not in the IANA database
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// Deadline is not `YYYY-MM-DDTHH:MM[:SS]`
    #[error("invalid arrival time (expected YYYY-MM-DDTHH:MM): {0}")]
    InvalidDeadline(String),

    /// Local time falls in a daylight-saving gap
    #[error("local time {local} does not exist in {zone}")]
    NonexistentLocalTime { local: String, zone: String },
}
