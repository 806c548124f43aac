//! Domain types for the departure planner.
//!
//! This module contains the validated inputs and outputs of a trip query.
//! Types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod error;
mod estimate;
mod place;
mod time;

pub use error::DomainError;
pub use estimate::{OracleStatus, TravelEstimate};
pub use place::{LatLng, Place, RouteQuery};
pub use time::{ArrivalDeadline, DepartureTime, parse_time_zone};
