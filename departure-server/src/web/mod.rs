//! Web layer for the departure planner.
//!
//! Provides HTTP endpoints for current route information and departure
//! recommendations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, NO_DEPARTURE_MESSAGE, create_router};
pub use state::AppState;
