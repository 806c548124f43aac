//! Departure planner.
//!
//! This module implements the core search that answers:
//! "When is the latest I can leave and still arrive on time?"
//!
//! The algorithm scans candidate departures backward from the deadline,
//! asking the maps service for a travel-time estimate at each one.

mod config;
mod search;

pub use config::{ScanMode, SearchConfig};
pub use search::{
    DepartureCandidate, DepartureSearch, SearchError, SearchRequest, SearchResult,
    TravelTimeOracle,
};
