//! Latest-safe departure search.
//!
//! Candidate departures run from `deadline - buffer` backward to
//! `deadline - buffer - horizon` in fixed steps. Each candidate is checked
//! against the maps service; a candidate is feasible when its predicted
//! arrival is at or before the deadline. The answer is the feasible
//! candidate with the latest departure.
//!
//! Scanning backward means the first feasible candidate found is already
//! the latest one, so [`ScanMode::FirstFeasible`] stops there.
//! [`ScanMode::Exhaustive`] queries the whole window and takes the maximum;
//! both give the same answer.

use std::future::Future;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::CachedMapsClient;
use crate::domain::{ArrivalDeadline, DepartureTime, RouteQuery, TravelEstimate};
use crate::maps::MapsError;

use super::config::{ScanMode, SearchConfig};

/// Error from departure search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// The maps service cannot be called at all
    #[error("maps service not configured: {0}")]
    NotConfigured(String),
}

/// Source of travel-time estimates.
///
/// This abstraction allows the planner to be tested without the network.
pub trait TravelTimeOracle {
    /// Predict travel time for `route` leaving at `departure`.
    fn estimate(
        &self,
        route: &RouteQuery,
        departure: DepartureTime,
    ) -> impl Future<Output = Result<TravelEstimate, MapsError>> + Send;
}

impl TravelTimeOracle for CachedMapsClient {
    async fn estimate(
        &self,
        route: &RouteQuery,
        departure: DepartureTime,
    ) -> Result<TravelEstimate, MapsError> {
        CachedMapsClient::estimate(self, route, departure).await
    }
}

/// Request for departure search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Where the trip starts and ends.
    pub route: RouteQuery,

    /// Latest acceptable arrival.
    pub deadline: ArrivalDeadline,

    /// How far back from the latest departure to look (hours).
    pub horizon_hours: u32,

    /// Spacing between candidate departures (minutes).
    pub step_minutes: u32,

    /// Safety margin subtracted from the deadline (minutes).
    pub buffer_minutes: u32,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        route: RouteQuery,
        deadline: ArrivalDeadline,
        horizon_hours: u32,
        step_minutes: u32,
        buffer_minutes: u32,
    ) -> Self {
        Self {
            route,
            deadline,
            horizon_hours,
            step_minutes,
            buffer_minutes,
        }
    }

    /// Latest candidate departure: `deadline - buffer`.
    pub fn latest_departure(&self) -> DateTime<Tz> {
        self.deadline.instant() - Duration::minutes(i64::from(self.buffer_minutes))
    }

    /// Earliest candidate departure: `latest - horizon`.
    pub fn earliest_departure(&self) -> DateTime<Tz> {
        self.latest_departure() - Duration::hours(i64::from(self.horizon_hours))
    }

    /// Number of candidates in the window, or `None` when `step` is zero.
    pub fn candidate_count(&self) -> Option<usize> {
        if self.step_minutes == 0 {
            return None;
        }
        let horizon_mins = u64::from(self.horizon_hours) * 60;
        let count = horizon_mins / u64::from(self.step_minutes) + 1;
        usize::try_from(count).ok()
    }

    /// Candidate departures, latest first.
    pub fn candidate_departures(&self) -> Vec<DateTime<Tz>> {
        let Some(count) = self.candidate_count() else {
            return Vec::new();
        };
        let latest = self.latest_departure();
        let step_mins = i64::from(self.step_minutes);

        (0..count as i64)
            .map(|i| latest - Duration::minutes(step_mins * i))
            .collect()
    }

    /// Validate the search request.
    pub fn validate(&self, config: &SearchConfig) -> Result<(), SearchError> {
        if self.step_minutes == 0 {
            return Err(SearchError::InvalidRequest(
                "step must be at least one minute".to_string(),
            ));
        }

        if self.horizon_hours > config.max_horizon_hours {
            return Err(SearchError::InvalidRequest(format!(
                "search horizon of {} hours exceeds the maximum of {}",
                self.horizon_hours, config.max_horizon_hours
            )));
        }

        match self.candidate_count() {
            Some(n) if n <= config.max_candidates => Ok(()),
            _ => Err(SearchError::InvalidRequest(format!(
                "search window needs more than {} queries; use a larger step or shorter horizon",
                config.max_candidates
            ))),
        }
    }
}

/// A departure that was checked against the maps service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureCandidate {
    /// When to leave.
    pub departure: DateTime<Tz>,

    /// Predicted travel time.
    pub estimate: TravelEstimate,

    /// `departure + estimate.duration`.
    pub arrival: DateTime<Tz>,
}

impl DepartureCandidate {
    /// Build a candidate, deriving the arrival time.
    ///
    /// Returns `None` when the travel time is negative or the arrival
    /// falls outside the representable calendar.
    pub fn new(departure: DateTime<Tz>, estimate: TravelEstimate) -> Option<Self> {
        if estimate.duration_secs < 0 {
            return None;
        }
        let arrival = departure.checked_add_signed(estimate.duration()?)?;
        Some(Self {
            departure,
            estimate,
            arrival,
        })
    }

    /// Departure as Unix epoch seconds.
    pub fn departure_epoch(&self) -> i64 {
        self.departure.timestamp()
    }

    /// Whether this candidate arrives by `deadline`.
    pub fn arrives_by(&self, deadline: &ArrivalDeadline) -> bool {
        self.arrival <= deadline.instant()
    }
}

/// Result of departure search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Latest feasible departure, or `None` if the window has none.
    pub recommendation: Option<DepartureCandidate>,

    /// Number of candidate departures queried.
    pub candidates_evaluated: usize,

    /// Number of queries that failed (treated as infeasible).
    pub failed_candidates: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            recommendation: None,
            candidates_evaluated: 0,
            failed_candidates: 0,
        }
    }

    pub fn is_found(&self) -> bool {
        self.recommendation.is_some()
    }
}

/// What happened when one candidate was checked.
#[derive(Debug)]
enum Outcome {
    Feasible(DepartureCandidate),
    TooLate,
    Failed(MapsError),
    TimedOut,
}

/// Departure planner.
pub struct DepartureSearch<'a, O: TravelTimeOracle> {
    oracle: &'a O,
    config: &'a SearchConfig,
}

impl<'a, O: TravelTimeOracle> DepartureSearch<'a, O> {
    /// Create a new planner.
    pub fn new(oracle: &'a O, config: &'a SearchConfig) -> Self {
        Self { oracle, config }
    }

    /// Find the latest departure that arrives by the deadline.
    ///
    /// Per-candidate failures (no route, bad status, transport errors,
    /// timeouts) make that candidate infeasible and never abort the search.
    /// Only a missing maps configuration is returned as an error.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate(self.config)?;

        let candidates = request.candidate_departures();

        debug!(
            origin = %request.route.origin,
            destination = %request.route.destination,
            deadline = %request.deadline,
            latest = %request.latest_departure().to_rfc3339(),
            earliest = %request.earliest_departure().to_rfc3339(),
            candidates = candidates.len(),
            mode = ?self.config.scan_mode,
            "Starting departure search"
        );

        let result = match self.config.scan_mode {
            ScanMode::FirstFeasible => self.scan_backward(request, &candidates).await?,
            ScanMode::Exhaustive => self.scan_all(request, &candidates).await?,
        };

        info!(
            found = result.is_found(),
            departure = ?result.recommendation.as_ref().map(|c| c.departure.to_rfc3339()),
            evaluated = result.candidates_evaluated,
            failed = result.failed_candidates,
            "Departure search complete"
        );

        Ok(result)
    }

    /// Sequential scan from the latest candidate, stopping at the first
    /// feasible one.
    async fn scan_backward(
        &self,
        request: &SearchRequest,
        candidates: &[DateTime<Tz>],
    ) -> Result<SearchResult, SearchError> {
        let mut result = SearchResult::empty();

        for departure in candidates {
            let outcome = self.evaluate(request, *departure).await;
            result.candidates_evaluated += 1;

            match outcome {
                Outcome::Feasible(candidate) => {
                    result.recommendation = Some(candidate);
                    break;
                }
                Outcome::TooLate => {}
                Outcome::Failed(e) if e.is_fatal() => {
                    return Err(SearchError::NotConfigured(e.to_string()));
                }
                Outcome::Failed(_) | Outcome::TimedOut => result.failed_candidates += 1,
            }
        }

        Ok(result)
    }

    /// Query every candidate in concurrent batches and keep the latest
    /// feasible departure.
    async fn scan_all(
        &self,
        request: &SearchRequest,
        candidates: &[DateTime<Tz>],
    ) -> Result<SearchResult, SearchError> {
        let mut result = SearchResult::empty();

        for batch in candidates.chunks(self.config.batch_size.max(1)) {
            let futures: Vec<_> = batch
                .iter()
                .map(|departure| self.evaluate(request, *departure))
                .collect();

            for outcome in join_all(futures).await {
                result.candidates_evaluated += 1;

                match outcome {
                    Outcome::Feasible(candidate) => {
                        let later = result
                            .recommendation
                            .as_ref()
                            .is_none_or(|best| candidate.departure > best.departure);
                        if later {
                            result.recommendation = Some(candidate);
                        }
                    }
                    Outcome::TooLate => {}
                    Outcome::Failed(e) if e.is_fatal() => {
                        return Err(SearchError::NotConfigured(e.to_string()));
                    }
                    Outcome::Failed(_) | Outcome::TimedOut => result.failed_candidates += 1,
                }
            }
        }

        Ok(result)
    }

    /// Query one candidate under the per-call timeout.
    async fn evaluate(&self, request: &SearchRequest, departure: DateTime<Tz>) -> Outcome {
        let query = self
            .oracle
            .estimate(&request.route, DepartureTime::at(&departure));

        let estimate = match tokio::time::timeout(self.config.call_timeout(), query).await {
            Ok(Ok(estimate)) => estimate,
            Ok(Err(e)) => {
                if e.oracle_status().is_some_and(|s| s.is_rate_limited()) {
                    warn!(
                        departure = %departure.to_rfc3339(),
                        error = %e,
                        "Maps service rate limit hit, treating candidate as infeasible"
                    );
                } else {
                    debug!(
                        departure = %departure.to_rfc3339(),
                        error = %e,
                        timeout = e.is_timeout(),
                        "Candidate query failed, treating as infeasible"
                    );
                }
                return Outcome::Failed(e);
            }
            Err(_) => {
                debug!(
                    departure = %departure.to_rfc3339(),
                    "Candidate query timed out, treating as infeasible"
                );
                return Outcome::TimedOut;
            }
        };

        let secs = estimate.duration_secs;
        let Some(candidate) = DepartureCandidate::new(departure, estimate) else {
            debug!(
                departure = %departure.to_rfc3339(),
                duration_secs = secs,
                "Unusable travel time, treating as infeasible"
            );
            return Outcome::Failed(MapsError::InvalidDuration(secs));
        };

        if candidate.arrives_by(&request.deadline) {
            Outcome::Feasible(candidate)
        } else {
            Outcome::TooLate
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
