//! Departure instants and arrival deadlines.
//!
//! The maps service takes departure times as Unix epoch seconds (or the
//! literal `now`). Deadlines arrive from callers as a local wall-clock time
//! plus an IANA zone name, and are resolved to an absolute instant here so
//! the search can do plain instant arithmetic.

use std::fmt;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use super::DomainError;

/// Accepted layouts for a local deadline.
const DEADLINE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// When a trip starts, as sent to the maps service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepartureTime {
    /// Leave immediately; the service uses its own clock.
    Now,
    /// Leave at this Unix timestamp (whole seconds).
    At(i64),
}

impl DepartureTime {
    /// Departure at the given instant, truncated to whole seconds.
    pub fn at<Z: TimeZone>(instant: &DateTime<Z>) -> Self {
        DepartureTime::At(instant.timestamp())
    }

    /// The value of the `departure_time` query parameter.
    pub fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartureTime::Now => f.write_str("now"),
            DepartureTime::At(epoch) => write!(f, "{epoch}"),
        }
    }
}

/// Parse an IANA zone name such as `America/New_York`.
pub fn parse_time_zone(name: &str) -> Result<Tz, DomainError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DomainError::UnknownTimeZone(name.to_string()))
}

/// A target arrival instant in a named zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalDeadline(DateTime<Tz>);

impl ArrivalDeadline {
    /// Parse `YYYY-MM-DDTHH:MM[:SS]` as a wall-clock time in `zone`.
    ///
    /// Ambiguous wall-clock times (the repeated hour when clocks go back)
    /// resolve to the earlier instant. Times that fall in the gap when
    /// clocks go forward are rejected.
    pub fn parse(local: &str, zone: &str) -> Result<Self, DomainError> {
        let tz = parse_time_zone(zone)?;
        let local = local.trim();

        let naive = DEADLINE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
            .ok_or_else(|| DomainError::InvalidDeadline(local.to_string()))?;

        Self::from_local(naive, tz)
    }

    /// Localize a naive wall-clock time in `tz`.
    pub fn from_local(naive: NaiveDateTime, tz: Tz) -> Result<Self, DomainError> {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(Self(dt)),
            LocalResult::Ambiguous(earlier, _) => Ok(Self(earlier)),
            LocalResult::None => Err(DomainError::NonexistentLocalTime {
                local: naive.to_string(),
                zone: tz.name().to_string(),
            }),
        }
    }

    /// The deadline as an instant in its zone.
    pub fn instant(&self) -> DateTime<Tz> {
        self.0
    }
}

impl fmt::Display for ArrivalDeadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
