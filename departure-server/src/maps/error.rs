//! Maps client error types.

use crate::domain::OracleStatus;

/// Errors from the maps HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    /// No API key available; calls cannot be authorized.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Service answered but reported a non-OK overall status
    #[error("maps service returned {status}{}", detail(.message))]
    Status {
        status: OracleStatus,
        message: Option<String>,
    },

    /// Overall request succeeded but this origin/destination pair has no result
    #[error("route element error: {status}")]
    Element { status: OracleStatus },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response parsed but lacks data the caller needs
    #[error("response missing {0}")]
    MissingField(&'static str),

    /// Travel time is negative or too large to place on a calendar
    #[error("unusable travel time of {0} seconds")]
    InvalidDuration(i64),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl MapsError {
    /// Errors that no amount of retrying other inputs can fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MapsError::NotConfigured(_))
    }

    /// The request gave up waiting on the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self, MapsError::Http(e) if e.is_timeout())
    }

    /// The maps service status behind this error, if it reported one.
    pub fn oracle_status(&self) -> Option<OracleStatus> {
        match self {
            MapsError::Status { status, .. } | MapsError::Element { status } => Some(*status),
            _ => None,
        }
    }
}
