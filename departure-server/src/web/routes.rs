//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{ArrivalDeadline, DepartureTime, DomainError};
use crate::maps::MapsError;
use crate::planner::{DepartureSearch, SearchError, SearchRequest};

use super::dto::*;
use super::state::AppState;

/// Message returned when the search window has no feasible departure.
pub const NO_DEPARTURE_MESSAGE: &str = "No suitable departure time found within your window.";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .route("/route", post(quick_route))
        .route("/get_route", post(quick_route))
        .route("/predict", post(predict_departure))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Liveness and version.
async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "Invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Distance, duration and directions for leaving now.
async fn quick_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: RouteRequest = parse_body(&body)?;
    let route = req.route_query()?;

    let (estimate, summary) = tokio::join!(
        state.maps.estimate(&route, DepartureTime::Now),
        state.maps.summarize(&route, Some(DepartureTime::Now)),
    );
    let estimate = estimate?;
    let summary = summary?;

    if let crate::maps::Steps::Unavailable(reason) = &summary.steps {
        warn!(reason = %reason, "Route steps unavailable");
    }

    let duration_in_traffic = estimate
        .duration_in_traffic_text
        .unwrap_or(summary.duration_in_traffic_text);

    Ok(Json(RouteResponse {
        origin: req.origin,
        destination: req.destination,
        distance: summary.distance_text,
        duration: summary.duration_text,
        duration_in_traffic,
        suggested_departure: "Now (real-time estimate)".to_string(),
        summary: summary.summary,
        steps: summary.steps,
    })
    .into_response())
}

/// Latest departure that still arrives by the requested time.
async fn predict_departure(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: PredictRequest = parse_body(&body)?;
    let config = &state.config;

    let route = req.route.route_query()?;
    let zone = req
        .time_zone
        .as_deref()
        .unwrap_or(&config.default_time_zone);
    let deadline = ArrivalDeadline::parse(&req.arrival_time, zone)?;

    let search_request = SearchRequest::new(
        route,
        deadline,
        req.max_search_hours.unwrap_or(config.default_horizon_hours),
        req.step_minutes.unwrap_or(config.default_step_minutes),
        req.buffer_minutes.unwrap_or(config.default_buffer_minutes),
    );

    let result = DepartureSearch::new(&*state.maps, config)
        .search(&search_request)
        .await?;

    let best = result.recommendation.ok_or_else(|| AppError::NotFound {
        message: NO_DEPARTURE_MESSAGE.to_string(),
    })?;

    let summary = state
        .maps
        .summarize(&search_request.route, Some(DepartureTime::at(&best.departure)))
        .await
        .map_err(|e| AppError::BadGateway {
            message: format!("Could not fetch directions for the recommended time: {e}"),
        })?;

    let distance = best
        .estimate
        .distance_text
        .clone()
        .unwrap_or(summary.distance_text);
    let duration_in_traffic = best
        .estimate
        .duration_in_traffic_text
        .clone()
        .unwrap_or(summary.duration_in_traffic_text);

    Ok(Json(PredictResponse {
        origin: req.route.origin,
        destination: req.route.destination,
        distance,
        duration: summary.duration_text,
        duration_in_traffic,
        recommended_departure_iso: best.departure.to_rfc3339(),
        recommended_departure_epoch: best.departure_epoch(),
        estimated_arrival_iso: best.arrival.to_rfc3339(),
        candidates_evaluated: result.candidates_evaluated,
        summary: summary.summary,
        steps: summary.steps,
    })
    .into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    ServiceUnavailable { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<MapsError> for AppError {
    fn from(e: MapsError) -> Self {
        match &e {
            MapsError::NotConfigured(_) => AppError::ServiceUnavailable {
                message: e.to_string(),
            },
            MapsError::Element { status } if status.is_no_route() => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            SearchError::NotConfigured(_) => AppError::ServiceUnavailable {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::ServiceUnavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        if status.is_server_error() {
            error!(status = %status, message = %message, "Request failed");
        } else {
            warn!(status = %status, message = %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
