use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use departure_server::cache::CachedMapsClient;
use departure_server::config::AppConfig;
use departure_server::maps::MapsClient;
use departure_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "departure_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Fail fast without a key: every oracle call would be rejected
    let maps_client = match config.maps_config().and_then(MapsClient::new) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Maps client unavailable");
            return ExitCode::FAILURE;
        }
    };

    let cached_maps = CachedMapsClient::new(maps_client, &config.cache_config());
    let state = AppState::new(cached_maps, config.search_config());
    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(%addr, "Departure planner listening");
    info!("  GET  /health   - Health check");
    info!("  POST /route    - Route info for leaving now");
    info!("  POST /predict  - Latest safe departure for an arrival time");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
