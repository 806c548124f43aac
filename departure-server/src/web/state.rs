//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedMapsClient;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached maps API client
    pub maps: Arc<CachedMapsClient>,

    /// Departure search configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(maps: CachedMapsClient, config: SearchConfig) -> Self {
        Self {
            maps: Arc::new(maps),
            config: Arc::new(config),
        }
    }
}
