//! Caching layer for maps API responses.
//!
//! A departure search asks for the same (origin, destination, departure)
//! triple again whenever a user repeats or widens a query. Travel-time
//! estimates for a fixed departure instant are deterministic from our
//! point of view, so successful answers are memoized.
//!
//! Only estimates for a concrete departure instant are cached. `now`
//! queries always go to the service, and failures are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{DepartureTime, RouteQuery, TravelEstimate};
use crate::maps::{MapsClient, MapsError, RouteSummary};

/// Cache key for estimates: (origin, destination, departure epoch seconds).
type EstimateKey = (String, String, i64);

/// Configuration for the cache.
///
/// The defaults give a process-lifetime cache with no bound and no expiry,
/// which suits short-lived processes or low query volume. Long-running
/// deployments should set one or both limits.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// TTL for cached entries. `None` keeps entries forever.
    pub ttl: Option<Duration>,

    /// Maximum number of cached entries. `None` is unbounded.
    pub max_capacity: Option<u64>,
}

impl CacheConfig {
    /// Expire entries after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Keep at most `n` entries.
    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = Some(n);
        self
    }
}

/// Cache for travel-time estimates.
pub struct EstimateCache {
    estimates: MokaCache<EstimateKey, TravelEstimate>,
}

impl EstimateCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = MokaCache::builder();
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        if let Some(max) = config.max_capacity {
            builder = builder.max_capacity(max);
        }

        Self {
            estimates: builder.build(),
        }
    }

    /// Build the key for a query, or `None` if the query must not be cached.
    fn key(route: &RouteQuery, departure: DepartureTime) -> Option<EstimateKey> {
        match departure {
            DepartureTime::Now => None,
            DepartureTime::At(epoch) => Some((
                route.origin.to_query_value(),
                route.destination.to_query_value(),
                epoch,
            )),
        }
    }

    /// Get a cached estimate.
    pub async fn get(&self, key: &EstimateKey) -> Option<TravelEstimate> {
        self.estimates.get(key).await
    }

    /// Insert an estimate into the cache.
    pub async fn insert(&self, key: EstimateKey, estimate: TravelEstimate) {
        self.estimates.insert(key, estimate).await;
    }

    /// Get cache statistics (for monitoring).
    ///
    /// The count is eventually consistent; pending inserts may not be
    /// reflected until [`EstimateCache::sync`] runs.
    pub fn entry_count(&self) -> u64 {
        self.estimates.entry_count()
    }

    /// Apply pending bookkeeping so `entry_count` is exact.
    pub async fn sync(&self) {
        self.estimates.run_pending_tasks().await;
    }
}

/// Maps client with caching.
///
/// Wraps a `MapsClient` and memoizes travel-time estimates.
pub struct CachedMapsClient {
    client: MapsClient,
    cache: EstimateCache,
}

impl CachedMapsClient {
    /// Create a new cached client.
    pub fn new(client: MapsClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: EstimateCache::new(cache_config),
        }
    }

    /// Estimate travel time, using the cache if available.
    pub async fn estimate(
        &self,
        route: &RouteQuery,
        departure: DepartureTime,
    ) -> Result<TravelEstimate, MapsError> {
        let key = EstimateCache::key(route, departure);

        // Try cache first
        if let Some(key) = &key
            && let Some(cached) = self.cache.get(key).await
        {
            trace!(departure = %departure, "Estimate cache hit");
            return Ok(cached);
        }

        let estimate = self.client.estimate(route, departure).await?;

        if let Some(key) = key {
            self.cache.insert(key, estimate.clone()).await;
        }

        Ok(estimate)
    }

    /// Fetch a route summary. Not cached.
    pub async fn summarize(
        &self,
        route: &RouteQuery,
        departure: Option<DepartureTime>,
    ) -> Result<RouteSummary, MapsError> {
        self.client.summarize(route, departure).await
    }

    /// Get cache statistics.
    pub async fn cache_entry_count(&self) -> u64 {
        self.cache.sync().await;
        self.cache.entry_count()
    }
}
