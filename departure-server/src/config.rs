//! Server configuration read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::domain::parse_time_zone;
use crate::maps::{MapsConfig, MapsError};
use crate::planner::SearchConfig;

/// Environment variable holding the maps API key.
pub const API_KEY_VAR: &str = "MAPS_API_KEY";

/// Older name for the API key, still honoured.
pub const LEGACY_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Process-level settings.
#[derive(Clone)]
pub struct AppConfig {
    /// Maps API key; `None` when unset or blank.
    pub api_key: Option<String>,

    /// Override for the maps base URL.
    pub maps_base_url: Option<String>,

    /// Per-request timeout for maps calls (seconds).
    pub maps_timeout_secs: u64,

    /// Address to listen on.
    pub bind_addr: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Zone used for deadlines when a request names none.
    pub default_time_zone: String,

    /// Expiry for cached estimates (seconds); `None` keeps them forever.
    pub cache_ttl_secs: Option<u64>,

    /// Most cached estimates; `None` is unbounded.
    pub cache_max_entries: Option<u64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("maps_base_url", &self.maps_base_url)
            .field("maps_timeout_secs", &self.maps_timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("default_time_zone", &self.default_time_zone)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(API_KEY_VAR).or_else(|| non_blank(LEGACY_API_KEY_VAR));

        let default_time_zone = non_blank("DEFAULT_TIME_ZONE")
            .unwrap_or_else(|| SearchConfig::default().default_time_zone);
        if let Err(e) = parse_time_zone(&default_time_zone) {
            return Err(ConfigError {
                key: "DEFAULT_TIME_ZONE",
                value: default_time_zone,
                reason: e.to_string(),
            });
        }

        let maps_timeout_secs = parse_var(
            "MAPS_TIMEOUT_SECS",
            non_blank("MAPS_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        if !(1..=MAX_TIMEOUT_SECS).contains(&maps_timeout_secs) {
            return Err(ConfigError {
                key: "MAPS_TIMEOUT_SECS",
                value: maps_timeout_secs.to_string(),
                reason: format!("must be between 1 and {MAX_TIMEOUT_SECS}"),
            });
        }

        let cache_ttl_secs = parse_optional_var("CACHE_TTL_SECS", non_blank("CACHE_TTL_SECS"))?;
        if cache_ttl_secs == Some(0) {
            return Err(ConfigError {
                key: "CACHE_TTL_SECS",
                value: "0".to_string(),
                reason: "must be at least 1; unset it to keep entries forever".to_string(),
            });
        }

        Ok(Self {
            api_key,
            maps_base_url: non_blank("MAPS_BASE_URL"),
            maps_timeout_secs,
            bind_addr: parse_var(
                "BIND_ADDR",
                non_blank("BIND_ADDR"),
                IpAddr::V4(Ipv4Addr::LOCALHOST),
            )?,
            port: parse_var("PORT", non_blank("PORT"), DEFAULT_PORT)?,
            default_time_zone,
            cache_ttl_secs,
            cache_max_entries: parse_optional_var(
                "CACHE_MAX_ENTRIES",
                non_blank("CACHE_MAX_ENTRIES"),
            )?,
        })
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Maps client settings.
    ///
    /// Fails with [`MapsError::NotConfigured`] when no API key is set.
    pub fn maps_config(&self) -> Result<MapsConfig, MapsError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            MapsError::NotConfigured(format!("set {API_KEY_VAR} to a maps API key"))
        })?;

        let mut config = MapsConfig::new(api_key.as_str()).with_timeout(self.maps_timeout_secs);
        if let Some(url) = &self.maps_base_url {
            config = config.with_base_url(url.as_str());
        }
        Ok(config)
    }

    /// Search settings, with the configured default zone.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            default_time_zone: self.default_time_zone.clone(),
            call_timeout_ms: self.maps_timeout_secs.saturating_mul(1000),
            ..SearchConfig::default()
        }
    }

    /// Estimate cache limits.
    pub fn cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig::default();
        if let Some(secs) = self.cache_ttl_secs {
            config = config.with_ttl(Duration::from_secs(secs));
        }
        if let Some(n) = self.cache_max_entries {
            config = config.with_max_capacity(n);
        }
        config
    }
}

fn parse_var<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn parse_optional_var<T>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|value| {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError {
                key,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}
