//! Server configuration, read once at start-up.

use std::path::PathBuf;

use crate::geocode::{NominatimConfig, default_user_agent};
use crate::onebusaway::OneBusAwayConfig;

pub const API_KEY_VAR: &str = "ONEBUSAWAY_API_KEY";
pub const BASE_URL_VAR: &str = "ONEBUSAWAY_BASE_URL";
pub const TIMEOUT_VAR: &str = "ONEBUSAWAY_TIMEOUT_SECS";
pub const NOMINATIM_URL_VAR: &str = "NOMINATIM_BASE_URL";
pub const NOMINATIM_AGENT_VAR: &str = "NOMINATIM_USER_AGENT";
pub const DUMP_DIR_VAR: &str = "TRANSIT_DEBUG_DUMP_DIR";

/// Error loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Everything the tool server needs to build its clients.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub onebusaway: OneBusAwayConfig,
    pub nominatim: NominatimConfig,
    /// Where to dump raw arrivals responses, if anywhere.
    pub debug_dump_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let mut onebusaway = OneBusAwayConfig::new(api_key);

        if let Some(url) = get(BASE_URL_VAR) {
            onebusaway = onebusaway.with_base_url(url);
        }

        if let Some(value) = get(TIMEOUT_VAR) {
            let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                var: TIMEOUT_VAR,
                value: value.clone(),
            })?;
            onebusaway = onebusaway.with_timeout(secs);
        }

        let mut nominatim =
            NominatimConfig::new(get(NOMINATIM_AGENT_VAR).unwrap_or_else(default_user_agent));
        if let Some(url) = get(NOMINATIM_URL_VAR) {
            nominatim = nominatim.with_base_url(url);
        }

        Ok(Self {
            onebusaway,
            nominatim,
            debug_dump_dir: get(DUMP_DIR_VAR).map(PathBuf::from),
        })
    }
}
