//! Nominatim search client.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Location;

use super::error::GeocodeError;

/// Default public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User agent sent when none is configured.
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Configuration for the Nominatim client.
///
/// The public instance's usage policy requires an identifying user agent,
/// so one is always set.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl NominatimConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: user_agent.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new(default_user_agent())
    }
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub location: Location,
    pub display_name: String,
    /// Address components (`road`, `city`, `postcode`, ...).
    pub address: BTreeMap<String, String>,
}

/// Result of a geocoding query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Found(GeocodedPlace),
    /// The geocoder returned no results.
    NotFound { query: String },
}

/// Raw Nominatim search result. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: BTreeMap<String, serde_json::Value>,
}

/// Client for the Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Resolve a free-form address to its best match.
    pub async fn geocode(&self, address: &str) -> Result<GeocodeOutcome, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::BlankAddress);
        }

        let url = format!("{}/search", self.base_url);
        let params = [
            ("q", query),
            ("format", "json"),
            ("limit", "1"),
            ("addressdetails", "1"),
        ];

        let response = self.http.get(&url).query(&params).send().await?;

        let status = response.status();
        debug!(query, status = status.as_u16(), "geocoder response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "geocoder returned error status");
            return Err(GeocodeError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let results: Vec<SearchResult> = serde_json::from_str(&body)
            .map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

        match results.into_iter().next() {
            None => Ok(GeocodeOutcome::NotFound {
                query: query.to_string(),
            }),
            Some(result) => Ok(GeocodeOutcome::Found(convert(result)?)),
        }
    }
}

fn convert(result: SearchResult) -> Result<GeocodedPlace, GeocodeError> {
    let latitude: f64 = result.lat.parse().map_err(|_| {
        GeocodeError::MalformedResponse(format!("invalid latitude {:?}", result.lat))
    })?;
    let longitude: f64 = result.lon.parse().map_err(|_| {
        GeocodeError::MalformedResponse(format!("invalid longitude {:?}", result.lon))
    })?;
    let location = Location::new(latitude, longitude)
        .map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

    // Address values are strings in practice; anything else is stringified.
    let address = result
        .address
        .into_iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect();

    Ok(GeocodedPlace {
        location,
        display_name: result.display_name.unwrap_or_default(),
        address,
    })
}
