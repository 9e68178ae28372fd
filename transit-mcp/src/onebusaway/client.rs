//! OneBusAway HTTP client.
//!
//! [`OneBusAwayClient::call`] is the single place that talks to the API:
//! it appends the key, issues one GET, checks the status and hands back the
//! JSON body untouched. The typed methods build on it and reshape the
//! response into domain types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Location, Route, RouteDetails, RouteId, RouteStops, Stop, StopArrivals, StopId};

use super::convert::{self, Listing};
use super::dump::DebugDump;
use super::error::TransitError;

/// Default base URL (Puget Sound deployment of the `where` API).
pub const DEFAULT_BASE_URL: &str = "https://api.pugetsound.onebusaway.org/api/where";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the OneBusAway client.
#[derive(Debug, Clone)]
pub struct OneBusAwayConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OneBusAwayConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or other deployments).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Window for an arrivals/departures query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalsQuery {
    /// Include vehicles that arrived/departed up to this many minutes ago
    pub minutes_before: u32,
    /// Include vehicles arriving/departing up to this many minutes ahead
    pub minutes_after: u32,
    /// Query as of this instant instead of now
    pub time: Option<DateTime<Utc>>,
}

impl Default for ArrivalsQuery {
    fn default() -> Self {
        Self {
            minutes_before: 5,
            minutes_after: 35,
            time: None,
        }
    }
}

/// Client for the OneBusAway `where` REST API.
#[derive(Debug, Clone)]
pub struct OneBusAwayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    dump: Option<DebugDump>,
}

impl OneBusAwayClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OneBusAwayConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            dump: None,
        })
    }

    /// Dump every raw arrivals/departures response via `dump`.
    pub fn with_debug_dump(mut self, dump: DebugDump) -> Self {
        self.dump = Some(dump);
        self
    }

    /// Call `endpoint` with `params` and return the JSON body verbatim.
    ///
    /// The URL is `{base_url}/{endpoint}.json`; the API key is appended to
    /// the caller's parameters. Non-success statuses become
    /// [`TransitError::RemoteApi`] carrying the status and body. No retries.
    pub async fn call(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, TransitError> {
        let url = format!("{}/{}.json", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "transit API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint, status = status.as_u16(), "transit API returned error status");
            return Err(TransitError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TransitError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Stops within `radius_m` metres of `location`.
    pub async fn stops_for_location(
        &self,
        location: &Location,
        radius_m: u32,
    ) -> Result<Listing<Stop>, TransitError> {
        let endpoint = "stops-for-location";
        let raw = self.call(endpoint, &location_params(location, radius_m)).await?;
        convert::stop_listing(endpoint, raw)
    }

    /// Routes with a stop within `radius_m` metres of `location`.
    pub async fn routes_for_location(
        &self,
        location: &Location,
        radius_m: u32,
    ) -> Result<Listing<Route>, TransitError> {
        let endpoint = "routes-for-location";
        let raw = self.call(endpoint, &location_params(location, radius_m)).await?;
        convert::route_listing(endpoint, raw)
    }

    /// Arrivals and departures at `stop`.
    ///
    /// When a debug dump is configured the raw response is written to it
    /// before being reshaped.
    pub async fn arrivals_and_departures(
        &self,
        stop: &StopId,
        query: &ArrivalsQuery,
    ) -> Result<StopArrivals, TransitError> {
        let endpoint = format!("arrivals-and-departures-for-stop/{}", stop.as_str());

        let mut params = vec![
            ("minutesBefore", query.minutes_before.to_string()),
            ("minutesAfter", query.minutes_after.to_string()),
        ];
        if let Some(time) = query.time {
            params.push(("time", time.timestamp_millis().to_string()));
        }

        let raw = self.call(&endpoint, &params).await?;

        if let Some(dump) = &self.dump {
            dump.write(stop, &raw).await;
        }

        convert::stop_arrivals(&endpoint, raw)
    }

    /// A single route.
    pub async fn route(&self, route: &RouteId) -> Result<Route, TransitError> {
        let endpoint = format!("route/{}", route.as_str());
        let raw = self.call(&endpoint, &[]).await?;
        convert::route_entry(&endpoint, raw)
    }

    /// A single stop.
    pub async fn stop(&self, stop: &StopId) -> Result<Stop, TransitError> {
        let endpoint = format!("stop/{}", stop.as_str());
        let raw = self.call(&endpoint, &[]).await?;
        convert::stop_entry(&endpoint, raw)
    }

    /// The stops served by `route`, grouped by direction.
    pub async fn stops_for_route(
        &self,
        route: &RouteId,
        include_polylines: bool,
    ) -> Result<RouteStops, TransitError> {
        let endpoint = format!("stops-for-route/{}", route.as_str());
        let params = [("includePolylines", include_polylines.to_string())];
        let raw = self.call(&endpoint, &params).await?;
        convert::route_stops(&endpoint, raw, include_polylines)
    }

    /// Route plus its stops and directions (two requests).
    pub async fn route_details(
        &self,
        route: &RouteId,
        include_polylines: bool,
    ) -> Result<RouteDetails, TransitError> {
        let details = self.route(route).await?;
        let stops = self.stops_for_route(route, include_polylines).await?;
        Ok(RouteDetails::new(details, stops))
    }
}

fn location_params(location: &Location, radius_m: u32) -> Vec<(&'static str, String)> {
    vec![
        ("lat", location.latitude().to_string()),
        ("lon", location.longitude().to_string()),
        ("radius", radius_m.to_string()),
    ]
}
