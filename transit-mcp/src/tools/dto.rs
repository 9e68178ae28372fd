//! Tool parameters and results.
//!
//! Parameter structs carry the JSON schema advertised to clients. Their
//! `validate` methods turn raw arguments into domain values, rejecting bad
//! input as [`ToolError::InvalidParam`] before anything goes over the wire.

use chrono::{DateTime, Utc};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::domain::{Location, Route, RouteId, StopId, StopWithDistance};
use crate::onebusaway::ArrivalsQuery;
use crate::pathfind::SearchLimits;

use super::error::ToolError;

pub const DEFAULT_RADIUS_M: u32 = 500;
pub const MAX_RADIUS_M: u32 = 10_000;

/// One day either side of the query time.
pub const MAX_WINDOW_MINUTES: u32 = 1_440;

pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const MAX_DEPTH_LIMIT: usize = 20;
pub const DEFAULT_MAX_PATHS: usize = 10;
pub const MAX_PATHS_LIMIT: usize = 100;

/// Cap on stops expanded by a single path search.
pub const MAX_STOPS_EXPANDED: usize = 200;

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GeocodeParams {
    #[schemars(description = "Free-form address or place name, e.g. '400 Broad St, Seattle'")]
    pub address: String,
}

impl GeocodeParams {
    pub fn validate(&self) -> Result<&str, ToolError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ToolError::invalid("address", "must not be blank"));
        }
        Ok(address)
    }
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct NearbyParams {
    #[schemars(description = "Latitude in decimal degrees (-90 to 90)")]
    pub latitude: f64,

    #[schemars(description = "Longitude in decimal degrees (-180 to 180)")]
    pub longitude: f64,

    #[schemars(description = "Search radius in metres (1-10000, default 500)")]
    pub radius_m: Option<u32>,
}

impl NearbyParams {
    pub fn validate(&self) -> Result<(Location, u32), ToolError> {
        let location = Location::new(self.latitude, self.longitude)
            .map_err(|e| ToolError::invalid("latitude/longitude", e))?;

        let radius = self.radius_m.unwrap_or(DEFAULT_RADIUS_M);
        if radius == 0 || radius > MAX_RADIUS_M {
            return Err(ToolError::invalid(
                "radius_m",
                format!("must be between 1 and {MAX_RADIUS_M}"),
            ));
        }

        Ok((location, radius))
    }
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ArrivalsParams {
    #[schemars(description = "Stop id, e.g. '1_75403'")]
    pub stop_id: String,

    #[schemars(description = "Include vehicles up to this many minutes in the past (default 5)")]
    pub minutes_before: Option<u32>,

    #[schemars(description = "Include vehicles up to this many minutes ahead (default 35)")]
    pub minutes_after: Option<u32>,

    #[schemars(description = "Query as of this RFC 3339 timestamp instead of now")]
    pub time: Option<String>,
}

impl ArrivalsParams {
    pub fn validate(&self) -> Result<(StopId, ArrivalsQuery), ToolError> {
        let stop = StopId::parse(&self.stop_id).map_err(|e| ToolError::invalid("stop_id", e))?;

        let defaults = ArrivalsQuery::default();
        let minutes_before = self.minutes_before.unwrap_or(defaults.minutes_before);
        let minutes_after = self.minutes_after.unwrap_or(defaults.minutes_after);

        if minutes_before > MAX_WINDOW_MINUTES {
            return Err(ToolError::invalid(
                "minutes_before",
                format!("must be at most {MAX_WINDOW_MINUTES}"),
            ));
        }
        if minutes_after > MAX_WINDOW_MINUTES {
            return Err(ToolError::invalid(
                "minutes_after",
                format!("must be at most {MAX_WINDOW_MINUTES}"),
            ));
        }

        let time = match self.time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| {
                        ToolError::invalid("time", format!("{raw:?} is not RFC 3339: {e}"))
                    })?
                    .with_timezone(&Utc),
            ),
        };

        Ok((
            stop,
            ArrivalsQuery {
                minutes_before,
                minutes_after,
                time,
            },
        ))
    }
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct RouteDetailsParams {
    #[schemars(description = "Route id, e.g. '1_100224'")]
    pub route_id: String,

    #[schemars(description = "Include encoded polylines for drawing the route (default false)")]
    pub include_polylines: Option<bool>,
}

impl RouteDetailsParams {
    pub fn validate(&self) -> Result<(RouteId, bool), ToolError> {
        let route = RouteId::parse(&self.route_id).map_err(|e| ToolError::invalid("route_id", e))?;
        Ok((route, self.include_polylines.unwrap_or(false)))
    }
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct StopPathsParams {
    #[schemars(description = "Stop id to start from")]
    pub start_stop_id: String,

    #[schemars(description = "Stop id to reach")]
    pub end_stop_id: String,

    #[schemars(description = "Maximum number of hops to explore (1-20, default 6)")]
    pub max_depth: Option<usize>,

    #[schemars(description = "Maximum number of paths to return (1-100, default 10)")]
    pub max_paths: Option<usize>,
}

impl StopPathsParams {
    pub fn validate(&self) -> Result<(StopId, StopId, SearchLimits), ToolError> {
        let start = StopId::parse(&self.start_stop_id)
            .map_err(|e| ToolError::invalid("start_stop_id", e))?;
        let end =
            StopId::parse(&self.end_stop_id).map_err(|e| ToolError::invalid("end_stop_id", e))?;

        let depth = self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        if depth == 0 || depth > MAX_DEPTH_LIMIT {
            return Err(ToolError::invalid(
                "max_depth",
                format!("must be between 1 and {MAX_DEPTH_LIMIT}"),
            ));
        }

        let paths = self.max_paths.unwrap_or(DEFAULT_MAX_PATHS);
        if paths == 0 || paths > MAX_PATHS_LIMIT {
            return Err(ToolError::invalid(
                "max_paths",
                format!("must be between 1 and {MAX_PATHS_LIMIT}"),
            ));
        }

        let limits = SearchLimits::unbounded()
            .with_max_depth(depth)
            .with_max_paths(paths)
            .with_max_visited(MAX_STOPS_EXPANDED);

        Ok((start, end, limits))
    }
}

/// Result of `find_nearby_stops`.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyStops {
    pub location: Location,
    pub radius_m: u32,
    /// Nearest first.
    pub stops: Vec<StopWithDistance>,
    pub limit_exceeded: bool,
    pub out_of_range: bool,
}

/// Result of `find_nearby_routes`.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyRoutes {
    pub location: Location,
    pub radius_m: u32,
    pub routes: Vec<Route>,
    pub limit_exceeded: bool,
    pub out_of_range: bool,
}

/// Result of `find_stop_paths`.
#[derive(Debug, Clone, Serialize)]
pub struct StopPaths {
    pub start: StopId,
    pub end: StopId,
    pub paths: Vec<Vec<StopId>>,
    pub stops_expanded: usize,
    /// More paths exist than were returned.
    pub truncated: bool,
}
