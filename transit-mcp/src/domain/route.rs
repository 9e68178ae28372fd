//! Transit routes.

use serde::Serialize;

use super::{RouteId, Stop, StopId};

/// A transit line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
    pub agency_id: Option<String>,
    /// GTFS route type (3 = bus, 0 = tram, ...).
    pub route_type: Option<i32>,
    pub url: Option<String>,
    pub color: Option<String>,
}

impl Route {
    /// Best human-readable name: short name, then long name, then the id.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// One direction of travel along a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Direction {
    pub id: String,
    /// Headsign-style name, e.g. "Downtown Seattle".
    pub name: Option<String>,
    /// Stops in travel order.
    pub stop_ids: Vec<StopId>,
}

/// The stops served by a route, grouped by direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStops {
    pub route_id: RouteId,
    pub stops: Vec<Stop>,
    pub directions: Vec<Direction>,
    /// Encoded polylines; empty unless requested.
    pub polylines: Vec<String>,
}

impl RouteStops {
    /// Stops that immediately follow `stop` in any direction of this route.
    pub fn next_stops(&self, stop: &StopId) -> Vec<StopId> {
        self.directions
            .iter()
            .flat_map(|d| d.stop_ids.windows(2))
            .filter(|pair| &pair[0] == stop)
            .map(|pair| pair[1].clone())
            .collect()
    }
}

/// A route with the stops it serves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetails {
    pub route: Route,
    pub stops: Vec<Stop>,
    pub directions: Vec<Direction>,
    /// Encoded polylines; empty unless requested.
    pub polylines: Vec<String>,
}

impl RouteDetails {
    pub fn new(route: Route, stops: RouteStops) -> Self {
        Self {
            route,
            stops: stops.stops,
            directions: stops.directions,
            polylines: stops.polylines,
        }
    }
}
