//! Transit stops.

use serde::Serialize;

use super::{Location, RouteId, StopId};

/// A physical boarding location, as reported by the transit API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    /// Rider-facing stop code, when the agency publishes one.
    pub code: Option<String>,
    /// Compass direction of travel (e.g. "N", "SW").
    pub direction: Option<String>,
    pub location: Location,
    pub route_ids: Vec<RouteId>,
}

/// A stop together with its distance from some reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopWithDistance {
    #[serde(flatten)]
    pub stop: Stop,
    pub distance_m: f64,
}

/// Annotate stops with their great-circle distance from `reference`,
/// nearest first.
pub fn annotate_distances(reference: &Location, stops: Vec<Stop>) -> Vec<StopWithDistance> {
    let mut annotated: Vec<StopWithDistance> = stops
        .into_iter()
        .map(|stop| StopWithDistance {
            distance_m: reference.distance_m(&stop.location),
            stop,
        })
        .collect();

    annotated.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    annotated
}
