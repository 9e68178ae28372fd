//! Conversion from OneBusAway DTOs to domain types.
//!
//! Every failure here is reported as [`TransitError::MalformedResponse`]
//! naming the endpoint, so a response with a missing key or a bad id
//! surfaces as a clear upstream problem rather than a lookup panic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{
    ArrivalDeparture, Direction, Location, Route, RouteId, RouteStops, Stop, StopArrivals, StopId,
};

use super::error::TransitError;
use super::types::{
    ArrivalDepartureEntry, ArrivalsEntry, EntryData, Envelope, ListData, RouteEntry, StopEntry,
    StopsForRouteEntry,
};

/// Result of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// The server truncated the list.
    pub limit_exceeded: bool,
    /// The query location is outside the deployment's coverage area.
    pub out_of_range: bool,
}

/// Unwrap the response envelope and deserialize its `data`.
///
/// Returns the server's `currentTime` alongside the data.
pub(crate) fn decode<D: DeserializeOwned>(
    endpoint: &str,
    value: Value,
) -> Result<(Option<i64>, D), TransitError> {
    let envelope: Envelope<Value> = serde_json::from_value(value)
        .map_err(|e| TransitError::malformed(endpoint, e.to_string()))?;

    if envelope.code != 200 {
        return Err(TransitError::RemoteApi {
            status: envelope.code,
            body: envelope.text.unwrap_or_default(),
        });
    }

    let data = match envelope.data {
        Some(Value::Null) | None => {
            return Err(TransitError::malformed(endpoint, "missing `data`"));
        }
        Some(data) => data,
    };

    let data = serde_json::from_value(data)
        .map_err(|e| TransitError::malformed(endpoint, e.to_string()))?;

    Ok((envelope.current_time, data))
}

/// The API sends `""` where other APIs would omit the field.
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Epoch milliseconds to UTC, with `0` meaning "no value".
fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    if ms == 0 {
        None
    } else {
        DateTime::from_timestamp_millis(ms)
    }
}

fn stop_id(endpoint: &str, s: &str) -> Result<StopId, TransitError> {
    StopId::parse(s).map_err(|e| TransitError::malformed(endpoint, e.to_string()))
}

fn route_id(endpoint: &str, s: &str) -> Result<RouteId, TransitError> {
    RouteId::parse(s).map_err(|e| TransitError::malformed(endpoint, e.to_string()))
}

pub(crate) fn convert_stop(endpoint: &str, entry: StopEntry) -> Result<Stop, TransitError> {
    let location = Location::new(entry.lat, entry.lon)
        .map_err(|e| TransitError::malformed(endpoint, format!("stop {}: {e}", entry.id)))?;

    let route_ids = entry
        .route_ids
        .iter()
        .map(|r| route_id(endpoint, r))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Stop {
        id: stop_id(endpoint, &entry.id)?,
        name: entry.name,
        code: non_empty(entry.code),
        direction: non_empty(entry.direction),
        location,
        route_ids,
    })
}

pub(crate) fn convert_route(endpoint: &str, entry: RouteEntry) -> Result<Route, TransitError> {
    Ok(Route {
        id: route_id(endpoint, &entry.id)?,
        short_name: non_empty(entry.short_name),
        long_name: non_empty(entry.long_name),
        description: non_empty(entry.description),
        agency_id: non_empty(entry.agency_id),
        route_type: entry.route_type,
        url: non_empty(entry.url),
        color: non_empty(entry.color),
    })
}

fn convert_arrival(
    endpoint: &str,
    entry: ArrivalDepartureEntry,
) -> Result<ArrivalDeparture, TransitError> {
    Ok(ArrivalDeparture {
        route_id: route_id(endpoint, &entry.route_id)?,
        trip_id: entry.trip_id,
        route_short_name: non_empty(entry.route_short_name),
        trip_headsign: non_empty(entry.trip_headsign),
        scheduled_arrival: from_millis(entry.scheduled_arrival_time),
        predicted_arrival: from_millis(entry.predicted_arrival_time),
        scheduled_departure: from_millis(entry.scheduled_departure_time),
        predicted_departure: from_millis(entry.predicted_departure_time),
        predicted: entry.predicted,
        status: non_empty(entry.status),
        number_of_stops_away: entry.number_of_stops_away,
        distance_from_stop_m: entry.distance_from_stop,
        vehicle_id: non_empty(entry.vehicle_id),
    })
}

/// `stops-for-location` response to a stop listing.
pub fn stop_listing(endpoint: &str, value: Value) -> Result<Listing<Stop>, TransitError> {
    let (_, data): (_, ListData<StopEntry>) = decode(endpoint, value)?;

    let items = data
        .list
        .into_iter()
        .map(|entry| convert_stop(endpoint, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Listing {
        items,
        limit_exceeded: data.limit_exceeded,
        out_of_range: data.out_of_range,
    })
}

/// `routes-for-location` response to a route listing.
pub fn route_listing(endpoint: &str, value: Value) -> Result<Listing<Route>, TransitError> {
    let (_, data): (_, ListData<RouteEntry>) = decode(endpoint, value)?;

    let items = data
        .list
        .into_iter()
        .map(|entry| convert_route(endpoint, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Listing {
        items,
        limit_exceeded: data.limit_exceeded,
        out_of_range: data.out_of_range,
    })
}

/// `arrivals-and-departures-for-stop` response to a stop board.
pub fn stop_arrivals(endpoint: &str, value: Value) -> Result<StopArrivals, TransitError> {
    let (current_time, data): (_, EntryData<ArrivalsEntry>) = decode(endpoint, value)?;
    let entry = data.entry;

    let arrivals_and_departures = entry
        .arrivals_and_departures
        .into_iter()
        .map(|a| convert_arrival(endpoint, a))
        .collect::<Result<Vec<_>, _>>()?;

    let nearby_stop_ids = entry
        .nearby_stop_ids
        .iter()
        .map(|s| stop_id(endpoint, s))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StopArrivals {
        stop_id: stop_id(endpoint, &entry.stop_id)?,
        current_time: current_time.and_then(from_millis),
        arrivals_and_departures,
        nearby_stop_ids,
    })
}

/// `route/{id}` response to a route.
pub fn route_entry(endpoint: &str, value: Value) -> Result<Route, TransitError> {
    let (_, data): (_, EntryData<RouteEntry>) = decode(endpoint, value)?;
    convert_route(endpoint, data.entry)
}

/// `stop/{id}` response to a stop.
pub fn stop_entry(endpoint: &str, value: Value) -> Result<Stop, TransitError> {
    let (_, data): (_, EntryData<StopEntry>) = decode(endpoint, value)?;
    convert_stop(endpoint, data.entry)
}

/// `stops-for-route/{id}` response to the route's stops and directions.
///
/// Stop records come from the `references` section and are returned in the
/// order of the entry's `stopIds`. Directions come from the first ordered
/// grouping (falling back to the first grouping of any kind).
pub fn route_stops(
    endpoint: &str,
    value: Value,
    include_polylines: bool,
) -> Result<RouteStops, TransitError> {
    let (_, data): (_, EntryData<StopsForRouteEntry>) = decode(endpoint, value)?;
    let entry = data.entry;

    let mut referenced: HashMap<String, StopEntry> = data
        .references
        .stops
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();

    let stops = entry
        .stop_ids
        .iter()
        .map(|id| {
            let stop = referenced.remove(id).ok_or_else(|| {
                TransitError::malformed(endpoint, format!("stop {id} missing from references"))
            })?;
            convert_stop(endpoint, stop)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let grouping = entry
        .stop_groupings
        .iter()
        .find(|g| g.ordered)
        .or(entry.stop_groupings.first());

    let directions = match grouping {
        Some(grouping) => grouping
            .stop_groups
            .iter()
            .map(|group| {
                let stop_ids = group
                    .stop_ids
                    .iter()
                    .map(|s| stop_id(endpoint, s))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Direction {
                    id: group.id.clone(),
                    name: group.name.as_ref().map(|n| n.name.clone()),
                    stop_ids,
                })
            })
            .collect::<Result<Vec<_>, TransitError>>()?,
        None => Vec::new(),
    };

    let polylines = if include_polylines {
        let mut lines: Vec<String> = entry.polylines.iter().map(|p| p.points.clone()).collect();
        if lines.is_empty() {
            if let Some(grouping) = grouping {
                lines = grouping
                    .stop_groups
                    .iter()
                    .flat_map(|g| g.polylines.iter().map(|p| p.points.clone()))
                    .collect();
            }
        }
        lines
    } else {
        Vec::new()
    };

    Ok(RouteStops {
        route_id: route_id(endpoint, &entry.route_id)?,
        stops,
        directions,
        polylines,
    })
}
