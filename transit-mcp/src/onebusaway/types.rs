//! OneBusAway API response DTOs.
//!
//! These map directly onto the JSON the `where` API returns. Every response
//! is wrapped in an envelope whose `data` holds either a `list` or a single
//! `entry`, plus a `references` section with the stops, routes and agencies
//! mentioned elsewhere in the payload. Fields the API sometimes omits are
//! `Option` or defaulted; the API also likes to send `""` for "no value".

use serde::Deserialize;

/// Top-level response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<D> {
    /// Application-level status; mirrors HTTP codes (200, 404, ...).
    pub code: u16,

    /// Server time in epoch milliseconds.
    pub current_time: Option<i64>,

    /// Status text ("OK", "resource not found", ...).
    pub text: Option<String>,

    pub version: Option<u32>,

    /// Absent or null when `code` is not 200.
    pub data: Option<D>,
}

/// `data` of list endpoints (`stops-for-location`, `routes-for-location`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListData<T> {
    pub list: Vec<T>,

    /// True if the result was truncated by the server.
    #[serde(default)]
    pub limit_exceeded: bool,

    /// True if the query location is outside the deployment's coverage.
    #[serde(default)]
    pub out_of_range: bool,

    #[serde(default)]
    pub references: References,
}

/// `data` of single-entity endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryData<T> {
    pub entry: T,

    #[serde(default)]
    pub references: References,
}

/// Entities referenced from elsewhere in the response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct References {
    #[serde(default)]
    pub stops: Vec<StopEntry>,

    #[serde(default)]
    pub routes: Vec<RouteEntry>,

    #[serde(default)]
    pub agencies: Vec<AgencyEntry>,
}

/// A stop record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEntry {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub direction: Option<String>,

    #[serde(default)]
    pub route_ids: Vec<String>,

    /// GTFS location type (0 = stop, 1 = station).
    pub location_type: Option<i32>,

    pub wheelchair_boarding: Option<String>,
}

/// A route record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub id: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
    pub agency_id: Option<String>,

    #[serde(rename = "type")]
    pub route_type: Option<i32>,

    pub url: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
}

/// An agency record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyEntry {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub timezone: Option<String>,
}

/// `entry` of `arrivals-and-departures-for-stop`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsEntry {
    pub stop_id: String,

    #[serde(default)]
    pub arrivals_and_departures: Vec<ArrivalDepartureEntry>,

    #[serde(default)]
    pub nearby_stop_ids: Vec<String>,
}

/// One arrival/departure event.
///
/// Times are epoch milliseconds; predicted times are `0` when the vehicle
/// is not reporting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalDepartureEntry {
    pub route_id: String,
    pub trip_id: String,
    pub route_short_name: Option<String>,
    pub trip_headsign: Option<String>,

    #[serde(default)]
    pub scheduled_arrival_time: i64,

    #[serde(default)]
    pub predicted_arrival_time: i64,

    #[serde(default)]
    pub scheduled_departure_time: i64,

    #[serde(default)]
    pub predicted_departure_time: i64,

    #[serde(default)]
    pub predicted: bool,

    pub status: Option<String>,
    pub number_of_stops_away: Option<i64>,
    pub distance_from_stop: Option<f64>,
    pub vehicle_id: Option<String>,
}

/// `entry` of `stops-for-route`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopsForRouteEntry {
    pub route_id: String,

    #[serde(default)]
    pub stop_ids: Vec<String>,

    #[serde(default)]
    pub stop_groupings: Vec<StopGrouping>,

    #[serde(default)]
    pub polylines: Vec<EncodedPolyline>,
}

/// A way of partitioning a route's stops, normally by direction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopGrouping {
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Whether `stop_ids` within each group are in travel order.
    #[serde(default)]
    pub ordered: bool,

    #[serde(default)]
    pub stop_groups: Vec<StopGroup>,
}

/// One group (direction) within a grouping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopGroup {
    pub id: String,
    pub name: Option<StopGroupName>,

    #[serde(default)]
    pub stop_ids: Vec<String>,

    #[serde(default)]
    pub polylines: Vec<EncodedPolyline>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopGroupName {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Google-encoded polyline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPolyline {
    pub points: String,
    pub length: Option<u32>,
    pub levels: Option<String>,
}
