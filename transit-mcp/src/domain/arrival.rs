//! Arrival and departure events at a stop.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RouteId, StopId};

/// A scheduled (and possibly predicted) vehicle visit to a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalDeparture {
    pub route_id: RouteId,
    pub trip_id: String,
    pub route_short_name: Option<String>,
    pub trip_headsign: Option<String>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub predicted_arrival: Option<DateTime<Utc>>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub predicted_departure: Option<DateTime<Utc>>,
    /// Whether real-time data backs the predicted times.
    pub predicted: bool,
    pub status: Option<String>,
    pub number_of_stops_away: Option<i64>,
    pub distance_from_stop_m: Option<f64>,
    pub vehicle_id: Option<String>,
}

impl ArrivalDeparture {
    /// Predicted arrival if available, otherwise scheduled.
    pub fn best_arrival(&self) -> Option<DateTime<Utc>> {
        self.predicted_arrival.or(self.scheduled_arrival)
    }

    /// Predicted departure if available, otherwise scheduled.
    pub fn best_departure(&self) -> Option<DateTime<Utc>> {
        self.predicted_departure.or(self.scheduled_departure)
    }
}

/// Arrivals and departures for one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopArrivals {
    pub stop_id: StopId,
    /// Server time the board was generated at.
    pub current_time: Option<DateTime<Utc>>,
    pub arrivals_and_departures: Vec<ArrivalDeparture>,
    pub nearby_stop_ids: Vec<StopId>,
}
