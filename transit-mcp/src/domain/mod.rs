//! Domain types for transit lookups.
//!
//! Values here are produced from upstream API data or validated caller
//! input; construction enforces their invariants so downstream code can
//! trust them.

mod arrival;
mod ids;
mod location;
mod route;
mod stop;

pub use arrival::{ArrivalDeparture, StopArrivals};
pub use ids::{InvalidId, RouteId, StopId};
pub use location::{InvalidLocation, Location};
pub use route::{Direction, Route, RouteDetails, RouteStops};
pub use stop::{Stop, StopWithDistance, annotate_distances};
