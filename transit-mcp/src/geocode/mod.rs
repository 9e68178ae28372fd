//! Address geocoding via Nominatim (OpenStreetMap).
//!
//! A search that matches nothing yields [`GeocodeOutcome::NotFound`]
//! rather than an error.

mod client;
mod error;

pub use client::{
    DEFAULT_BASE_URL, GeocodeOutcome, GeocodedPlace, NominatimClient, NominatimConfig,
    default_user_agent,
};
pub use error::GeocodeError;
