//! OneBusAway `where` API client.
//!
//! This module provides an HTTP client for the OneBusAway REST API, which
//! serves stop, route and real-time arrival information for a deployment
//! (Puget Sound by default).
//!
//! Key characteristics of the API:
//! - Every request carries the API key as the `key` query parameter
//! - Responses are wrapped in an envelope whose `code` mirrors HTTP status
//! - Related stops and routes arrive in a shared `references` section
//!   rather than inline
//! - Times are epoch milliseconds, with `0` meaning "no prediction"

mod client;
mod convert;
mod dump;
mod error;
mod types;

pub use client::{
    ArrivalsQuery, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, OneBusAwayClient, OneBusAwayConfig,
};
pub use convert::{
    Listing, route_entry, route_listing, route_stops, stop_arrivals, stop_entry, stop_listing,
};
pub use dump::DebugDump;
pub use error::TransitError;
