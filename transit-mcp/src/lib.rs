//! Transit lookup tool server.
//!
//! An MCP server that answers questions like "which buses stop near this
//! address, and when is the next one?" by calling the OneBusAway transit
//! API and the Nominatim geocoder.

pub mod config;
pub mod domain;
pub mod geocode;
pub mod http;
pub mod onebusaway;
pub mod pathfind;
pub mod tools;
