//! MCP tool surface.
//!
//! Each tool validates its arguments, makes its upstream call(s) and
//! returns pretty-printed JSON. Failures come back as MCP error results
//! whose text names the failure, never as protocol errors.

mod dto;
mod error;
mod service;

pub use dto::*;
pub use error::ToolError;
pub use service::TransitTools;
