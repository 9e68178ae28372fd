//! Tool-level errors.

use crate::geocode::GeocodeError;
use crate::onebusaway::TransitError;
use crate::pathfind::PathError;

/// Why a tool call failed. The display text is what the caller sees.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A caller-supplied argument was rejected before any request was made.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParam { name: &'static str, message: String },

    #[error(transparent)]
    Transit(#[from] TransitError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl ToolError {
    pub(crate) fn invalid(name: &'static str, message: impl ToString) -> Self {
        ToolError::InvalidParam {
            name,
            message: message.to_string(),
        }
    }
}
