//! Path finder error types.

use crate::domain::StopId;

/// Error from a path search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// `end` was never reached from `start`.
    #[error("no path from {start} to {end}")]
    NoPathFound { start: StopId, end: StopId },

    /// The successor lookup for a stop failed.
    #[error("failed to fetch successors of {stop}: {message}")]
    Successors { stop: StopId, message: String },

    /// The expansion tried to expand more stops than allowed.
    #[error("search expanded more than {limit} stops")]
    LimitExceeded { limit: usize },
}
