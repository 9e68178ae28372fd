//! Stop-to-stop path search.
//!
//! Given a start and an end stop, finds every simple path between them by
//! breadth-first expansion over a [`Successors`] source followed by
//! backtracking over the recorded predecessors. The same search runs against
//! a fixed table ([`TableSuccessors`]) or live route data
//! ([`RouteSuccessors`]).

mod error;
mod search;
mod successors;
mod upstream;

pub use error::PathError;
pub use search::{PathSearch, ReachabilityMap, SearchLimits, expand, find_paths, reconstruct};
pub use successors::{Successors, TableSuccessors, toy_graph};
pub use upstream::RouteSuccessors;
