//! Successor lookups driving the path search.

use std::collections::BTreeMap;
use std::future::Future;

use crate::domain::{InvalidId, StopId};

use super::error::PathError;

/// Source of one-hop successors for a stop.
///
/// This abstraction allows the search to run against a fixed table in
/// tests and against the live transit API in production.
pub trait Successors {
    /// Stops reachable from `stop` in one hop.
    fn successors(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Vec<StopId>, PathError>> + Send;
}

/// Successors from a fixed adjacency table.
///
/// Stops missing from the table have no successors.
#[derive(Debug, Clone, Default)]
pub struct TableSuccessors {
    edges: BTreeMap<StopId, Vec<StopId>>,
}

impl TableSuccessors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge `from -> to`.
    pub fn with_edge(mut self, from: StopId, to: StopId) -> Self {
        self.edges.entry(from).or_default().push(to);
        self
    }

    /// Build a table from `(from, [to, ...])` rows of raw ids.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = (&'a str, &'a [&'a str])>,
    ) -> Result<Self, InvalidId> {
        let mut table = Self::new();
        for (from, tos) in rows {
            let from = StopId::parse(from)?;
            let entry = table.edges.entry(from).or_default();
            for to in tos {
                entry.push(StopId::parse(to)?);
            }
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl Successors for TableSuccessors {
    async fn successors(&self, stop: &StopId) -> Result<Vec<StopId>, PathError> {
        Ok(self.edges.get(stop).cloned().unwrap_or_default())
    }
}

/// The six-stop demonstration graph.
///
/// ```text
/// S -> B, A, D
/// A -> C, F, B
/// B -> E
/// C -> E
/// D -> E
/// F -> D
/// ```
pub fn toy_graph() -> Result<TableSuccessors, InvalidId> {
    const EDGES: [(&str, &str); 10] = [
        ("S", "B"),
        ("S", "A"),
        ("S", "D"),
        ("A", "C"),
        ("A", "F"),
        ("A", "B"),
        ("B", "E"),
        ("C", "E"),
        ("D", "E"),
        ("F", "D"),
    ];

    EDGES
        .iter()
        .try_fold(TableSuccessors::new(), |table, (from, to)| {
            Ok(table.with_edge(StopId::parse(from)?, StopId::parse(to)?))
        })
}
