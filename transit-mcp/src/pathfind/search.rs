//! Breadth-first expansion and backtracking path reconstruction.
//!
//! The search runs in two phases:
//!
//! 1. **Expansion.** A FIFO queue seeded with the start stop. Each popped
//!    stop that has not been expanded yet asks the [`Successors`] source for
//!    its successors, records itself as a predecessor of each, and enqueues
//!    them all. The result is a [`ReachabilityMap`] from each reached stop to
//!    the set of stops it was reached from.
//!
//! 2. **Reconstruction.** Starting at the end stop, walk predecessor sets
//!    back to the start, emitting every simple path found. A stop already on
//!    the partial path is never revisited, so cycles in the graph cannot
//!    produce repeated stops or non-termination. Walks are repeated for each
//!    path length in turn, so a `max_paths` cut keeps the shortest paths.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use tracing::debug;

use crate::domain::StopId;

use super::error::PathError;
use super::successors::Successors;

/// Bounds on a path search. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stops first reached this many hops from the start are recorded but
    /// not expanded further.
    pub max_depth: Option<usize>,

    /// Fail with [`PathError::LimitExceeded`] rather than expand more than
    /// this many stops.
    pub max_visited: Option<usize>,

    /// Keep at most this many paths, shortest first.
    pub max_paths: Option<usize>,
}

impl SearchLimits {
    /// No limits: the search runs until the reachable graph is exhausted.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_visited(mut self, visited: usize) -> Self {
        self.max_visited = Some(visited);
        self
    }

    pub fn with_max_paths(mut self, paths: usize) -> Self {
        self.max_paths = Some(paths);
        self
    }
}

/// Predecessor sets built during expansion.
///
/// A stop is a key only once some expanded stop has listed it as a
/// successor. The start stop is therefore absent unless the graph has a
/// cycle back to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachabilityMap {
    predecessors: BTreeMap<StopId, BTreeSet<StopId>>,
    expanded: usize,
}

impl ReachabilityMap {
    /// Stops `stop` was reached from, if it was reached at all.
    pub fn predecessors(&self, stop: &StopId) -> Option<&BTreeSet<StopId>> {
        self.predecessors.get(stop)
    }

    pub fn contains(&self, stop: &StopId) -> bool {
        self.predecessors.contains_key(stop)
    }

    /// Number of reached stops.
    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Number of stops whose successors were fetched.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn record(&mut self, from: &StopId, to: StopId) {
        self.predecessors.entry(to).or_default().insert(from.clone());
    }
}

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSearch {
    /// Every simple path found, each running from start to end.
    pub paths: Vec<Vec<StopId>>,

    /// Number of stops whose successors were fetched.
    pub stops_expanded: usize,

    /// True if more paths exist than `max_paths` allowed.
    pub truncated: bool,
}

/// Build the reachability map from `start`.
pub async fn expand<S>(
    successors: &S,
    start: &StopId,
    limits: &SearchLimits,
) -> Result<ReachabilityMap, PathError>
where
    S: Successors + Sync,
{
    let mut map = ReachabilityMap::default();
    let mut visited: HashSet<StopId> = HashSet::new();
    let mut queue: VecDeque<(StopId, usize)> = VecDeque::new();
    queue.push_back((start.clone(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if visited.contains(&current) {
            continue;
        }

        if limits.max_depth.is_some_and(|max| depth >= max) {
            visited.insert(current);
            continue;
        }

        if let Some(limit) = limits.max_visited {
            if map.expanded >= limit {
                return Err(PathError::LimitExceeded { limit });
            }
        }

        let next = successors.successors(&current).await?;
        map.expanded += 1;

        for successor in next {
            map.record(&current, successor.clone());
            queue.push_back((successor, depth + 1));
        }

        visited.insert(current);
    }

    debug!(
        start = %start,
        reached = map.len(),
        expanded = map.expanded,
        "expansion complete"
    );

    Ok(map)
}

/// Reconstruct every simple path from `start` to `end`.
///
/// Paths are returned shortest first, ties broken by stop ids. With
/// `max_paths`, the second value reports whether further paths were left
/// out. When the cut falls inside one length, which of the equal-length
/// paths survive follows predecessor order.
pub fn reconstruct(
    map: &ReachabilityMap,
    start: &StopId,
    end: &StopId,
    max_paths: Option<usize>,
) -> Result<(Vec<Vec<StopId>>, bool), PathError> {
    if start == end {
        return Ok((vec![vec![start.clone()]], false));
    }

    if !map.contains(end) {
        return Err(PathError::NoPathFound {
            start: start.clone(),
            end: end.clone(),
        });
    }

    let mut paths: Vec<Vec<StopId>> = Vec::new();
    let mut truncated = false;

    // A simple path visits each reached stop at most once, plus the start.
    for length in 2..=map.len() + 1 {
        let room = max_paths.map(|max| max.saturating_sub(paths.len()));

        // One path beyond `room` is enough to know the list is cut.
        let mut walk = Backtrack::new(map, start, length, room.map(|r| r + 1));
        walk.visit(end);

        let mut found = walk.paths;
        found.sort();

        if let Some(room) = room {
            if found.len() > room {
                found.truncate(room);
                paths.extend(found);
                truncated = true;
                break;
            }
        }
        paths.extend(found);

        if !walk.longer {
            break;
        }
    }

    if paths.is_empty() && !truncated {
        return Err(PathError::NoPathFound {
            start: start.clone(),
            end: end.clone(),
        });
    }

    Ok((paths, truncated))
}

/// Find every simple path from `start` to `end`.
pub async fn find_paths<S>(
    successors: &S,
    start: &StopId,
    end: &StopId,
    limits: &SearchLimits,
) -> Result<PathSearch, PathError>
where
    S: Successors + Sync,
{
    let map = expand(successors, start, limits).await?;
    let (paths, truncated) = reconstruct(&map, start, end, limits.max_paths)?;

    debug!(start = %start, end = %end, paths = paths.len(), truncated, "path search complete");

    Ok(PathSearch {
        paths,
        stops_expanded: map.expanded(),
        truncated,
    })
}

/// Depth-first walk over predecessor sets from the end stop, collecting
/// paths of exactly `length` stops.
///
/// `trail` holds the stops visited so far, end first.
struct Backtrack<'a> {
    map: &'a ReachabilityMap,
    start: &'a StopId,
    length: usize,
    cap: Option<usize>,
    trail: Vec<StopId>,
    on_trail: HashSet<StopId>,
    paths: Vec<Vec<StopId>>,
    /// Some trail was cut at `length` with predecessors left to follow.
    longer: bool,
}

impl<'a> Backtrack<'a> {
    fn new(
        map: &'a ReachabilityMap,
        start: &'a StopId,
        length: usize,
        cap: Option<usize>,
    ) -> Self {
        Self {
            map,
            start,
            length,
            cap,
            trail: Vec::new(),
            on_trail: HashSet::new(),
            paths: Vec::new(),
            longer: false,
        }
    }

    fn visit(&mut self, current: &StopId) {
        if self.cap.is_some_and(|cap| self.paths.len() >= cap) {
            return;
        }

        let stops = self.trail.len() + 1;

        if current == self.start {
            if stops == self.length {
                let mut path = Vec::with_capacity(stops);
                path.push(current.clone());
                path.extend(self.trail.iter().rev().cloned());
                self.paths.push(path);
            }
            return;
        }

        let map = self.map;
        let Some(predecessors) = map.predecessors(current) else {
            return;
        };

        if stops >= self.length {
            self.longer = true;
            return;
        }

        self.trail.push(current.clone());
        self.on_trail.insert(current.clone());

        for predecessor in predecessors {
            if !self.on_trail.contains(predecessor) {
                self.visit(predecessor);
            }
        }

        self.on_trail.remove(current);
        self.trail.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfind::successors::{TableSuccessors, toy_graph};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn id(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    fn path(s: &str) -> Vec<StopId> {
        s.split('-').map(id).collect()
    }

    fn toy() -> TableSuccessors {
        toy_graph().unwrap()
    }

    fn table(rows: &[(&str, &[&str])]) -> TableSuccessors {
        TableSuccessors::from_rows(rows.iter().copied()).unwrap()
    }

    /// Counts lookups and fails for one chosen stop.
    struct Counting {
        inner: TableSuccessors,
        calls: AtomicUsize,
        fail_on: Option<StopId>,
    }

    impl Successors for Counting {
        async fn successors(&self, stop: &StopId) -> Result<Vec<StopId>, PathError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_ref() == Some(stop) {
                return Err(PathError::Successors {
                    stop: stop.clone(),
                    message: "upstream down".to_string(),
                });
            }
            self.inner.successors(stop).await
        }
    }

    #[tokio::test]
    async fn toy_graph_finds_all_five_paths() {
        let result = find_paths(&toy(), &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap();

        let found: BTreeSet<Vec<StopId>> = result.paths.iter().cloned().collect();
        let expected: BTreeSet<Vec<StopId>> = ["S-B-E", "S-A-B-E", "S-A-C-E", "S-D-E", "S-A-F-D-E"]
            .into_iter()
            .map(path)
            .collect();

        assert_eq!(found, expected);
        assert_eq!(result.paths.len(), 5);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn paths_are_shortest_first() {
        let result = find_paths(&toy(), &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap();

        assert_eq!(result.paths[0], path("S-B-E"));
        assert_eq!(result.paths[1], path("S-D-E"));
        assert_eq!(result.paths.last().unwrap(), &path("S-A-F-D-E"));
    }

    #[tokio::test]
    async fn toy_graph_expands_each_stop_once() {
        let counting = Counting {
            inner: toy(),
            calls: AtomicUsize::new(0),
            fail_on: None,
        };
        find_paths(&counting, &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap();

        // S, A, B, C, D, E, F: B, D and E are enqueued repeatedly
        assert_eq!(counting.calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn reachability_map_records_predecessors() {
        let map = expand(&toy(), &id("S"), &SearchLimits::unbounded())
            .await
            .unwrap();

        let preds: Vec<&StopId> = map.predecessors(&id("E")).unwrap().iter().collect();
        assert_eq!(preds, vec![&id("B"), &id("C"), &id("D")]);

        let preds: Vec<&StopId> = map.predecessors(&id("B")).unwrap().iter().collect();
        assert_eq!(preds, vec![&id("A"), &id("S")]);

        assert!(!map.contains(&id("S")));
        assert_eq!(map.len(), 6);
    }

    #[tokio::test]
    async fn unreachable_end_is_no_path() {
        let graph = table(&[("S", &["A"]), ("A", &["B"]), ("X", &["E"])]);
        let err = find_paths(&graph, &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PathError::NoPathFound {
                start: id("S"),
                end: id("E"),
            }
        );
    }

    #[tokio::test]
    async fn unknown_start_is_no_path() {
        let err = find_paths(&toy(), &id("Z"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap_err();
        assert!(matches!(err, PathError::NoPathFound { .. }));
    }

    #[tokio::test]
    async fn start_equals_end() {
        let result = find_paths(&toy(), &id("S"), &id("S"), &SearchLimits::unbounded())
            .await
            .unwrap();
        assert_eq!(result.paths, vec![vec![id("S")]]);
    }

    #[tokio::test]
    async fn cycles_terminate_with_simple_paths() {
        // A <-> B cycle, plus a cycle back to the start.
        let graph = table(&[
            ("S", &["A"]),
            ("A", &["B", "S"]),
            ("B", &["A", "E"]),
            ("E", &["S"]),
        ]);

        let result = find_paths(&graph, &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap();

        assert_eq!(result.paths, vec![path("S-A-B-E")]);
    }

    #[tokio::test]
    async fn dense_cycle_yields_every_simple_path() {
        let graph = table(&[
            ("S", &["A", "B"]),
            ("A", &["B", "E"]),
            ("B", &["A", "E"]),
        ]);

        let result = find_paths(&graph, &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap();

        let found: BTreeSet<Vec<StopId>> = result.paths.into_iter().collect();
        let expected: BTreeSet<Vec<StopId>> = ["S-A-E", "S-B-E", "S-A-B-E", "S-B-A-E"]
            .into_iter()
            .map(path)
            .collect();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn max_depth_stops_expansion() {
        let limits = SearchLimits::unbounded().with_max_depth(2);

        // S-A-F-D-E needs four hops; E is still reachable in two.
        let result = find_paths(&toy(), &id("S"), &id("E"), &limits)
            .await
            .unwrap();
        assert!(result.paths.iter().all(|p| p.len() <= 4));
        assert!(result.paths.contains(&path("S-B-E")));

        let limits = SearchLimits::unbounded().with_max_depth(1);
        let err = find_paths(&toy(), &id("S"), &id("E"), &limits)
            .await
            .unwrap_err();
        assert!(matches!(err, PathError::NoPathFound { .. }));
    }

    #[tokio::test]
    async fn max_visited_fails_search() {
        let limits = SearchLimits::unbounded().with_max_visited(3);
        let err = find_paths(&toy(), &id("S"), &id("E"), &limits)
            .await
            .unwrap_err();
        assert_eq!(err, PathError::LimitExceeded { limit: 3 });
    }

    #[tokio::test]
    async fn max_visited_at_exact_size_succeeds() {
        let limits = SearchLimits::unbounded().with_max_visited(7);
        let result = find_paths(&toy(), &id("S"), &id("E"), &limits).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn max_paths_keeps_the_shortest() {
        let limits = SearchLimits::unbounded().with_max_paths(2);
        let result = find_paths(&toy(), &id("S"), &id("E"), &limits)
            .await
            .unwrap();
        assert_eq!(result.paths, vec![path("S-B-E"), path("S-D-E")]);
        assert!(result.truncated);

        let limits = SearchLimits::unbounded().with_max_paths(3);
        let result = find_paths(&toy(), &id("S"), &id("E"), &limits)
            .await
            .unwrap();
        assert_eq!(
            result.paths,
            vec![path("S-B-E"), path("S-D-E"), path("S-A-B-E")]
        );
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn max_paths_equal_to_path_count_is_not_truncated() {
        let limits = SearchLimits::unbounded().with_max_paths(5);
        let result = find_paths(&toy(), &id("S"), &id("E"), &limits)
            .await
            .unwrap();
        assert_eq!(result.paths.len(), 5);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn dead_end_cycle_does_not_count_as_more_paths() {
        // E <-> Z adds predecessors to E without adding any path.
        let graph = table(&[("S", &["A"]), ("A", &["E"]), ("E", &["Z"]), ("Z", &["E"])]);
        let limits = SearchLimits::unbounded().with_max_paths(1);

        let result = find_paths(&graph, &id("S"), &id("E"), &limits)
            .await
            .unwrap();

        assert_eq!(result.paths, vec![path("S-A-E")]);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn successor_failure_propagates() {
        let counting = Counting {
            inner: toy(),
            calls: AtomicUsize::new(0),
            fail_on: Some(id("A")),
        };
        let err = find_paths(&counting, &id("S"), &id("E"), &SearchLimits::unbounded())
            .await
            .unwrap_err();

        assert!(matches!(err, PathError::Successors { stop, .. } if stop == id("A")));
    }
}
