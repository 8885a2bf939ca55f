//! Single-source shortest-distance search.
//!
//! A Dijkstra variant with lazy deletion: every edge relaxation pushes a
//! fresh candidate onto the frontier, and candidates for stations that
//! were already finalized are discarded when they surface. Parallel edges
//! between the same pair of stations each produce their own candidate.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use tracing::{debug, trace};

use crate::domain::StationId;
use crate::fare::fare;
use crate::network::MetroNetwork;

use super::reach::{ReachableStation, reachable_stations};

/// Error from a reachability search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The origin is not a station of the network
    #[error("unknown origin station {0}")]
    UnknownOrigin(StationId),

    /// The search was cancelled before it finished
    #[error("search cancelled")]
    Cancelled,

    /// The worker running the search failed
    #[error("search worker failed: {0}")]
    Worker(String),
}

/// Shortest route from the origin to one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Total length in meters.
    pub distance: u64,

    /// Fare for `distance`.
    pub fare: u32,

    /// Stations visited, origin first and destination last.
    pub path: Vec<StationId>,
}

/// Every station reachable from one origin, keyed by station.
pub type Reachability = HashMap<StationId, SearchResult>;

/// Shared flag for aborting an in-flight search.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every search observing this flag.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Frontier entry: a candidate distance to a station.
///
/// The path is not stored; `via` names the finalized station the candidate
/// was pushed from, and the path is rebuilt from it on finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    distance: u64,
    station: StationId,
    via: Option<StationId>,
}

// Min-heap by distance
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other.distance.cmp(&self.distance)
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the shortest route from `origin` to every reachable station.
///
/// The origin is always present with distance 0 and path `[origin]`, even
/// if it is not a station of the network (in which case nothing else is
/// reached). Stations that cannot be reached are absent. Edges pointing at
/// stations missing from the network are ignored.
pub fn search_all(network: &MetroNetwork, origin: StationId, free_distance: i64) -> Reachability {
    run(network, origin, free_distance, || false).unwrap_or_default()
}

/// Like [`search_all`], but checks `cancel` before every frontier extraction.
///
/// A cancelled search returns [`SearchError::Cancelled`] and no partial
/// results.
pub fn search_all_cancellable(
    network: &MetroNetwork,
    origin: StationId,
    free_distance: i64,
    cancel: &CancelFlag,
) -> Result<Reachability, SearchError> {
    run(network, origin, free_distance, || cancel.is_cancelled())
}

fn run<F>(
    network: &MetroNetwork,
    origin: StationId,
    free_distance: i64,
    cancelled: F,
) -> Result<Reachability, SearchError>
where
    F: Fn() -> bool,
{
    let mut result: Reachability = HashMap::new();
    let mut visited: HashSet<StationId> = HashSet::new();
    let mut frontier = BinaryHeap::new();
    let mut pops = 0usize;
    let mut stale = 0usize;

    frontier.push(Candidate {
        distance: 0,
        station: origin,
        via: None,
    });

    while let Some(current) = frontier.pop() {
        if cancelled() {
            debug!(origin = %origin, settled = result.len(), "Search cancelled");
            return Err(SearchError::Cancelled);
        }
        pops += 1;

        if !visited.insert(current.station) {
            stale += 1;
            continue;
        }

        let mut path = match current.via.and_then(|via| result.get(&via)) {
            Some(previous) => previous.path.clone(),
            None => Vec::new(),
        };
        path.push(current.station);

        trace!(
            station = %current.station,
            distance = current.distance,
            "Finalized station"
        );

        result.insert(
            current.station,
            SearchResult {
                distance: current.distance,
                fare: fare(current.distance, free_distance),
                path,
            },
        );

        let Some(station) = network.station(&current.station) else {
            continue;
        };

        for (neighbor, edges) in station.neighbors() {
            if visited.contains(&neighbor) || !network.contains(&neighbor) {
                continue;
            }
            for edge in edges {
                frontier.push(Candidate {
                    distance: current.distance + u64::from(edge.distance_m),
                    station: neighbor,
                    via: Some(current.station),
                });
            }
        }
    }

    debug!(
        origin = %origin,
        reached = result.len(),
        pops,
        stale,
        "Search complete"
    );

    Ok(result)
}

/// Query front end over a loaded network.
///
/// Unlike the free functions, the planner rejects origins that are not part
/// of the network and always prices with the network's own free distance.
pub struct Planner<'a> {
    network: &'a MetroNetwork,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(network: &'a MetroNetwork) -> Self {
        Self { network }
    }

    /// Shortest routes from `origin` to every reachable station.
    pub fn search(&self, origin: StationId) -> Result<Reachability, SearchError> {
        self.check_origin(origin)?;
        Ok(search_all(
            self.network,
            origin,
            self.network.free_distance(),
        ))
    }

    /// Stations reachable from `origin`, optionally only those costing
    /// exactly `fare`.
    pub fn reachable(
        &self,
        origin: StationId,
        fare: Option<u32>,
    ) -> Result<Vec<ReachableStation>, SearchError> {
        let reachability = self.search(origin)?;
        Ok(reachable_stations(
            self.network,
            origin,
            &reachability,
            fare,
        ))
    }

    fn check_origin(&self, origin: StationId) -> Result<(), SearchError> {
        if self.network.contains(&origin) {
            Ok(())
        } else {
            Err(SearchError::UnknownOrigin(origin))
        }
    }
}
