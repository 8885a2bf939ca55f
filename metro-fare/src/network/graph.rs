//! Stations, edges and lines of a loaded metro network.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::domain::StationId;

/// A single physical connection to a neighboring station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Length of the connection in meters.
    pub distance_m: u32,
}

impl Edge {
    pub fn new(distance_m: u32) -> Self {
        Self { distance_m }
    }
}

/// A station and its outgoing connections.
///
/// A (station, neighbor) pair may carry several parallel edges, e.g. two
/// lines running over different tracks between the same stops.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    edges: HashMap<StationId, Vec<Edge>>,
}

impl Station {
    /// Create a station with no connections.
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            edges: HashMap::new(),
        }
    }

    /// Add one outgoing edge. Existing edges to the same neighbor are kept.
    pub fn add_edge(&mut self, to: StationId, distance_m: u32) {
        self.edges.entry(to).or_default().push(Edge::new(distance_m));
    }

    /// Iterate over neighbors together with every edge leading to them.
    pub fn neighbors(&self) -> impl Iterator<Item = (StationId, &[Edge])> + '_ {
        self.edges.iter().map(|(id, edges)| (*id, edges.as_slice()))
    }

    /// All edges leading to `to`; empty if the stations are not adjacent.
    pub fn edges_to(&self, to: &StationId) -> &[Edge] {
        self.edges.get(to).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct neighbors.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// A named line and the stations it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub name: String,
    pub stations: Vec<StationId>,
}

impl Line {
    pub fn new(name: impl Into<String>, stations: Vec<StationId>) -> Self {
        Self {
            name: name.into(),
            stations,
        }
    }

    /// Whether the line serves the given station.
    pub fn serves(&self, id: &StationId) -> bool {
        self.stations.contains(id)
    }
}

/// An edge whose neighbor does not exist in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingEdge {
    pub from: StationId,
    pub to: StationId,
}

/// An immutable, fully materialized metro network.
///
/// Besides the graph itself the network carries the pricing offset
/// (`free_distance`) and a name index for resolving user input.
#[derive(Debug, Clone)]
pub struct MetroNetwork {
    stations: HashMap<StationId, Station>,
    names: HashMap<String, StationId>,
    lines: Vec<Line>,
    free_distance: i64,
}

impl MetroNetwork {
    /// Build a network, indexing stations by their display names.
    ///
    /// When two stations share a name, the name resolves to whichever
    /// was listed first.
    pub fn new(stations: Vec<Station>, lines: Vec<Line>, free_distance: i64) -> Self {
        let mut names = HashMap::with_capacity(stations.len());
        for station in &stations {
            names.entry(station.name.clone()).or_insert(station.id);
        }
        Self::from_parts(stations, names, lines, free_distance)
    }

    /// Build a network with an explicit name index.
    pub fn from_parts(
        stations: Vec<Station>,
        names: HashMap<String, StationId>,
        lines: Vec<Line>,
        free_distance: i64,
    ) -> Self {
        let stations = stations.into_iter().map(|s| (s.id, s)).collect();
        Self {
            stations,
            names,
            lines,
            free_distance,
        }
    }

    /// Look up a station by identifier.
    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Whether the identifier names a station in this network.
    pub fn contains(&self, id: &StationId) -> bool {
        self.stations.contains_key(id)
    }

    /// Iterate over all stations, in no particular order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> + '_ {
        self.stations.values()
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the network has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Distance offset (meters) subtracted before fare banding.
    pub fn free_distance(&self) -> i64 {
        self.free_distance
    }

    /// Resolve a display name to a station identifier.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for unknown names.
    pub fn station_id_by_name(&self, name: &str) -> Option<StationId> {
        self.names.get(name.trim()).copied()
    }

    /// Display name of a station, or the identifier's text if it is unknown.
    pub fn station_name(&self, id: &StationId) -> Cow<'_, str> {
        match self.stations.get(id) {
            Some(station) => Cow::Borrowed(station.name.as_str()),
            None => Cow::Owned(id.to_string()),
        }
    }

    /// Names of every line serving the station, in line order.
    pub fn lines_for(&self, id: &StationId) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|line| line.serves(id))
            .map(|line| line.name.as_str())
            .collect()
    }

    /// Stations whose name contains `query`, shortest names first.
    pub fn search_names(&self, query: &str, limit: usize) -> Vec<&Station> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&Station> = self
            .stations
            .values()
            .filter(|s| s.name.contains(query))
            .collect();
        matches.sort_by(|a, b| {
            a.name
                .chars()
                .count()
                .cmp(&b.name.chars().count())
                .then_with(|| a.name.cmp(&b.name))
        });
        matches.truncate(limit);
        matches
    }

    /// Edges pointing at stations that are not part of the network.
    ///
    /// The search tolerates such edges; this is for callers that want to
    /// report them.
    pub fn dangling_edges(&self) -> Vec<DanglingEdge> {
        let mut dangling = Vec::new();
        for station in self.stations.values() {
            for (to, _) in station.neighbors() {
                if !self.stations.contains_key(&to) {
                    dangling.push(DanglingEdge {
                        from: station.id,
                        to,
                    });
                }
            }
        }
        dangling
    }
}
