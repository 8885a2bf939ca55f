//! Fluent construction of small networks.

use std::collections::HashMap;

use crate::domain::StationId;

use super::graph::{Line, MetroNetwork, Station};

/// Builder for assembling a [`MetroNetwork`] by hand.
///
/// Edges may be declared before or after their stations. Edges leaving an
/// undeclared station are dropped; edges pointing at an undeclared station
/// are kept as dangling edges.
///
/// # Example
///
/// ```
/// use metro_fare::domain::StationId;
/// use metro_fare::network::NetworkBuilder;
///
/// let network = NetworkBuilder::new()
///     .station(1, "A")
///     .station(2, "B")
///     .link(1, 2, 1200)
///     .line("Line 1", &[1, 2])
///     .build();
///
/// assert_eq!(network.len(), 2);
/// assert_eq!(network.lines_for(&StationId::new(2)), vec!["Line 1"]);
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    stations: Vec<Station>,
    edges: Vec<(u32, u32, u32)>,
    lines: Vec<Line>,
    free_distance: i64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a station.
    pub fn station(mut self, id: u32, name: &str) -> Self {
        self.stations.push(Station::new(StationId::new(id), name));
        self
    }

    /// Add a one-way edge.
    pub fn edge(mut self, from: u32, to: u32, distance_m: u32) -> Self {
        self.edges.push((from, to, distance_m));
        self
    }

    /// Add an edge in both directions with the same length.
    pub fn link(self, a: u32, b: u32, distance_m: u32) -> Self {
        self.edge(a, b, distance_m).edge(b, a, distance_m)
    }

    /// Declare a line serving the given stations.
    pub fn line(mut self, name: &str, stations: &[u32]) -> Self {
        let stations = stations.iter().copied().map(StationId::new).collect();
        self.lines.push(Line::new(name, stations));
        self
    }

    /// Set the network-wide free distance (meters).
    pub fn free_distance(mut self, meters: i64) -> Self {
        self.free_distance = meters;
        self
    }

    pub fn build(self) -> MetroNetwork {
        let mut stations = self.stations;
        let positions: HashMap<StationId, usize> = stations
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.id, idx))
            .collect();

        for (from, to, distance_m) in self.edges {
            if let Some(&idx) = positions.get(&StationId::new(from)) {
                stations[idx].add_edge(StationId::new(to), distance_m);
            }
        }

        MetroNetwork::new(stations, self.lines, self.free_distance)
    }
}
