//! Conversion from dataset wire types into the network model.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::StationId;
use crate::network::{Line, MetroNetwork, Station};

use super::error::DatasetError;
use super::types::MetroDataDto;

impl TryFrom<MetroDataDto> for MetroNetwork {
    type Error = DatasetError;

    /// Validate identifiers and edge lengths and build the network.
    ///
    /// Edges pointing at stations missing from the dataset are kept; the
    /// search ignores them. The name index is the dataset's own, completed
    /// with the names of any stations it does not mention.
    fn try_from(data: MetroDataDto) -> Result<Self, Self::Error> {
        let mut stations = Vec::with_capacity(data.sta_dict.len());

        for (raw_id, dto) in data.sta_dict {
            let id = StationId::parse(&raw_id)?;
            let mut station = Station::new(id, dto.name);

            for (raw_neighbor, edges) in dto.edges {
                let neighbor = StationId::parse(&raw_neighbor)?;
                for edge in edges {
                    let distance = u32::try_from(edge.dis)
                        .ok()
                        .filter(|d| *d > 0)
                        .ok_or_else(|| DatasetError::InvalidEdge {
                            from: raw_id.clone(),
                            to: raw_neighbor.clone(),
                            distance: edge.dis,
                        })?;
                    station.add_edge(neighbor, distance);
                }
            }

            stations.push(station);
        }

        let mut names: HashMap<String, StationId> = data
            .sta_to_id
            .into_iter()
            .map(|(name, raw)| (name, StationId::new(raw)))
            .collect();
        for station in &stations {
            names
                .entry(station.name.clone())
                .or_insert(station.id);
        }

        let lines: Vec<Line> = data
            .line_detail
            .into_values()
            .map(|dto| Line::new(dto.name, dto.sta_list.into_iter().map(StationId::new).collect()))
            .collect();

        let network = MetroNetwork::from_parts(stations, names, lines, data.free_dis);

        let dangling = network.dangling_edges();
        if !dangling.is_empty() {
            warn!(
                count = dangling.len(),
                "Dataset has edges to unknown stations; they will be ignored"
            );
        }
        debug!(
            stations = network.len(),
            lines = network.lines().len(),
            free_distance = network.free_distance(),
            "Converted dataset"
        );

        Ok(network)
    }
}
