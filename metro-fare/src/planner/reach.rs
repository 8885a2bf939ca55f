//! Turning raw search output into fare-qualified answers.

use crate::domain::StationId;
use crate::network::MetroNetwork;

use super::search::Reachability;

/// Group name for stations that belong to no known line.
pub const UNKNOWN_LINE: &str = "unknown";

/// Separator between station names in a rendered path.
pub const PATH_SEPARATOR: &str = " -> ";

/// A destination reachable from the origin, resolved for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableStation {
    pub id: StationId,
    pub name: String,
    pub distance: u64,
    pub fare: u32,
    /// Station names along the route, origin first.
    pub path: Vec<String>,
    /// Lines serving the destination, in line order.
    pub lines: Vec<String>,
}

impl ReachableStation {
    /// The route as `A -> B -> C`.
    pub fn path_text(&self) -> String {
        self.path.join(PATH_SEPARATOR)
    }

    /// Line names joined by commas, or [`UNKNOWN_LINE`] when there are none.
    pub fn lines_text(&self) -> String {
        if self.lines.is_empty() {
            UNKNOWN_LINE.to_string()
        } else {
            self.lines.join(", ")
        }
    }
}

/// Reachable stations sharing a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGroup {
    pub line: String,
    pub stations: Vec<ReachableStation>,
}

/// Resolve a reachability map into presentable destinations.
///
/// The origin itself is never reported. When `fare_filter` is set only
/// destinations whose fare equals it exactly are kept. Results are ordered
/// by distance, then name.
pub fn reachable_stations(
    network: &MetroNetwork,
    origin: StationId,
    reachability: &Reachability,
    fare_filter: Option<u32>,
) -> Vec<ReachableStation> {
    let mut stations: Vec<ReachableStation> = reachability
        .iter()
        .filter(|(id, _)| **id != origin)
        .filter(|(_, result)| fare_filter.is_none_or(|target| result.fare == target))
        .map(|(id, result)| ReachableStation {
            id: *id,
            name: network.station_name(id).into_owned(),
            distance: result.distance,
            fare: result.fare,
            path: result
                .path
                .iter()
                .map(|step| network.station_name(step).into_owned())
                .collect(),
            lines: network
                .lines_for(id)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    stations.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.name.cmp(&b.name))
    });
    stations
}

/// Group stations by line.
///
/// A transfer station appears under every line serving it; stations with
/// no line go under [`UNKNOWN_LINE`]. Groups appear in the order their
/// first station is encountered.
pub fn group_by_line(stations: &[ReachableStation]) -> Vec<LineGroup> {
    let mut groups: Vec<LineGroup> = Vec::new();

    for station in stations {
        let keys: Vec<&str> = if station.lines.is_empty() {
            vec![UNKNOWN_LINE]
        } else {
            station.lines.iter().map(String::as_str).collect()
        };

        for key in keys {
            match groups.iter_mut().find(|g| g.line == key) {
                Some(group) => group.stations.push(station.clone()),
                None => groups.push(LineGroup {
                    line: key.to_string(),
                    stations: vec![station.clone()],
                }),
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use crate::planner::SearchResult;

    fn id(raw: u32) -> StationId {
        StationId::new(raw)
    }

    fn network() -> MetroNetwork {
        NetworkBuilder::new()
            .station(1, "Origin")
            .station(2, "Bell")
            .station(3, "Cedar")
            .station(4, "Dock")
            .line("Red", &[1, 2, 3])
            .line("Blue", &[3])
            .build()
    }

    fn result(distance: u64, fare: u32, path: &[u32]) -> SearchResult {
        SearchResult {
            distance,
            fare,
            path: path.iter().copied().map(id).collect(),
        }
    }

    fn reachability() -> Reachability {
        [
            (id(1), result(0, 3, &[1])),
            (id(2), result(2_000, 3, &[1, 2])),
            (id(3), result(7_000, 4, &[1, 2, 3])),
            (id(4), result(5_000, 3, &[1, 4])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn exact_fare_filter_excludes_origin() {
        let network = network();
        let stations = reachable_stations(&network, id(1), &reachability(), Some(3));

        let ids: Vec<StationId> = stations.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![id(2), id(4)]);
    }

    #[test]
    fn filter_is_exact_not_upper_bound() {
        let network = network();
        let stations = reachable_stations(&network, id(1), &reachability(), Some(4));

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Cedar");
    }

    #[test]
    fn no_filter_keeps_everything_but_origin() {
        let network = network();
        let stations = reachable_stations(&network, id(1), &reachability(), None);

        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bell", "Dock", "Cedar"]);
    }

    #[test]
    fn unmatched_filter_is_empty() {
        let network = network();
        assert!(reachable_stations(&network, id(1), &reachability(), Some(9)).is_empty());
    }

    #[test]
    fn paths_and_lines_are_resolved() {
        let network = network();
        let stations = reachable_stations(&network, id(1), &reachability(), Some(4));
        let cedar = &stations[0];

        assert_eq!(cedar.path, vec!["Origin", "Bell", "Cedar"]);
        assert_eq!(cedar.path_text(), "Origin -> Bell -> Cedar");
        assert_eq!(cedar.lines, vec!["Red", "Blue"]);
        assert_eq!(cedar.lines_text(), "Red, Blue");
    }

    #[test]
    fn station_without_lines_uses_placeholder() {
        let network = network();
        let stations = reachable_stations(&network, id(1), &reachability(), None);
        let dock = stations.iter().find(|s| s.name == "Dock").unwrap();

        assert!(dock.lines.is_empty());
        assert_eq!(dock.lines_text(), UNKNOWN_LINE);
    }

    #[test]
    fn grouping_repeats_transfer_stations() {
        let network = network();
        let stations = reachable_stations(&network, id(1), &reachability(), None);
        let groups = group_by_line(&stations);

        let summary: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|g| {
                (
                    g.line.as_str(),
                    g.stations.iter().map(|s| s.name.as_str()).collect(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Red", vec!["Bell", "Cedar"]),
                (UNKNOWN_LINE, vec!["Dock"]),
                ("Blue", vec!["Cedar"]),
            ]
        );
    }

    #[test]
    fn grouping_empty_input() {
        assert!(group_by_line(&[]).is_empty());
    }
}
