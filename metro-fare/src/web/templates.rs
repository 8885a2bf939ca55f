//! Askama templates for the web frontend.

use askama::Template;

use crate::planner::{ReachableStation, group_by_line};

/// Home page with the query form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub station_count: usize,
    pub line_count: usize,
}

/// Reachable stations fragment (AJAX response, no base.html).
#[derive(Template)]
#[template(path = "reachable.html")]
pub struct ReachableTemplate {
    pub origin: String,
    pub fare: Option<u32>,
    pub groups: Vec<LineGroupView>,
    pub count: usize,
}

impl ReachableTemplate {
    pub fn new(origin: String, fare: Option<u32>, stations: &[ReachableStation]) -> Self {
        let groups = group_by_line(stations)
            .into_iter()
            .map(|group| LineGroupView {
                line: group.line,
                stations: group.stations.iter().map(StationView::from_station).collect(),
            })
            .collect();

        Self {
            origin,
            fare,
            groups,
            count: stations.len(),
        }
    }
}

/// A line heading and its stations.
#[derive(Debug, Clone)]
pub struct LineGroupView {
    pub line: String,
    pub stations: Vec<StationView>,
}

/// Station view model for templates.
#[derive(Debug, Clone)]
pub struct StationView {
    pub name: String,
    pub distance: String,
    pub fare: u32,
    pub path: String,
    pub lines: String,
}

impl StationView {
    pub fn from_station(station: &ReachableStation) -> Self {
        Self {
            name: station.name.clone(),
            distance: format_distance(station.distance),
            fare: station.fare,
            path: station.path_text(),
            lines: station.lines_text(),
        }
    }
}

/// Meters as `850 m` or `12.3 km`.
fn format_distance(meters: u64) -> String {
    if meters < 1_000 {
        format!("{meters} m")
    } else {
        format!("{}.{} km", meters / 1_000, (meters % 1_000) / 100)
    }
}
