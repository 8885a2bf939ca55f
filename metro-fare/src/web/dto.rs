//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::network::Station;
use crate::planner::ReachableStation;

/// Request to search stations by name.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Substring of the station name
    pub q: String,

    /// Maximum number of matches (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A station in name search results.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub id: String,
    pub name: String,
}

impl StationSummary {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
        }
    }
}

/// Response to a station name search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationSummary>,
}

/// Request for stations reachable from an origin.
#[derive(Debug, Deserialize)]
pub struct ReachableRequest {
    /// Origin station name
    pub from: String,

    /// Exact fare to filter on; all destinations when absent
    pub fare: Option<u32>,
}

/// A reachable destination.
#[derive(Debug, Serialize)]
pub struct ReachableResult {
    pub id: String,
    pub name: String,
    pub distance: u64,
    pub fare: u32,
    pub path: Vec<String>,
    pub lines: Vec<String>,
}

impl ReachableResult {
    pub fn from_station(station: &ReachableStation) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            distance: station.distance,
            fare: station.fare,
            path: station.path.clone(),
            lines: station.lines.clone(),
        }
    }
}

/// Response listing reachable destinations.
#[derive(Debug, Serialize)]
pub struct ReachableResponse {
    pub origin: String,
    pub fare: Option<u32>,
    pub count: usize,
    pub stations: Vec<ReachableResult>,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
