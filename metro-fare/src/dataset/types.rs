//! Wire types of the fare dataset JSON.
//!
//! The dataset is a single document:
//!
//! ```json
//! {
//!   "staDict": { "1": { "name": "Xizhimen", "edges": { "2": [{ "dis": 1899 }] } } },
//!   "staToId": { "Xizhimen": 1 },
//!   "freeDis": 0,
//!   "lineDetail": { "1": { "name": "Line 2", "staList": [1, 2] } }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// The complete dataset document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroDataDto {
    /// Stations keyed by textual station id.
    pub sta_dict: HashMap<String, StationDto>,

    /// Station name to id index.
    #[serde(default)]
    pub sta_to_id: HashMap<String, u32>,

    /// Free distance in meters.
    #[serde(default)]
    pub free_dis: i64,

    /// Lines keyed by an arbitrary line key.
    #[serde(default)]
    pub line_detail: BTreeMap<String, LineDto>,
}

/// A station and its outgoing edges, keyed by neighbor id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationDto {
    pub name: String,
    #[serde(default)]
    pub edges: HashMap<String, Vec<EdgeDto>>,
}

/// One edge, with its length in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeDto {
    pub dis: i64,
}

/// A line and the ids of the stations it serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub name: String,
    #[serde(default)]
    pub sta_list: Vec<u32>,
}
