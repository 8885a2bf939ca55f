//! Domain types for the metro fare planner.
//!
//! Identifiers are validated at construction time, so code that receives
//! these types can trust their validity.

mod station_id;

pub use station_id::{InvalidStationId, StationId};
