//! Fare reachability planner.
//!
//! This module answers: "starting from this station, which stations can I
//! reach for exactly this fare, and how?"
//!
//! [`search_all`] finds the shortest route to every reachable station;
//! [`reachable_stations`] prices, filters and resolves those routes into
//! names and lines.

mod reach;
mod search;


pub use reach::{
    LineGroup, PATH_SEPARATOR, ReachableStation, UNKNOWN_LINE, group_by_line, reachable_stations,
};
pub use search::{
    CancelFlag, Planner, Reachability, SearchError, SearchResult, search_all,
    search_all_cancellable,
};
