//! In-memory metro network.
//!
//! The network is loaded once and never mutated while searches run
//! against it. Construction from the remote dataset lives in
//! [`crate::dataset`]; tests build networks with [`NetworkBuilder`].

mod builder;
mod graph;

pub use builder::NetworkBuilder;
pub use graph::{DanglingEdge, Edge, Line, MetroNetwork, Station};
