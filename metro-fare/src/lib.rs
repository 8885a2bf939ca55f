//! Metro fare explorer.
//!
//! Given a metro network with distance-priced fares, answers: "which
//! stations can I reach from here for exactly this fare?"

pub mod batch;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod fare;
pub mod network;
pub mod planner;
pub mod web;
