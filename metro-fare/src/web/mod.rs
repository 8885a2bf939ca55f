//! Web layer for the fare explorer.
//!
//! Provides HTTP endpoints for station lookup and fare reachability.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
