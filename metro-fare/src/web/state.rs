//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CachedSearch, ResultCacheConfig};
use crate::network::MetroNetwork;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The loaded network
    pub network: Arc<MetroNetwork>,

    /// Memoized per-origin searches
    pub search: Arc<CachedSearch>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(network: MetroNetwork, results: &ResultCacheConfig) -> Self {
        let network = Arc::new(network);
        let search = CachedSearch::new(Arc::clone(&network), results);
        Self {
            network,
            search: Arc::new(search),
        }
    }
}
