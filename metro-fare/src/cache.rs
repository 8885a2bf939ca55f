//! Caching layer for per-origin search results.
//!
//! The network never changes while the server runs, so a reachability map
//! is valid for as long as it stays in the cache. Entries still expire so
//! that memory use stays bounded under a wide spread of origins.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::StationId;
use crate::network::MetroNetwork;
use crate::planner::{Reachability, SearchError, search_all};

/// Configuration for the result cache.
#[derive(Debug, Clone)]
pub struct ResultCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached origins.
    pub max_capacity: u64,
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 512,
        }
    }
}

/// Search front end that memoizes reachability per origin.
///
/// Searches run on the blocking thread pool so they never stall the
/// async runtime.
pub struct CachedSearch {
    network: Arc<MetroNetwork>,
    results: MokaCache<StationId, Arc<Reachability>>,
}

impl CachedSearch {
    /// Create a new cached search over `network`.
    pub fn new(network: Arc<MetroNetwork>, config: &ResultCacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { network, results }
    }

    /// Reachability from `origin`, computed on first use.
    pub async fn reachability(&self, origin: StationId) -> Result<Arc<Reachability>, SearchError> {
        if !self.network.contains(&origin) {
            return Err(SearchError::UnknownOrigin(origin));
        }

        if let Some(cached) = self.results.get(&origin).await {
            debug!(origin = %origin, "Result cache hit");
            return Ok(cached);
        }

        let network = Arc::clone(&self.network);
        let reachability = tokio::task::spawn_blocking(move || {
            search_all(&network, origin, network.free_distance())
        })
        .await
        .map_err(|e| SearchError::Worker(e.to_string()))?;

        let entry = Arc::new(reachability);
        self.results.insert(origin, Arc::clone(&entry)).await;

        Ok(entry)
    }

    /// The network searches run against.
    pub fn network(&self) -> &Arc<MetroNetwork> {
        &self.network
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.results.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.results.invalidate_all();
    }
}
