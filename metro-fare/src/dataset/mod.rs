//! Acquisition of the network dataset.
//!
//! The network is published as one JSON document. It can be read from a
//! local file, from a snapshot of a previous download, or fetched over
//! HTTP. Whatever the source, the document is validated and converted
//! into an immutable [`MetroNetwork`] before any search runs.

mod cache;
mod client;
mod convert;
mod error;
mod types;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::network::MetroNetwork;

pub use cache::{CachedNetwork, DatasetCache, DatasetCacheConfig};
pub use client::{DEFAULT_DATA_URL, DatasetClient, DatasetClientConfig};
pub use error::DatasetError;
pub use types::{EdgeDto, LineDto, MetroDataDto, StationDto};

/// Where to get the dataset from.
#[derive(Debug, Clone, Default)]
pub struct DatasetConfig {
    /// Remote source.
    pub client: DatasetClientConfig,
    /// Snapshot of the last download; `None` disables it.
    pub cache: Option<DatasetCacheConfig>,
    /// Local document that replaces the remote source entirely.
    pub local_file: Option<PathBuf>,
}

/// Parse a dataset document.
pub fn parse(json: &str) -> Result<MetroDataDto, DatasetError> {
    serde_json::from_str(json).map_err(|e| DatasetError::Json {
        message: e.to_string(),
    })
}

/// Read a dataset document from disk.
pub fn read_file(path: &Path) -> Result<MetroDataDto, DatasetError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DatasetError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse(&contents)
}

/// Load and convert the network.
///
/// A configured local file wins. Otherwise a fresh snapshot of the
/// configured URL is used, and failing that the dataset is downloaded and
/// the snapshot replaced. If the download fails, a stale snapshot is
/// better than nothing. Failing to write the snapshot is logged but not
/// fatal.
pub async fn load_network(config: &DatasetConfig) -> Result<MetroNetwork, DatasetError> {
    if let Some(path) = &config.local_file {
        info!(path = %path.display(), "Loading dataset from file");
        return MetroNetwork::try_from(read_file(path)?);
    }

    let cache = config
        .cache
        .clone()
        .map(|c| DatasetCache::new(c, config.client.url.clone()));

    let stale = match cache.as_ref().and_then(DatasetCache::read) {
        Some(cached) if cached.fresh => {
            info!(fetched_at = %cached.fetched_at, "Loaded dataset from snapshot");
            return Ok(cached.network);
        }
        other => other,
    };

    match download(config, cache.as_ref()).await {
        Ok(network) => Ok(network),
        Err(e) => match stale {
            Some(cached) => {
                warn!(
                    error = %e,
                    fetched_at = %cached.fetched_at,
                    "Download failed, using stale dataset snapshot"
                );
                Ok(cached.network)
            }
            None => Err(e),
        },
    }
}

async fn download(
    config: &DatasetConfig,
    cache: Option<&DatasetCache>,
) -> Result<MetroNetwork, DatasetError> {
    let client = DatasetClient::new(config.client.clone())?;
    info!(url = client.url(), "Fetching dataset");
    let data = client.fetch().await?;
    let network = MetroNetwork::try_from(data.clone())?;

    // Only documents that convert are worth keeping.
    if let Some(cache) = cache
        && let Err(e) = cache.write(&data)
    {
        warn!(path = %cache.path().display(), error = %e, "Failed to write dataset snapshot");
    }

    Ok(network)
}
