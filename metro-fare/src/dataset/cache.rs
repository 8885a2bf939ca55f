//! Local snapshot of the last downloaded dataset.
//!
//! A snapshot remembers the URL it was downloaded from and when. It is only
//! trusted if it came from the URL currently configured and still converts
//! into a valid network. Snapshots past their TTL are not discarded: the
//! loader falls back to them when a fresh download fails.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::network::MetroNetwork;

use super::error::DatasetError;
use super::types::MetroDataDto;

/// Snapshots are refreshed daily.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the dataset snapshot.
#[derive(Debug, Clone)]
pub struct DatasetCacheConfig {
    pub path: PathBuf,
    /// Age after which a snapshot is only used as a fallback.
    pub ttl: Duration,
}

impl DatasetCacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for DatasetCacheConfig {
    fn default() -> Self {
        Self::new("farecalc_cache.json")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    source: String,
    fetched_at: DateTime<Utc>,
    data: MetroDataDto,
}

/// A network restored from a snapshot.
#[derive(Debug)]
pub struct CachedNetwork {
    pub network: MetroNetwork,
    pub fetched_at: DateTime<Utc>,
    /// Whether the snapshot is younger than the configured TTL.
    pub fresh: bool,
}

/// Snapshot store for one dataset URL.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    config: DatasetCacheConfig,
    source: String,
}

impl DatasetCache {
    /// A snapshot store for documents downloaded from `source`.
    pub fn new(config: DatasetCacheConfig, source: impl Into<String>) -> Self {
        Self {
            config,
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Restore the snapshot, fresh or stale.
    ///
    /// Missing, unreadable, foreign or invalid snapshots yield `None`.
    pub fn read(&self) -> Option<CachedNetwork> {
        self.read_at(Utc::now())
    }

    fn read_at(&self, now: DateTime<Utc>) -> Option<CachedNetwork> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let snapshot: Snapshot = match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.config.path.display(), error = %e, "Ignoring unreadable dataset snapshot");
                return None;
            }
        };

        if snapshot.source != self.source {
            debug!(
                snapshot = %snapshot.source,
                configured = %self.source,
                "Dataset snapshot is from another source"
            );
            return None;
        }

        let network = match MetroNetwork::try_from(snapshot.data) {
            Ok(network) => network,
            Err(e) => {
                warn!(path = %self.config.path.display(), error = %e, "Ignoring invalid dataset snapshot");
                return None;
            }
        };

        // A timestamp in the future counts as brand new.
        let age = (now - snapshot.fetched_at).to_std().unwrap_or_default();

        Some(CachedNetwork {
            network,
            fetched_at: snapshot.fetched_at,
            fresh: age < self.config.ttl,
        })
    }

    /// Replace the snapshot with `data`, downloaded just now.
    ///
    /// The document is written beside the snapshot and renamed over it, so
    /// a concurrent reader never sees a half-written file.
    pub fn write(&self, data: &MetroDataDto) -> Result<(), DatasetError> {
        let path = &self.config.path;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| DatasetError::CacheWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let snapshot = SnapshotRef {
            source: &self.source,
            fetched_at: Utc::now(),
            data,
        };

        let partial = path.with_extension("partial");
        let io_err = |source: std::io::Error| DatasetError::CacheWrite {
            path: partial.clone(),
            source,
        };
        let mut writer = BufWriter::new(File::create(&partial).map_err(io_err)?);
        serde_json::to_writer(&mut writer, &snapshot).map_err(|e| io_err(e.into()))?;
        writer.flush().map_err(io_err)?;
        drop(writer);

        std::fs::rename(&partial, path).map_err(|source| DatasetError::CacheWrite {
            path: path.clone(),
            source,
        })
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    source: &'a str,
    fetched_at: DateTime<Utc>,
    data: &'a MetroDataDto,
}
