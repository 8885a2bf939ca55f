//! Dataset loading error types.

use std::path::PathBuf;

use crate::domain::InvalidStationId;

/// Errors that can occur while acquiring or converting the network dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("dataset server error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse dataset JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to read a local dataset file
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Failed to write the dataset snapshot
    #[error("failed to write dataset snapshot {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A station identifier in the dataset is malformed
    #[error(transparent)]
    InvalidStationId(#[from] InvalidStationId),

    /// An edge has a non-positive length
    #[error("edge {from} -> {to} has invalid length {distance}")]
    InvalidEdge { from: String, to: String, distance: i64 },
}
