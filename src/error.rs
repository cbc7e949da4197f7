//! Error types for dataset loading and mesh cache I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dataset and cache operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised at the I/O boundary. Geometry code never fails; it
/// returns empty meshes or `None` instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] simd_json::Error),

    /// The input is JSON but not a GeoJSON object.
    #[error("document is not a GeoJSON object")]
    NotGeoJson,

    /// The cache file was written by an incompatible version.
    #[error("unsupported mesh cache version {found} (expected {expected})")]
    CacheVersion { found: u32, expected: u32 },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
