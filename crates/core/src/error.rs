use bundlerepo_api::ParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid version range: {0}")]
    Range(#[from] ParseError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Problems with the persisted fingerprint index.
///
/// Loading recovers from all of these by starting with an empty cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error on cache index {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode cache index: {0}")]
    Decode(String),
    #[error("Failed to encode cache index: {0}")]
    Encode(String),
    #[error("Cache index has format version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

impl CacheError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
