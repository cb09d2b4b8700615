use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of one fingerprinted archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntrySummary {
    pub hash: String,
    pub path: String,
    pub size_bytes: u64,
    pub mtime_millis: u64,
    pub symbolic_name: String,
    pub version: String,
}

/// Statistics for the fingerprint cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub cache_file: Option<PathBuf>,
}

/// Service interface for managing a persisted fingerprint index
pub trait FingerprintIndex {
    /// Get cache statistics
    fn stats(&self) -> CacheStats;

    /// All entries, sorted by path
    fn entries(&self) -> Vec<CachedEntrySummary>;

    /// Find an entry by hash (full or prefix)
    fn find_by_hash_prefix(&self, hash_prefix: &str) -> Option<CachedEntrySummary>;

    /// Drop every entry, in memory and on disk
    fn clear(&mut self) -> Result<(), String>;
}
