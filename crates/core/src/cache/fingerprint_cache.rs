//! Fingerprint cache for content-inspected archives
//!
//! Maps an archive's (path, size, mtime) to the identity read from its manifest,
//! so that unchanged archives are not re-opened across scans or process restarts.
//! The cache is an optimization only: every answer it gives is one the inspector
//! would have given for the same file state.

use super::codec::CacheFormat;
use crate::error::CacheError;
use bundlerepo_api::{ArtifactIdentity, CacheStats, CachedEntrySummary, FingerprintIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use xxhash_rust::xxh3::xxh3_64;

pub const CACHE_FILE_NAME: &str = "bundle.cache";
pub const CURRENT_VERSION: u32 = 1;

/// Key identifying one state of an archive on disk
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Fingerprint {
    pub path: PathBuf,
    pub size: u64,
    pub mtime: u64, // milliseconds since the Unix epoch
}

impl Fingerprint {
    /// Create a Fingerprint from a file path
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let mtime = metadata
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime,
        })
    }

    /// Compute a hash for this fingerprint
    pub fn hash(&self) -> u64 {
        let key_str = format!("{}:{}:{}", self.path.display(), self.size, self.mtime);
        xxh3_64(key_str.as_bytes())
    }
}

/// Cached identity of one archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    pub size: u64,
    pub mtime: u64,
    pub identity: ArtifactIdentity,
}

impl CacheRecord {
    fn matches(&self, fingerprint: &Fingerprint) -> bool {
        self.size == fingerprint.size && self.mtime == fingerprint.mtime
    }

    fn fingerprint(&self, path: &Path) -> Fingerprint {
        Fingerprint {
            path: path.to_path_buf(),
            size: self.size,
            mtime: self.mtime,
        }
    }
}

/// Persisted form of the cache
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheIndexFile {
    pub version: u32,
    pub created_at: u64,
    pub entries: BTreeMap<String, CacheRecord>,
}

impl CacheIndexFile {
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION,
            created_at: unix_now(),
            entries: BTreeMap::new(),
        }
    }
}

impl Default for CacheIndexFile {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub struct FingerprintCache {
    entries: HashMap<PathBuf, CacheRecord>,
    cache_dir: Option<PathBuf>,
    format: CacheFormat,
    created_at: u64,
    dirty: bool,
    hits: u64,
    misses: u64,
    inserts: u64,
}

impl FingerprintCache {
    /// An empty cache that is not bound to a directory
    pub fn new(format: CacheFormat) -> Self {
        Self {
            entries: HashMap::new(),
            cache_dir: None,
            format,
            created_at: unix_now(),
            dirty: false,
            hits: 0,
            misses: 0,
            inserts: 0,
        }
    }

    /// Load the index persisted in `cache_dir`.
    ///
    /// Never fails: a missing, unreadable, corrupt or outdated index yields an
    /// empty cache bound to the same directory.
    pub fn load_from_disk(cache_dir: &Path, format: CacheFormat) -> Self {
        let mut cache = Self::new(format);
        cache.cache_dir = Some(cache_dir.to_path_buf());

        let path = cache_dir.join(CACHE_FILE_NAME);
        if !path.exists() {
            return cache;
        }

        match Self::read_index(&path, format) {
            Ok(index) => {
                cache.created_at = index.created_at;
                cache.entries = index
                    .entries
                    .into_iter()
                    .filter(|(_, record)| !record.identity.symbolic_name.is_empty())
                    .map(|(path, record)| (PathBuf::from(path), record))
                    .collect();
                tracing::info!(
                    "Loaded {} fingerprints from {}",
                    cache.entries.len(),
                    path.display()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring fingerprint cache at {}: {}. Starting empty.",
                    path.display(),
                    e
                );
                // Rewrite on the next flush
                cache.dirty = true;
            }
        }

        cache
    }

    fn read_index(path: &Path, format: CacheFormat) -> Result<CacheIndexFile, CacheError> {
        let bytes = fs::read(path).map_err(|e| CacheError::io(path, e))?;
        let index = format.codec().decode(&bytes)?;
        if index.version != CURRENT_VERSION {
            return Err(CacheError::VersionMismatch {
                found: index.version,
                expected: CURRENT_VERSION,
            });
        }
        Ok(index)
    }

    /// Look up the identity recorded for this exact file state.
    ///
    /// A record for the same path with a different size or mtime is stale; it is
    /// removed and the lookup counts as a miss.
    pub fn get(&mut self, fingerprint: &Fingerprint) -> Option<ArtifactIdentity> {
        let current = self
            .entries
            .get(&fingerprint.path)
            .map(|record| record.matches(fingerprint).then(|| record.identity.clone()));

        match current {
            Some(Some(identity)) => {
                self.hits += 1;
                Some(identity)
            }
            Some(None) => {
                tracing::debug!("Stale fingerprint for {}", fingerprint.path.display());
                self.entries.remove(&fingerprint.path);
                self.dirty = true;
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, fingerprint: Fingerprint, identity: ArtifactIdentity) {
        self.entries.insert(
            fingerprint.path,
            CacheRecord {
                size: fingerprint.size,
                mtime: fingerprint.mtime,
                identity,
            },
        );
        self.inserts += 1;
        self.dirty = true;
    }

    /// Write the index into `cache_dir`, dropping records for files that are gone.
    pub fn persist(&mut self, cache_dir: &Path) -> Result<(), CacheError> {
        self.entries.retain(|path, _| path.exists());

        let index = CacheIndexFile {
            version: CURRENT_VERSION,
            created_at: self.created_at,
            entries: self
                .entries
                .iter()
                .map(|(path, record)| (path.display().to_string(), record.clone()))
                .collect(),
        };
        let bytes = self.format.codec().encode(&index)?;

        fs::create_dir_all(cache_dir).map_err(|e| CacheError::io(cache_dir, e))?;
        let path = cache_dir.join(CACHE_FILE_NAME);

        // Write to file atomically (write to temp, then rename)
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes).map_err(|e| CacheError::io(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| CacheError::io(&path, e))?;

        self.dirty = false;
        tracing::info!(
            "Saved {} fingerprints to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }

    /// Persist to the bound directory if anything changed since the last write.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        match self.cache_dir.clone() {
            Some(dir) if self.dirty => self.persist(&dir),
            _ => Ok(()),
        }
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    pub fn cache_file(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|d| d.join(CACHE_FILE_NAME))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn summarize(path: &Path, record: &CacheRecord) -> CachedEntrySummary {
        CachedEntrySummary {
            hash: format!("{:016x}", record.fingerprint(path).hash()),
            path: path.display().to_string(),
            size_bytes: record.size,
            mtime_millis: record.mtime,
            symbolic_name: record.identity.symbolic_name.clone(),
            version: record.identity.version().to_string(),
        }
    }
}

impl FingerprintIndex for FingerprintCache {
    fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            inserts: self.inserts,
            cache_file: self.cache_file(),
        }
    }

    fn entries(&self) -> Vec<CachedEntrySummary> {
        let mut summaries: Vec<CachedEntrySummary> = self
            .entries
            .iter()
            .map(|(path, record)| Self::summarize(path, record))
            .collect();
        summaries.sort_by(|a, b| a.path.cmp(&b.path));
        summaries
    }

    fn find_by_hash_prefix(&self, hash_prefix: &str) -> Option<CachedEntrySummary> {
        self.entries().into_iter().find(|s| s.hash.starts_with(hash_prefix))
    }

    fn clear(&mut self) -> Result<(), String> {
        self.entries.clear();
        self.dirty = false;

        if let Some(path) = self.cache_file() {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }
}
