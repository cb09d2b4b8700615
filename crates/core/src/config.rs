use crate::cache::CacheFormat;
use crate::error::{RepositoryError, Result};
use crate::inspect::InspectorKind;
use crate::scan::InspectionPolicy;
use crate::scan::scanner::DEFAULT_LOCATION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_DIR: &str = ".bundlerepo/cache";
pub const CACHE_DIR_ENV: &str = "BUNDLEREPO_CACHE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Directory location specs are resolved against
    pub base_dir: PathBuf,
    /// Where the fingerprint index lives; `None` keeps it in memory only
    pub cache_dir: Option<PathBuf>,
    pub cache_enabled: bool,
    /// Scanned when a location spec is empty
    pub default_location: String,
    /// File extensions treated as archives, without the dot
    pub archive_extensions: Vec<String>,
    pub inspection: InspectionPolicy,
    pub inspector: InspectorKind,
    pub cache_format: CacheFormat,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            cache_dir: None,
            cache_enabled: true,
            default_location: DEFAULT_LOCATION.to_string(),
            archive_extensions: vec!["jar".to_string()],
            inspection: InspectionPolicy::default(),
            inspector: InspectorKind::default(),
            cache_format: CacheFormat::default(),
        }
    }
}

impl RepositoryConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Read a JSON config file; fields it omits take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self
            .archive_extensions
            .iter()
            .all(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(RepositoryError::Config(
                "at least one archive extension is required".to_string(),
            ));
        }
        if !self.base_dir.is_dir() {
            return Err(RepositoryError::Config(format!(
                "base directory {} does not exist",
                self.base_dir.display()
            )));
        }
        Ok(())
    }

    /// Cache directory used when none is configured, supporting BUNDLEREPO_CACHE_DIR env var.
    pub fn default_cache_dir() -> PathBuf {
        if let Ok(env_dir) = std::env::var(CACHE_DIR_ENV) {
            return PathBuf::from(env_dir);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_CACHE_DIR)
    }

    /// The directory memoized inspections are persisted to, if any
    pub fn effective_cache_dir(&self) -> Option<&Path> {
        if self.cache_enabled {
            self.cache_dir.as_deref()
        } else {
            None
        }
    }
}
