//! Local bundle repository.
//!
//! Answers "which file should be loaded for this symbolic name and version
//! range" for archives installed under a base directory. Archive identities
//! established by opening files are memoized in a fingerprint cache that
//! survives restarts.

use crate::cache::FingerprintCache;
use crate::config::RepositoryConfig;
use crate::diagnostics::TracingSink;
use crate::error::Result;
use crate::naming::NameConventionParser;
use crate::scan::{CandidateScanner, InspectionPolicy, ScanOutcome};
use crate::select::BundleSelector;
use bundlerepo_api::{Candidate, ContentInspector, Diagnostic, DiagnosticSink, VersionRange};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Cumulative counters since the repository was created
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepositoryStats {
    pub selections: u64,
    pub inspections: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Everything known about one selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub selected: Option<PathBuf>,
    /// The winning candidate; `None` when the location named an archive directly
    pub candidate: Option<Candidate>,
    pub candidates_considered: usize,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct LocalBundleRepository {
    base_dir: PathBuf,
    default_location: String,
    naming: NameConventionParser,
    policy: InspectionPolicy,
    inspector: Box<dyn ContentInspector>,
    sink: Box<dyn DiagnosticSink>,
    cache: Option<FingerprintCache>,
    stats: RepositoryStats,
}

impl LocalBundleRepository {
    /// A repository rooted at `base_dir`.
    ///
    /// Inspections are memoized only when `enabled` is set and a cache
    /// directory is given; otherwise nothing is read from or written to disk
    /// besides the archives themselves.
    pub fn new(base_dir: impl Into<PathBuf>, cache_dir: Option<PathBuf>, enabled: bool) -> Self {
        let mut config = RepositoryConfig::new(base_dir);
        config.cache_dir = cache_dir;
        config.cache_enabled = enabled;
        Self::assemble(config)
    }

    /// Build from a validated configuration
    pub fn from_config(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: RepositoryConfig) -> Self {
        let cache = config
            .effective_cache_dir()
            .map(|dir| FingerprintCache::load_from_disk(dir, config.cache_format));
        let base_dir = std::path::absolute(&config.base_dir).unwrap_or(config.base_dir);

        info!(
            "Bundle repository at {} (cache: {})",
            base_dir.display(),
            cache
                .as_ref()
                .and_then(|c| c.cache_dir())
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "off".to_string())
        );

        Self {
            base_dir,
            default_location: config.default_location,
            naming: NameConventionParser::new(config.archive_extensions.as_slice()),
            policy: config.inspection,
            inspector: config.inspector.build(),
            sink: Box::new(TracingSink),
            cache,
            stats: RepositoryStats::default(),
        }
    }

    pub fn with_inspector(mut self, inspector: impl ContentInspector + 'static) -> Self {
        self.inspector = Box::new(inspector);
        self
    }

    pub fn with_diagnostic_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn stats(&self) -> RepositoryStats {
        self.stats
    }

    pub fn cache(&self) -> Option<&FingerprintCache> {
        self.cache.as_ref()
    }

    /// Path of the archive to load for `symbolic_name` within `range_text`,
    /// or `None` when nothing in `location_spec` qualifies.
    ///
    /// Only a malformed range is an error. Unreadable archives are skipped.
    pub fn select_bundle(
        &mut self,
        location_spec: &str,
        symbolic_name: &str,
        range_text: &str,
    ) -> Result<Option<PathBuf>> {
        Ok(self
            .select_bundle_detailed(location_spec, symbolic_name, range_text)?
            .selected)
    }

    pub fn select_bundle_detailed(
        &mut self,
        location_spec: &str,
        symbolic_name: &str,
        range_text: &str,
    ) -> Result<SelectionReport> {
        let range = VersionRange::parse(range_text)?;
        self.stats.selections += 1;

        let mut scanner = CandidateScanner::new(&self.base_dir, &self.naming, self.inspector.as_ref())
            .with_policy(self.policy)
            .with_default_location(&self.default_location);
        let memoized = self.cache.is_some();
        if let Some(cache) = self.cache.as_mut() {
            scanner = scanner.with_cache(cache);
        }

        let outcome = scanner.scan(location_spec, symbolic_name);
        let scan_stats = scanner.stats();

        self.stats.inspections += scan_stats.inspections as u64;
        self.stats.cache_hits += scan_stats.cache_hits as u64;
        if memoized {
            self.stats.cache_misses += scan_stats.inspections as u64;
        }

        let candidates = match outcome {
            ScanOutcome::Exact(path) => {
                return Ok(SelectionReport {
                    selected: Some(path),
                    candidate: None,
                    candidates_considered: 0,
                    diagnostics: Vec::new(),
                });
            }
            ScanOutcome::Candidates(candidates) => candidates,
        };

        let candidates_considered = candidates.len();
        let selection = BundleSelector::select(candidates, &range);
        for diagnostic in &selection.diagnostics {
            self.sink.report(diagnostic);
        }

        match &selection.chosen {
            Some(chosen) => debug!(
                "Selected {} for {} {}",
                chosen.path.display(),
                symbolic_name,
                range
            ),
            None => debug!(
                "No match for {} {} among {} candidates",
                symbolic_name, range, candidates_considered
            ),
        }

        Ok(SelectionReport {
            selected: selection.chosen.as_ref().map(|c| c.path.clone()),
            candidate: selection.chosen,
            candidates_considered,
            diagnostics: selection.diagnostics,
        })
    }

    /// Persist memoized inspections now, if any changed
    pub fn flush(&mut self) -> Result<()> {
        if let Some(cache) = self.cache.as_mut() {
            cache.flush()?;
        }
        Ok(())
    }

    /// Flush and release the repository. A cache that cannot be written is
    /// logged and left behind; the next run starts from what is on disk.
    pub fn dispose(mut self) {
        self.flush_quietly();
    }

    fn flush_quietly(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to persist fingerprint cache: {}", e);
        }
    }
}

impl Drop for LocalBundleRepository {
    fn drop(&mut self) {
        self.flush_quietly();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlerepo_api::ParseError;
    use tempfile::TempDir;

    #[test]
    fn test_malformed_range_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut repo = LocalBundleRepository::new(temp.path(), None, false);

        let err = repo.select_bundle("", "a.b", "[1.0,").unwrap_err();
        assert!(matches!(
            err,
            crate::error::RepositoryError::Range(ParseError::MalformedRange { .. })
        ));
        assert_eq!(repo.stats().selections, 0);
    }

    #[test]
    fn test_missing_location_selects_nothing() {
        let temp = TempDir::new().unwrap();
        let mut repo = LocalBundleRepository::new(temp.path(), None, true);

        assert_eq!(repo.select_bundle("nowhere/", "a.b", "1.0").unwrap(), None);
        assert!(repo.cache().is_none());
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let temp = TempDir::new().unwrap();
        let mut config = RepositoryConfig::new(temp.path());
        config.archive_extensions.clear();
        assert!(LocalBundleRepository::from_config(config).is_err());
    }
}
