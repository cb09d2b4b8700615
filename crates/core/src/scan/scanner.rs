//! Candidate scanner.
//!
//! For every archive found in the resolved locations:
//! 1. Parse the file name by convention
//! 2. If that fails, or names another artifact, inspect the contents
//!    (consulting the fingerprint cache first)
//! 3. Keep the file only if its identity carries the requested symbolic name

use super::{InspectionPolicy, LocationSpec, ResolvedLocations};
use crate::cache::{Fingerprint, FingerprintCache};
use crate::naming::{NameConventionParser, NameParse};
use bundlerepo_api::{ArtifactIdentity, Candidate, ContentInspector, IdentitySource};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const DEFAULT_LOCATION: &str = "lib/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The location spec named one existing archive
    Exact(PathBuf),
    /// Pooled candidates, in scan order
    Candidates(Vec<Candidate>),
}

/// Counters for a scanner's lifetime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Archives visited
    pub archives_seen: usize,
    /// Archives opened by the content inspector
    pub inspections: usize,
    /// Inspections that failed (the archive was skipped)
    pub inspect_failures: usize,
    /// Identities served from the fingerprint cache
    pub cache_hits: usize,
    /// Archives that turned out to be another artifact
    pub discarded: usize,
}

pub struct CandidateScanner<'a> {
    base_dir: &'a Path,
    default_location: &'a str,
    naming: &'a NameConventionParser,
    inspector: &'a dyn ContentInspector,
    cache: Option<&'a mut FingerprintCache>,
    policy: InspectionPolicy,
    stats: ScanStats,
}

impl<'a> CandidateScanner<'a> {
    pub fn new(
        base_dir: &'a Path,
        naming: &'a NameConventionParser,
        inspector: &'a dyn ContentInspector,
    ) -> Self {
        Self {
            base_dir,
            default_location: DEFAULT_LOCATION,
            naming,
            inspector,
            cache: None,
            policy: InspectionPolicy::default(),
            stats: ScanStats::default(),
        }
    }

    /// Memoize inspections in `cache`
    pub fn with_cache(mut self, cache: &'a mut FingerprintCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_policy(mut self, policy: InspectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_location(mut self, location: &'a str) -> Self {
        self.default_location = location;
        self
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn scan(&mut self, location_spec: &str, symbolic_name: &str) -> ScanOutcome {
        let spec = LocationSpec::parse(location_spec);
        let directories = match spec.resolve(self.base_dir, self.default_location, self.naming) {
            ResolvedLocations::Exact(path) => {
                debug!("Location {} names an archive directly", path.display());
                return ScanOutcome::Exact(path);
            }
            ResolvedLocations::Directories(directories) => directories,
        };

        let mut candidates = Vec::new();
        for (location, dir) in directories {
            self.scan_directory(&location, &dir, symbolic_name, &mut candidates);
        }

        debug!(
            "Found {} candidates for {} in '{}'",
            candidates.len(),
            symbolic_name,
            location_spec
        );
        ScanOutcome::Candidates(candidates)
    }

    fn scan_directory(
        &mut self,
        location: &str,
        dir: &Path,
        symbolic_name: &str,
        candidates: &mut Vec<Candidate>,
    ) {
        if !dir.is_dir() {
            debug!("Skipping missing location {}", dir.display());
            return;
        }

        let archives: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| self.naming.is_archive(path))
            .collect();

        for path in archives {
            self.stats.archives_seen += 1;
            match self.identify(&path, symbolic_name) {
                Some((identity, source)) if identity.symbolic_name == symbolic_name => {
                    candidates.push(Candidate::new(path, location, identity, source));
                }
                Some((identity, _)) => {
                    debug!("{} is {}, not {}", path.display(), identity, symbolic_name);
                    self.stats.discarded += 1;
                }
                None => {}
            }
        }
    }

    fn identify(
        &mut self,
        path: &Path,
        symbolic_name: &str,
    ) -> Option<(ArtifactIdentity, IdentitySource)> {
        match self.naming.parse_path(path) {
            NameParse::Unparseable => None,
            NameParse::Convention(identity)
                if identity.symbolic_name == symbolic_name
                    && self.policy == InspectionPolicy::Fallback =>
            {
                Some((identity, IdentitySource::NameConvention))
            }
            NameParse::Convention(_) | NameParse::NeedsInspection => self
                .inspect(path)
                .map(|identity| (identity, IdentitySource::ContentInspected)),
        }
    }

    fn inspect(&mut self, path: &Path) -> Option<ArtifactIdentity> {
        let fingerprint = match Fingerprint::from_path(path) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                debug!("Cannot stat {}: {}", path.display(), e);
                return None;
            }
        };

        if let Some(cache) = self.cache.as_deref_mut() {
            if let Some(identity) = cache.get(&fingerprint) {
                self.stats.cache_hits += 1;
                return Some(identity);
            }
        }

        self.stats.inspections += 1;
        match self.inspector.inspect(path) {
            Ok(identity) => {
                if let Some(cache) = self.cache.as_deref_mut() {
                    cache.put(fingerprint, identity.clone());
                }
                Some(identity)
            }
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                self.stats.inspect_failures += 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheFormat;
    use bundlerepo_api::{InspectError, InspectResult, Version};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Mock inspector answering from a file-name table
    struct MockInspector {
        identities: HashMap<String, ArtifactIdentity>,
        calls: AtomicUsize,
    }

    impl MockInspector {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self {
                identities: entries
                    .iter()
                    .map(|(file, name, version)| {
                        (
                            file.to_string(),
                            ArtifactIdentity::from_version(*name, Version::parse(version).unwrap()),
                        )
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ContentInspector for MockInspector {
        fn inspect(&self, archive: &Path) -> InspectResult<ArtifactIdentity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let file = archive.file_name().unwrap().to_string_lossy().to_string();
            self.identities
                .get(&file)
                .cloned()
                .ok_or_else(|| InspectError::MissingManifest {
                    path: archive.to_path_buf(),
                })
        }

        fn name(&self) -> &str {
            "Mock Inspector"
        }
    }

    fn touch(base: &Path, rel: &str) {
        let path = base.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, rel.as_bytes()).unwrap();
    }

    fn file_names(outcome: &ScanOutcome) -> Vec<String> {
        match outcome {
            ScanOutcome::Candidates(candidates) => candidates.iter().map(|c| c.file_name()).collect(),
            ScanOutcome::Exact(path) => panic!("unexpected exact match {}", path.display()),
        }
    }

    #[test]
    fn test_scan_uses_names_and_falls_back_to_inspection() {
        let temp = TempDir::new().unwrap();
        for rel in ["lib/a.b_1.0.1.jar", "lib/bad.jar", "lib/c.d_1.0.jar", "lib/notes.txt"] {
            touch(temp.path(), rel);
        }
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[("bad.jar", "a.b", "1.0.2"), ("c.d_1.0.jar", "c.d", "1.0")]);

        let mut scanner = CandidateScanner::new(temp.path(), &naming, &inspector);
        let outcome = scanner.scan("lib/", "a.b");

        assert_eq!(file_names(&outcome), vec!["a.b_1.0.1.jar", "bad.jar"]);
        let ScanOutcome::Candidates(candidates) = outcome else {
            unreachable!()
        };
        assert_eq!(candidates[0].source, IdentitySource::NameConvention);
        assert_eq!(candidates[1].source, IdentitySource::ContentInspected);
        assert_eq!(candidates[1].location, "lib/");

        // bad.jar and the mismatching c.d_1.0.jar were opened
        let stats = scanner.stats();
        assert_eq!(stats.archives_seen, 3);
        assert_eq!(stats.inspections, 2);
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn test_mismatched_name_can_still_match_by_content() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/renamed_2.0.jar");
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[("renamed_2.0.jar", "a.b", "2.0.0")]);

        let mut scanner = CandidateScanner::new(temp.path(), &naming, &inspector);
        let outcome = scanner.scan("", "a.b");
        assert_eq!(file_names(&outcome), vec!["renamed_2.0.jar"]);
    }

    #[test]
    fn test_failed_inspection_skips_candidate() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/broken.jar");
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[]);

        let mut scanner = CandidateScanner::new(temp.path(), &naming, &inspector);
        assert!(file_names(&scanner.scan("lib/", "a.b")).is_empty());
        assert_eq!(scanner.stats().inspect_failures, 1);
    }

    #[test]
    fn test_always_policy_confirms_by_content() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/a.b_1.0.0.jar");
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[("a.b_1.0.0.jar", "x.y", "1.0.0")]);

        let mut scanner = CandidateScanner::new(temp.path(), &naming, &inspector)
            .with_policy(InspectionPolicy::Always);
        assert!(file_names(&scanner.scan("lib/", "a.b")).is_empty());
        assert_eq!(inspector.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_avoids_second_inspection() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/bad.jar");
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[("bad.jar", "a.b", "1.0.2")]);
        let mut cache = FingerprintCache::new(CacheFormat::MsgPack);

        {
            let mut scanner =
                CandidateScanner::new(temp.path(), &naming, &inspector).with_cache(&mut cache);
            assert_eq!(file_names(&scanner.scan("lib/", "a.b")), vec!["bad.jar"]);
        }
        let mut scanner =
            CandidateScanner::new(temp.path(), &naming, &inspector).with_cache(&mut cache);
        assert_eq!(file_names(&scanner.scan("lib/", "a.b")), vec!["bad.jar"]);

        assert_eq!(inspector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(scanner.stats().cache_hits, 1);
    }

    #[test]
    fn test_exact_location_bypasses_scan() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/a.b_1.0.jar");
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[]);

        let mut scanner = CandidateScanner::new(temp.path(), &naming, &inspector);
        assert_eq!(
            scanner.scan("lib/a.b_1.0.jar", "whatever"),
            ScanOutcome::Exact(temp.path().join("lib/a.b_1.0.jar"))
        );
    }

    #[test]
    fn test_subdirectories_are_not_scanned() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/nested/a.b_1.0.jar");
        let naming = NameConventionParser::default();
        let inspector = MockInspector::new(&[]);

        let mut scanner = CandidateScanner::new(temp.path(), &naming, &inspector);
        assert!(file_names(&scanner.scan("lib/", "a.b")).is_empty());
    }
}
