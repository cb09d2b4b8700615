//! Candidate discovery.
//!
//! A location spec names where to look, relative to the repository base
//! directory:
//! - `""` - the configured default root (`lib/` unless configured otherwise)
//! - `"lib/a.b_1.0.jar"` - one existing archive, returned as-is
//! - `"dev/,lib/"` - directories, scanned non-recursively and pooled

pub mod scanner;

pub use scanner::{CandidateScanner, ScanOutcome, ScanStats};

use crate::naming::NameConventionParser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// When archive contents are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionPolicy {
    /// Only for names that do not follow the convention or do not match the query
    #[default]
    Fallback,
    /// For every archive, confirming the name by content
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSpec {
    Default,
    Entries(Vec<String>),
}

/// Where a scan actually looks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocations {
    /// A fully specified archive; selection is bypassed
    Exact(PathBuf),
    /// (location entry, directory) pairs in spec order
    Directories(Vec<(String, PathBuf)>),
}

impl LocationSpec {
    pub fn parse(text: &str) -> Self {
        let entries: Vec<String> = text
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();

        if entries.is_empty() {
            Self::Default
        } else {
            Self::Entries(entries)
        }
    }

    pub fn resolve(
        &self,
        base_dir: &Path,
        default_location: &str,
        naming: &NameConventionParser,
    ) -> ResolvedLocations {
        let entries = match self {
            Self::Default => vec![default_location.to_string()],
            Self::Entries(entries) => entries.clone(),
        };

        if let [single] = entries.as_slice() {
            let candidate = base_dir.join(single);
            if naming.is_archive(&candidate) && candidate.is_file() {
                return ResolvedLocations::Exact(candidate);
            }
        }

        ResolvedLocations::Directories(
            entries
                .into_iter()
                .map(|entry| {
                    let dir = base_dir.join(&entry);
                    (entry, dir)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_trims_and_skips_empty_entries() {
        assert_eq!(LocationSpec::parse(""), LocationSpec::Default);
        assert_eq!(LocationSpec::parse(" , "), LocationSpec::Default);
        assert_eq!(
            LocationSpec::parse(" dev/, ,lib/ "),
            LocationSpec::Entries(vec!["dev/".to_string(), "lib/".to_string()])
        );
    }

    #[test]
    fn test_resolve_exact_archive_only_when_it_exists() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib")).unwrap();
        std::fs::write(temp.path().join("lib/a.b_1.0.jar"), b"").unwrap();
        let naming = NameConventionParser::default();

        let exact = LocationSpec::parse("lib/a.b_1.0.jar").resolve(temp.path(), "lib/", &naming);
        assert_eq!(
            exact,
            ResolvedLocations::Exact(temp.path().join("lib/a.b_1.0.jar"))
        );

        let missing = LocationSpec::parse("lib/a.b_2.0.jar").resolve(temp.path(), "lib/", &naming);
        assert!(matches!(missing, ResolvedLocations::Directories(_)));
    }

    #[test]
    fn test_resolve_default_and_lists() {
        let temp = TempDir::new().unwrap();
        let naming = NameConventionParser::default();

        let default = LocationSpec::Default.resolve(temp.path(), "lib/", &naming);
        assert_eq!(
            default,
            ResolvedLocations::Directories(vec![("lib/".to_string(), temp.path().join("lib/"))])
        );

        let listed = LocationSpec::parse("dev/,lib/").resolve(temp.path(), "lib/", &naming);
        let ResolvedLocations::Directories(dirs) = listed else {
            panic!("expected directories");
        };
        let names: Vec<&str> = dirs.iter().map(|(entry, _)| entry.as_str()).collect();
        assert_eq!(names, vec!["dev/", "lib/"]);
    }
}
