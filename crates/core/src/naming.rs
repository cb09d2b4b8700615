//! File-name convention parsing: `<symbolicName>_<major>.<minor>.<micro>[.<qualifier>].<ext>`
//!
//! Purely syntactic. Archive contents are never consulted here; names that do
//! not follow the convention are reported as [`NameParse::NeedsInspection`] and
//! left to a [`ContentInspector`](bundlerepo_api::ContentInspector).

use bundlerepo_api::{ArtifactIdentity, Version};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Lazy `name` so the split lands on the first `_` that is followed by a
/// version-shaped tail, i.e. the last `_` before the version suffix.
static CONVENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)_(?P<version>\d+(?:\.\d+(?:\.\d+(?:\.[A-Za-z0-9_\-]+)?)?)?)$")
        .expect("Failed to compile file name convention pattern - this is a fatal error")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameParse {
    /// The name follows the convention.
    Convention(ArtifactIdentity),
    /// An archive whose name carries no version; only its contents can tell.
    NeedsInspection,
    /// Not a recognized archive at all.
    Unparseable,
}

#[derive(Debug, Clone)]
pub struct NameConventionParser {
    extensions: Vec<String>,
}

impl NameConventionParser {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether the path ends in a recognized archive extension.
    pub fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    pub fn parse_path(&self, path: &Path) -> NameParse {
        if !self.is_archive(path) {
            return NameParse::Unparseable;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return NameParse::NeedsInspection;
        };

        let Some(caps) = CONVENTION.captures(stem) else {
            return NameParse::NeedsInspection;
        };

        // Overflowing components fall back to inspection rather than guessing
        match Version::parse(&caps["version"]) {
            Ok(version) => {
                NameParse::Convention(ArtifactIdentity::from_version(&caps["name"], version))
            }
            Err(_) => NameParse::NeedsInspection,
        }
    }

    pub fn parse_file_name(&self, file_name: &str) -> NameParse {
        self.parse_path(Path::new(file_name))
    }
}

impl Default for NameConventionParser {
    fn default() -> Self {
        Self::new(&["jar"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(file_name: &str) -> ArtifactIdentity {
        match NameConventionParser::default().parse_file_name(file_name) {
            NameParse::Convention(id) => id,
            other => panic!("{} did not parse: {:?}", file_name, other),
        }
    }

    #[test]
    fn test_parses_base_version() {
        let id = identity("a.b_1.0.2.jar");
        assert_eq!(id.symbolic_name, "a.b");
        assert_eq!(id.base_version, Version::new(1, 0, 2));
        assert_eq!(id.qualifier, None);
    }

    #[test]
    fn test_parses_qualifier() {
        let id = identity("a.b_1.0.2.v1.jar");
        assert_eq!(id.symbolic_name, "a.b");
        assert_eq!(id.base_version, Version::new(1, 0, 2));
        assert_eq!(id.qualifier.as_deref(), Some("v1"));
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        assert_eq!(identity("x.y_1.0.jar").base_version, Version::new(1, 0, 0));
        assert_eq!(identity("x.y_3.jar").base_version, Version::new(3, 0, 0));
    }

    #[test]
    fn test_underscores_in_name_and_qualifier() {
        let id = identity("com.foo_bar_2.1.0.jar");
        assert_eq!(id.symbolic_name, "com.foo_bar");
        assert_eq!(id.base_version, Version::new(2, 1, 0));

        let id = identity("a.b_1.0.2.v_1.jar");
        assert_eq!(id.symbolic_name, "a.b");
        assert_eq!(id.qualifier.as_deref(), Some("v_1"));
    }

    #[test]
    fn test_badly_named_archive_needs_inspection() {
        let parser = NameConventionParser::default();
        assert_eq!(parser.parse_file_name("bad.jar"), NameParse::NeedsInspection);
        assert_eq!(parser.parse_file_name("_1.0.jar"), NameParse::NeedsInspection);
        assert_eq!(parser.parse_file_name("a.b_1.0.2.x.y.jar"), NameParse::NeedsInspection);
        assert_eq!(
            parser.parse_file_name("a.b_99999999999.jar"),
            NameParse::NeedsInspection
        );
    }

    #[test]
    fn test_non_archives_are_unparseable() {
        let parser = NameConventionParser::default();
        assert_eq!(parser.parse_file_name("a.b_1.0.2.txt"), NameParse::Unparseable);
        assert_eq!(parser.parse_file_name("README"), NameParse::Unparseable);
    }

    #[test]
    fn test_extensions_are_case_insensitive_and_configurable() {
        let parser = NameConventionParser::new(&[".JAR", "zip"]);
        assert!(parser.is_archive(Path::new("lib/a.b_1.0.Jar")));
        assert!(parser.is_archive(Path::new("lib/a.b_1.0.zip")));
        assert!(!parser.is_archive(Path::new("lib/a.b_1.0.war")));
    }
}
