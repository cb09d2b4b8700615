use crate::identity::ArtifactIdentity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a candidate's identity was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentitySource {
    /// Parsed from the file name
    NameConvention,
    /// Read from the archive manifest
    ContentInspected,
}

/// A file found during a scan, with its resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub path: PathBuf,
    /// The location entry (relative to the base directory) the file was found under.
    pub location: String,
    pub identity: ArtifactIdentity,
    pub source: IdentitySource,
}

impl Candidate {
    pub fn new(
        path: PathBuf,
        location: impl Into<String>,
        identity: ArtifactIdentity,
        source: IdentitySource,
    ) -> Self {
        Self {
            path,
            location: location.into(),
            identity,
            source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Extension of the underlying archive, `jar` when it has none.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "jar".to_string())
    }
}
