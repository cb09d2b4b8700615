use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Who an artifact claims to be: symbolic name, base version, optional iFix qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactIdentity {
    pub symbolic_name: String,
    /// Always qualifier-free.
    pub base_version: Version,
    pub qualifier: Option<String>,
}

impl ArtifactIdentity {
    pub fn new(
        symbolic_name: impl Into<String>,
        base_version: Version,
        qualifier: Option<String>,
    ) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            base_version: base_version.base(),
            qualifier: qualifier.filter(|q| !q.is_empty()),
        }
    }

    /// Split a full version into base and qualifier.
    pub fn from_version(symbolic_name: impl Into<String>, version: Version) -> Self {
        let qualifier = version.has_qualifier().then(|| version.qualifier.clone());
        Self::new(symbolic_name, version, qualifier)
    }

    /// The full version, qualifier included.
    pub fn version(&self) -> Version {
        match &self.qualifier {
            Some(q) => self.base_version.clone().with_qualifier(q.clone()),
            None => self.base_version.clone(),
        }
    }

    pub fn is_ifix(&self) -> bool {
        self.qualifier.is_some()
    }

    /// Same symbolic name and base version, whatever the qualifier.
    pub fn is_sibling_of(&self, other: &ArtifactIdentity) -> bool {
        self.symbolic_name == other.symbolic_name && self.base_version == other.base_version
    }

    /// The unqualified sibling of this identity.
    pub fn base_identity(&self) -> ArtifactIdentity {
        Self::new(self.symbolic_name.clone(), self.base_version.clone(), None)
    }

    /// `<name>_<maj>.<min>.<mic>[.<qualifier>].<ext>`
    pub fn conventional_file_name(&self, extension: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}_{}.{}",
            self.symbolic_name,
            self.version(),
            extension
        ))
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbolic_name, self.version())
    }
}
