//! Content inspection backends.
//!
//! The backend is picked from [`InspectorKind`] when the repository is built:
//! - `ManifestInspector` - reads `Bundle-SymbolicName` / `Bundle-Version`
//! - `DisabledInspector` - never opens files; only conventionally named
//!   archives can match

pub mod manifest;

pub use manifest::{Manifest, ManifestInspector};

use bundlerepo_api::{ArtifactIdentity, ContentInspector, InspectError, InspectResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectorKind {
    #[default]
    Manifest,
    Disabled,
}

impl InspectorKind {
    pub fn build(self) -> Box<dyn ContentInspector> {
        match self {
            Self::Manifest => Box::new(ManifestInspector::new()),
            Self::Disabled => Box::new(DisabledInspector),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledInspector;

impl ContentInspector for DisabledInspector {
    fn inspect(&self, _archive: &Path) -> InspectResult<ArtifactIdentity> {
        Err(InspectError::Disabled)
    }

    fn name(&self) -> &str {
        "Disabled Inspector"
    }
}
