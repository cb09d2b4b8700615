//! Capabilities the repository is assembled from.
//!
//! Implementations are chosen when the repository is constructed; nothing is
//! looked up dynamically afterwards.

use crate::diagnostic::Diagnostic;
use crate::error::InspectResult;
use crate::identity::ArtifactIdentity;
use std::path::Path;
use std::sync::Arc;

/// Reads the authoritative identity of an archive from its contents.
pub trait ContentInspector: Send + Sync {
    /// Open `archive`, read its metadata, release it before returning.
    fn inspect(&self, archive: &Path) -> InspectResult<ArtifactIdentity>;

    /// Inspector name (for logging/debugging)
    fn name(&self) -> &str;
}

/// Receives selection warnings.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}
