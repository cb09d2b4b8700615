pub mod cache;
pub mod candidate;
pub mod cap;
pub mod diagnostic;
pub mod error;
pub mod identity;
pub mod version;

// Re-export commonly used types
pub use cache::{CacheStats, CachedEntrySummary, FingerprintIndex};
pub use candidate::{Candidate, IdentitySource};
pub use cap::{ContentInspector, DiagnosticSink};
pub use diagnostic::Diagnostic;
pub use error::{InspectError, InspectResult, ParseError};
pub use identity::ArtifactIdentity;
pub use version::{Version, VersionRange};
