use std::path::PathBuf;

/// Malformed version or version-range text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty version")]
    EmptyVersion,
    #[error("Invalid {component} component in version '{text}'")]
    InvalidVersionComponent {
        text: String,
        component: &'static str,
    },
    #[error("Invalid qualifier in version '{text}'")]
    InvalidQualifier { text: String },
    #[error("Malformed version range '{text}': {reason}")]
    MalformedRange { text: String, reason: String },
    #[error("Version range floor {floor} is above its ceiling {ceiling}")]
    InvertedRange { floor: String, ceiling: String },
}

/// Failure to read an archive's identity from its contents.
///
/// Always recovered by the caller: the archive simply stops being a candidate.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unreadable archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },
    #[error("No manifest in {path}")]
    MissingManifest { path: PathBuf },
    #[error("Manifest of {path} has no {header} header")]
    MissingHeader { path: PathBuf, header: &'static str },
    #[error("Manifest of {path} declares an invalid version: {source}")]
    InvalidVersion {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("Content inspection is disabled")]
    Disabled,
}

pub type InspectResult<T> = std::result::Result<T, InspectError>;
