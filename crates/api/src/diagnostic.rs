//! Warnings raised while selecting a bundle.
//!
//! Diagnostics never fail a selection. They are handed to a [`DiagnosticSink`]
//! and returned alongside the selected candidate.
//!
//! [`DiagnosticSink`]: crate::cap::DiagnosticSink

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A qualified file whose unqualified base is not among the candidates.
    OrphanedIfix {
        symbolic_name: String,
        ifix: PathBuf,
        /// Conventional file name the missing base would have.
        expected_base: String,
    },
    /// More than one iFix exists for the selected base; `chosen` wins.
    IfixOverride {
        symbolic_name: String,
        chosen: PathBuf,
        base: PathBuf,
        superseded: Vec<PathBuf>,
    },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Self::OrphanedIfix { .. } => "ifix-orphaned",
            Self::IfixOverride { .. } => "ifix-override",
        }
    }

    pub fn symbolic_name(&self) -> &str {
        match self {
            Self::OrphanedIfix { symbolic_name, .. } | Self::IfixOverride { symbolic_name, .. } => {
                symbolic_name
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanedIfix {
                ifix,
                expected_base,
                ..
            } => write!(
                f,
                "iFix {} was ignored because its base bundle {} is not installed",
                file_name(ifix),
                expected_base
            ),
            Self::IfixOverride {
                chosen,
                base,
                superseded,
                ..
            } => {
                write!(
                    f,
                    "iFix {} is applied in place of base bundle {}",
                    file_name(chosen),
                    file_name(base)
                )?;
                if !superseded.is_empty() {
                    let names: Vec<String> = superseded.iter().map(|p| file_name(p)).collect();
                    write!(f, "; older iFixes ignored: {}", names.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_message_names_both_files() {
        let diag = Diagnostic::OrphanedIfix {
            symbolic_name: "a.b".into(),
            ifix: PathBuf::from("/repo/lib/a.b_1.0.2.v1.jar"),
            expected_base: "a.b_1.0.2.jar".into(),
        };
        let msg = diag.to_string();
        assert!(msg.contains("a.b_1.0.2.v1.jar"));
        assert!(msg.contains("a.b_1.0.2.jar"));
        assert_eq!(diag.code(), "ifix-orphaned");
    }

    #[test]
    fn test_override_message_lists_superseded() {
        let diag = Diagnostic::IfixOverride {
            symbolic_name: "a.b".into(),
            chosen: PathBuf::from("lib/a.b_1.0.1.v2.jar"),
            base: PathBuf::from("lib/a.b_1.0.1.jar"),
            superseded: vec![PathBuf::from("lib/a.b_1.0.1.v1.jar")],
        };
        let msg = diag.to_string();
        assert!(msg.starts_with("iFix a.b_1.0.1.v2.jar is applied in place of base bundle a.b_1.0.1.jar"));
        assert!(msg.ends_with("a.b_1.0.1.v1.jar"));
    }
}
