//! Bundle selection with iFix precedence.
//!
//! Candidates in range are grouped by base version. A group is selectable only
//! if its unqualified base file is present; qualified members of a group
//! without a base are orphaned iFixes and never selected. The highest
//! selectable group wins, and within it the highest qualifier (or the base
//! itself when there are no iFixes).
//!
//! Ties between byte-identical identities go to the candidate seen first, i.e.
//! the earliest entry of the location spec, then file name order within it.

use bundlerepo_api::{Candidate, Diagnostic, Version, VersionRange};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// The winner, plus any warnings raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub chosen: Option<Candidate>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Selection {
    pub fn into_chosen(self) -> Option<Candidate> {
        self.chosen
    }
}

#[derive(Default)]
struct BaseGroup {
    base: Option<Candidate>,
    ifixes: Vec<Candidate>,
}

impl BaseGroup {
    fn add(&mut self, candidate: Candidate) {
        if candidate.identity.is_ifix() {
            if self
                .ifixes
                .iter()
                .any(|seen| seen.identity == candidate.identity)
            {
                debug!(
                    "Ignoring duplicate iFix {}; first seen wins",
                    candidate.path.display()
                );
            } else {
                self.ifixes.push(candidate);
            }
        } else if self.base.is_none() {
            self.base = Some(candidate);
        } else {
            debug!(
                "Ignoring duplicate base {}; first seen wins",
                candidate.path.display()
            );
        }
    }

    /// The group's effective candidate. Callers only resolve groups with a base.
    fn resolve(self, diagnostics: &mut Vec<Diagnostic>) -> Option<Candidate> {
        let base = self.base?;
        let mut ifixes = self.ifixes.into_iter();
        let Some(first) = ifixes.next() else {
            return Some(base);
        };

        let mut chosen = first;
        let mut superseded = Vec::new();
        for ifix in ifixes {
            if ifix.identity.version() > chosen.identity.version() {
                superseded.push(std::mem::replace(&mut chosen, ifix).path);
            } else {
                superseded.push(ifix.path);
            }
        }

        if !superseded.is_empty() {
            superseded.sort();
            diagnostics.push(Diagnostic::IfixOverride {
                symbolic_name: chosen.identity.symbolic_name.clone(),
                chosen: chosen.path.clone(),
                base: base.path.clone(),
                superseded,
            });
        } else {
            debug!(
                "iFix {} applies over {}",
                chosen.path.display(),
                base.path.display()
            );
        }

        Some(chosen)
    }
}

pub struct BundleSelector;

impl BundleSelector {
    pub fn select(candidates: Vec<Candidate>, range: &VersionRange) -> Selection {
        let mut groups: BTreeMap<Version, BaseGroup> = BTreeMap::new();
        for candidate in candidates {
            // The full version is tested, so a qualified file can fall outside a
            // range that admits its base
            if !range.contains(&candidate.identity.version()) {
                continue;
            }
            groups
                .entry(candidate.identity.base_version.clone())
                .or_default()
                .add(candidate);
        }

        let mut diagnostics = Vec::new();
        for group in groups.values().filter(|g| g.base.is_none()) {
            for ifix in &group.ifixes {
                diagnostics.push(Diagnostic::OrphanedIfix {
                    symbolic_name: ifix.identity.symbolic_name.clone(),
                    ifix: ifix.path.clone(),
                    expected_base: ifix
                        .identity
                        .base_identity()
                        .conventional_file_name(&ifix.extension())
                        .display()
                        .to_string(),
                });
            }
        }

        let chosen = groups
            .into_values()
            .rev()
            .find(|g| g.base.is_some())
            .and_then(|g| g.resolve(&mut diagnostics));

        Selection {
            chosen,
            diagnostics,
        }
    }
}
