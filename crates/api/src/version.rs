//! OSGi-style versions and interval version ranges.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `major.minor.micro[.qualifier]` version.
///
/// Ordering follows OSGi: the numeric components compare numerically, then the
/// qualifier compares as a plain string. The empty qualifier sorts first, so
/// `1.0.2 < 1.0.2.v1 < 1.0.3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub qualifier: String,
}

impl Version {
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// The same version with the qualifier dropped.
    pub fn base(&self) -> Self {
        Self::new(self.major, self.minor, self.micro)
    }

    pub fn has_qualifier(&self) -> bool {
        !self.qualifier.is_empty()
    }

    /// Parse `maj[.min[.mic[.qual]]]`. Omitted numeric components default to 0.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::EmptyVersion);
        }

        let mut parts = text.splitn(4, '.');
        let major = parse_component(text, "major", parts.next())?.unwrap_or(0);
        let minor = parse_component(text, "minor", parts.next())?.unwrap_or(0);
        let micro = parse_component(text, "micro", parts.next())?.unwrap_or(0);

        let qualifier = match parts.next() {
            Some(q) if is_valid_qualifier(q) => q.to_string(),
            Some(_) => {
                return Err(ParseError::InvalidQualifier {
                    text: text.to_string(),
                });
            }
            None => String::new(),
        };

        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }
}

fn parse_component(
    text: &str,
    component: &'static str,
    part: Option<&str>,
) -> Result<Option<u32>, ParseError> {
    let Some(part) = part else {
        return Ok(None);
    };
    // u32::from_str would accept a leading '+'
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidVersionComponent {
            text: text.to_string(),
            component,
        });
    }
    part.parse::<u32>()
        .map(Some)
        .map_err(|_| ParseError::InvalidVersionComponent {
            text: text.to_string(),
            component,
        })
}

pub(crate) fn is_valid_qualifier(q: &str) -> bool {
    !q.is_empty()
        && q
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if self.has_qualifier() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

/// An interval of versions: `[floor,ceiling)`, `[floor,ceiling]`, `(floor,ceiling)`,
/// `(floor,ceiling]`, or a bare floor meaning "floor and above".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub floor: Version,
    pub ceiling: Option<Version>,
    pub floor_inclusive: bool,
    pub ceiling_inclusive: bool,
}

impl VersionRange {
    /// `floor` and everything above it.
    pub fn at_least(floor: Version) -> Self {
        Self {
            floor,
            ceiling: None,
            floor_inclusive: true,
            ceiling_inclusive: false,
        }
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        let malformed = |reason: &str| ParseError::MalformedRange {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let floor_inclusive = match text.chars().next() {
            Some('[') => true,
            Some('(') => false,
            Some(_) => return Ok(Self::at_least(Version::parse(text)?)),
            None => return Err(malformed("empty range")),
        };

        let ceiling_inclusive = match text.chars().last() {
            Some(']') if text.len() > 1 => true,
            Some(')') if text.len() > 1 => false,
            _ => return Err(malformed("missing closing ']' or ')'")),
        };

        let inner = &text[1..text.len() - 1];
        let Some((floor, ceiling)) = inner.split_once(',') else {
            return Err(malformed("expected 'floor,ceiling'"));
        };
        if ceiling.contains(',') {
            return Err(malformed("too many bounds"));
        }

        let floor = Version::parse(floor)?;
        let ceiling = Version::parse(ceiling)?;
        if floor > ceiling {
            return Err(ParseError::InvertedRange {
                floor: floor.to_string(),
                ceiling: ceiling.to_string(),
            });
        }

        Ok(Self {
            floor,
            ceiling: Some(ceiling),
            floor_inclusive,
            ceiling_inclusive,
        })
    }

    /// Evaluate each bound independently, honoring its inclusivity.
    pub fn contains(&self, version: &Version) -> bool {
        let above_floor = if self.floor_inclusive {
            *version >= self.floor
        } else {
            *version > self.floor
        };
        if !above_floor {
            return false;
        }

        match &self.ceiling {
            None => true,
            Some(ceiling) if self.ceiling_inclusive => version <= ceiling,
            Some(ceiling) => version < ceiling,
        }
    }
}

impl FromStr for VersionRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ceiling {
            None => write!(f, "{}", self.floor),
            Some(ceiling) => write!(
                f,
                "{}{},{}{}",
                if self.floor_inclusive { '[' } else { '(' },
                self.floor,
                ceiling,
                if self.ceiling_inclusive { ']' } else { ')' }
            ),
        }
    }
}
