//! Hierarchical dotted parameter keys.

use std::borrow::Borrow;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{codes, PcgError};

/// Validated dotted key such as `domain.quantity`.
///
/// Paths are case-sensitive; every `.`-separated segment must be non-empty and
/// free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParamPath(String);

impl ParamPath {
    /// Parses and validates a dotted key.
    pub fn parse(raw: impl Into<String>) -> Result<Self, PcgError> {
        let raw = raw.into();
        validate_path(&raw)?;
        Ok(Self(raw))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dotted segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the enclosing namespace (`a.b` for `a.b.c`), if any.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(head, _)| head)
    }

    /// Whether this path lives inside the namespace `prefix` (or equals it).
    pub fn in_namespace(&self, prefix: &str) -> bool {
        self.0 == prefix
            || (self.0.starts_with(prefix) && self.0[prefix.len()..].starts_with('.'))
    }
}

/// Validates a raw dotted key without allocating.
pub fn validate_path(raw: &str) -> Result<(), PcgError> {
    let invalid = |reason: &str| {
        PcgError::store(codes::INVALID_PATH, format!("invalid parameter path: {reason}"))
            .with_context("path", raw)
    };
    if raw.is_empty() {
        return Err(invalid("path is empty"));
    }
    for segment in raw.split('.') {
        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }
        if segment.chars().any(char::is_whitespace) {
            return Err(invalid("segment contains whitespace"));
        }
    }
    Ok(())
}

impl Borrow<str> for ParamPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ParamPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParamPath {
    type Error = PcgError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl TryFrom<&str> for ParamPath {
    type Error = PcgError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<ParamPath> for String {
    fn from(path: ParamPath) -> Self {
        path.0
    }
}

impl Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
