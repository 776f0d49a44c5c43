//! Provenance and schema descriptors shared across PCG artefacts.

use serde::{Deserialize, Serialize};

/// Source recorded for values written by the external seed step.
pub const EXTERNAL_SOURCE: &str = "external";

/// Source recorded for meta-values written by the validation layer.
pub const VALIDATOR_SOURCE: &str = "validator";

/// Namespaces written only by the validation layer after a session runs.
pub const RESERVED_NAMESPACES: [&str; 2] = ["validation", "system"];

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a payload written under `other` can be read by this version.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}
