//! Structured error types shared across PCG crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine readable codes carried in [`ErrorInfo::code`].
pub mod codes {
    /// The unit graph contains a dependency cycle.
    pub const CYCLE: &str = "cycle";
    /// A required input has no producer and was not seeded.
    pub const UNPRODUCED_INPUT: &str = "unproduced-input";
    /// Two producers declare the same output path.
    pub const DUPLICATE_PRODUCER: &str = "duplicate-producer";
    /// Two units were registered under the same identifier.
    pub const DUPLICATE_UNIT: &str = "duplicate-unit";
    /// A unit returned without producing every declared output.
    pub const INCOMPLETE_OUTPUT: &str = "incomplete-output";
    /// A unit returned a path it never declared.
    pub const UNDECLARED_OUTPUT: &str = "undeclared-output";
    /// A unit read a path outside its declared inputs.
    pub const UNDECLARED_READ: &str = "undeclared-read";
    /// A declared input was absent from the store at execution time.
    pub const MISSING_INPUT: &str = "missing-input";
    /// A write attempted to replace a protected or foreign entry.
    pub const IMMUTABLE_OVERWRITE: &str = "immutable-overwrite";
    /// The requested path is absent.
    pub const NOT_FOUND: &str = "not-found";
    /// The requested path carries no reference value.
    pub const NO_REFERENCE: &str = "no-reference";
    /// The reference (or theory value) cannot produce a finite deviation.
    pub const INVALID_REFERENCE: &str = "invalid-reference";
    /// The path is not a well-formed dotted key.
    pub const INVALID_PATH: &str = "invalid-path";
    /// A formula identifier was registered twice in a catalogue.
    pub const DUPLICATE_FORMULA: &str = "duplicate-formula";
    /// A certificate or gate identifier was registered twice.
    pub const DUPLICATE_CHECK: &str = "duplicate-check";
    /// The stored payload does not have the requested shape.
    pub const TYPE_MISMATCH: &str = "type-mismatch";
    /// A number written to the store is NaN or infinite.
    pub const NON_FINITE_VALUE: &str = "non-finite-value";
    /// A unit output or check identifier falls inside a namespace owned by the validator.
    pub const RESERVED_NAMESPACE: &str = "reserved-namespace";
}

/// Structured payload attached to every [`PcgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (unit ids, paths, cycle members).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the parameter computation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PcgError {
    /// Scheduling-time configuration errors; always fatal to the session.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Runtime contract violations raised by the execution engine.
    #[error("contract violation: {0}")]
    Contract(ErrorInfo),
    /// Store integrity errors raised by the parameter store.
    #[error("store error: {0}")]
    Store(ErrorInfo),
    /// Serialization, schema, and IO errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PcgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PcgError::Config(info)
            | PcgError::Contract(info)
            | PcgError::Store(info)
            | PcgError::Serde(info) => info,
        }
    }

    /// Returns the stable code of the underlying payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Whether a caller may reasonably continue after this error.
    ///
    /// Only lookups that miss (`not-found`, `no-reference`) are recoverable;
    /// everything else indicates a faulty declaration or a corrupted store.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PcgError::Store(info)
            if info.code == codes::NOT_FOUND || info.code == codes::NO_REFERENCE)
    }

    /// Shorthand for a [`PcgError::Config`] with the given code and message.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        PcgError::Config(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`PcgError::Contract`] with the given code and message.
    pub fn contract(code: &str, message: impl Into<String>) -> Self {
        PcgError::Contract(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`PcgError::Store`] with the given code and message.
    pub fn store(code: &str, message: impl Into<String>) -> Self {
        PcgError::Store(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`PcgError::Serde`] with the given code and message.
    pub fn serde(code: &str, message: impl Into<String>) -> Self {
        PcgError::Serde(ErrorInfo::new(code, message))
    }

    /// Adds a context entry to whichever payload this error carries.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Sets the remediation hint on the payload.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            PcgError::Config(info) => PcgError::Config(f(info)),
            PcgError::Contract(info) => PcgError::Contract(f(info)),
            PcgError::Store(info) => PcgError::Store(f(info)),
            PcgError::Serde(info) => PcgError::Serde(f(info)),
        }
    }
}
