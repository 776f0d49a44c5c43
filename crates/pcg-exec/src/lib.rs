#![deny(missing_docs)]
#![doc = "Runs registered units in dependency order against a parameter store, then validates the result."]

/// Session configuration loaded from YAML.
pub mod config;
/// The execution engine.
pub mod engine;
/// Tracing subscriber setup for binaries.
pub mod logging;
/// Session builder owning a fresh store per run.
pub mod session;

pub use config::{ExecutionConfig, ExecutionMode, SessionConfig, ValidationConfig};
pub use engine::{ExecutionEngine, ExecutionSummary, UnitRecord};
pub use session::{SessionBuilder, SessionOutcome};
