use std::path::Path;

use pcg_core::errors::PcgError;
use serde::{Deserialize, Serialize};

fn config_error(code: &str, err: impl ToString) -> PcgError {
    PcgError::config(code, err.to_string())
}

/// How units of a session are dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One unit at a time in schedule order.
    #[default]
    Sequential,
    /// Units of a wave run concurrently; commits stay on the calling thread.
    Parallel,
}

/// Execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Dispatch mode.
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Worker threads used in parallel mode.
    #[serde(default = "ExecutionConfig::default_threads")]
    pub threads: usize,
}

impl ExecutionConfig {
    const fn default_threads() -> usize {
        1
    }

    /// Sequential execution.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Parallel waves on `threads` workers.
    pub fn parallel(threads: usize) -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            threads: threads.max(1),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            threads: Self::default_threads(),
        }
    }
}

/// Post-execution validation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Write certificate outcomes back into the store as meta-values.
    #[serde(default)]
    pub record_results: bool,
}

/// Top-level session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl SessionConfig {
    /// Parses YAML; every field is optional.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, PcgError> {
        serde_yaml::from_slice(data).map_err(|err| config_error("session_config_parse", err))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, PcgError> {
        let data = std::fs::read(path).map_err(|err| {
            config_error("session_config_read", err).with_context("file", path.display().to_string())
        })?;
        Self::from_yaml_slice(&data).map_err(|err| err.with_context("file", path.display().to_string()))
    }

    /// Serialises the configuration to YAML.
    pub fn to_yaml_string(&self) -> Result<String, PcgError> {
        serde_yaml::to_string(self).map_err(|err| config_error("session_config_serialize", err))
    }
}
