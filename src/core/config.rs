//! Layered configuration
//!
//! Sources are merged in order, later ones winning key by key:
//!
//! 1. built-in defaults
//! 2. user config (`<config dir>/tpm/config.yaml`)
//! 3. workspace config (`.tpm/config.yaml`)
//! 4. `TPM_LOG` environment variable (log level only)

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_yml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::core::schedule::InspectionIntervals;
use crate::core::token::{DigestTokens, RandomTokens, TokenSource};
use crate::core::workflow::WorkflowEngine;

/// Environment variable overriding `log.level`
pub const LOG_ENV: &str = "TPM_LOG";

#[derive(Debug, Error, Diagnostic)]
#[diagnostic(code(tpm::config))]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Invalid merged configuration: {0}")]
    Merged(#[source] serde_yml::Error),
}

/// How verification tokens are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TokenMode {
    /// Hash of the record content, re-checkable
    #[default]
    Digest,
    /// Random, not re-checkable
    Random,
}

impl std::fmt::Display for TokenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenMode::Digest => write!(f, "digest"),
            TokenMode::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub mode: TokenMode,
    /// Hex/alphanumeric characters after the `0x` prefix
    pub length: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            mode: TokenMode::Digest,
            length: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Simulated scan delay in milliseconds
    pub delay_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tokens: TokenConfig,
    pub inspection: InspectionIntervals,
    pub scan: ScanConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load config from the user dir, then the workspace root (if any)
    pub fn load(workspace_root: Option<&Path>) -> Result<Self, ConfigError> {
        let mut paths = Vec::new();
        if let Some(path) = Self::user_config_path() {
            paths.push(path);
        }
        if let Some(root) = workspace_root {
            paths.push(Self::workspace_config_path(root));
        }
        let mut config = Self::from_files(&paths)?;
        config.apply_env(std::env::var(LOG_ENV).ok().as_deref());
        Ok(config)
    }

    /// Merge the given files over the defaults; missing files are skipped
    pub fn from_files(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged = Value::Mapping(Default::default());
        for path in paths {
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let layer: Value =
                serde_yml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            merge_values(&mut merged, layer);
        }
        serde_yml::from_value(merged).map_err(ConfigError::Merged)
    }

    /// Apply the log level override, ignoring blank values
    pub fn apply_env(&mut self, level: Option<&str>) {
        if let Some(level) = level.map(str::trim).filter(|l| !l.is_empty()) {
            self.log.level = level.to_string();
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tpm").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    pub fn workspace_config_path(root: &Path) -> PathBuf {
        root.join(".tpm").join("config.yaml")
    }

    /// Token source selected by `tokens.mode`
    pub fn token_source(&self) -> Arc<dyn TokenSource> {
        match self.tokens.mode {
            TokenMode::Digest => Arc::new(DigestTokens::new(self.tokens.length)),
            TokenMode::Random => Arc::new(RandomTokens::new(self.tokens.length)),
        }
    }

    /// Workflow engine using the configured token source
    pub fn engine(&self) -> WorkflowEngine {
        WorkflowEngine::new(self.token_source())
    }
}

/// Overlay `layer` onto `base`, recursing into mappings
fn merge_values(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Mapping(base_map), Value::Mapping(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        // An empty document contributes nothing
        (_, Value::Null) => {}
        (base, layer) => *base = layer,
    }
}
