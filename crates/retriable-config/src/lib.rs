// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for retriability
//! classification.
//!
//! The classification table itself is fixed; the only knob is how far the
//! chain walker may descend before giving up. [`ClassifierConfig`] holds it,
//! loads from TOML, takes environment overrides, and builds a
//! [`ChainWalker`].
#![deny(unsafe_code)]
#![warn(missing_docs)]

use retriable_core::ChainWalker;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file does not exist.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read config file {path}: {reason}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error detail.
        reason: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No depth cap is set, so a cyclic error chain would never terminate.
    Unbounded,
    /// The depth cap is far beyond any realistic wrapping depth.
    LargeDepth {
        /// Configured cap.
        depth: usize,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::Unbounded => {
                f.write_str("max_chain_depth is unset; cyclic error chains will not terminate")
            }
            ConfigWarning::LargeDepth { depth } => {
                write!(f, "max_chain_depth {depth} exceeds {LARGE_DEPTH_THRESHOLD}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Runtime settings for the chain classifier.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Maximum number of chain links to inspect. Unset means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chain_depth: Option<usize>,
}

impl ClassifierConfig {
    /// Build a [`ChainWalker`] with the default extractor and this config's
    /// depth cap.
    pub fn walker(&self) -> ChainWalker {
        match self.max_chain_depth {
            Some(depth) => ChainWalker::new().with_max_depth(depth),
            None => ChainWalker::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Environment variable overriding [`ClassifierConfig::max_chain_depth`].
pub const ENV_MAX_CHAIN_DEPTH: &str = "RETRIABLE_MAX_CHAIN_DEPTH";

/// Depth above which a cap generates a warning.
const LARGE_DEPTH_THRESHOLD: usize = 10_000;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`ClassifierConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`ClassifierConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ClassifierConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                    path: p.display().to_string(),
                },
                _ => ConfigError::Io {
                    path: p.display().to_string(),
                    reason: e.to_string(),
                },
            })?;
            parse_toml(&content)?
        }
        None => ClassifierConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into a [`ClassifierConfig`].
pub fn parse_toml(content: &str) -> Result<ClassifierConfig, ConfigError> {
    toml::from_str::<ClassifierConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply overrides from the process environment.
///
/// Recognised variables:
/// - `RETRIABLE_MAX_CHAIN_DEPTH`
pub fn apply_env_overrides(config: &mut ClassifierConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` in place of the process environment.
///
/// Values that do not parse are ignored with a warning.
pub fn apply_overrides_from<F>(config: &mut ClassifierConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_MAX_CHAIN_DEPTH) {
        match val.trim().parse::<usize>() {
            Ok(depth) => config.max_chain_depth = Some(depth),
            Err(e) => warn!(
                target: "retriable.config",
                var = ENV_MAX_CHAIN_DEPTH,
                value = %val,
                error = %e,
                "ignoring unparseable override"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// A zero depth cap is a hard error: the walker would never inspect the
/// error it was handed.
pub fn validate_config(config: &ClassifierConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    match config.max_chain_depth {
        None => warnings.push(ConfigWarning::Unbounded),
        Some(0) => errors.push("max_chain_depth must be at least 1".into()),
        Some(depth) if depth > LARGE_DEPTH_THRESHOLD => {
            warnings.push(ConfigWarning::LargeDepth { depth });
        }
        Some(_) => {}
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
pub fn merge_configs(base: ClassifierConfig, overlay: ClassifierConfig) -> ClassifierConfig {
    ClassifierConfig {
        max_chain_depth: overlay.max_chain_depth.or(base.max_chain_depth),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
