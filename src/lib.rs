// SPDX-License-Identifier: MIT OR Apache-2.0
//! grpc-retriable
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Facade over [`retriable_core`] and [`retriable_config`]: classify errors by
//! their gRPC status code, directly or through their `source()` chain.

pub use retriable_config::{
    ClassifierConfig, ConfigError, ConfigWarning, ENV_MAX_CHAIN_DEPTH, load_config,
    merge_configs, parse_toml, validate_config,
};
pub use retriable_core::*;

use std::path::Path;
use tracing::warn;

/// Load, validate, and turn a config file into a [`ChainWalker`].
///
/// Advisory warnings are emitted as `tracing` events rather than returned.
pub fn walker_from_config(path: Option<&Path>) -> Result<ChainWalker, ConfigError> {
    let config = load_config(path)?;
    for warning in validate_config(&config)? {
        warn!(target: "retriable.config", %warning, "classifier config warning");
    }
    Ok(config.walker())
}
