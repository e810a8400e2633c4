// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end: config file on disk to a working chain walker.

use grpc_retriable::{ConfigError, ENV_MAX_CHAIN_DEPTH, Status, walker_from_config};
use std::io::Write;

fn env_override_set() -> bool {
    std::env::var(ENV_MAX_CHAIN_DEPTH).is_ok()
}

#[test]
fn no_file_gives_an_unbounded_walker() {
    if env_override_set() {
        return;
    }
    let walker = walker_from_config(None).unwrap();
    assert_eq!(walker.max_depth(), None);
    assert!(walker.is_retriable_in_chain(Some(&Status::unavailable("down"))));
}

#[test]
fn file_depth_is_applied() {
    if env_override_set() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retriable.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "max_chain_depth = 16").unwrap();

    let walker = walker_from_config(Some(&path)).unwrap();
    assert_eq!(walker.max_depth(), Some(16));
}

#[test]
fn zero_depth_is_rejected() {
    if env_override_set() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retriable.toml");
    std::fs::write(&path, "max_chain_depth = 0\n").unwrap();

    let err = walker_from_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retriable.toml");
    std::fs::write(&path, "max_chain_depth = \n").unwrap();

    let err = walker_from_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}
