// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz ClassifierConfig TOML parsing and validation.
//!
//! Verifies that `parse_toml` and `validate_config` never panic, that a
//! parsed config survives a TOML round-trip, and that the walker it builds
//! carries the configured cap.
#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(config) = retriable_config::parse_toml(s) else {
        return;
    };

    match retriable_config::validate_config(&config) {
        Ok(warnings) => {
            for w in &warnings {
                let _ = format!("{w}");
            }
        }
        Err(e) => {
            let _ = format!("{e}");
        }
    }

    if let Ok(toml_str) = toml::to_string(&config)
        && let Ok(rt) = retriable_config::parse_toml(&toml_str)
    {
        assert_eq!(config, rt, "TOML round-trip must be lossless");
    }

    assert_eq!(config.walker().max_depth(), config.max_chain_depth);

    if let Ok(json) = serde_json::to_string(&config) {
        let _ = serde_json::from_str::<retriable_config::ClassifierConfig>(&json);
    }
});
