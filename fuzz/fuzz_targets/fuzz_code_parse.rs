// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz status code parsing and raw lookups.
//!
//! Any code that parses must round-trip through its canonical name, and its
//! verdict must agree with the raw wire lookup.
#![no_main]
use libfuzzer_sys::fuzz_target;
use retriable_core::{code_name, lookup, lookup_raw, parse_code};

fuzz_target!(|data: &[u8]| {
    if data.len() >= 4 {
        let raw = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let verdict = lookup_raw(raw);
        if !(0..=16).contains(&raw) {
            assert!(!verdict, "unknown wire value {raw} must not be retriable");
        }
    }

    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Some(code) = parse_code(s) {
        assert_eq!(parse_code(code_name(code)), Some(code));
        assert_eq!(lookup(code), lookup_raw(code as i32));
    }
});
