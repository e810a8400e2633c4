// SPDX-License-Identifier: MIT OR Apache-2.0
//! The fixed gRPC status code → retriability table.

use tonic::Code;

/// Number of status codes defined by the gRPC convention.
pub const CODE_COUNT: usize = 17;

/// Retriability verdict for every gRPC status code.
///
/// Four codes are retriable: `UNKNOWN`, `RESOURCE_EXHAUSTED`, `INTERNAL` and
/// `UNAVAILABLE`. The rest are listed explicitly as non-retriable so the
/// table documents the full vocabulary.
///
/// `INTERNAL` is officially reserved for serious errors, but in practice it
/// is the generic code servers fall back to when nothing more specific fits,
/// so it is treated as transient. Expect the occasional retry of a genuinely
/// broken call.
pub const CLASSIFICATION_TABLE: [(Code, bool); CODE_COUNT] = [
    (Code::Ok, false),
    (Code::Cancelled, false),
    (Code::Unknown, true),
    (Code::InvalidArgument, false),
    (Code::DeadlineExceeded, false),
    (Code::NotFound, false),
    (Code::AlreadyExists, false),
    (Code::PermissionDenied, false),
    (Code::ResourceExhausted, true),
    (Code::FailedPrecondition, false),
    (Code::Aborted, false),
    (Code::OutOfRange, false),
    (Code::Unimplemented, false),
    (Code::Internal, true),
    (Code::Unavailable, true),
    (Code::DataLoss, false),
    (Code::Unauthenticated, false),
];

static TABLE: &[(Code, bool)] = &CLASSIFICATION_TABLE;

/// Returns the verdict for `code`. Codes missing from the table are not
/// retriable.
pub fn lookup(code: Code) -> bool {
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .is_some_and(|(_, retriable)| *retriable)
}

/// Classify a raw wire value such as the `grpc-status` trailer.
///
/// Values outside `0..=16` are not folded into `UNKNOWN` the way
/// [`Code::from_i32`] does; an unrecognised code is never retriable.
pub fn lookup_raw(value: i32) -> bool {
    code_from_raw(value).is_some_and(lookup)
}

/// Map a raw wire value to a [`Code`], rejecting values the convention does
/// not define.
pub fn code_from_raw(value: i32) -> Option<Code> {
    if (0..CODE_COUNT as i32).contains(&value) {
        Some(Code::from_i32(value))
    } else {
        None
    }
}

/// Codes that classify as retriable, in table order.
pub fn retriable_codes() -> impl Iterator<Item = Code> {
    TABLE
        .iter()
        .filter(|(_, r)| *r)
        .map(|(c, _)| *c)
}

/// Codes that classify as non-retriable, in table order.
pub fn non_retriable_codes() -> impl Iterator<Item = Code> {
    TABLE
        .iter()
        .filter(|(_, r)| !*r)
        .map(|(c, _)| *c)
}

/// Canonical `SCREAMING_SNAKE_CASE` name of a status code.
pub fn code_name(code: Code) -> &'static str {
    match code {
        Code::Ok => "OK",
        Code::Cancelled => "CANCELLED",
        Code::Unknown => "UNKNOWN",
        Code::InvalidArgument => "INVALID_ARGUMENT",
        Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
        Code::NotFound => "NOT_FOUND",
        Code::AlreadyExists => "ALREADY_EXISTS",
        Code::PermissionDenied => "PERMISSION_DENIED",
        Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
        Code::FailedPrecondition => "FAILED_PRECONDITION",
        Code::Aborted => "ABORTED",
        Code::OutOfRange => "OUT_OF_RANGE",
        Code::Unimplemented => "UNIMPLEMENTED",
        Code::Internal => "INTERNAL",
        Code::Unavailable => "UNAVAILABLE",
        Code::DataLoss => "DATA_LOSS",
        Code::Unauthenticated => "UNAUTHENTICATED",
    }
}

/// Parse a status code from its canonical name (any case, `CANCELED` also
/// accepted) or from its decimal wire value.
pub fn parse_code(input: &str) -> Option<Code> {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<i32>() {
        return code_from_raw(value);
    }
    let upper = trimmed.to_ascii_uppercase();
    if upper == "CANCELED" {
        return Some(Code::Cancelled);
    }
    TABLE
        .iter()
        .map(|(c, _)| *c)
        .find(|c| code_name(*c) == upper)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_covers_every_wire_value_once() {
        let values: HashSet<i32> = CLASSIFICATION_TABLE
            .iter()
            .map(|(c, _)| *c as i32)
            .collect();
        assert_eq!(values.len(), CODE_COUNT);
        assert_eq!(values, (0..CODE_COUNT as i32).collect());
    }

    #[test]
    fn exactly_four_retriable_codes() {
        let retriable: Vec<Code> = retriable_codes().collect();
        assert_eq!(
            retriable,
            vec![
                Code::Unknown,
                Code::ResourceExhausted,
                Code::Internal,
                Code::Unavailable
            ]
        );
        assert_eq!(non_retriable_codes().count(), 13);
    }

    #[test]
    fn lookup_matches_table() {
        for (code, verdict) in CLASSIFICATION_TABLE {
            assert_eq!(lookup(code), verdict, "verdict mismatch for {code:?}");
        }
    }

    #[test]
    fn raw_values_out_of_range_are_not_retriable() {
        assert!(!lookup_raw(-1));
        assert!(!lookup_raw(17));
        assert!(!lookup_raw(i32::MAX));
        assert_eq!(code_from_raw(17), None);
    }

    #[test]
    fn raw_values_in_range_follow_table() {
        assert!(lookup_raw(14));
        assert!(lookup_raw(2));
        assert!(!lookup_raw(5));
        assert!(!lookup_raw(0));
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = CLASSIFICATION_TABLE
            .iter()
            .map(|(c, _)| code_name(*c))
            .collect();
        assert_eq!(names.len(), CODE_COUNT);
    }

    #[test]
    fn parse_accepts_names_numbers_and_spellings() {
        assert_eq!(parse_code("UNAVAILABLE"), Some(Code::Unavailable));
        assert_eq!(parse_code("resource_exhausted"), Some(Code::ResourceExhausted));
        assert_eq!(parse_code(" not_found "), Some(Code::NotFound));
        assert_eq!(parse_code("CANCELED"), Some(Code::Cancelled));
        assert_eq!(parse_code("cancelled"), Some(Code::Cancelled));
        assert_eq!(parse_code("14"), Some(Code::Unavailable));
        assert_eq!(parse_code("0"), Some(Code::Ok));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_code(""), None);
        assert_eq!(parse_code("17"), None);
        assert_eq!(parse_code("-3"), None);
        assert_eq!(parse_code("UNAVAILABLE!"), None);
        assert_eq!(parse_code("retry"), None);
    }

    #[test]
    fn name_parse_roundtrip() {
        for (code, _) in CLASSIFICATION_TABLE {
            assert_eq!(parse_code(code_name(code)), Some(code));
        }
    }
}
