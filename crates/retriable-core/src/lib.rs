// SPDX-License-Identifier: MIT OR Apache-2.0
//! Retriability classification for errors carrying gRPC status codes.
//!
//! A fixed [`CLASSIFICATION_TABLE`] maps every gRPC [`Code`] to a verdict:
//! `UNKNOWN`, `RESOURCE_EXHAUSTED`, `INTERNAL` and `UNAVAILABLE` are
//! retriable, everything else is not. [`is_retriable`] looks at a single
//! error; [`is_retriable_in_chain`] walks `source()` and answers `true` as
//! soon as any link carries a retriable code.
//!
//! Nothing here retries anything. Retry counts, backoff and jitter belong to
//! the caller's loop.
//!
//! ```
//! use retriable_core::{RetriableErrorExt, is_retriable_in_chain};
//! use tonic::Status;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("fetching block range")]
//! struct FetchError(#[source] Status);
//!
//! let err = FetchError(Status::unavailable("connection reset"));
//! assert!(!err.is_retriable());
//! assert!(is_retriable_in_chain(Some(&err)));
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod codes;
mod extract;
mod status_error;

use std::error::Error;

pub use chain::{ChainWalker, Classification, RetriableErrorExt, WalkOutcome};
pub use codes::{
    CLASSIFICATION_TABLE, CODE_COUNT, code_from_raw, code_name, lookup, lookup_raw,
    non_retriable_codes, parse_code, retriable_codes,
};
pub use extract::{CodeExtractor, Downcast, Fallback, HasStatusCode, StatusExtractor};
pub use status_error::StatusError;
pub use tonic::{Code, Status};

/// Whether `err` itself carries a retriable status code.
///
/// Causes are not consulted. `None`, and errors without a status code, are
/// not retriable.
pub fn is_retriable(err: Option<&(dyn Error + 'static)>) -> bool {
    ChainWalker::new().is_retriable(err)
}

/// Whether any error in `err`'s `source()` chain carries a retriable status
/// code.
///
/// The walk returns `true` at the first retriable link. Links without a code
/// and links with a non-retriable code are passed over, so
/// `NOT_FOUND` wrapping `UNAVAILABLE` is retriable. `false` means the chain
/// ran out. The walk has no depth cap; use [`ChainWalker::with_max_depth`]
/// when chains may be cyclic.
pub fn is_retriable_in_chain(err: Option<&(dyn Error + 'static)>) -> bool {
    ChainWalker::new().is_retriable_in_chain(err)
}

/// Like [`is_retriable_in_chain`], but reports which link decided.
pub fn classify_chain(err: Option<&(dyn Error + 'static)>) -> Classification {
    ChainWalker::new().classify_chain(err)
}
