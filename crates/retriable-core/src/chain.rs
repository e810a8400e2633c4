// SPDX-License-Identifier: MIT OR Apache-2.0
//! Walking `source()` chains in search of a retriable status code.

use crate::codes::{code_name, lookup};
use crate::extract::{CodeExtractor, StatusExtractor};
use serde::{Serialize, Serializer};
use std::error::Error;
use tonic::Code;
use tracing::{trace, warn};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// How a chain walk terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkOutcome {
    /// A link carried a retriable status code.
    Found,
    /// The chain ended without a retriable code (or there was no error).
    Exhausted,
    /// The walker's depth cap was reached before a retriable code was found.
    DepthLimitReached,
}

/// Detailed result of a chain walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Final verdict.
    pub retriable: bool,
    /// Code of the retriable link; otherwise the outermost non-retriable code
    /// seen on the way down, if any.
    #[serde(serialize_with = "serialize_code")]
    pub code: Option<Code>,
    /// Zero-based position of the link `code` came from (`0` is the
    /// outermost error).
    pub depth: Option<usize>,
    /// Number of links inspected.
    pub links_visited: usize,
    /// How the walk ended.
    pub outcome: WalkOutcome,
}

impl Classification {
    fn found(code: Code, depth: usize) -> Self {
        Self {
            retriable: true,
            code: Some(code),
            depth: Some(depth),
            links_visited: depth + 1,
            outcome: WalkOutcome::Found,
        }
    }

    fn not_found(
        seen: Option<(Code, usize)>,
        links_visited: usize,
        outcome: WalkOutcome,
    ) -> Self {
        Self {
            retriable: false,
            code: seen.map(|(code, _)| code),
            depth: seen.map(|(_, depth)| depth),
            links_visited,
            outcome,
        }
    }
}

fn serialize_code<S: Serializer>(code: &Option<Code>, ser: S) -> Result<S::Ok, S::Error> {
    code.map(code_name).serialize(ser)
}

// ---------------------------------------------------------------------------
// ChainWalker
// ---------------------------------------------------------------------------

/// Classifier over error chains.
///
/// The walk descends `source()` one link at a time and stops at the first
/// link whose status code is retriable. Links without a code, and links with
/// a non-retriable code, do not end the walk; the chain is only judged
/// non-retriable once it runs out. There is no depth cap unless one is
/// configured with
/// [`with_max_depth`](Self::with_max_depth), so a cyclic chain never
/// terminates.
#[derive(Debug, Clone, Default)]
pub struct ChainWalker<E = StatusExtractor> {
    extractor: E,
    max_depth: Option<usize>,
}

impl ChainWalker {
    /// Walker with the default extractor and no depth cap.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: CodeExtractor> ChainWalker<E> {
    /// Replace the code extractor, keeping the depth cap.
    pub fn with_extractor<F: CodeExtractor>(self, extractor: F) -> ChainWalker<F> {
        ChainWalker {
            extractor,
            max_depth: self.max_depth,
        }
    }

    /// Inspect at most `max_depth` links before giving up.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// The configured depth cap, if any.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Classify `err` alone, ignoring its causes.
    pub fn is_retriable(&self, err: Option<&(dyn Error + 'static)>) -> bool {
        err.and_then(|e| self.extractor.extract(e))
            .is_some_and(lookup)
    }

    /// Whether any link in `err`'s chain carries a retriable code.
    pub fn is_retriable_in_chain(&self, err: Option<&(dyn Error + 'static)>) -> bool {
        self.classify_chain(err).retriable
    }

    /// Walk the chain and report which link decided the verdict.
    pub fn classify_chain(&self, err: Option<&(dyn Error + 'static)>) -> Classification {
        let mut current = err;
        let mut depth = 0usize;
        let mut seen: Option<(Code, usize)> = None;

        while let Some(link) = current {
            if let Some(max) = self.max_depth
                && depth >= max
            {
                warn!(
                    target: "retriable.chain",
                    max_depth = max,
                    "depth cap reached before a retriable code was found"
                );
                return Classification::not_found(seen, depth, WalkOutcome::DepthLimitReached);
            }

            if let Some(code) = self.extractor.extract(link) {
                if lookup(code) {
                    trace!(
                        target: "retriable.chain",
                        depth,
                        code = code_name(code),
                        "retriable status code found"
                    );
                    return Classification::found(code, depth);
                }
                trace!(
                    target: "retriable.chain",
                    depth,
                    code = code_name(code),
                    "non-retriable status code, descending"
                );
                seen.get_or_insert((code, depth));
            }

            current = link.source();
            depth += 1;
        }

        trace!(target: "retriable.chain", links = depth, "no retriable code in chain");
        Classification::not_found(seen, depth, WalkOutcome::Exhausted)
    }
}

// ---------------------------------------------------------------------------
// Extension trait
// ---------------------------------------------------------------------------

/// Retriability checks callable directly on any concrete error type.
pub trait RetriableErrorExt {
    /// See [`crate::is_retriable`].
    fn is_retriable(&self) -> bool;

    /// See [`crate::is_retriable_in_chain`].
    fn is_retriable_in_chain(&self) -> bool;

    /// See [`crate::classify_chain`].
    fn classify_chain(&self) -> Classification;
}

impl<T: Error + 'static> RetriableErrorExt for T {
    fn is_retriable(&self) -> bool {
        crate::is_retriable(Some(self))
    }

    fn is_retriable_in_chain(&self) -> bool {
        crate::is_retriable_in_chain(Some(self))
    }

    fn classify_chain(&self) -> Classification {
        crate::classify_chain(Some(self))
    }
}
