// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stress tests: very long chains and cyclic chains.
//!
//! Links are leaked so that neither building nor dropping the chain recurses.

use retriable_core::{ChainWalker, Code, Status, WalkOutcome, is_retriable_in_chain};
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug)]
struct RefLayer(&'static (dyn Error + Send + Sync));

impl fmt::Display for RefLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("layer")
    }
}

impl Error for RefLayer {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0)
    }
}

fn leaked_chain(root: Status, layers: usize) -> &'static (dyn Error + Send + Sync) {
    let mut current: &'static (dyn Error + Send + Sync) = Box::leak(Box::new(root));
    for _ in 0..layers {
        current = Box::leak(Box::new(RefLayer(current)));
    }
    current
}

#[derive(Debug)]
struct CycleNode {
    name: &'static str,
    next: OnceLock<&'static CycleNode>,
}

impl fmt::Display for CycleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Error for CycleNode {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.next.get().map(|n| *n as &(dyn Error + 'static))
    }
}

fn leaked_cycle() -> &'static CycleNode {
    let a: &'static CycleNode = Box::leak(Box::new(CycleNode {
        name: "a",
        next: OnceLock::new(),
    }));
    let b: &'static CycleNode = Box::leak(Box::new(CycleNode {
        name: "b",
        next: OnceLock::new(),
    }));
    assert!(a.next.set(b).is_ok());
    assert!(b.next.set(a).is_ok());
    a
}

#[test]
fn hundred_thousand_links_do_not_overflow_the_stack() {
    let err = leaked_chain(Status::unavailable("bottom"), 100_000);
    let c = ChainWalker::new().classify_chain(Some(err));
    assert!(c.retriable);
    assert_eq!(c.code, Some(Code::Unavailable));
    assert_eq!(c.depth, Some(100_000));
}

#[test]
fn deep_non_retriable_root_is_found() {
    let err = leaked_chain(Status::data_loss("corrupt"), 10_000);
    assert!(!is_retriable_in_chain(Some(err)));
}

#[test]
fn depth_cap_terminates_cyclic_chain() {
    let head = leaked_cycle();
    let c = ChainWalker::new()
        .with_max_depth(1_000)
        .classify_chain(Some(head));
    assert!(!c.retriable);
    assert_eq!(c.outcome, WalkOutcome::DepthLimitReached);
    assert_eq!(c.links_visited, 1_000);
}

#[test]
fn depth_cap_of_one_only_inspects_the_outer_error() {
    let walker = ChainWalker::new().with_max_depth(1);
    assert!(walker.is_retriable_in_chain(Some(&Status::unavailable("outer"))));
    let wrapped = leaked_chain(Status::unavailable("inner"), 1);
    assert!(!walker.is_retriable_in_chain(Some(wrapped)));
}
