//! Composition utilities for common walker patterns.
//!
//! These helpers cover the queries analyzers keep re-implementing: "is there
//! any X under here", "how many X", "collect every X". Each one is a small
//! [`Walker`] that overrides `default_visit`, so it sees every operation,
//! placeholders included, and inherits the stack-safety guard.
//!
//! # Examples
//!
//! ```
//! use opwalk::ir::{Operation, OperationKind};
//! use opwalk::visit::composers::*;
//!
//! let tree = Operation::new(OperationKind::Return).with_child(Operation::local("x"));
//!
//! // Check for unbound code
//! let has_errors = contains(&tree, |op| op.kind.is_placeholder()).unwrap();
//! assert!(!has_errors);
//!
//! // Collect all local names
//! let locals = collect(&tree, |op| match &op.kind {
//!     OperationKind::LocalReference { name } => Some(name.clone()),
//!     _ => None,
//! })
//! .unwrap();
//! assert_eq!(locals, vec!["x".to_string()]);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::guard::{Depth, InsufficientExecutionStack, DEFAULT_MAX_DEPTH};
use crate::ir::Operation;
use crate::visit::{walk_children, Walker};

// ============================================================================
// Detection / Predicate Helpers
// ============================================================================

/// Check if the tree under `root` contains an operation matching `predicate`.
///
/// Stops descending once a match is found.
pub fn contains<F>(root: &Operation, predicate: F) -> Result<bool, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> bool,
{
    contains_with_limit(root, DEFAULT_MAX_DEPTH, predicate)
}

pub fn contains_with_limit<F>(
    root: &Operation,
    limit: u32,
    predicate: F,
) -> Result<bool, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> bool,
{
    struct Detector<F> {
        predicate: F,
        limit: u32,
        found: bool,
    }

    impl<F> Walker for Detector<F>
    where
        F: Fn(&Operation) -> bool,
    {
        type Error = InsufficientExecutionStack;

        fn max_depth(&self) -> u32 {
            self.limit
        }

        fn default_visit(&mut self, op: &Operation, depth: Depth) -> Result<(), Self::Error> {
            if self.found {
                return Ok(());
            }
            if (self.predicate)(op) {
                self.found = true;
                return Ok(()); // Short-circuit
            }
            walk_children(self, op, depth)
        }
    }

    let mut detector = Detector {
        predicate,
        limit,
        found: false,
    };
    detector.walk(Some(root))?;
    Ok(detector.found)
}

/// Find the first operation in pre-order matching `predicate`.
pub fn find_first<'a, F>(
    root: &'a Operation,
    predicate: F,
) -> Result<Option<&'a Operation>, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> bool,
{
    find_first_with_limit(root, DEFAULT_MAX_DEPTH, predicate)
}

pub fn find_first_with_limit<'a, F>(
    root: &'a Operation,
    limit: u32,
    predicate: F,
) -> Result<Option<&'a Operation>, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> bool,
{
    // Hooks only see short-lived borrows, so record the child-index path to
    // the match and resolve it against `root` afterwards.
    struct Finder<F> {
        predicate: F,
        limit: u32,
        path: Vec<usize>,
        found: Option<Vec<usize>>,
    }

    impl<F> Walker for Finder<F>
    where
        F: Fn(&Operation) -> bool,
    {
        type Error = InsufficientExecutionStack;

        fn max_depth(&self) -> u32 {
            self.limit
        }

        fn default_visit(&mut self, op: &Operation, depth: Depth) -> Result<(), Self::Error> {
            if self.found.is_some() {
                return Ok(());
            }
            if (self.predicate)(op) {
                self.found = Some(self.path.clone());
                return Ok(());
            }
            for (index, child) in op.children().enumerate() {
                self.path.push(index);
                self.visit(Some(child), depth)?;
                self.path.pop();
                if self.found.is_some() {
                    break;
                }
            }
            Ok(())
        }
    }

    let mut finder = Finder {
        predicate,
        limit,
        path: Vec::new(),
        found: None,
    };
    finder.walk(Some(root))?;
    Ok(finder
        .found
        .map(|path| path.iter().fold(root, |op, &index| &op.children[index])))
}

// ============================================================================
// Counting Helpers
// ============================================================================

/// Count operations matching `predicate` in the tree under `root`.
pub fn count<F>(root: &Operation, predicate: F) -> Result<usize, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> bool,
{
    count_with_limit(root, DEFAULT_MAX_DEPTH, predicate)
}

pub fn count_with_limit<F>(
    root: &Operation,
    limit: u32,
    predicate: F,
) -> Result<usize, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> bool,
{
    struct Counter<F> {
        predicate: F,
        limit: u32,
        count: usize,
    }

    impl<F> Walker for Counter<F>
    where
        F: Fn(&Operation) -> bool,
    {
        type Error = InsufficientExecutionStack;

        fn max_depth(&self) -> u32 {
            self.limit
        }

        fn default_visit(&mut self, op: &Operation, depth: Depth) -> Result<(), Self::Error> {
            if (self.predicate)(op) {
                self.count += 1;
            }
            walk_children(self, op, depth)
        }
    }

    let mut counter = Counter {
        predicate,
        limit,
        count: 0,
    };
    counter.walk(Some(root))?;
    Ok(counter.count)
}

// ============================================================================
// Collection Helpers
// ============================================================================

/// Collect values from the tree under `root`, in pre-order.
///
/// The mapper returns `Some(value)` to collect a value, or `None` to skip.
pub fn collect<F, T>(root: &Operation, mapper: F) -> Result<Vec<T>, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> Option<T>,
{
    collect_with_limit(root, DEFAULT_MAX_DEPTH, mapper)
}

pub fn collect_with_limit<F, T>(
    root: &Operation,
    limit: u32,
    mapper: F,
) -> Result<Vec<T>, InsufficientExecutionStack>
where
    F: Fn(&Operation) -> Option<T>,
{
    struct Collector<F, T> {
        mapper: F,
        limit: u32,
        items: Vec<T>,
    }

    impl<F, T> Walker for Collector<F, T>
    where
        F: Fn(&Operation) -> Option<T>,
    {
        type Error = InsufficientExecutionStack;

        fn max_depth(&self) -> u32 {
            self.limit
        }

        fn default_visit(&mut self, op: &Operation, depth: Depth) -> Result<(), Self::Error> {
            if let Some(item) = (self.mapper)(op) {
                self.items.push(item);
            }
            walk_children(self, op, depth)
        }
    }

    let mut collector = Collector {
        mapper,
        limit,
        items: Vec::new(),
    };
    collector.walk(Some(root))?;
    Ok(collector.items)
}

/// Kind names of every operation under `root`, in dispatch order.
pub fn preorder_kinds(root: &Operation) -> Result<Vec<&'static str>, InsufficientExecutionStack> {
    preorder_kinds_with_limit(root, DEFAULT_MAX_DEPTH)
}

pub fn preorder_kinds_with_limit(
    root: &Operation,
    limit: u32,
) -> Result<Vec<&'static str>, InsufficientExecutionStack> {
    collect_with_limit(root, limit, |op| Some(op.kind.name()))
}

// ============================================================================
// Tree Statistics
// ============================================================================

/// Shape summary of an operation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    /// Deepest nesting reached; the root is at depth 1.
    pub max_depth: u32,
    /// `None` and `Invalid` operations.
    pub placeholders: usize,
    pub kinds: BTreeMap<&'static str, usize>,
}

impl TreeStats {
    pub fn gather(root: &Operation, limit: u32) -> Result<TreeStats, InsufficientExecutionStack> {
        struct Gatherer {
            limit: u32,
            stats: TreeStats,
        }

        impl Walker for Gatherer {
            type Error = InsufficientExecutionStack;

            fn max_depth(&self) -> u32 {
                self.limit
            }

            fn default_visit(&mut self, op: &Operation, depth: Depth) -> Result<(), Self::Error> {
                self.stats.nodes += 1;
                self.stats.max_depth = self.stats.max_depth.max(depth.current());
                if op.kind.is_placeholder() {
                    self.stats.placeholders += 1;
                }
                *self.stats.kinds.entry(op.kind.name()).or_default() += 1;
                walk_children(self, op, depth)
            }
        }

        let mut gatherer = Gatherer {
            limit,
            stats: TreeStats::default(),
        };
        gatherer.walk(Some(root))?;
        Ok(gatherer.stats)
    }
}
