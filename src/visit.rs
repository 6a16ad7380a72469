//! Operation tree walkers
//!
//! This module provides two walker traits that drive depth-first, pre-order
//! traversal over an [`Operation`] tree:
//!
//! - [`Walker`]: side-effecting traversal; hooks return `Result<(), Error>`
//! - [`ArgWalker`]: threads a read-only argument through every call and lets
//!   each hook produce a result
//!
//! ## Usage
//!
//! Implement the walker trait for your pass, overriding only the `visit_*`
//! hooks for the kinds you care about. Every other kind falls through to
//! `default_visit`, which visits the children in order. Call `default_visit`
//! (or [`walk_children`]) inside your override to keep descending; return
//! without it to prune the subtree.
//!
//! ```rust
//! use opwalk::guard::{Depth, InsufficientExecutionStack};
//! use opwalk::ir::{Operation, OperationKind};
//! use opwalk::visit::Walker;
//!
//! struct LocalCollector {
//!     names: Vec<String>,
//! }
//!
//! impl Walker for LocalCollector {
//!     type Error = InsufficientExecutionStack;
//!
//!     fn visit_local_reference(&mut self, op: &Operation, depth: Depth) -> Result<(), Self::Error> {
//!         if let OperationKind::LocalReference { name } = &op.kind {
//!             self.names.push(name.clone());
//!         }
//!         self.default_visit(op, depth)
//!     }
//! }
//! ```
//!
//! ## Stack safety
//!
//! Every recursive step goes through [`visit`], which enters one level of
//! [`Depth`] before dispatching. Past the walker's `max_depth` the traversal
//! fails with [`InsufficientExecutionStack`] instead of overflowing the native
//! stack. Hook errors are returned to the caller untouched.
//!
//! A walker value must not be shared between threads mid-traversal, but
//! separate walkers may traverse the same tree concurrently since trees are
//! never mutated.

pub mod composers;
pub mod with_arg;

pub use with_arg::ArgWalker;

use crate::guard::{Depth, InsufficientExecutionStack, DEFAULT_MAX_DEPTH};
use crate::ir::Operation;

// ============================================================================
// Walker Trait (Side-Effecting)
// ============================================================================

/// Side-effecting operation walker. Every hook defaults to `default_visit`,
/// which recurses into all children in declaration order.
pub trait Walker: Sized {
    /// Error type of the traversal. Must be able to carry a guard trip.
    type Error: From<InsufficientExecutionStack>;

    /// Nesting depth beyond which traversal fails.
    fn max_depth(&self) -> u32 {
        DEFAULT_MAX_DEPTH
    }

    /// Walk a whole tree starting at `root`.
    fn walk(&mut self, root: Option<&Operation>) -> Result<(), Self::Error> {
        let depth = Depth::root(self.max_depth());
        self.visit(root, depth)
    }

    /// Visit one operation. `depth` is the depth of its parent.
    fn visit(&mut self, operation: Option<&Operation>, depth: Depth) -> Result<(), Self::Error> {
        visit(self, operation, depth)
    }

    /// Fallback for every kind without an override.
    fn default_visit(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        walk_children(self, operation, depth)
    }

    // Placeholders get ordinary traversal, same as any kind without an override.
    fn visit_none(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_invalid(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    // Statements
    fn visit_block(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_expression_statement(
        &mut self,
        operation: &Operation,
        depth: Depth,
    ) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_variable_declaration(
        &mut self,
        operation: &Operation,
        depth: Depth,
    ) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_loop(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_return(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    // Expressions
    fn visit_literal(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_local_reference(
        &mut self,
        operation: &Operation,
        depth: Depth,
    ) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_field_reference(
        &mut self,
        operation: &Operation,
        depth: Depth,
    ) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_parenthesized(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_unary(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_binary(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_conditional(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_invocation(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_argument(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_anonymous_function(
        &mut self,
        operation: &Operation,
        depth: Depth,
    ) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }

    fn visit_conversion(&mut self, operation: &Operation, depth: Depth) -> Result<(), Self::Error> {
        self.default_visit(operation, depth)
    }
}

// ============================================================================
// Walk Functions (Side-Effecting)
// ============================================================================

/// Enter one level and dispatch `operation`. Absent operations are a no-op.
pub fn visit<W: Walker>(
    walker: &mut W,
    operation: Option<&Operation>,
    depth: Depth,
) -> Result<(), W::Error> {
    let Some(operation) = operation else {
        return Ok(());
    };
    let depth = depth.enter().inspect_err(|err| {
        tracing::debug!(
            kind = operation.kind.name(),
            depth = err.depth,
            limit = err.limit,
            "stack guard tripped"
        );
    })?;
    operation.accept(walker, depth)
}

/// Visit every child of `operation` in declaration order.
pub fn walk_children<W: Walker>(
    walker: &mut W,
    operation: &Operation,
    depth: Depth,
) -> Result<(), W::Error> {
    visit_array(walker, operation.children(), depth)
}

/// Visit each operation of a sequence in order, stopping at the first error.
///
/// Overrides use this to descend into a chosen subset of children, e.g. only
/// the arguments of an invocation.
pub fn visit_array<'a, W, I>(walker: &mut W, operations: I, depth: Depth) -> Result<(), W::Error>
where
    W: Walker,
    I: IntoIterator<Item = &'a Operation>,
{
    for operation in operations {
        walker.visit(Some(operation), depth)?;
    }
    Ok(())
}
