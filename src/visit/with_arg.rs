//! Argument-threading walker.
//!
//! Same traversal as [`Walker`](super::Walker), but every call carries a
//! caller-supplied argument and produces an optional result. The argument is
//! read-only context: the default traversal hands every child the same `&A`
//! it received. Results are only meaningful where a walker overrides a hook;
//! `default_visit` discards its children's results and yields `None`.

use crate::guard::{Depth, InsufficientExecutionStack, DEFAULT_MAX_DEPTH};
use crate::ir::Operation;

/// Operation walker that threads an argument of type `A` through the
/// traversal. Every hook defaults to `default_visit`.
pub trait ArgWalker<A>: Sized {
    /// Result produced by overridden hooks.
    type Output;
    /// Error type of the traversal. Must be able to carry a guard trip.
    type Error: From<InsufficientExecutionStack>;

    fn max_depth(&self) -> u32 {
        DEFAULT_MAX_DEPTH
    }

    /// Walk a whole tree starting at `root`, returning the root's result.
    fn walk(&mut self, root: Option<&Operation>, arg: &A) -> Result<Option<Self::Output>, Self::Error> {
        let depth = Depth::root(self.max_depth());
        self.visit(root, arg, depth)
    }

    /// Visit one operation. `depth` is the depth of its parent.
    ///
    /// Returns whatever the dispatched hook returned, so an override on the
    /// root kind hands its result back out of [`walk`](Self::walk). Walkers
    /// that always yield `None` from `visit` (discarding the hook result)
    /// need to override this method and return `Ok(None)` themselves.
    fn visit(
        &mut self,
        operation: Option<&Operation>,
        arg: &A,
        depth: Depth,
    ) -> Result<Option<Self::Output>, Self::Error> {
        visit_with(self, operation, arg, depth)
    }

    /// Visits all children with the same `arg` and yields `None`.
    fn default_visit(
        &mut self,
        operation: &Operation,
        arg: &A,
        depth: Depth,
    ) -> Result<Option<Self::Output>, Self::Error> {
        walk_children_with(self, operation, arg, depth)?;
        Ok(None)
    }

    fn visit_none(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_invalid(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_block(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_expression_statement(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_variable_declaration(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_loop(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_return(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_literal(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_local_reference(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_field_reference(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_parenthesized(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_unary(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_binary(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_conditional(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_invocation(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_argument(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_anonymous_function(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }

    fn visit_conversion(&mut self, operation: &Operation, arg: &A, depth: Depth) -> Result<Option<Self::Output>, Self::Error> {
        self.default_visit(operation, arg, depth)
    }
}

/// Enter one level and dispatch `operation` with `arg`, returning the hook's
/// result. Absent operations yield `None` without dispatching.
pub fn visit_with<A, W: ArgWalker<A>>(
    walker: &mut W,
    operation: Option<&Operation>,
    arg: &A,
    depth: Depth,
) -> Result<Option<W::Output>, W::Error> {
    let Some(operation) = operation else {
        return Ok(None);
    };
    let depth = depth.enter().inspect_err(|err| {
        tracing::debug!(
            kind = operation.kind.name(),
            depth = err.depth,
            limit = err.limit,
            "stack guard tripped"
        );
    })?;
    operation.accept_with(walker, arg, depth)
}

/// Visit every child of `operation` with `arg`, discarding their results.
pub fn walk_children_with<A, W: ArgWalker<A>>(
    walker: &mut W,
    operation: &Operation,
    arg: &A,
    depth: Depth,
) -> Result<(), W::Error> {
    visit_array_with(walker, operation.children(), arg, depth)
}

/// Visit each operation of a sequence in order with the same `arg`.
pub fn visit_array_with<'a, A, W, I>(
    walker: &mut W,
    operations: I,
    arg: &A,
    depth: Depth,
) -> Result<(), W::Error>
where
    W: ArgWalker<A>,
    I: IntoIterator<Item = &'a Operation>,
{
    for operation in operations {
        walker.visit(Some(operation), arg, depth)?;
    }
    Ok(())
}
