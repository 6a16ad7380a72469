//! Stack-safety guard for recursive traversal.
//!
//! Operation trees come from arbitrary source text, so their nesting is bounded
//! only by what the front end was fed. Walkers recurse natively, and the native
//! stack is much smaller than the deepest tree a generator or fuzzer can
//! produce. Every recursive dispatch therefore goes through [`Depth::enter`],
//! which turns "about to overflow" into an [`InsufficientExecutionStack`]
//! error the caller can recover from.
//!
//! The depth is a plain `Copy` value threaded through the call chain rather
//! than a counter stored on the walker. Each frame holds its own depth, so
//! there is nothing to restore when a visit returns early or fails, and a
//! walker that caught an exhaustion error can be reused as-is.

use thiserror::Error;

/// Default recursion limit for walkers that don't override `max_depth`.
///
/// One level of operation nesting costs several native frames (`visit`,
/// `accept`, the per-kind hook, `walk_children`), plus whatever the hooks
/// themselves put on the stack. 256 levels stays well inside the 2 MiB stack
/// Rust gives spawned threads, including unoptimized builds.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Raised when a traversal would recurse past its depth limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient execution stack: operation nesting depth {depth} exceeds limit {limit}")]
pub struct InsufficientExecutionStack {
    /// Depth the walker tried to enter.
    pub depth: u32,
    /// Limit in force for the traversal.
    pub limit: u32,
}

/// Recursion depth of the operation currently being dispatched.
///
/// `Depth::root(limit)` sits above the root operation at depth 0; the root is
/// dispatched at depth 1, its children at depth 2, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    current: u32,
    limit: u32,
}

impl Depth {
    pub fn root(limit: u32) -> Self {
        Self { current: 0, limit }
    }

    pub fn current(self) -> u32 {
        self.current
    }

    pub fn limit(self) -> u32 {
        self.limit
    }

    /// Levels that can still be entered before the guard trips.
    pub fn remaining(self) -> u32 {
        self.limit.saturating_sub(self.current)
    }

    /// Descend one level, failing if that would exceed the limit.
    pub fn enter(self) -> Result<Depth, InsufficientExecutionStack> {
        let next = Depth {
            current: self.current.saturating_add(1),
            limit: self.limit,
        };
        ensure_sufficient_stack(next)?;
        Ok(next)
    }
}

/// Check that `depth` is still within its limit.
pub fn ensure_sufficient_stack(depth: Depth) -> Result<(), InsufficientExecutionStack> {
    if depth.current > depth.limit {
        return Err(InsufficientExecutionStack {
            depth: depth.current,
            limit: depth.limit,
        });
    }
    Ok(())
}
