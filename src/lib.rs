//! Stack-safe traversal of semantic operation trees.
//!
//! Analyses (diagnostics, lint passes, refactorings, completion queries) need
//! to reach every node of an operation tree without writing a recursive
//! descent per node kind and without crashing on adversarially deep input.
//! This crate provides the tree contract ([`ir`]), two walker traits
//! ([`visit::Walker`], [`visit::ArgWalker`]) and the depth guard that turns
//! runaway recursion into an error ([`guard`]).

pub mod span;
pub mod diagnostics;
pub mod guard;
pub mod ir;
pub mod visit;
pub mod pretty;
pub mod config;

pub use diagnostics::WalkError;
pub use guard::{Depth, InsufficientExecutionStack, DEFAULT_MAX_DEPTH};
pub use ir::{Operation, OperationKind};
pub use visit::{ArgWalker, Walker};
