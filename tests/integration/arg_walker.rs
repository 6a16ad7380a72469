//! Tests for the argument-threading walker.

mod common;

use common::{a_b_c_d, conditional_with_broken_branch};
use opwalk::guard::{Depth, InsufficientExecutionStack};
use opwalk::ir::{Operation, OperationKind};
use opwalk::visit::with_arg::{visit_array_with, walk_children_with};
use opwalk::visit::ArgWalker;

/// Records `(kind, argument)` for every dispatch; `Return` answers "hit"
/// without descending.
#[derive(Default)]
struct ReturnProbe {
    dispatched: Vec<(&'static str, char)>,
}

impl ArgWalker<char> for ReturnProbe {
    type Output = String;
    type Error = InsufficientExecutionStack;

    fn default_visit(&mut self, op: &Operation, arg: &char, depth: Depth) -> Result<Option<String>, Self::Error> {
        self.dispatched.push((op.kind.name(), *arg));
        walk_children_with(self, op, arg, depth)?;
        Ok(None)
    }

    fn visit_return(&mut self, op: &Operation, arg: &char, _depth: Depth) -> Result<Option<String>, Self::Error> {
        self.dispatched.push((op.kind.name(), *arg));
        Ok(Some("hit".to_string()))
    }
}

#[test]
fn test_override_skips_subtree_and_root_result_is_empty() {
    let mut probe = ReturnProbe::default();
    let result = probe.walk(Some(&a_b_c_d()), &'x').unwrap();

    assert_eq!(result, None);
    assert_eq!(
        probe.dispatched,
        vec![("Block", 'x'), ("Literal", 'x'), ("Return", 'x')]
    );
    // D (the LocalReference under Return) is never dispatched.
    assert!(probe.dispatched.iter().all(|(kind, _)| *kind != "LocalReference"));
}

#[test]
fn test_default_threads_same_argument_everywhere() {
    #[derive(Default)]
    struct Threads {
        args: Vec<u64>,
    }

    impl ArgWalker<u64> for Threads {
        type Output = ();
        type Error = InsufficientExecutionStack;

        fn default_visit(&mut self, op: &Operation, arg: &u64, depth: Depth) -> Result<Option<()>, Self::Error> {
            self.args.push(*arg);
            walk_children_with(self, op, arg, depth)?;
            Ok(None)
        }
    }

    let mut walker = Threads::default();
    walker.walk(Some(&conditional_with_broken_branch()), &42).unwrap();
    assert_eq!(walker.args.len(), 14);
    assert!(walker.args.iter().all(|a| *a == 42));
}

#[test]
fn test_absent_root_returns_none() {
    let mut probe = ReturnProbe::default();
    assert_eq!(probe.walk(None, &'x').unwrap(), None);
    assert!(probe.dispatched.is_empty());
}

#[test]
fn test_override_aggregates_child_results() {
    // Constant folder over integer literals and `+`; anything else is unknown.
    struct Fold;

    impl ArgWalker<()> for Fold {
        type Output = i64;
        type Error = InsufficientExecutionStack;

        fn visit_literal(&mut self, op: &Operation, _arg: &(), _depth: Depth) -> Result<Option<i64>, Self::Error> {
            match &op.kind {
                OperationKind::Literal { value } => Ok(value.parse().ok()),
                _ => Ok(None),
            }
        }

        fn visit_parenthesized(&mut self, op: &Operation, arg: &(), depth: Depth) -> Result<Option<i64>, Self::Error> {
            self.visit(op.children().next(), arg, depth)
        }

        fn visit_binary(&mut self, op: &Operation, arg: &(), depth: Depth) -> Result<Option<i64>, Self::Error> {
            let OperationKind::Binary { op: opwalk::ir::BinaryOperator::Add } = op.kind else {
                return self.default_visit(op, arg, depth);
            };
            let mut total = 0i64;
            for child in op.children() {
                match self.visit(Some(child), arg, depth)? {
                    Some(value) => total += value,
                    None => return Ok(None),
                }
            }
            Ok(Some(total))
        }
    }

    use opwalk::ir::BinaryOperator::Add;
    let tree = Operation::binary(
        Add,
        Operation::literal("1"),
        Operation::new(OperationKind::Parenthesized).with_child(Operation::binary(
            Add,
            Operation::literal("2"),
            Operation::literal("39"),
        )),
    );
    assert_eq!(Fold.walk(Some(&tree), &()).unwrap(), Some(42));

    let unknown = Operation::binary(Add, Operation::literal("1"), Operation::local("x"));
    assert_eq!(Fold.walk(Some(&unknown), &()).unwrap(), None);
}

#[test]
fn test_selective_descent_with_array_helper() {
    // Argument is a scope label; arguments of an invocation get the method name.
    #[derive(Default)]
    struct Scopes {
        seen: Vec<(String, String)>,
    }

    impl ArgWalker<String> for Scopes {
        type Output = ();
        type Error = InsufficientExecutionStack;

        fn default_visit(&mut self, op: &Operation, arg: &String, depth: Depth) -> Result<Option<()>, Self::Error> {
            self.seen.push((op.kind.name().to_string(), arg.clone()));
            walk_children_with(self, op, arg, depth)?;
            Ok(None)
        }

        fn visit_invocation(&mut self, op: &Operation, arg: &String, depth: Depth) -> Result<Option<()>, Self::Error> {
            self.seen.push((op.kind.name().to_string(), arg.clone()));
            let OperationKind::Invocation { method } = &op.kind else {
                return Ok(None);
            };
            visit_array_with(self, op.children(), method, depth)?;
            Ok(None)
        }
    }

    let tree = Operation::new(OperationKind::ExpressionStatement).with_child(
        Operation::new(OperationKind::Invocation {
            method: "print".to_string(),
        })
        .with_child(Operation::new(OperationKind::Argument).with_child(Operation::local("a"))),
    );
    let mut walker = Scopes::default();
    walker.walk(Some(&tree), &"top".to_string()).unwrap();
    let seen: Vec<(&str, &str)> = walker
        .seen
        .iter()
        .map(|(k, a)| (k.as_str(), a.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("ExpressionStatement", "top"),
            ("Invocation", "top"),
            ("Argument", "print"),
            ("LocalReference", "print"),
        ]
    );
}

#[test]
fn test_guard_trip_in_arg_walker() {
    struct Tight;

    impl ArgWalker<()> for Tight {
        type Output = ();
        type Error = InsufficientExecutionStack;

        fn max_depth(&self) -> u32 {
            32
        }
    }

    let ok = Operation::nested(OperationKind::Parenthesized, 32);
    assert_eq!(Tight.walk(Some(&ok), &()).unwrap(), None);

    let deep = Operation::nested(OperationKind::Parenthesized, 33);
    let err = Tight.walk(Some(&deep), &()).unwrap_err();
    assert_eq!(err, InsufficientExecutionStack { depth: 33, limit: 32 });
}
