#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use opwalk::guard::InsufficientExecutionStack;
use opwalk::ir::{BinaryOperator, Operation, OperationKind};
use opwalk::visit::composers::{self, TreeStats};

/// Fuzzing-friendly subset of operation kinds
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzKind {
    None,
    Invalid,
    Block,
    Parenthesized,
    Conditional,
    Add,
    Invocation,
    Argument,
    Return,
    Local,
    Literal,
}

impl FuzzKind {
    fn to_kind(self) -> OperationKind {
        match self {
            FuzzKind::None => OperationKind::None,
            FuzzKind::Invalid => OperationKind::Invalid,
            FuzzKind::Block => OperationKind::Block,
            FuzzKind::Parenthesized => OperationKind::Parenthesized,
            FuzzKind::Conditional => OperationKind::Conditional,
            FuzzKind::Add => OperationKind::Binary { op: BinaryOperator::Add },
            FuzzKind::Invocation => OperationKind::Invocation { method: "f".to_string() },
            FuzzKind::Argument => OperationKind::Argument,
            FuzzKind::Return => OperationKind::Return,
            FuzzKind::Local => OperationKind::LocalReference { name: "x".to_string() },
            FuzzKind::Literal => OperationKind::Literal { value: "1".to_string() },
        }
    }
}

/// Tree shape as a bracket sequence: `Open` pushes a node, `Leaf` adds a
/// childless node, `Close` attaches the innermost open node to its parent.
#[derive(Arbitrary, Debug)]
enum Step {
    Open(FuzzKind),
    Leaf(FuzzKind),
    Close,
}

#[derive(Arbitrary, Debug)]
struct FuzzTree {
    steps: Vec<Step>,
    limit: u8,
}

fn build(steps: &[Step]) -> Operation {
    let mut open = vec![Operation::new(OperationKind::Block)];
    for step in steps {
        match step {
            Step::Open(kind) => open.push(Operation::new(kind.to_kind())),
            Step::Leaf(kind) => {
                if let Some(parent) = open.last_mut() {
                    parent.children.push(Operation::new(kind.to_kind()));
                }
            }
            Step::Close => {
                if open.len() > 1 {
                    if let (Some(child), Some(parent)) = (open.pop(), open.last_mut()) {
                        parent.children.push(child);
                    }
                }
            }
        }
    }
    while open.len() > 1 {
        if let (Some(child), Some(parent)) = (open.pop(), open.last_mut()) {
            parent.children.push(child);
        }
    }
    open.pop().unwrap_or_else(|| Operation::new(OperationKind::None))
}

fuzz_target!(|input: FuzzTree| {
    let tree = build(&input.steps);
    let limit = u32::from(input.limit).max(1);

    // Walking must either complete or report exhaustion - never overflow
    let counted = composers::count_with_limit(&tree, limit, |_| true);
    let stats = TreeStats::gather(&tree, limit);

    match (counted, stats) {
        (Ok(nodes), Ok(stats)) => {
            assert_eq!(nodes, stats.nodes);
            assert!(stats.max_depth <= limit);
        }
        (Err(a), Err(b)) => {
            assert_eq!(a, b);
            assert_eq!(a, InsufficientExecutionStack { depth: limit + 1, limit });
        }
        (a, b) => panic!("walkers disagree: {a:?} vs {b:?}"),
    }
});
