use serde::{Deserialize, Serialize};

/// Semantic category of an [`Operation`](super::Operation).
///
/// Walkers never match on this directly; `Operation::accept` does the one
/// match and calls the corresponding `visit_*` hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationKind {
    /// Unrecognized construct. The front end emits this when it cannot
    /// classify a node (typically in erroneous code) but still has children.
    None,
    /// Construct the front end recognized but could not bind.
    Invalid,
    Block,
    ExpressionStatement,
    VariableDeclaration {
        name: String,
    },
    Literal {
        value: String,
    },
    LocalReference {
        name: String,
    },
    FieldReference {
        field: String,
    },
    Parenthesized,
    Unary {
        op: UnaryOperator,
    },
    Binary {
        op: BinaryOperator,
    },
    Conditional,
    Invocation {
        method: String,
    },
    Argument,
    Loop,
    Return,
    AnonymousFunction,
    Conversion,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::None => "None",
            OperationKind::Invalid => "Invalid",
            OperationKind::Block => "Block",
            OperationKind::ExpressionStatement => "ExpressionStatement",
            OperationKind::VariableDeclaration { .. } => "VariableDeclaration",
            OperationKind::Literal { .. } => "Literal",
            OperationKind::LocalReference { .. } => "LocalReference",
            OperationKind::FieldReference { .. } => "FieldReference",
            OperationKind::Parenthesized => "Parenthesized",
            OperationKind::Unary { .. } => "Unary",
            OperationKind::Binary { .. } => "Binary",
            OperationKind::Conditional => "Conditional",
            OperationKind::Invocation { .. } => "Invocation",
            OperationKind::Argument => "Argument",
            OperationKind::Loop => "Loop",
            OperationKind::Return => "Return",
            OperationKind::AnonymousFunction => "AnonymousFunction",
            OperationKind::Conversion => "Conversion",
        }
    }

    /// JSON key holding this kind's payload, if it carries one.
    pub fn payload_key(&self) -> Option<&'static str> {
        match self {
            OperationKind::VariableDeclaration { .. } | OperationKind::LocalReference { .. } => Some("name"),
            OperationKind::Literal { .. } => Some("value"),
            OperationKind::FieldReference { .. } => Some("field"),
            OperationKind::Unary { .. } | OperationKind::Binary { .. } => Some("op"),
            OperationKind::Invocation { .. } => Some("method"),
            _ => None,
        }
    }

    /// True for kinds produced from incomplete or erroneous source.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, OperationKind::None | OperationKind::Invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Negate,
    Not,
    BitwiseNegate,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNegate => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }
}
