//! Operation tree: the semantic IR the walkers traverse.
//!
//! Trees are produced by a front end (or deserialized from JSON) and are
//! read-only from the walkers' point of view. Each node owns its children
//! exclusively, so the structure is always a tree.

pub mod kind;

pub use kind::{BinaryOperator, OperationKind, UnaryOperator};

use std::path::Path;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;

use crate::diagnostics::WalkError;
use crate::guard::Depth;
use crate::span::Span;
use crate::visit::Walker;
use crate::visit::with_arg::ArgWalker;

/// A node of the operation tree.
///
/// The JSON form is a flat object: the `kind` tag, the kind's payload key if
/// it has one, and optional `span` and `children`. Any other key is rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    #[serde(flatten)]
    pub kind: OperationKind,
    #[serde(skip_serializing_if = "Span::is_empty")]
    pub span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Operation>,
}

impl Operation {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            span: Span::dummy(),
            children: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_child(mut self, child: Operation) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Operation>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(OperationKind::Literal { value: value.into() })
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self::new(OperationKind::LocalReference { name: name.into() })
    }

    pub fn binary(op: BinaryOperator, lhs: Operation, rhs: Operation) -> Self {
        Self::new(OperationKind::Binary { op }).with_children([lhs, rhs])
    }

    /// Unrecognized node wrapping whatever children the front end salvaged.
    pub fn placeholder(children: impl IntoIterator<Item = Operation>) -> Self {
        Self::new(OperationKind::None).with_children(children)
    }

    /// Build a chain of `levels` operations of `kind`, each the only child of
    /// the previous one. Built bottom-up without recursion, so it is safe for
    /// any `levels`. A `levels` of 0 still yields a single node.
    pub fn nested(kind: OperationKind, levels: usize) -> Self {
        let mut op = Operation::new(kind.clone());
        for _ in 1..levels {
            op = Operation::new(kind.clone()).with_child(op);
        }
        op
    }

    /// Children in declaration order. The iterator is cheap to recreate.
    pub fn children(&self) -> std::slice::Iter<'_, Operation> {
        self.children.iter()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Double dispatch: call the `walker` hook for this operation's kind.
    ///
    /// `depth` is the depth of `self`, already checked by the caller.
    pub fn accept<W: Walker>(&self, walker: &mut W, depth: Depth) -> Result<(), W::Error> {
        match &self.kind {
            OperationKind::None => walker.visit_none(self, depth),
            OperationKind::Invalid => walker.visit_invalid(self, depth),
            OperationKind::Block => walker.visit_block(self, depth),
            OperationKind::ExpressionStatement => walker.visit_expression_statement(self, depth),
            OperationKind::VariableDeclaration { .. } => {
                walker.visit_variable_declaration(self, depth)
            }
            OperationKind::Literal { .. } => walker.visit_literal(self, depth),
            OperationKind::LocalReference { .. } => walker.visit_local_reference(self, depth),
            OperationKind::FieldReference { .. } => walker.visit_field_reference(self, depth),
            OperationKind::Parenthesized => walker.visit_parenthesized(self, depth),
            OperationKind::Unary { .. } => walker.visit_unary(self, depth),
            OperationKind::Binary { .. } => walker.visit_binary(self, depth),
            OperationKind::Conditional => walker.visit_conditional(self, depth),
            OperationKind::Invocation { .. } => walker.visit_invocation(self, depth),
            OperationKind::Argument => walker.visit_argument(self, depth),
            OperationKind::Loop => walker.visit_loop(self, depth),
            OperationKind::Return => walker.visit_return(self, depth),
            OperationKind::AnonymousFunction => walker.visit_anonymous_function(self, depth),
            OperationKind::Conversion => walker.visit_conversion(self, depth),
        }
    }

    /// Double dispatch for argument-threading walkers.
    pub fn accept_with<A, W: ArgWalker<A>>(
        &self,
        walker: &mut W,
        arg: &A,
        depth: Depth,
    ) -> Result<Option<W::Output>, W::Error> {
        match &self.kind {
            OperationKind::None => walker.visit_none(self, arg, depth),
            OperationKind::Invalid => walker.visit_invalid(self, arg, depth),
            OperationKind::Block => walker.visit_block(self, arg, depth),
            OperationKind::ExpressionStatement => {
                walker.visit_expression_statement(self, arg, depth)
            }
            OperationKind::VariableDeclaration { .. } => {
                walker.visit_variable_declaration(self, arg, depth)
            }
            OperationKind::Literal { .. } => walker.visit_literal(self, arg, depth),
            OperationKind::LocalReference { .. } => walker.visit_local_reference(self, arg, depth),
            OperationKind::FieldReference { .. } => walker.visit_field_reference(self, arg, depth),
            OperationKind::Parenthesized => walker.visit_parenthesized(self, arg, depth),
            OperationKind::Unary { .. } => walker.visit_unary(self, arg, depth),
            OperationKind::Binary { .. } => walker.visit_binary(self, arg, depth),
            OperationKind::Conditional => walker.visit_conditional(self, arg, depth),
            OperationKind::Invocation { .. } => walker.visit_invocation(self, arg, depth),
            OperationKind::Argument => walker.visit_argument(self, arg, depth),
            OperationKind::Loop => walker.visit_loop(self, arg, depth),
            OperationKind::Return => walker.visit_return(self, arg, depth),
            OperationKind::AnonymousFunction => walker.visit_anonymous_function(self, arg, depth),
            OperationKind::Conversion => walker.visit_conversion(self, arg, depth),
        }
    }

    /// Parse a tree from its JSON form.
    ///
    /// Nesting is unbounded here: serde_json's recursion limit is lifted and
    /// serde_stacker grows the stack on demand, so the walker's depth guard
    /// is the only depth bound a loaded tree meets.
    pub fn from_json(json: &str) -> Result<Operation, serde_json::Error> {
        let mut json_de = serde_json::Deserializer::from_str(json);
        json_de.disable_recursion_limit();
        let op = Operation::deserialize(serde_stacker::Deserializer::new(&mut json_de))?;
        json_de.end()?;
        Ok(op)
    }
}

const OPERATION_FIELDS: &[&str] = &["kind", "span", "children", "name", "value", "field", "op", "method"];

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OperationVisitor;

        impl<'de> Visitor<'de> for OperationVisitor {
            type Value = Operation;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an operation object")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Operation, M::Error>
            where
                M: MapAccess<'de>,
            {
                // `kind` plus payload keys, handed to OperationKind's own derive.
                let mut tagged = serde_json::Map::new();
                let mut span: Option<Span> = None;
                let mut children: Option<Vec<Operation>> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "span" => {
                            if span.is_some() {
                                return Err(de::Error::duplicate_field("span"));
                            }
                            span = Some(map.next_value()?);
                        }
                        "children" => {
                            if children.is_some() {
                                return Err(de::Error::duplicate_field("children"));
                            }
                            children = Some(map.next_value()?);
                        }
                        "kind" | "name" | "value" | "field" | "op" | "method" => {
                            let value: serde_json::Value = map.next_value()?;
                            if tagged.contains_key(&key) {
                                return Err(de::Error::custom(format!("duplicate field `{key}`")));
                            }
                            tagged.insert(key, value);
                        }
                        other => return Err(de::Error::unknown_field(other, OPERATION_FIELDS)),
                    }
                }

                let payload: Vec<String> = tagged.keys().filter(|k| k.as_str() != "kind").cloned().collect();
                let kind = OperationKind::deserialize(serde_json::Value::Object(tagged))
                    .map_err(de::Error::custom)?;
                if let Some(stray) = payload.iter().find(|k| kind.payload_key() != Some(k.as_str())) {
                    return Err(de::Error::custom(format!(
                        "unexpected field `{stray}` on {} operation",
                        kind.name()
                    )));
                }

                Ok(Operation {
                    kind,
                    span: span.unwrap_or_default(),
                    children: children.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_map(OperationVisitor)
    }
}

// Tear down iteratively so that dropping a very deep tree can't overflow.
impl Drop for Operation {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut op) = pending.pop() {
            pending.append(&mut op.children);
        }
    }
}

/// Read and parse a JSON operation tree from disk.
pub fn load_tree(path: &Path) -> Result<Operation, WalkError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| WalkError::load(format!("cannot read tree: {e}"), path.to_path_buf()))?;
    Operation::from_json(&text)
        .map_err(|e| WalkError::load(format!("invalid operation tree: {e}"), path.to_path_buf()))
}
