use crate::diagnostics::WalkError;
use crate::guard::Depth;
use crate::ir::{Operation, OperationKind};
use crate::visit::{visit, walk_children, Walker};

/// Render the tree as an indented outline, one operation per line with its
/// payload and span.
pub fn outline(root: &Operation, max_depth: u32) -> Result<String, WalkError> {
    let mut pp = OutlinePrinter::new(max_depth, Style::Outline);
    pp.walk(Some(root))?;
    Ok(pp.buf)
}

/// Render the dispatch sequence: kind names only, indented by depth.
pub fn trace(root: &Operation, max_depth: u32) -> Result<String, WalkError> {
    let mut pp = OutlinePrinter::new(max_depth, Style::Trace);
    pp.walk(Some(root))?;
    Ok(pp.buf)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Outline,
    Trace,
}

struct OutlinePrinter {
    buf: String,
    max_depth: u32,
    style: Style,
}

impl OutlinePrinter {
    fn new(max_depth: u32, style: Style) -> Self {
        Self {
            buf: String::new(),
            max_depth,
            style,
        }
    }

    fn write_indent(&mut self, depth: Depth) {
        for _ in 1..depth.current() {
            self.buf.push_str("  ");
        }
    }
}

impl Walker for OutlinePrinter {
    type Error = WalkError;

    fn max_depth(&self) -> u32 {
        self.max_depth
    }

    fn visit(&mut self, operation: Option<&Operation>, depth: Depth) -> Result<(), WalkError> {
        visit(self, operation, depth).map_err(|err| match operation {
            Some(op) => err.with_span(op.span),
            None => err,
        })
    }

    fn default_visit(&mut self, op: &Operation, depth: Depth) -> Result<(), WalkError> {
        self.write_indent(depth);
        match self.style {
            Style::Trace => self.buf.push_str(op.kind.name()),
            Style::Outline => {
                self.buf.push_str(&label(&op.kind));
                if !op.span.is_empty() {
                    self.buf.push_str(&format!(" @{}..{}", op.span.start, op.span.end));
                }
            }
        }
        self.buf.push('\n');
        tracing::trace!(kind = op.kind.name(), depth = depth.current(), "dispatch");
        walk_children(self, op, depth)
    }
}

fn label(kind: &OperationKind) -> String {
    match kind {
        OperationKind::VariableDeclaration { name } => format!("VariableDeclaration {name}"),
        OperationKind::Literal { value } => format!("Literal {value}"),
        OperationKind::LocalReference { name } => format!("LocalReference {name}"),
        OperationKind::FieldReference { field } => format!("FieldReference .{field}"),
        OperationKind::Unary { op } => format!("Unary {}", op.symbol()),
        OperationKind::Binary { op } => format!("Binary {}", op.symbol()),
        OperationKind::Invocation { method } => format!("Invocation {method}()"),
        other => other.name().to_string(),
    }
}
