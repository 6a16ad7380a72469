use crate::guard::InsufficientExecutionStack;
use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("insufficient execution stack: operation nesting depth {depth} exceeds limit {limit}")]
    InsufficientStack {
        depth: u32,
        limit: u32,
        span: Option<Span>,
    },

    #[error("Load error: {msg}")]
    Load { msg: String, path: PathBuf },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },
}

impl WalkError {
    pub fn load(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Load { msg: msg.into(), path }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    /// Attach the span of the operation that could not be entered. A span
    /// that is already set is kept, so the innermost operation wins.
    pub fn with_span(self, span: Span) -> Self {
        match self {
            Self::InsufficientStack { depth, limit, span: None } => Self::InsufficientStack {
                depth,
                limit,
                span: Some(span),
            },
            other => other,
        }
    }

    pub fn is_stack_exhaustion(&self) -> bool {
        matches!(self, Self::InsufficientStack { .. })
    }
}

impl From<InsufficientExecutionStack> for WalkError {
    fn from(err: InsufficientExecutionStack) -> Self {
        Self::InsufficientStack {
            depth: err.depth,
            limit: err.limit,
            span: None,
        }
    }
}

/// Render a WalkError with ariadne for nice terminal output.
///
/// Falls back to a plain message when there is no source text or the error
/// carries no usable span.
pub fn render_error(source: Option<&str>, filename: &str, err: &WalkError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match (err, source) {
        (WalkError::InsufficientStack { span: Some(span), .. }, Some(source))
            if !span.is_empty() && span.end <= source.len() =>
        {
            let rendered = Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("operation tree too deep ({filename})"))
                .with_label(Label::new(span.range()).with_message(err.to_string()))
                .with_note("raise [walker] max-depth in opwalk.toml or pass --max-depth")
                .finish()
                .eprint(Source::from(source));
            if rendered.is_err() {
                eprintln!("error: {err}");
            }
        }
        (WalkError::Load { msg, path }, _) => {
            eprintln!("error[load]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        (WalkError::Config { msg, path }, _) => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        _ => eprintln!("error: {err}"),
    }
}
