//! Diagnostics and error reporting for qilang source text
//!
//! [`CompileError`] is what the lexer and parser produce. It can be printed directly with [`format_error`], or
//! turned into a `miette` report with [`CompileError::to_report`] for rich terminal output.

use miette::{NamedSource, SourceSpan};

use crate::ast::{LineIndex, Span};

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn lexical(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Lexical,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Build a `miette` diagnostic carrying the source text of `file_name`.
    pub fn to_report(&self, file_name: &str, source: &str) -> SourceReport {
        let start = self.span.start.min(source.len());
        let len = self.span.end.saturating_sub(self.span.start).max(1).min(source.len() - start);
        let help = if self.notes.is_empty() && self.hints.is_empty() {
            None
        } else {
            Some(self.notes.iter().chain(&self.hints).cloned().collect::<Vec<_>>().join("\n"))
        };
        SourceReport {
            message: format!("{}: {}", self.kind, self.message),
            src: NamedSource::new(file_name, source.to_string()),
            span: (start, len).into(),
            help,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Lexical,
    Syntax,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A [`CompileError`] bound to its source text, renderable by `miette`.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct SourceReport {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
}

/// Render an error as plain text (`file:line:col: kind: message` plus the offending line and a caret).
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let pos = LineIndex::new(source).position(error.span.start.min(source.len()));
    let line_text = source.lines().nth(pos.line as usize - 1).unwrap_or("");

    let mut out = format!(
        "{file}:{line}:{col}: {kind}: {message}\n",
        file = file_name,
        line = pos.line,
        col = pos.column,
        kind = error.kind,
        message = error.message,
    );
    out.push_str(&format!("  | {}\n", line_text));
    out.push_str(&format!("  | {}^\n", " ".repeat(pos.column as usize - 1)));
    for note in &error.notes {
        out.push_str(&format!("  = note: {}\n", note));
    }
    for hint in &error.hints {
        out.push_str(&format!("  = hint: {}\n", hint));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_points_at_column() {
        let source = "package a\ninterface ?\n";
        let err = CompileError::syntax("Expected interface name".to_string(), Span::new(20, 21));
        let text = format_error("a/x.qi", source, &err);
        assert!(text.starts_with("a/x.qi:2:11: syntax error: Expected interface name"));
        assert!(text.contains("  | interface ?\n"));
        assert!(text.contains("  |           ^\n"));
    }

    #[test]
    fn test_format_error_lists_notes_then_hints() {
        let source = "package a\ninterface ?\n";
        let err = CompileError::syntax("Expected interface name".to_string(), Span::new(20, 21))
            .with_hint("names start with a letter")
            .with_note("while parsing an interface");
        insta::assert_snapshot!(format_error("a/x.qi", source, &err), @r"
        a/x.qi:2:11: syntax error: Expected interface name
          | interface ?
          |           ^
          = note: while parsing an interface
          = hint: names start with a letter
        ");
    }

    #[test]
    fn test_report_keeps_notes_as_help() {
        let err = CompileError::new("boom".to_string(), Span::new(0, 3)).with_note("previous declared here");
        let report = err.to_report("f.qi", "abc");
        assert_eq!(report.to_string(), "error: boom");
        assert_eq!(report.help.as_deref(), Some("previous declared here"));
    }
}
