//! Diagnostics sink for package loading, type resolution and code generation
//!
//! Syntax errors are not recorded here: they travel as [`qilang_syntax::diagnostics::CompileError`]s together with
//! the source text so the CLI can render them with context. Everything found after parsing (structural package
//! errors, unresolved types, generator warnings) is pushed into a [`DiagnosticManager`] owned by the compilation job.

use std::fmt;

use qilang_syntax::ast::Location;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A secondary message attached to a diagnostic, usually pointing somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub location: Location,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn new(severity: Severity, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location,
            notes: Vec::new(),
        }
    }

    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, message)
    }

    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, message)
    }

    pub fn info(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, location, message)
    }

    pub fn with_note(mut self, location: Location, message: impl Into<String>) -> Self {
        self.notes.push(Note {
            location,
            message: message.into(),
        });
        self
    }
}

/// `file:line:col: severity: message`, then one line per note.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)?;
        for note in &self.notes {
            write!(f, "\n{}: note: {}", note.location, note.message)?;
        }
        Ok(())
    }
}

/// Accumulates diagnostics in report order.
#[derive(Debug, Default)]
pub struct DiagnosticManager {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(severity = %diagnostic.severity, message = %diagnostic.message, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, location: Location, message: impl Into<String>) {
        self.report(Diagnostic::error(location, message));
    }

    pub fn warning(&mut self, location: Location, message: impl Into<String>) {
        self.report(Diagnostic::warning(location, message));
    }

    /// `true` iff at least one [`Severity::Error`] was reported.
    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Move every diagnostic of `other` into `self`.
    pub fn extend(&mut self, other: DiagnosticManager) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Render every diagnostic, one per line (notes on their own lines).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for the diagnostics reported by the package manager.
pub mod errors {
    use super::*;

    pub fn missing_package(location: Location) -> Diagnostic {
        Diagnostic::error(location, "missing package declaration")
    }

    pub fn extra_package(location: Location, previous: Location) -> Diagnostic {
        Diagnostic::error(location, "extra package declaration").with_note(previous, "previous declared here")
    }

    pub fn package_directory_mismatch(location: Location, package: &str, directory: &str) -> Diagnostic {
        Diagnostic::error(
            location,
            format!("package name '{}' do not match parent directory name '{}'", package, directory),
        )
    }

    pub fn already_exported(location: Location, name: &str, previous: Location) -> Diagnostic {
        Diagnostic::error(location, format!("symbol '{}' already exported", name))
            .with_note(previous, "previous declared here")
    }

    pub fn package_not_found(location: Location, package: &str) -> Diagnostic {
        Diagnostic::error(location, format!("Can't find package '{}'", package))
    }

    pub fn symbol_not_found(location: Location, name: &str, package: &str) -> Diagnostic {
        Diagnostic::error(location, format!("Can't find '{}' in package '{}'", name, package))
    }

    pub fn not_a_type(location: Location, name: &str, package: &str) -> Diagnostic {
        Diagnostic::error(location, format!("'{}' in package '{}' is not a type", name, package))
    }

    pub fn unresolved(location: Location, name: &str) -> Diagnostic {
        Diagnostic::error(location, format!("Can't resolve '{}'", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qilang_syntax::ast::Position;
    use std::sync::Arc;

    fn loc(line: u32) -> Location {
        Location::new(Arc::from("pkg/a.qi"), Position::new(line, 1), Position::new(line, 5))
    }

    #[test]
    fn test_has_error_ignores_warnings() {
        let mut diags = DiagnosticManager::new();
        diags.warning(loc(1), "struct registration is not generated");
        diags.report(Diagnostic::info(loc(2), "fyi"));
        assert!(!diags.has_error());
        diags.error(loc(3), "boom");
        assert!(diags.has_error());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.diagnostics().len(), 3);
    }

    #[test]
    fn test_display_includes_notes() {
        let diag = errors::already_exported(loc(4), "Robot", loc(2));
        assert_eq!(
            diag.to_string(),
            "pkg/a.qi:4:1: error: symbol 'Robot' already exported\npkg/a.qi:2:1: note: previous declared here"
        );
    }

    #[test]
    fn test_render_without_location() {
        let mut diags = DiagnosticManager::new();
        diags.report(errors::package_not_found(Location::none(), "a.b"));
        assert_eq!(diags.render(), "<no location>: error: Can't find package 'a.b'\n");
    }
}
