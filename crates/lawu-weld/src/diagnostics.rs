//! Diagnostics reporting
//!
//! Failed generation requests and registry decisions are collected as
//! [`Diagnostic`]s rather than aborting the run. Every diagnostic added to a
//! [`DiagnosticsCollector`] is also logged through `tracing`.

use crate::error::{Location, WeldError};
use std::path::PathBuf;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error - the affected request was not generated
    Error,
    /// Warning - generated, but worth a look
    Warning,
    /// Note - a skip or redirect decision
    Note,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Note => "note",
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (0-indexed)
    pub col: Option<usize>,
    /// Diagnostic code (for categorization)
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            line: None,
            col: None,
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create a note diagnostic
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Note, message)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the location
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }

    /// Copy file, line and column from a declaration location
    pub fn at_location(mut self, location: &Location) -> Self {
        self.file = location.file.clone();
        self.line = location.line;
        self.col = location.column;
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            if let Some(line) = self.line {
                result.push(':');
                result.push_str(&line.to_string());
                if let Some(col) = self.col {
                    result.push(':');
                    result.push_str(&col.to_string());
                }
            }
            result.push_str(": ");
        }

        result.push_str(self.severity.display());

        if let Some(ref code) = self.code {
            result.push('[');
            result.push_str(code);
            result.push(']');
        }

        result.push_str(": ");
        result.push_str(&self.message);

        result
    }
}

impl From<&WeldError> for Diagnostic {
    fn from(error: &WeldError) -> Self {
        let diagnostic = Diagnostic::error(error.to_string()).with_code(error.code());
        match error.location() {
            Some(location) => diagnostic.at_location(location),
            None => diagnostic,
        }
    }
}

/// Collector for diagnostics during a generator run
#[derive(Debug, Default, Clone)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error | DiagnosticSeverity::Warning => {
                tracing::warn!("{}", diagnostic.format())
            }
            DiagnosticSeverity::Note => tracing::info!("{}", diagnostic.format()),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Record a failed request
    pub fn report(&mut self, error: &WeldError) {
        self.add(Diagnostic::from(error));
    }

    /// Add every diagnostic from another collection
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add(diagnostic);
        }
    }

    /// Add an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::error(message));
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add a note
    pub fn note(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::note(message));
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of one severity
    pub fn with_severity(&self, severity: DiagnosticSeverity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.with_severity(DiagnosticSeverity::Error).count()
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.with_severity(DiagnosticSeverity::Warning).count()
    }

    /// Get note count
    pub fn note_count(&self) -> usize {
        self.with_severity(DiagnosticSeverity::Note).count()
    }
}
