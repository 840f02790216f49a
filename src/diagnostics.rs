use std::fmt;

use thiserror::Error;

/// Classification of a diagnostic event, one variant per error family the
/// language can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lex,
    Syntax,
    InvalidAssignmentTarget,
    UndefinedVariable,
    Type,
    DivisionByZero,
    Arity,
    Import,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Lex => "lex error",
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::InvalidAssignmentTarget => "invalid assignment target",
            DiagnosticKind::UndefinedVariable => "undefined variable",
            DiagnosticKind::Type => "type error",
            DiagnosticKind::DivisionByZero => "division by zero",
            DiagnosticKind::Arity => "arity error",
            DiagnosticKind::Import => "import error",
        };
        write!(f, "{name}")
    }
}

/// Rich diagnostic information surfaced to end users. Lines are 1-based and
/// refer to the source text handed to the scanner.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: Option<usize>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            notes: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        if !self.notes.is_empty() {
            writeln!(f)?;
            for note in &self.notes {
                writeln!(f, "  note: {note}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the Lantana toolchain.
#[derive(Debug, Error)]
pub enum LantanaError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LantanaError {
    /// The diagnostic kind, if this error carries one.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        match self {
            LantanaError::Diagnostic(diag) => Some(diag.kind),
            LantanaError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LantanaError>;
