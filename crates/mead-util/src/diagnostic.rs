//! Diagnostic reporting infrastructure.
//!
//! The compiler phases report problems as [`Diagnostic`] values collected by
//! a [`Handler`]. The driver drains the handler after each phase and decides
//! whether compilation continues.

use std::fmt;

use crate::SourceLocation;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents compilation
    Error,
    /// A warning that doesn't prevent compilation
    Warning,
    /// Additional information about a diagnostic
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with severity and location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level
    pub level: Level,
    /// Main diagnostic message
    pub message: String,
    /// Source location the diagnostic points at, if known
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            location: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Attach a source location.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{}: {} {}", self.level, self.message, loc),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Collects diagnostics emitted during a compilation phase.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl Handler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == Level::Error {
            self.error_count += 1;
        }
        log::debug!("diagnostic: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Record an error message.
    pub fn error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.emit(Diagnostic::error(message).at(location));
    }

    /// Whether any error-level diagnostic was emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// All diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
