//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! All user-input problems are reported as [`Diagnostic`] values collected
//! by a [`Handler`]; compiler phases never abort on bad input. The handler
//! uses interior mutability so the lexer, parser and generator can share
//! one handler without threading `&mut` through every call.
//!
//! # Examples
//!
//! ```
//! use ljc_util::diagnostic::{codes, Handler};
//! use ljc_util::span::Span;
//!
//! let handler = Handler::new();
//! handler.error(codes::E_PAR_UNEXPECTED_TOKEN, "unexpected token", Span::DUMMY);
//!
//! assert!(handler.has_errors());
//! assert_eq!(handler.error_count(), 1);
//! ```

pub mod codes;

pub use codes::DiagnosticCode;

use std::cell::RefCell;
use std::fmt;

use crate::span::{SourceMap, Span};

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that fails the compilation.
    Error,
    /// A warning that does not fail the compilation.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with severity, code and location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Diagnostic severity level.
    pub level: Level,
    /// Stable diagnostic code.
    pub code: DiagnosticCode,
    /// Main diagnostic message.
    pub message: String,
    /// Source location.
    pub span: Span,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            code,
            message: message.into(),
            span,
        }
    }

    /// Create an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, code, message, span)
    }

    /// Create a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, code, message, span)
    }

    /// Render this diagnostic as a single line:
    /// `file:line:col: severity[code]: message`.
    pub fn render(&self, sources: &SourceMap) -> String {
        format!(
            "{}:{}:{}: {}[{}]: {}",
            sources.name(self.span.file_id),
            self.span.line,
            self.span.column,
            self.level,
            self.code,
            self.message
        )
    }
}

/// Handler for collecting and querying diagnostics.
///
/// The handler is the single collection point for one compilation. It is
/// deliberately `&self`-based (interior mutability) so a parser holding
/// `&Handler` can spawn a sub-lexer over template-string fragments that
/// reports into the same handler.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Emit a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Report an error.
    pub fn error(&self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::error(code, message, span));
    }

    /// Report a warning.
    pub fn warning(&self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(code, message, span));
    }

    /// Check if any errors have been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// Snapshot of all diagnostics in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Marker for the current diagnostic count.
    ///
    /// Used together with [`Handler::rollback`] by speculative parses:
    /// a failed attempt must not leak its diagnostics.
    pub fn checkpoint(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Discard every diagnostic emitted after `checkpoint`.
    pub fn rollback(&self, checkpoint: usize) {
        self.diagnostics.borrow_mut().truncate(checkpoint);
    }

    /// Clear all diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
