//! ljc-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation types shared by every phase of the
//! Ljos compiler: source spans and the source map, the diagnostic
//! infrastructure, and the string interner.
//!
//! Nothing in here knows about Ljos syntax. The goal is that `ljc-lex`,
//! `ljc-par` and `ljc-gen` can all speak the same vocabulary of positions
//! and diagnostics without depending on each other.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level};
pub use error::{SourceMapError, SourceMapResult};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;
