//! Code generation error types.
//!
//! User-input problems are diagnostics, never errors. This error type
//! exists for the other kind of failure: an AST shape the generator
//! considers impossible, which is a compiler bug and carries its position
//! context out to the caller.

use thiserror::Error;

/// Fatal code generation failure.
#[derive(Debug, Error)]
pub enum GenError {
    /// Internal invariant violation - an AST shape the parser can never
    /// produce reached the generator.
    #[error("internal code generation error at {line}:{column}: {message}")]
    Internal {
        message: String,
        line: u32,
        column: u32,
    },
}
