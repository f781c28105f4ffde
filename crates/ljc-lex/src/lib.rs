//! ljc-lex - Lexical Analyzer for the Ljos language.
//!
//! The lexer turns source text into a finite token stream terminated by
//! [`TokenKind::Eof`]. It never aborts: a bad character produces an
//! [`TokenKind::Invalid`] token and a diagnostic, and scanning resumes on
//! the next character, so every input yields both tokens and diagnostics.
//!
//! Trivia rules:
//! - spaces, tabs and `\r` (when part of `\r\n`) advance position silently
//! - newlines become [`TokenKind::Newline`] tokens because they terminate
//!   statements
//! - `#` starts a line comment that runs to the next newline
//!
//! # Examples
//!
//! ```
//! use ljc_lex::{Lexer, TokenKind};
//! use ljc_util::{FileId, Handler};
//!
//! let handler = Handler::new();
//! let tokens = Lexer::tokenize("const x = 1", &handler, FileId::DUMMY);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(tokens.first().map(|t| t.kind.clone()), Some(TokenKind::Const));
//! assert_eq!(tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
//! ```

pub mod cursor;
mod edge_cases;
mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{keyword_from_str, TemplatePart, Token, TokenKind};
