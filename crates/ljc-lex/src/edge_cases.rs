//! Edge-case and property tests for the lexer.
//!
//! These exercise the lexer's failure semantics: scanning never panics,
//! never loops, and every position it reports lies within the input.
