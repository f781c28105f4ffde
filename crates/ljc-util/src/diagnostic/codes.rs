//! Diagnostic codes - stable identifiers for every diagnostic the compiler
//! can produce.
//!
//! Codes are grouped by phase: E1xxx lexical, E2xxx syntactic, E3xxx
//! structural, E4xxx emission, Wxxxx warnings. The numeric value and the
//! symbolic name are both stable; the renderer prints them as `E2001`.

use std::fmt;

/// A diagnostic code: numeric id plus a stable symbolic name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// Numeric code (e.g. 2001).
    pub code: u16,
    /// Symbolic name (e.g. "unexpected_token").
    pub name: &'static str,
}

impl DiagnosticCode {
    /// Create a new diagnostic code.
    pub const fn new(code: u16, name: &'static str) -> Self {
        Self { code, name }
    }

    /// True for warning-class codes.
    pub const fn is_warning(&self) -> bool {
        self.code < 1000
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_warning() {
            write!(f, "W{:04}", self.code)
        } else {
            write!(f, "E{:04}", self.code)
        }
    }
}

// Lexical errors
pub const E_LEX_UNEXPECTED_CHAR: DiagnosticCode = DiagnosticCode::new(1001, "unexpected_character");
pub const E_LEX_UNTERMINATED_STRING: DiagnosticCode =
    DiagnosticCode::new(1002, "unterminated_string");
pub const E_LEX_INVALID_ESCAPE: DiagnosticCode = DiagnosticCode::new(1003, "invalid_escape");
pub const E_LEX_MALFORMED_NUMBER: DiagnosticCode = DiagnosticCode::new(1004, "malformed_number");
pub const E_LEX_UNTERMINATED_TEMPLATE: DiagnosticCode =
    DiagnosticCode::new(1005, "unterminated_template");

// Syntactic errors
pub const E_PAR_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new(2001, "unexpected_token");
pub const E_PAR_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new(2002, "expected_token");
pub const E_PAR_INVALID_PATTERN: DiagnosticCode = DiagnosticCode::new(2003, "invalid_pattern");
pub const E_PAR_MISPLACED_MODIFIER: DiagnosticCode =
    DiagnosticCode::new(2004, "misplaced_modifier");
pub const E_PAR_DUPLICATE_PARAMETER: DiagnosticCode =
    DiagnosticCode::new(2005, "duplicate_parameter");
pub const E_PAR_MISSING_TERMINATOR: DiagnosticCode =
    DiagnosticCode::new(2006, "missing_terminator");
pub const E_PAR_MISSING_ELSE_ARM: DiagnosticCode = DiagnosticCode::new(2007, "missing_else_arm");

// Structural errors
pub const E_STRUCT_CONST_WITHOUT_INIT: DiagnosticCode =
    DiagnosticCode::new(3001, "const_without_initializer");
pub const E_STRUCT_EXPORT_WITHOUT_TARGET: DiagnosticCode =
    DiagnosticCode::new(3002, "export_without_target");
pub const E_STRUCT_INVALID_CONTROL_FLOW: DiagnosticCode =
    DiagnosticCode::new(3003, "invalid_control_flow");
pub const E_STRUCT_THIS_OUTSIDE_CLASS: DiagnosticCode =
    DiagnosticCode::new(3004, "this_outside_class");
pub const E_STRUCT_PRIVATE_ACCESS: DiagnosticCode = DiagnosticCode::new(3005, "private_access");
pub const E_STRUCT_DUPLICATE_MODIFIER: DiagnosticCode =
    DiagnosticCode::new(3006, "duplicate_modifier");

// Emission errors
pub const E_GEN_UNRESOLVED_IMPORT: DiagnosticCode = DiagnosticCode::new(4001, "unresolved_import");
pub const E_GEN_RESERVED_NAME: DiagnosticCode = DiagnosticCode::new(4002, "reserved_name");

// Warnings
pub const W_BREAK_VALUE: DiagnosticCode = DiagnosticCode::new(1, "break_with_value");
pub const W_DEFER_SWALLOW: DiagnosticCode = DiagnosticCode::new(2, "deferred_exception_swallowed");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        assert_eq!(format!("{}", E_PAR_UNEXPECTED_TOKEN), "E2001");
    }

    #[test]
    fn test_display_warning() {
        assert_eq!(format!("{}", W_BREAK_VALUE), "W0001");
        assert!(W_BREAK_VALUE.is_warning());
    }

    #[test]
    fn test_code_equality() {
        assert_eq!(
            E_LEX_UNEXPECTED_CHAR,
            DiagnosticCode::new(1001, "unexpected_character")
        );
    }
}
