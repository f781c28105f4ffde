//! Numeric literal scanning.
//!
//! Integers: `[0-9]+`, `0x…`, `0o…`, `0b…`. Floats: `[0-9]+ '.' [0-9]+`
//! with an optional `[eE][+-]?[0-9]+` exponent. A lone trailing `.` is not
//! consumed, so `1..5` lexes as a range over two integers.

use ljc_util::diagnostic::codes;

use crate::token::{Token, TokenKind};

use super::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn lex_number(&mut self) -> Token {
        let first = self.cursor.current().unwrap_or('0');

        if first == '0' {
            match self.cursor.peek() {
                Some('x') | Some('X') => return self.lex_radix(16),
                Some('o') | Some('O') => return self.lex_radix(8),
                Some('b') | Some('B') => return self.lex_radix(2),
                _ => {}
            }
        }

        let start = self.cursor.pos();
        self.eat_digits();

        // Fractional part only when a digit follows the dot; `1..5` and
        // `x.1.to_str()` style chains must keep their dots.
        let mut is_float = false;
        if self.cursor.current() == Some('.')
            && self.cursor.peek().map_or(false, |c| c.is_ascii_digit())
        {
            is_float = true;
            self.cursor.advance();
            self.eat_digits();

            if matches!(self.cursor.current(), Some('e') | Some('E')) {
                self.cursor.advance();
                if matches!(self.cursor.current(), Some('+') | Some('-')) {
                    self.cursor.advance();
                }
                if !self.cursor.current().map_or(false, |c| c.is_ascii_digit()) {
                    self.handler.error(
                        codes::E_LEX_MALFORMED_NUMBER,
                        "exponent has no digits",
                        self.current_span(),
                    );
                    return self.token(TokenKind::Invalid);
                }
                self.eat_digits();
            }
        }

        let text = self.cursor.slice(start, self.cursor.pos());
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => self.token(TokenKind::Float(value)),
                Err(_) => {
                    self.handler.error(
                        codes::E_LEX_MALFORMED_NUMBER,
                        format!("malformed float literal `{}`", text),
                        self.current_span(),
                    );
                    self.token(TokenKind::Invalid)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.token(TokenKind::Int(value)),
                Err(_) => {
                    self.handler.error(
                        codes::E_LEX_MALFORMED_NUMBER,
                        format!("integer literal `{}` out of range", text),
                        self.current_span(),
                    );
                    self.token(TokenKind::Invalid)
                }
            }
        }
    }

    /// Scan a `0x`/`0o`/`0b` literal; the cursor sits on the leading `0`.
    fn lex_radix(&mut self, radix: u32) -> Token {
        self.cursor.advance(); // 0
        self.cursor.advance(); // x / o / b

        let digits_start = self.cursor.pos();
        while self.cursor.current().map_or(false, |c| c.is_digit(radix)) {
            self.cursor.advance();
        }
        let digits = self.cursor.slice(digits_start, self.cursor.pos());

        if digits.is_empty() {
            self.handler.error(
                codes::E_LEX_MALFORMED_NUMBER,
                "number literal has no digits",
                self.current_span(),
            );
            return self.token(TokenKind::Invalid);
        }

        match i64::from_str_radix(digits, radix) {
            Ok(value) => self.token(TokenKind::Int(value)),
            Err(_) => {
                self.handler.error(
                    codes::E_LEX_MALFORMED_NUMBER,
                    "integer literal out of range",
                    self.current_span(),
                );
                self.token(TokenKind::Invalid)
            }
        }
    }

    fn eat_digits(&mut self) {
        while self.cursor.current().map_or(false, |c| c.is_ascii_digit()) {
            self.cursor.advance();
        }
    }
}
