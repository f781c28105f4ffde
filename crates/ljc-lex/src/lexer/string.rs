//! String and template-string scanning.
//!
//! Strings are double-quoted with `\n \r \t \\ \" \0 \xNN \uNNNN` escapes.
//! A string containing `${...}` placeholders becomes a template-string
//! token carrying literal chunks and the raw placeholder sources; the
//! parser re-lexes those with their recorded origins.

use ljc_util::diagnostic::codes;
use ljc_util::Span;
use ljc_util::Symbol;

use crate::token::{TemplatePart, Token, TokenKind};

use super::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn lex_string(&mut self) -> Token {
        // Unterminated strings are reported at the opening quote.
        let quote_span = Span::with_file(
            self.token_start,
            self.token_start + 1,
            self.file_id,
            self.token_line,
            self.token_column,
        );

        self.cursor.advance(); // opening quote

        let mut chunk = String::new();
        let mut parts: Vec<TemplatePart> = Vec::new();

        loop {
            match self.cursor.current() {
                None | Some('\n') | Some('\r') => {
                    self.handler.error(
                        codes::E_LEX_UNTERMINATED_STRING,
                        "unterminated string literal",
                        quote_span,
                    );
                    return self.token(TokenKind::Invalid);
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    if let Some(c) = self.lex_escape() {
                        chunk.push(c);
                    }
                }
                Some('$') if self.cursor.peek() == Some('{') => {
                    if !chunk.is_empty() {
                        parts.push(TemplatePart::Chunk(std::mem::take(&mut chunk)));
                    }
                    self.cursor.advance(); // $
                    self.cursor.advance(); // {
                    match self.lex_placeholder(quote_span) {
                        Some(part) => parts.push(part),
                        None => return self.token(TokenKind::Invalid),
                    }
                }
                Some(c) => {
                    chunk.push(c);
                    self.cursor.advance();
                }
            }
        }

        if parts.is_empty() {
            self.token(TokenKind::Str(Symbol::intern(&chunk)))
        } else {
            if !chunk.is_empty() {
                parts.push(TemplatePart::Chunk(chunk));
            }
            self.token(TokenKind::TemplateStr(parts))
        }
    }

    /// Scan one `${...}` placeholder body; the cursor sits just past `{`.
    ///
    /// Braces nest, and string literals inside the placeholder may contain
    /// braces that must not count. Returns `None` on an unterminated
    /// placeholder (diagnostic already emitted).
    fn lex_placeholder(&mut self, quote_span: Span) -> Option<TemplatePart> {
        let offset = self.cursor.pos();
        let line = self.cursor.line();
        let column = self.cursor.column();
        let mut depth = 1usize;
        let mut source = String::new();

        loop {
            match self.cursor.current() {
                None => {
                    self.handler.error(
                        codes::E_LEX_UNTERMINATED_TEMPLATE,
                        "unterminated template placeholder",
                        quote_span,
                    );
                    return None;
                }
                Some('{') => {
                    depth += 1;
                    source.push('{');
                    self.cursor.advance();
                }
                Some('}') => {
                    depth -= 1;
                    self.cursor.advance();
                    if depth == 0 {
                        return Some(TemplatePart::Expr {
                            source,
                            offset,
                            line,
                            column,
                        });
                    }
                    source.push('}');
                }
                Some('"') => {
                    // Copy a nested string verbatim so its braces don't count.
                    source.push('"');
                    self.cursor.advance();
                    loop {
                        match self.cursor.current() {
                            None => break,
                            Some('\\') => {
                                source.push('\\');
                                self.cursor.advance();
                                if let Some(next) = self.cursor.advance() {
                                    source.push(next);
                                }
                            }
                            Some('"') => {
                                source.push('"');
                                self.cursor.advance();
                                break;
                            }
                            Some(c) => {
                                source.push(c);
                                self.cursor.advance();
                            }
                        }
                    }
                }
                Some(c) => {
                    source.push(c);
                    self.cursor.advance();
                }
            }
        }
    }

    /// Scan one escape sequence; the cursor sits on the backslash.
    ///
    /// On an invalid escape, a diagnostic is emitted and the escaped
    /// character itself is kept so scanning can continue.
    fn lex_escape(&mut self) -> Option<char> {
        let escape_start = self.cursor.pos();
        let escape_line = self.cursor.line();
        let escape_column = self.cursor.column();
        self.cursor.advance(); // backslash

        let Some(c) = self.cursor.advance() else {
            // The enclosing loop reports the unterminated string.
            return None;
        };

        match c {
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '0' => Some('\0'),
            'x' => self.lex_hex_escape(2, escape_start, escape_line, escape_column),
            'u' => self.lex_hex_escape(4, escape_start, escape_line, escape_column),
            other => {
                self.handler.error(
                    codes::E_LEX_INVALID_ESCAPE,
                    format!("invalid escape sequence `\\{}`", other),
                    Span::with_file(
                        escape_start,
                        self.cursor.pos(),
                        self.file_id,
                        escape_line,
                        escape_column,
                    ),
                );
                Some(other)
            }
        }
    }

    /// Read exactly `count` hex digits and decode them as a code point.
    fn lex_hex_escape(
        &mut self,
        count: usize,
        escape_start: usize,
        escape_line: u32,
        escape_column: u32,
    ) -> Option<char> {
        let mut value: u32 = 0;
        for _ in 0..count {
            match self.cursor.current().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    value = value * 16 + digit;
                    self.cursor.advance();
                }
                None => {
                    self.handler.error(
                        codes::E_LEX_INVALID_ESCAPE,
                        format!("escape sequence expects {} hex digits", count),
                        Span::with_file(
                            escape_start,
                            self.cursor.pos(),
                            self.file_id,
                            escape_line,
                            escape_column,
                        ),
                    );
                    return Some('\u{FFFD}');
                }
            }
        }
        match char::from_u32(value) {
            Some(c) => Some(c),
            None => {
                self.handler.error(
                    codes::E_LEX_INVALID_ESCAPE,
                    format!("`\\u{:04X}` is not a valid code point", value),
                    Span::with_file(
                        escape_start,
                        self.cursor.pos(),
                        self.file_id,
                        escape_line,
                        escape_column,
                    ),
                );
                Some('\u{FFFD}')
            }
        }
    }
}
