//! Identifier and keyword scanning.

use ljc_util::Symbol;

use crate::token::{keyword_from_str, Token, TokenKind};

use super::Lexer;

impl<'a> Lexer<'a> {
    /// Scan `[A-Za-z_][A-Za-z0-9_]*` and classify it as keyword or
    /// identifier.
    pub(super) fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.pos();
        while self
            .cursor
            .current()
            .map_or(false, |c| c == '_' || c.is_ascii_alphanumeric())
        {
            self.cursor.advance();
        }
        let text = self.cursor.slice(start, self.cursor.pos());

        match keyword_from_str(text) {
            Some(kind) => self.token(kind),
            None => self.token(TokenKind::Ident(Symbol::intern(text))),
        }
    }
}
