//! Core lexer implementation.
//!
//! This module contains the main [`Lexer`] struct, trivia handling and the
//! dispatch over the current character. The per-family scanners live in
//! sibling modules: [`identifier`], [`number`], [`operator`], [`string`].

mod identifier;
mod number;
mod operator;
mod string;

use ljc_util::diagnostic::codes;
use ljc_util::{FileId, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for the Ljos language.
///
/// Transforms source text into a stream of tokens. Diagnostics are
/// reported through the shared [`Handler`]; the lexer itself never fails.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    cursor: Cursor<'a>,

    /// Diagnostic sink.
    handler: &'a Handler,

    /// File the source came from; stamped into every span.
    file_id: FileId,

    /// Starting position of the current token (absolute byte offset).
    token_start: usize,

    /// Line where the current token starts (1-based).
    token_line: u32,

    /// Column where the current token starts (1-based).
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str, handler: &'a Handler, file_id: FileId) -> Self {
        Self::with_origin(source, handler, file_id, 0, 1, 1)
    }

    /// Creates a lexer whose reported positions start at the given origin.
    ///
    /// Used by the parser to re-lex template-string placeholders in place.
    pub fn with_origin(
        source: &'a str,
        handler: &'a Handler,
        file_id: FileId,
        offset: usize,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            cursor: Cursor::with_origin(source, offset, line, column),
            handler,
            file_id,
            token_start: offset,
            token_line: line,
            token_column: column,
        }
    }

    /// Convenience: tokenize an entire source into a `Vec<Token>`.
    ///
    /// The returned vector always ends with an `Eof` token.
    pub fn tokenize(source: &str, handler: &Handler, file_id: FileId) -> Vec<Token> {
        let mut lexer = Lexer::new(source, handler, file_id);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Returns the next token from the source.
    ///
    /// This is the main entry point for tokenization. It skips trivia,
    /// then dispatches on the current character.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        self.token_start = self.cursor.pos();
        self.token_line = self.cursor.line();
        self.token_column = self.cursor.column();

        let Some(c) = self.cursor.current() else {
            return self.token(TokenKind::Eof);
        };

        match c {
            '\n' => {
                self.cursor.advance();
                self.token(TokenKind::Newline)
            }
            '\r' => {
                self.cursor.advance();
                // \r\n counts as one newline
                self.cursor.eat('\n');
                self.token(TokenKind::Newline)
            }

            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '^' => self.single(TokenKind::Caret),
            '~' => self.single(TokenKind::Tilde),

            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_eq(),
            '!' => self.lex_bang(),
            '<' => self.lex_lt(),
            '>' => self.lex_gt(),
            '&' => self.lex_amp(),
            '|' => self.lex_pipe(),
            '?' => self.lex_question(),
            '.' => self.lex_dot(),

            '"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if c == '_' || c.is_ascii_alphabetic() => self.lex_identifier(),

            other => {
                self.cursor.advance();
                self.handler.error(
                    codes::E_LEX_UNEXPECTED_CHAR,
                    format!("unexpected character `{}`", other),
                    self.current_span(),
                );
                self.token(TokenKind::Invalid)
            }
        }
    }

    // ── Shared helpers for the scanner submodules ────────────────────────

    /// Consume spaces, tabs and `#` line comments. Newlines are tokens,
    /// not trivia, and are left in place.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                Some(' ') | Some('\t') => {
                    self.cursor.advance();
                }
                Some('#') => {
                    while let Some(c) = self.cursor.current() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Build a token spanning from the recorded token start to the cursor.
    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.current_span())
    }

    /// Span from the recorded token start to the current cursor position.
    fn current_span(&self) -> Span {
        Span::with_file(
            self.token_start,
            self.cursor.pos(),
            self.file_id,
            self.token_line,
            self.token_column,
        )
    }

    /// Consume one character and build a token of the given kind.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TemplatePart;
    use ljc_util::Symbol;

    fn lex(source: &str) -> (Vec<Token>, Handler) {
        let handler = Handler::new();
        let tokens = Lexer::tokenize(source, &handler, FileId::DUMMY);
        (tokens, handler)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).0.into_iter().map(|t| t.kind).collect()
    }

    // ── Keywords and identifiers ─────────────────────────────────────────

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(
            kinds("const mut constant"),
            vec![
                TokenKind::Const,
                TokenKind::Mut,
                TokenKind::Ident(Symbol::intern("constant")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_underscore_identifier() {
        assert_eq!(
            kinds("_private"),
            vec![TokenKind::Ident(Symbol::intern("_private")), TokenKind::Eof]
        );
    }

    // ── Operators: maximal munch ─────────────────────────────────────────

    #[test]
    fn test_operator_maximal_munch() {
        let cases: Vec<(&str, TokenKind)> = vec![
            ("**", TokenKind::StarStar),
            ("**=", TokenKind::StarStarEq),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::NotEq),
            ("<=", TokenKind::LtEq),
            (">=", TokenKind::GtEq),
            ("&&", TokenKind::AndAnd),
            ("||", TokenKind::OrOr),
            ("??", TokenKind::QuestionQuestion),
            ("<<", TokenKind::Shl),
            (">>", TokenKind::Shr),
            ("<-", TokenKind::LArrow),
            ("=>", TokenKind::FatArrow),
            ("->", TokenKind::Arrow),
            ("?.", TokenKind::QuestionDot),
            ("?:", TokenKind::QuestionColon),
            ("..=", TokenKind::DotDotEq),
            ("..", TokenKind::DotDot),
            ("+=", TokenKind::PlusEq),
            ("-=", TokenKind::MinusEq),
            ("*=", TokenKind::StarEq),
            ("/=", TokenKind::SlashEq),
            ("%=", TokenKind::PercentEq),
            ("&&=", TokenKind::AndAndEq),
            ("||=", TokenKind::OrOrEq),
            ("??=", TokenKind::QuestionQuestionEq),
        ];
        for (source, expected) in cases {
            let (tokens, handler) = lex(source);
            assert!(!handler.has_errors(), "errors for {:?}", source);
            assert_eq!(tokens[0].kind, expected, "mismatch for {:?}", source);
            assert_eq!(tokens.len(), 2, "extra tokens for {:?}", source);
        }
    }

    #[test]
    fn test_single_char_operators_still_work() {
        assert_eq!(
            kinds("+ - * / % < > ! ? . & | ^ ~ ="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Not,
                TokenKind::Question,
                TokenKind::Dot,
                TokenKind::Amp,
                TokenKind::Pipe,
                TokenKind::Caret,
                TokenKind::Tilde,
                TokenKind::Eq,
                TokenKind::Eof,
            ]
        );
    }

    // ── Numbers ──────────────────────────────────────────────────────────

    #[test]
    fn test_integer_literals() {
        assert_eq!(kinds("42")[0], TokenKind::Int(42));
        assert_eq!(kinds("0")[0], TokenKind::Int(0));
        assert_eq!(kinds("0xFF")[0], TokenKind::Int(255));
        assert_eq!(kinds("0o777")[0], TokenKind::Int(511));
        assert_eq!(kinds("0b1010")[0], TokenKind::Int(10));
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(kinds("3.14")[0], TokenKind::Float(3.14));
        assert_eq!(kinds("2.5e3")[0], TokenKind::Float(2500.0));
        assert_eq!(kinds("1.0e-2")[0], TokenKind::Float(0.01));
    }

    #[test]
    fn test_range_is_not_a_float() {
        assert_eq!(
            kinds("1..5"),
            vec![
                TokenKind::Int(1),
                TokenKind::DotDot,
                TokenKind::Int(5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_hex() {
        let (tokens, handler) = lex("0x");
        assert!(handler.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
    }

    // ── Strings ──────────────────────────────────────────────────────────

    #[test]
    fn test_plain_string() {
        assert_eq!(
            kinds("\"hello\"")[0],
            TokenKind::Str(Symbol::intern("hello"))
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\nb\tc\\d\"e\0f""#)[0],
            TokenKind::Str(Symbol::intern("a\nb\tc\\d\"e\0f"))
        );
        assert_eq!(
            kinds(r#""\x41B""#)[0],
            TokenKind::Str(Symbol::intern("AB"))
        );
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, handler) = lex("\"abc");
        assert_eq!(handler.error_count(), 1);
        let diag = &handler.diagnostics()[0];
        assert_eq!(diag.code, codes::E_LEX_UNTERMINATED_STRING);
        // reported at the opening quote
        assert_eq!(diag.span.start, 0);
        assert_eq!(diag.span.column, 1);
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
    }

    #[test]
    fn test_template_string_parts() {
        let (tokens, handler) = lex(r#""a${x + 1}b""#);
        assert!(!handler.has_errors());
        match &tokens[0].kind {
            TokenKind::TemplateStr(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], TemplatePart::Chunk("a".to_string()));
                match &parts[1] {
                    TemplatePart::Expr { source, offset, .. } => {
                        assert_eq!(source, "x + 1");
                        assert_eq!(*offset, 4);
                    }
                    other => panic!("expected expr part, got {:?}", other),
                }
                assert_eq!(parts[2], TemplatePart::Chunk("b".to_string()));
            }
            other => panic!("expected template string, got {:?}", other),
        }
    }

    #[test]
    fn test_template_nested_braces() {
        let (tokens, handler) = lex(r#""v=${obj.get({k: 1})}""#);
        assert!(!handler.has_errors());
        match &tokens[0].kind {
            TokenKind::TemplateStr(parts) => match &parts[1] {
                TemplatePart::Expr { source, .. } => assert_eq!(source, "obj.get({k: 1})"),
                other => panic!("expected expr part, got {:?}", other),
            },
            other => panic!("expected template string, got {:?}", other),
        }
    }

    // ── Trivia and newlines ──────────────────────────────────────────────

    #[test]
    fn test_comment_is_trivia() {
        assert_eq!(
            kinds("1 # the answer\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_crlf_is_one_newline() {
        assert_eq!(
            kinds("a\r\nb"),
            vec![
                TokenKind::Ident(Symbol::intern("a")),
                TokenKind::Newline,
                TokenKind::Ident(Symbol::intern("b")),
                TokenKind::Eof,
            ]
        );
    }

    // ── Positions ────────────────────────────────────────────────────────

    #[test]
    fn test_positions() {
        let (tokens, _) = lex("ab\n  cd");
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
        // `cd` on line 2, after two spaces
        assert_eq!((tokens[2].span.line, tokens[2].span.column), (2, 3));
        assert_eq!(tokens[2].span.start, 5);
    }

    #[test]
    fn test_unknown_char_recovers() {
        let (tokens, handler) = lex("1 @ 2");
        assert_eq!(handler.error_count(), 1);
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                TokenKind::Int(1),
                TokenKind::Invalid,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_diagnostics_are_deterministic() {
        let (_, first) = lex("\"abc\n@");
        let (_, second) = lex("\"abc\n@");
        let render = |h: &Handler| {
            h.diagnostics()
                .iter()
                .map(|d| format!("{}:{}", d.code, d.message))
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
    }
}
