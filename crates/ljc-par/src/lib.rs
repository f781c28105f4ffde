//! ljc-par - Parser for the Ljos language.
//!
//! Deterministic recursive descent for statements (LL(k), k <= 2) layered
//! over a Pratt expression parser whose binding-power table lives in
//! [`expr::bp`]. The parser consumes the token stream produced by
//! `ljc-lex` and builds the AST defined in [`ast`].
//!
//! Statement terminators are newlines or `;`. Newlines are insignificant
//! inside `(...)` and `[...]` groups; the parser tracks group depth and
//! skips newline tokens transparently while inside one.
//!
//! # Error recovery
//!
//! User errors become diagnostics, never panics. On an unexpected token
//! the parser reports once and synchronizes to the next statement
//! boundary: a terminator, a closing brace, or a keyword that can start a
//! statement. The driving loops guarantee forward progress, so the parser
//! never loops on one token.
//!
//! # Examples
//!
//! ```
//! use ljc_par::Parser;
//! use ljc_util::{FileId, Handler};
//!
//! let handler = Handler::new();
//! let program = Parser::parse_source("const x = 1 + 2", &handler, FileId::DUMMY);
//!
//! assert!(!handler.has_errors());
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
mod expr;
mod items;
mod pattern;
mod stmt;
mod types;

pub use expr::bp;

use ljc_lex::{Lexer, Token, TokenKind};
use ljc_util::diagnostic::codes;
use ljc_util::{FileId, Handler, Span, Symbol};

use ast::{Block, Program};

/// The Ljos parser.
///
/// Owns the token stream and reports diagnostics through a shared
/// [`Handler`]. One parser instance parses one source file.
pub struct Parser<'a> {
    /// Token stream from the lexer, `Eof`-terminated.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,

    /// Span of the most recently consumed token.
    prev_span: Span,

    /// Diagnostic sink.
    handler: &'a Handler,

    /// File id stamped into synthesized spans.
    file_id: FileId,

    /// Depth of enclosing `(...)`/`[...]` groups. Newlines are skipped
    /// while this is non-zero.
    group_depth: usize,

    /// Function nesting depth; `return` requires it to be non-zero.
    fn_depth: usize,

    /// Loop nesting depth; `break`/`continue` require it to be non-zero.
    loop_depth: usize,

    /// Class-body nesting depth; `this`/`super` require it to be non-zero.
    class_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over an already-lexed token stream.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler, file_id: FileId) -> Self {
        Self {
            tokens,
            position: 0,
            prev_span: Span::DUMMY.with_file_id(file_id),
            handler,
            file_id,
            group_depth: 0,
            fn_depth: 0,
            loop_depth: 0,
            class_depth: 0,
        }
    }

    /// Lex and parse a source string in one step.
    pub fn parse_source(source: &str, handler: &Handler, file_id: FileId) -> Program {
        let tokens = Lexer::tokenize(source, handler, file_id);
        Parser::new(tokens, handler, file_id).parse_program()
    }

    /// Parse a complete program.
    ///
    /// Always returns a `Program`; when the input was broken the program
    /// holds whatever parsed and the handler holds the diagnostics.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        self.skip_stmt_separators();
        while !self.at_eof() {
            let before = self.position;
            match self.parse_stmt() {
                Some(stmt) => statements.push(stmt),
                None => {
                    self.synchronize();
                    if self.position == before {
                        self.force_advance();
                    }
                }
            }
            self.skip_stmt_separators();
        }
        let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        Program {
            statements,
            span: Span::with_file(0, end, self.file_id, 1, 1),
        }
    }

    // ── Token access ─────────────────────────────────────────────────────

    /// Index of the current significant token. `Invalid` tokens (already
    /// reported by the lexer) are never significant; newline tokens are
    /// not significant inside a group.
    fn peek_index(&self) -> usize {
        let mut i = self.position;
        loop {
            match self.tokens.get(i).map(|t| &t.kind) {
                Some(TokenKind::Invalid) => i += 1,
                Some(TokenKind::Newline) if self.group_depth > 0 => i += 1,
                _ => break,
            }
        }
        i.min(self.tokens.len().saturating_sub(1))
    }

    /// Kind of the current significant token.
    pub(crate) fn current(&self) -> TokenKind {
        self.tokens
            .get(self.peek_index())
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::Eof)
    }

    /// Span of the current significant token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.peek_index())
            .map(|t| t.span)
            .unwrap_or(Span::DUMMY.with_file_id(self.file_id))
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek(&self) -> TokenKind {
        let mut i = self.peek_index() + 1;
        loop {
            match self.tokens.get(i).map(|t| &t.kind) {
                Some(TokenKind::Invalid) => i += 1,
                Some(TokenKind::Newline) if self.group_depth > 0 => i += 1,
                _ => break,
            }
        }
        self.tokens
            .get(i)
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::Eof)
    }

    /// Span of the most recently consumed token.
    pub(crate) fn prev_span(&self) -> Span {
        self.prev_span
    }

    /// Consume and return the current significant token.
    pub(crate) fn advance(&mut self) -> Token {
        self.position = self.peek_index();
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::DUMMY.with_file_id(self.file_id)));
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        self.prev_span = token.span;
        token
    }

    /// True when the current significant token matches `kind`.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        &self.current() == kind
    }

    /// Consume the current token when it matches `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require `kind`; report `expected_token` and return `None` otherwise.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(&kind) {
            Some(self.advance())
        } else {
            self.handler.error(
                codes::E_PAR_EXPECTED_TOKEN,
                format!("expected {}, found {}", kind.describe(), self.current().describe()),
                self.current_span(),
            );
            None
        }
    }

    /// Require an identifier, described as `what` in the error message.
    pub(crate) fn expect_ident(&mut self, what: &str) -> Option<(Symbol, Span)> {
        match self.current() {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Some((name, span))
            }
            other => {
                self.handler.error(
                    codes::E_PAR_EXPECTED_TOKEN,
                    format!("expected {}, found {}", what, other.describe()),
                    self.current_span(),
                );
                None
            }
        }
    }

    /// Require a string literal.
    pub(crate) fn expect_str(&mut self, what: &str) -> Option<Symbol> {
        match self.current() {
            TokenKind::Str(value) => {
                self.advance();
                Some(value)
            }
            other => {
                self.handler.error(
                    codes::E_PAR_EXPECTED_TOKEN,
                    format!("expected {}, found {}", what, other.describe()),
                    self.current_span(),
                );
                None
            }
        }
    }

    /// True at the end of the token stream.
    pub(crate) fn at_eof(&self) -> bool {
        self.current() == TokenKind::Eof
    }

    /// Unconditionally step past the current token (unless already at the
    /// final `Eof`). Last-resort guarantee that recovery makes progress.
    fn force_advance(&mut self) {
        if self.position < self.tokens.len().saturating_sub(1) {
            self.position += 1;
        }
    }

    // ── Groups ───────────────────────────────────────────────────────────

    /// Require `(` and open a newline-insignificant group.
    pub(crate) fn expect_lparen(&mut self) -> Option<()> {
        self.expect(TokenKind::LParen)?;
        self.group_depth += 1;
        Some(())
    }

    /// Require `)` and close the group (closed even on failure: a missing
    /// `)` abandons the group).
    pub(crate) fn expect_rparen(&mut self) -> Option<()> {
        let res = self.expect(TokenKind::RParen);
        self.group_depth = self.group_depth.saturating_sub(1);
        res.map(|_| ())
    }

    /// Require `[` and open a newline-insignificant group.
    pub(crate) fn expect_lbracket(&mut self) -> Option<()> {
        self.expect(TokenKind::LBracket)?;
        self.group_depth += 1;
        Some(())
    }

    /// Require `]` and close the group.
    pub(crate) fn expect_rbracket(&mut self) -> Option<()> {
        let res = self.expect(TokenKind::RBracket);
        self.group_depth = self.group_depth.saturating_sub(1);
        res.map(|_| ())
    }

    // ── Terminators and recovery ─────────────────────────────────────────

    /// Skip newlines and stray semicolons between statements.
    pub(crate) fn skip_stmt_separators(&mut self) {
        while matches!(self.current(), TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// True when the current token ends a statement without being consumed.
    pub(crate) fn at_terminator(&self) -> bool {
        matches!(
            self.current(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        )
    }

    /// Consume one statement terminator. A closing brace or end of input
    /// terminates without being consumed; anything else is an error.
    pub(crate) fn expect_terminator(&mut self) {
        match self.current() {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance();
            }
            TokenKind::RBrace | TokenKind::Eof => {}
            other => {
                self.handler.error(
                    codes::E_PAR_MISSING_TERMINATOR,
                    format!(
                        "expected newline or `;` after statement, found {}",
                        other.describe()
                    ),
                    self.current_span(),
                );
                self.synchronize();
            }
        }
    }

    /// Panic-mode recovery: skip to the next statement boundary.
    ///
    /// Stops at (and consumes) a terminator, or stops before a closing
    /// brace, a statement-starting keyword, or end of input. Resets group
    /// depth: a failed statement abandons its open groups.
    pub(crate) fn synchronize(&mut self) {
        self.group_depth = 0;
        loop {
            let kind = match self.tokens.get(self.position) {
                Some(token) => &token.kind,
                None => return,
            };
            match kind {
                TokenKind::Eof => return,
                TokenKind::Newline | TokenKind::Semicolon => {
                    self.position += 1;
                    return;
                }
                TokenKind::RBrace => return,
                k if k.starts_statement() => return,
                _ => self.position += 1,
            }
        }
    }

    // ── Blocks ───────────────────────────────────────────────────────────

    /// Parse a `{ ... }` statement block.
    ///
    /// A block re-enters statement context: even inside `(...)`, newlines
    /// terminate the statements between its braces, so the group depth is
    /// parked for the duration.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(TokenKind::LBrace)?;
        let saved_depth = std::mem::replace(&mut self.group_depth, 0);
        let mut statements = Vec::new();
        self.skip_stmt_separators();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            let before = self.position;
            match self.parse_stmt() {
                Some(stmt) => statements.push(stmt),
                None => {
                    self.synchronize();
                    if self.position == before {
                        self.force_advance();
                    }
                }
            }
            self.skip_stmt_separators();
        }
        let end = self.current_span();
        let closed = self.expect(TokenKind::RBrace);
        self.group_depth = saved_depth;
        closed?;
        Some(Block {
            statements,
            span: start.merge(end),
        })
    }

    /// Parse a block as a function body: loop context does not cross the
    /// function boundary, and plain functions reset the `this` context.
    pub(crate) fn parse_fn_body(&mut self, keeps_this: bool) -> Option<Block> {
        let saved_loop = std::mem::replace(&mut self.loop_depth, 0);
        let saved_class = if keeps_this {
            self.class_depth
        } else {
            std::mem::replace(&mut self.class_depth, 0)
        };
        self.fn_depth += 1;
        let body = self.parse_block();
        self.fn_depth -= 1;
        self.loop_depth = saved_loop;
        self.class_depth = saved_class;
        body
    }
}

#[cfg(test)]
mod tests {
    use super::ast::*;
    use super::*;

    /// Helper to parse a program and hand back the handler too.
    fn parse(source: &str) -> (Program, Handler) {
        let handler = Handler::new();
        let program = Parser::parse_source(source, &handler, FileId::DUMMY);
        (program, handler)
    }

    fn parse_ok(source: &str) -> Program {
        let (program, handler) = parse(source);
        assert!(
            !handler.has_errors(),
            "unexpected errors for {:?}: {:?}",
            source,
            handler.diagnostics()
        );
        program
    }

    // =========================================================================
    // STATEMENT DISPATCH
    // =========================================================================

    #[test]
    fn test_var_declarations() {
        let program = parse_ok("const x = 1\nmut y: int = 2\nmut z");
        assert_eq!(program.statements.len(), 3);
        match &program.statements[0] {
            Stmt::Var(v) => {
                assert_eq!(v.kind, VarKind::Const);
                assert_eq!(v.name.as_str(), "x");
                assert!(v.init.is_some());
            }
            other => panic!("expected var, got {:?}", other),
        }
        match &program.statements[1] {
            Stmt::Var(v) => {
                assert_eq!(v.kind, VarKind::Mut);
                assert!(v.ty.is_some());
            }
            other => panic!("expected var, got {:?}", other),
        }
    }

    #[test]
    fn test_const_requires_initializer() {
        let (_, handler) = parse("const x");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_CONST_WITHOUT_INIT));
    }

    #[test]
    fn test_semicolon_and_newline_terminators() {
        let program = parse_ok("const a = 1; const b = 2\nconst c = 3");
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_newlines_ignored_inside_parens() {
        let program = parse_ok("const x = f(\n  1,\n  2\n)");
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_newline_separates_statements() {
        // `a` then `(b)` must be two statements, not a call `a(b)`.
        let program = parse_ok("a\n(b)");
        assert_eq!(program.statements.len(), 2);
    }

    // =========================================================================
    // FUNCTIONS
    // =========================================================================

    #[test]
    fn test_fn_declaration() {
        let program = parse_ok("fn add(a: int, b: int): int { return a + b }");
        match &program.statements[0] {
            Stmt::Fn(f) => {
                assert_eq!(f.name.as_str(), "add");
                assert_eq!(f.params.len(), 2);
                assert!(f.return_ty.is_some());
                assert_eq!(f.body.statements.len(), 1);
            }
            other => panic!("expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_fn() {
        let program = parse_ok("fn id<T>(x: T): T { return x }");
        match &program.statements[0] {
            Stmt::Fn(f) => assert_eq!(f.type_params.len(), 1),
            other => panic!("expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_parameter_is_reported() {
        let (_, handler) = parse("fn f(a, a) { }");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_PAR_DUPLICATE_PARAMETER));
    }

    #[test]
    fn test_return_outside_function() {
        let (_, handler) = parse("return 1");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_INVALID_CONTROL_FLOW));
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    #[test]
    fn test_if_else_chain_with_parenthesized_conditions() {
        let program = parse_ok("if (a) { } else (b) { } else { }");
        match &program.statements[0] {
            Stmt::If(first) => {
                match first.alternate.as_deref() {
                    Some(Stmt::If(second)) => {
                        assert!(matches!(second.alternate.as_deref(), Some(Stmt::Block(_))));
                    }
                    other => panic!("expected nested if, got {:?}", other),
                }
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_for_c_style() {
        let program = parse_ok("for (mut i = 0; i < 10; i += 1) { }");
        match &program.statements[0] {
            Stmt::For(f) => match &f.kind {
                ForKind::CStyle {
                    init,
                    condition,
                    update,
                } => {
                    assert!(init.is_some());
                    assert!(condition.is_some());
                    assert!(update.is_some());
                }
                other => panic!("expected c-style, got {:?}", other),
            },
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_for_in() {
        let program = parse_ok("for (x in xs) { }");
        match &program.statements[0] {
            Stmt::For(f) => match &f.kind {
                ForKind::ForIn { variable, .. } => assert_eq!(variable.as_str(), "x"),
                other => panic!("expected for-in, got {:?}", other),
            },
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_infinite_for() {
        let program = parse_ok("for { break }");
        match &program.statements[0] {
            Stmt::For(f) => match &f.kind {
                ForKind::CStyle {
                    init,
                    condition,
                    update,
                } => {
                    assert!(init.is_none() && condition.is_none() && update.is_none());
                }
                other => panic!("expected c-style, got {:?}", other),
            },
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_break_outside_loop() {
        let (_, handler) = parse("break");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_INVALID_CONTROL_FLOW));
    }

    #[test]
    fn test_try_requires_catch() {
        let (_, handler) = parse("try { }");
        assert!(handler.has_errors());
    }

    #[test]
    fn test_try_with_typed_catches() {
        let program = parse_ok("try { f() } catch (e: IoError) { } catch (e) { }");
        match &program.statements[0] {
            Stmt::Try(t) => {
                assert_eq!(t.catches.len(), 2);
                assert!(t.catches[0].ty.is_some());
                assert!(t.catches[1].ty.is_none());
            }
            other => panic!("expected try, got {:?}", other),
        }
    }

    // =========================================================================
    // DEFER / USING / CONCURRENCY
    // =========================================================================

    #[test]
    fn test_defer_and_using() {
        let program = parse_ok(
            "fn f() {\n  defer cleanup()\n  using (r = open()) {\n    r.use()\n  }\n}",
        );
        match &program.statements[0] {
            Stmt::Fn(f) => {
                assert!(matches!(f.body.statements[0], Stmt::Defer(_)));
                assert!(matches!(f.body.statements[1], Stmt::Using(_)));
            }
            other => panic!("expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_send_statement_and_receive_expression() {
        let program = parse_ok("fn f() {\n  ch <- 1\n  const v = <-ch\n}");
        match &program.statements[0] {
            Stmt::Fn(f) => {
                match &f.body.statements[0] {
                    Stmt::Expr(e) => assert!(matches!(e.expr, Expr::Send(_))),
                    other => panic!("expected send statement, got {:?}", other),
                }
                match &f.body.statements[1] {
                    Stmt::Var(v) => {
                        assert!(matches!(v.init, Some(Expr::Receive(_))));
                    }
                    other => panic!("expected var, got {:?}", other),
                }
            }
            other => panic!("expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_receive_in_assignment_rhs() {
        let program = parse_ok("fn f() { x = <-ch }");
        match &program.statements[0] {
            Stmt::Fn(f) => match &f.body.statements[0] {
                Stmt::Expr(e) => match &e.expr {
                    Expr::Assign(a) => assert!(matches!(*a.value, Expr::Receive(_))),
                    other => panic!("expected assign, got {:?}", other),
                },
                other => panic!("expected expr stmt, got {:?}", other),
            },
            other => panic!("expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_chan_and_go() {
        let program = parse_ok("fn f() {\n  const ch = chan int(4)\n  go worker(ch)\n}");
        match &program.statements[0] {
            Stmt::Fn(f) => {
                match &f.body.statements[0] {
                    Stmt::Var(v) => assert!(matches!(v.init, Some(Expr::Chan(_)))),
                    other => panic!("expected var, got {:?}", other),
                }
                match &f.body.statements[1] {
                    Stmt::Expr(e) => assert!(matches!(e.expr, Expr::Go(_))),
                    other => panic!("expected go, got {:?}", other),
                }
            }
            other => panic!("expected fn, got {:?}", other),
        }
    }

    // =========================================================================
    // MODULES
    // =========================================================================

    #[test]
    fn test_imports() {
        let program = parse_ok(
            "import d from \"m\"\nimport { a, b as c } from \"m\"\nimport * as ns from \"m\"",
        );
        assert_eq!(program.statements.len(), 3);
        match &program.statements[1] {
            Stmt::Import(i) => {
                assert_eq!(i.specifiers.len(), 2);
                assert!(matches!(
                    i.specifiers[1],
                    ImportSpecifier::Named { alias: Some(_), .. }
                ));
            }
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_exports() {
        let program =
            parse_ok("export const x = 1\nexport default f()\nexport { a as b } from \"m\"");
        assert!(matches!(
            &program.statements[0],
            Stmt::Export(ExportDecl {
                kind: ExportKind::Declaration(_),
                ..
            })
        ));
        assert!(matches!(
            &program.statements[1],
            Stmt::Export(ExportDecl {
                kind: ExportKind::Default(_),
                ..
            })
        ));
        match &program.statements[2] {
            Stmt::Export(ExportDecl {
                kind: ExportKind::Named { specifiers, source },
                ..
            }) => {
                assert_eq!(specifiers.len(), 1);
                assert!(source.is_some());
            }
            other => panic!("expected named export, got {:?}", other),
        }
    }

    #[test]
    fn test_export_without_target() {
        let (_, handler) = parse("export");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_EXPORT_WITHOUT_TARGET));
    }

    // =========================================================================
    // CLASSES
    // =========================================================================

    #[test]
    fn test_class_members_in_order() {
        let source = "class Point extends Base implements Printable {\n  x: int = 0\n  constructor(x: int) { this.x = x }\n  static origin() { return new Point(0) }\n  private secret: int\n}";
        let program = parse_ok(source);
        match &program.statements[0] {
            Stmt::Class(c) => {
                assert_eq!(c.name.as_str(), "Point");
                assert_eq!(c.superclass.map(|s| s.as_str()), Some("Base"));
                assert_eq!(c.implements.len(), 1);
                assert_eq!(c.members.len(), 4);
                assert!(matches!(c.members[0].kind, MemberKind::Field { .. }));
                assert!(matches!(c.members[1].kind, MemberKind::Constructor { .. }));
                assert!(c.members[2].modifiers.is_static);
                assert_eq!(c.members[3].modifiers.visibility, Visibility::Private);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_abstract_class() {
        let program = parse_ok("abstract class Shape { area() { return 0 } }");
        match &program.statements[0] {
            Stmt::Class(c) => assert!(c.is_abstract),
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_member_modifier() {
        let (_, handler) = parse("class C { static static x: int }");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_DUPLICATE_MODIFIER));
    }

    #[test]
    fn test_this_outside_class() {
        let (_, handler) = parse("fn f() { return this }");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_THIS_OUTSIDE_CLASS));
    }

    #[test]
    fn test_private_member_access_through_other_receiver() {
        let (_, handler) = parse("fn f(p) { return p._secret }");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_STRUCT_PRIVATE_ACCESS));
    }

    #[test]
    fn test_private_member_access_through_this_is_fine() {
        let program = parse_ok("class C { m() { return this._secret } }");
        assert_eq!(program.statements.len(), 1);
    }

    // =========================================================================
    // ENUMS AND TYPE ALIASES
    // =========================================================================

    #[test]
    fn test_enum_declaration() {
        let program = parse_ok("enum Color {\n  Red,\n  Green = 5,\n  Blue\n}");
        match &program.statements[0] {
            Stmt::Enum(e) => {
                assert_eq!(e.variants.len(), 3);
                assert!(e.variants[1].value.is_some());
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_type_alias() {
        let program = parse_ok("type Pair = (int, str)");
        assert!(matches!(program.statements[0], Stmt::TypeAlias(_)));
    }

    // =========================================================================
    // ERROR RECOVERY
    // =========================================================================

    #[test]
    fn test_recovery_continues_after_bad_statement() {
        let (program, handler) = parse("const = 1\nconst y = 2");
        assert!(handler.has_errors());
        // The second statement still parses.
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(s, Stmt::Var(v) if v.name.as_str() == "y")));
    }

    #[test]
    fn test_unterminated_string_best_effort() {
        let (program, handler) = parse("\"abc");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == codes::E_LEX_UNTERMINATED_STRING));
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_parser_never_loops() {
        // Pathological inputs must still terminate.
        for source in ["}}}}", ")))(", "const const const", "else", "@#!%", "? : ? :"] {
            let handler = Handler::new();
            let _ = Parser::parse_source(source, &handler, FileId::DUMMY);
        }
    }

    #[test]
    fn test_empty_or_diagnostics_invariant() {
        // parse(lex(s)) returns a valid AST or a non-empty diagnostic list.
        for source in ["", "const x = ", "fn f( {", "when (x) {"] {
            let handler = Handler::new();
            let program = Parser::parse_source(source, &handler, FileId::DUMMY);
            if program.statements.is_empty() && !source.trim().is_empty() {
                assert!(
                    !handler.diagnostics().is_empty(),
                    "no AST and no diagnostics for {:?}",
                    source
                );
            }
        }
    }
}
