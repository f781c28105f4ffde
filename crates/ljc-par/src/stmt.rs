//! Statement parsing - declarations dispatch, control flow, defer, using.
//!
//! The leading token decides the production; two tokens of lookahead
//! cover the worst cases (`async fn`, `abstract class`, the `for (x in …)`
//! probe). Item-like declarations (fn, class, enum, type, import, export)
//! live in `items.rs`; this module owns everything else plus the dispatch.

use ljc_lex::TokenKind;
use ljc_util::diagnostic::codes;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse a single statement.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current() {
            TokenKind::Const | TokenKind::Mut => self.parse_var_stmt(),
            TokenKind::Fn => self.parse_fn_stmt(false),
            TokenKind::Async if self.peek() == TokenKind::Fn => {
                self.advance();
                self.parse_fn_stmt(true)
            }
            TokenKind::Class => self.parse_class_stmt(false),
            TokenKind::Abstract if self.peek() == TokenKind::Class => {
                self.advance();
                self.parse_class_stmt(true)
            }
            TokenKind::Enum => self.parse_enum_stmt(),
            TokenKind::Type => self.parse_type_alias_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::When => self.parse_when_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Throw => self.parse_throw_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::Import => self.parse_import_stmt(),
            TokenKind::Export => self.parse_export_stmt(),
            TokenKind::Defer => self.parse_defer_stmt(),
            TokenKind::Using => self.parse_using_stmt(),
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            kind @ (TokenKind::Public
            | TokenKind::Private
            | TokenKind::Protected
            | TokenKind::Static
            | TokenKind::Readonly
            | TokenKind::Abstract) => {
                self.handler.error(
                    codes::E_PAR_MISPLACED_MODIFIER,
                    format!("{} is only valid on class members", kind.describe()),
                    self.current_span(),
                );
                None
            }
            _ => self.parse_expr_stmt(),
        }
    }

    // ── Variable declarations ────────────────────────────────────────────

    fn parse_var_stmt(&mut self) -> Option<Stmt> {
        self.parse_var_decl(true)
    }

    /// Variable declaration; `terminated` is false inside a for-header.
    pub(crate) fn parse_var_decl(&mut self, terminated: bool) -> Option<Stmt> {
        let start = self.current_span();
        let kind = if self.eat(&TokenKind::Const) {
            VarKind::Const
        } else {
            self.expect(TokenKind::Mut)?;
            VarKind::Mut
        };
        let (name, _) = self.expect_ident("variable name")?;
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        if kind == VarKind::Const && init.is_none() {
            self.handler.error(
                codes::E_STRUCT_CONST_WITHOUT_INIT,
                "`const` declaration requires an initializer",
                start,
            );
        }
        let span = start.merge(self.prev_span());
        if terminated {
            self.expect_terminator();
        }
        Some(Stmt::Var(VarDecl {
            kind,
            name,
            ty,
            init,
            span,
        }))
    }

    // ── Control flow ─────────────────────────────────────────────────────

    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::If)?;
        self.parse_if_tail(start)
    }

    /// Shared by `if (…)` and the `else (…)` re-entry.
    fn parse_if_tail(&mut self, start: ljc_util::Span) -> Option<Stmt> {
        self.expect_lparen()?;
        let condition = self.parse_expr()?;
        self.expect_rparen()?;
        let consequence = self.parse_block()?;

        let alternate = if self.eat(&TokenKind::Else) {
            let else_span = self.prev_span();
            match self.current() {
                TokenKind::LParen => Some(Box::new(self.parse_if_tail(else_span)?)),
                TokenKind::LBrace => Some(Box::new(Stmt::Block(self.parse_block()?))),
                other => {
                    self.handler.error(
                        codes::E_PAR_EXPECTED_TOKEN,
                        format!("expected `(` or `{{` after `else`, found {}", other.describe()),
                        self.current_span(),
                    );
                    None
                }
            }
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        Some(Stmt::If(IfStmt {
            condition,
            consequence,
            alternate,
            span,
        }))
    }

    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::For)?;

        // `for { }` - infinite loop.
        if self.check(&TokenKind::LBrace) {
            let body = self.parse_loop_body()?;
            let span = start.merge(self.prev_span());
            return Some(Stmt::For(ForStmt {
                kind: ForKind::CStyle {
                    init: None,
                    condition: None,
                    update: None,
                },
                body,
                span,
            }));
        }

        self.expect_lparen()?;

        // `for (x in xs)` - the probe needs one extra token of lookahead.
        if let TokenKind::Ident(variable) = self.current() {
            if self.peek() == TokenKind::In {
                self.advance();
                self.advance();
                let iterable = self.parse_expr()?;
                self.expect_rparen()?;
                let body = self.parse_loop_body()?;
                let span = start.merge(self.prev_span());
                return Some(Stmt::For(ForStmt {
                    kind: ForKind::ForIn { variable, iterable },
                    body,
                    span,
                }));
            }
        }

        // C-style header; every slot optional.
        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if matches!(self.current(), TokenKind::Const | TokenKind::Mut) {
            Some(Box::new(self.parse_var_decl(false)?))
        } else {
            let expr = self.parse_expr()?;
            let span = expr.span();
            Some(Box::new(Stmt::Expr(ExprStmt { expr, span })))
        };
        self.expect(TokenKind::Semicolon)?;
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_rparen()?;
        let body = self.parse_loop_body()?;
        let span = start.merge(self.prev_span());
        Some(Stmt::For(ForStmt {
            kind: ForKind::CStyle {
                init,
                condition,
                update,
            },
            body,
            span,
        }))
    }

    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::While)?;
        self.expect_lparen()?;
        let condition = self.parse_expr()?;
        self.expect_rparen()?;
        let body = self.parse_loop_body()?;
        let span = start.merge(self.prev_span());
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    fn parse_do_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Do)?;
        let body = self.parse_loop_body()?;
        self.expect(TokenKind::While)?;
        self.expect_lparen()?;
        let condition = self.parse_expr()?;
        self.expect_rparen()?;
        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Some(Stmt::DoWhile(DoWhileStmt {
            body,
            condition,
            span,
        }))
    }

    /// Parse a loop body block with the loop context open.
    fn parse_loop_body(&mut self) -> Option<Block> {
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        body
    }

    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        if self.fn_depth == 0 {
            self.handler.error(
                codes::E_STRUCT_INVALID_CONTROL_FLOW,
                "`return` outside of a function",
                start,
            );
        }
        self.expect(TokenKind::Return)?;
        let value = if self.at_terminator() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Some(Stmt::Return(ReturnStmt { value, span }))
    }

    fn parse_break_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        if self.loop_depth == 0 {
            self.handler.error(
                codes::E_STRUCT_INVALID_CONTROL_FLOW,
                "`break` outside of a loop",
                start,
            );
        }
        self.expect(TokenKind::Break)?;
        let value = if self.at_terminator() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Some(Stmt::Break(BreakStmt { value, span }))
    }

    fn parse_continue_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        if self.loop_depth == 0 {
            self.handler.error(
                codes::E_STRUCT_INVALID_CONTROL_FLOW,
                "`continue` outside of a loop",
                start,
            );
        }
        self.expect(TokenKind::Continue)?;
        self.expect_terminator();
        Some(Stmt::Continue(ContinueStmt { span: start }))
    }

    fn parse_throw_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Throw)?;
        let value = self.parse_expr()?;
        let span = start.merge(value.span());
        self.expect_terminator();
        Some(Stmt::Throw(ThrowStmt { value, span }))
    }

    fn parse_try_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Try)?;
        let block = self.parse_block()?;
        let mut catches = Vec::new();
        while self.check(&TokenKind::Catch) {
            let catch_start = self.current_span();
            self.advance();
            self.expect_lparen()?;
            let (name, _) = self.expect_ident("catch binding")?;
            let ty = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            self.expect_rparen()?;
            let body = self.parse_block()?;
            let span = catch_start.merge(self.prev_span());
            catches.push(CatchClause {
                name,
                ty,
                body,
                span,
            });
        }
        if catches.is_empty() {
            self.handler.error(
                codes::E_PAR_EXPECTED_TOKEN,
                "expected at least one `catch` clause after `try` block",
                self.current_span(),
            );
        }
        let span = start.merge(self.prev_span());
        Some(Stmt::Try(TryStmt {
            block,
            catches,
            span,
        }))
    }

    // ── Defer and using ──────────────────────────────────────────────────

    fn parse_defer_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        if self.fn_depth == 0 {
            self.handler.error(
                codes::E_STRUCT_INVALID_CONTROL_FLOW,
                "`defer` outside of a function",
                start,
            );
        }
        self.expect(TokenKind::Defer)?;
        let expr = self.parse_expr()?;
        let span = start.merge(expr.span());
        self.expect_terminator();
        Some(Stmt::Defer(DeferStmt { expr, span }))
    }

    fn parse_using_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Using)?;
        self.expect_lparen()?;
        let (name, _) = self.expect_ident("resource name")?;
        self.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        self.expect_rparen()?;
        let body = self.parse_block()?;
        let span = start.merge(self.prev_span());
        Some(Stmt::Using(UsingStmt {
            name,
            init,
            body,
            span,
        }))
    }

    // ── When ─────────────────────────────────────────────────────────────

    fn parse_when_stmt(&mut self) -> Option<Stmt> {
        let (subject, arms, span) = self.parse_when()?;
        Some(Stmt::When(WhenStmt {
            subject,
            arms,
            span,
        }))
    }

    /// Shared `when` parse for statement and expression positions.
    /// Returns the subject, the arms in source order, and the full span.
    pub(crate) fn parse_when(&mut self) -> Option<(Expr, Vec<WhenArm>, ljc_util::Span)> {
        let start = self.current_span();
        self.expect(TokenKind::When)?;
        self.expect_lparen()?;
        let subject = self.parse_expr()?;
        self.expect_rparen()?;
        self.expect(TokenKind::LBrace)?;

        let mut arms = Vec::new();
        loop {
            self.skip_stmt_separators();
            if self.check(&TokenKind::RBrace) || self.at_eof() {
                break;
            }
            let before = self.position;
            match self.parse_when_arm() {
                Some(arm) => arms.push(arm),
                None => {
                    self.synchronize();
                    if self.position == before {
                        self.advance();
                    }
                }
            }
            self.eat(&TokenKind::Comma);
        }

        let end = self.current_span();
        self.expect(TokenKind::RBrace)?;
        Some((subject, arms, start.merge(end)))
    }

    fn parse_when_arm(&mut self) -> Option<WhenArm> {
        let start = self.current_span();
        let pattern = self.parse_pattern()?;
        let guard = if self.eat(&TokenKind::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::FatArrow)?;
        let body = if self.check(&TokenKind::LBrace) {
            WhenBody::Block(self.parse_block()?)
        } else {
            WhenBody::Expr(self.parse_expr()?)
        };
        let end = match &body {
            WhenBody::Block(b) => b.span,
            WhenBody::Expr(e) => e.span(),
        };
        Some(WhenArm {
            pattern,
            guard,
            body,
            span: start.merge(end),
        })
    }

    // ── Expression statements and sends ──────────────────────────────────

    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let expr = self.parse_expr()?;

        // `ch <- v`: a send is recognized in statement position only; in
        // expression position `<-` is always the receive prefix.
        let expr = if self.check(&TokenKind::LArrow) {
            self.advance();
            let value = self.parse_expr()?;
            let span = start.merge(value.span());
            Expr::Send(SendExpr {
                channel: Box::new(expr),
                value: Box::new(value),
                span,
            })
        } else {
            expr
        };

        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Some(Stmt::Expr(ExprStmt { expr, span }))
    }
}
