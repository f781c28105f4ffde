//! Expression parsing using Pratt parsing (top-down operator precedence).
//!
//! The [`bp`] module is the precedence table: one named constant per
//! binding level, lowest to highest. Left-associative operators parse
//! their right side at `level + 1`, right-associative ones (`=`, `**`) at
//! the level itself.
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | 1 | `=` and compound assignment (right) |
//! | 2 | `? :`, `??` |
//! | 3 | `\|\|` |
//! | 4 | `&&` |
//! | 5 | `\|` |
//! | 6 | `^` |
//! | 7 | `&` |
//! | 8 | `==`, `!=` |
//! | 9 | `<`, `<=`, `>`, `>=`, `is`, `instanceof`, `in` |
//! | 10 | `<<`, `>>` |
//! | 11 | `..`, `..=` |
//! | 12 | `+`, `-` |
//! | 13 | `*`, `/`, `%` |
//! | 14 | `**` (right) |
//! | 15 | `of` |
//! | 16 | unary prefix |
//! | 17 | call, index, member, `?.` |

use ljc_lex::{Lexer, TemplatePart, TokenKind};
use ljc_util::diagnostic::codes;
use ljc_util::Span;

use crate::ast::*;
use crate::Parser;

/// Binding power levels for Pratt parsing.
/// Higher numbers = tighter binding (higher precedence).
pub mod bp {
    /// Minimum binding power (start of expression).
    pub const MIN: u8 = 0;

    /// Assignment: `=`, `+=`, ... (right-associative)
    pub const ASSIGN: u8 = 2;

    /// Ternary `? :` and nullish `??`
    pub const TERNARY: u8 = 4;

    /// Logical OR: `||`
    pub const LOGICAL_OR: u8 = 6;

    /// Logical AND: `&&`
    pub const LOGICAL_AND: u8 = 8;

    /// Bitwise OR: `|`
    pub const BIT_OR: u8 = 10;

    /// Bitwise XOR: `^`
    pub const BIT_XOR: u8 = 12;

    /// Bitwise AND: `&`
    pub const BIT_AND: u8 = 14;

    /// Equality: `==`, `!=`
    pub const EQUALITY: u8 = 16;

    /// Comparison: `<`, `<=`, `>`, `>=`, `is`, `instanceof`, `in`
    pub const COMPARISON: u8 = 18;

    /// Shift: `<<`, `>>`
    pub const SHIFT: u8 = 20;

    /// Range: `..`, `..=`
    pub const RANGE: u8 = 22;

    /// Additive: `+`, `-`
    pub const ADDITIVE: u8 = 24;

    /// Multiplicative: `*`, `/`, `%`
    pub const MULTIPLICATIVE: u8 = 26;

    /// Exponent: `**` (right-associative)
    pub const EXPONENT: u8 = 28;

    /// Cast: `of`
    pub const CAST: u8 = 30;

    /// Unary prefix operators.
    pub const UNARY: u8 = 32;

    /// Postfix: call, index, member access.
    pub const POSTFIX: u8 = 34;
}

/// Binding powers and AST operator for a plain infix token.
///
/// Returns `(left_bp, right_bp, op)`; `right_bp` is the minimum binding
/// power for the right operand, so left-associative operators use
/// `left + 1` and right-associative ones reuse `left`.
fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8, BinOp)> {
    use bp::*;
    let entry = match kind {
        TokenKind::QuestionQuestion => (TERNARY, TERNARY + 1, BinOp::Nullish),
        TokenKind::OrOr => (LOGICAL_OR, LOGICAL_OR + 1, BinOp::Or),
        TokenKind::AndAnd => (LOGICAL_AND, LOGICAL_AND + 1, BinOp::And),
        TokenKind::Pipe => (BIT_OR, BIT_OR + 1, BinOp::BitOr),
        TokenKind::Caret => (BIT_XOR, BIT_XOR + 1, BinOp::BitXor),
        TokenKind::Amp => (BIT_AND, BIT_AND + 1, BinOp::BitAnd),
        TokenKind::EqEq => (EQUALITY, EQUALITY + 1, BinOp::Eq),
        TokenKind::NotEq => (EQUALITY, EQUALITY + 1, BinOp::Ne),
        TokenKind::Lt => (COMPARISON, COMPARISON + 1, BinOp::Lt),
        TokenKind::LtEq => (COMPARISON, COMPARISON + 1, BinOp::Le),
        TokenKind::Gt => (COMPARISON, COMPARISON + 1, BinOp::Gt),
        TokenKind::GtEq => (COMPARISON, COMPARISON + 1, BinOp::Ge),
        TokenKind::Instanceof => (COMPARISON, COMPARISON + 1, BinOp::Instanceof),
        TokenKind::In => (COMPARISON, COMPARISON + 1, BinOp::In),
        TokenKind::Shl => (SHIFT, SHIFT + 1, BinOp::Shl),
        TokenKind::Shr => (SHIFT, SHIFT + 1, BinOp::Shr),
        TokenKind::Plus => (ADDITIVE, ADDITIVE + 1, BinOp::Add),
        TokenKind::Minus => (ADDITIVE, ADDITIVE + 1, BinOp::Sub),
        TokenKind::Star => (MULTIPLICATIVE, MULTIPLICATIVE + 1, BinOp::Mul),
        TokenKind::Slash => (MULTIPLICATIVE, MULTIPLICATIVE + 1, BinOp::Div),
        TokenKind::Percent => (MULTIPLICATIVE, MULTIPLICATIVE + 1, BinOp::Rem),
        // Right-associative: right side parsed at the same level.
        TokenKind::StarStar => (EXPONENT, EXPONENT, BinOp::Pow),
        _ => return None,
    };
    Some(entry)
}

/// Assignment operator for a token, if it is one.
fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Rem,
        TokenKind::StarStarEq => AssignOp::Pow,
        TokenKind::AndAndEq => AssignOp::And,
        TokenKind::OrOrEq => AssignOp::Or,
        TokenKind::QuestionQuestionEq => AssignOp::Nullish,
        _ => return None,
    };
    Some(op)
}

/// True for tokens that can begin an expression.
pub(crate) fn starts_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::TemplateStr(_)
            | TokenKind::Ident(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nul
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::When
            | TokenKind::Chan
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::Tilde
            | TokenKind::Typeof
            | TokenKind::Void
            | TokenKind::Delete
            | TokenKind::Await
            | TokenKind::Go
            | TokenKind::LArrow
            | TokenKind::Yield
            | TokenKind::Async
    )
}

impl<'a> Parser<'a> {
    /// Main expression entry point.
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Parse an expression consuming only operators whose left binding
    /// power is at least `min_bp` (Pratt parser core).
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let cur = self.current();

            // Postfix operators bind tightest.
            if bp::POSTFIX >= min_bp {
                match cur {
                    TokenKind::LParen => {
                        lhs = self.parse_call(lhs)?;
                        continue;
                    }
                    TokenKind::LBracket => {
                        lhs = self.parse_index(lhs)?;
                        continue;
                    }
                    TokenKind::Dot => {
                        lhs = self.parse_member(lhs, false)?;
                        continue;
                    }
                    TokenKind::QuestionDot => {
                        lhs = self.parse_member(lhs, true)?;
                        continue;
                    }
                    _ => {}
                }
            }

            // `expr of T` - safe cast.
            if cur == TokenKind::Of && bp::CAST >= min_bp {
                self.advance();
                let ty = self.parse_type()?;
                let span = lhs.span().merge(self.prev_span());
                lhs = Expr::Cast(CastExpr {
                    expr: Box::new(lhs),
                    ty,
                    span,
                });
                continue;
            }

            // `expr is T` - runtime type check.
            if cur == TokenKind::Is && bp::COMPARISON >= min_bp {
                self.advance();
                let ty = self.parse_type()?;
                let span = lhs.span().merge(self.prev_span());
                lhs = Expr::TypeCheck(TypeCheckExpr {
                    expr: Box::new(lhs),
                    ty,
                    span,
                });
                continue;
            }

            // Ranges.
            if matches!(cur, TokenKind::DotDot | TokenKind::DotDotEq) && bp::RANGE >= min_bp {
                let inclusive = cur == TokenKind::DotDotEq;
                self.advance();
                let end = self.parse_expr_bp(bp::RANGE + 1)?;
                let span = lhs.span().merge(end.span());
                lhs = Expr::Range(RangeExpr {
                    start: Box::new(lhs),
                    end: Box::new(end),
                    inclusive,
                    span,
                });
                continue;
            }

            // Ternary conditional.
            if cur == TokenKind::Question && bp::TERNARY >= min_bp {
                self.advance();
                let consequence = self.parse_expr_bp(bp::MIN)?;
                self.expect(TokenKind::Colon)?;
                // Right-associative: `a ? b : c ? d : e` nests rightwards.
                let alternate = self.parse_expr_bp(bp::TERNARY)?;
                let span = lhs.span().merge(alternate.span());
                lhs = Expr::Ternary(TernaryExpr {
                    condition: Box::new(lhs),
                    consequence: Box::new(consequence),
                    alternate: Box::new(alternate),
                    span,
                });
                continue;
            }

            // Assignment (right-associative).
            if let Some(op) = assign_op(&cur) {
                if bp::ASSIGN < min_bp {
                    break;
                }
                if !matches!(lhs, Expr::Ident(_) | Expr::Member(_)) {
                    self.handler.error(
                        codes::E_PAR_UNEXPECTED_TOKEN,
                        "invalid assignment target",
                        lhs.span(),
                    );
                }
                self.advance();
                let value = self.parse_expr_bp(bp::ASSIGN)?;
                let span = lhs.span().merge(value.span());
                lhs = Expr::Assign(AssignExpr {
                    op,
                    target: Box::new(lhs),
                    value: Box::new(value),
                    span,
                });
                continue;
            }

            // Plain binary operators.
            match infix_binding_power(&cur) {
                Some((lbp, rbp, op)) if lbp >= min_bp => {
                    self.advance();
                    let rhs = self.parse_expr_bp(rbp)?;
                    let span = lhs.span().merge(rhs.span());
                    lhs = Expr::Binary(BinaryExpr {
                        op,
                        left: Box::new(lhs),
                        right: Box::new(rhs),
                        span,
                    });
                }
                _ => break,
            }
        }

        Some(lhs)
    }

    // ── Prefix position ──────────────────────────────────────────────────

    fn parse_prefix(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.current() {
            TokenKind::Int(value) => {
                self.advance();
                Some(Expr::Int(IntLit { value, span }))
            }
            TokenKind::Float(value) => {
                self.advance();
                Some(Expr::Float(FloatLit { value, span }))
            }
            TokenKind::Str(value) => {
                self.advance();
                Some(Expr::Str(StrLit { value, span }))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::Bool(BoolLit { value: true, span }))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::Bool(BoolLit { value: false, span }))
            }
            TokenKind::Nul => {
                self.advance();
                Some(Expr::Nul(NulLit { span }))
            }
            TokenKind::TemplateStr(parts) => {
                self.advance();
                Some(self.parse_template(parts, span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Some(Expr::Ident(Ident { name, span }))
            }
            TokenKind::This => {
                if self.class_depth == 0 {
                    self.handler.error(
                        codes::E_STRUCT_THIS_OUTSIDE_CLASS,
                        "`this` is only valid inside a class body",
                        span,
                    );
                }
                self.advance();
                Some(Expr::This(ThisExpr { span }))
            }
            TokenKind::Super => {
                if self.class_depth == 0 {
                    self.handler.error(
                        codes::E_STRUCT_THIS_OUTSIDE_CLASS,
                        "`super` is only valid inside a class body",
                        span,
                    );
                }
                self.advance();
                Some(Expr::Super(SuperExpr { span }))
            }
            TokenKind::New => self.parse_new(),
            TokenKind::LParen => {
                if let Some(arrow) = self.try_parse_arrow() {
                    return Some(arrow);
                }
                self.expect_lparen()?;
                let inner = self.parse_expr()?;
                self.expect_rparen()?;
                Some(inner)
            }
            TokenKind::Async => {
                if let Some(arrow) = self.try_parse_arrow() {
                    return Some(arrow);
                }
                self.handler.error(
                    codes::E_PAR_UNEXPECTED_TOKEN,
                    "expected `(` to start an async arrow function",
                    span,
                );
                None
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::When => {
                let (subject, arms, span) = self.parse_when()?;
                if !arms
                    .iter()
                    .any(|arm| matches!(arm.pattern, Pattern::Else(_)))
                {
                    self.handler.error(
                        codes::E_PAR_MISSING_ELSE_ARM,
                        "`when` used as an expression requires an `else` arm",
                        span,
                    );
                }
                Some(Expr::When(Box::new(WhenExpr {
                    subject,
                    arms,
                    span,
                })))
            }
            TokenKind::Chan => self.parse_chan(),
            TokenKind::Minus => self.parse_unary(UnOp::Neg),
            TokenKind::Plus => self.parse_unary(UnOp::Pos),
            TokenKind::Not => self.parse_unary(UnOp::Not),
            TokenKind::Tilde => self.parse_unary(UnOp::BitNot),
            TokenKind::Typeof => self.parse_unary(UnOp::Typeof),
            TokenKind::Void => self.parse_unary(UnOp::Void),
            TokenKind::Delete => self.parse_unary(UnOp::Delete),
            TokenKind::Await => {
                self.advance();
                let expr = self.parse_expr_bp(bp::UNARY)?;
                let span = span.merge(expr.span());
                Some(Expr::Await(AwaitExpr {
                    expr: Box::new(expr),
                    span,
                }))
            }
            TokenKind::Go => {
                self.advance();
                let operand = self.parse_expr_bp(bp::UNARY)?;
                if !matches!(operand, Expr::Call(_)) {
                    self.handler.error(
                        codes::E_PAR_UNEXPECTED_TOKEN,
                        "`go` requires a function call",
                        operand.span(),
                    );
                }
                let span = span.merge(operand.span());
                Some(Expr::Go(GoExpr {
                    call: Box::new(operand),
                    span,
                }))
            }
            TokenKind::LArrow => {
                self.advance();
                let channel = self.parse_expr_bp(bp::UNARY)?;
                let span = span.merge(channel.span());
                Some(Expr::Receive(ReceiveExpr {
                    channel: Box::new(channel),
                    span,
                }))
            }
            TokenKind::Yield => {
                self.advance();
                let delegate = self.eat(&TokenKind::Star);
                let argument = if starts_expression(&self.current()) {
                    Some(Box::new(self.parse_expr_bp(bp::UNARY)?))
                } else {
                    None
                };
                let end = argument
                    .as_ref()
                    .map(|a| a.span())
                    .unwrap_or(self.prev_span());
                Some(Expr::Yield(YieldExpr {
                    argument,
                    delegate,
                    span: span.merge(end),
                }))
            }
            other => {
                self.handler.error(
                    codes::E_PAR_UNEXPECTED_TOKEN,
                    format!("expected expression, found {}", other.describe()),
                    span,
                );
                None
            }
        }
    }

    fn parse_unary(&mut self, op: UnOp) -> Option<Expr> {
        let start = self.current_span();
        self.advance();
        let operand = self.parse_expr_bp(bp::UNARY)?;
        let span = start.merge(operand.span());
        Some(Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            span,
        }))
    }

    /// `new Callee(args)` - the callee is a member chain, so the argument
    /// list belongs to `new` rather than forming a call expression.
    fn parse_new(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(TokenKind::New)?;
        let mut callee = self.parse_prefix()?;
        loop {
            match self.current() {
                TokenKind::Dot => callee = self.parse_member(callee, false)?,
                TokenKind::LBracket => callee = self.parse_index(callee)?,
                _ => break,
            }
        }
        let args = if self.check(&TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        let span = start.merge(self.prev_span());
        Some(Expr::New(NewExpr {
            callee: Box::new(callee),
            args,
            span,
        }))
    }

    /// `chan T(cap)` channel construction.
    fn parse_chan(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(TokenKind::Chan)?;
        let elem_ty = if starts_type(&self.current()) {
            Some(self.parse_type_primary()?)
        } else {
            None
        };
        let capacity = if self.check(&TokenKind::LParen) {
            self.expect_lparen()?;
            let cap = self.parse_expr()?;
            self.expect_rparen()?;
            Some(Box::new(cap))
        } else {
            None
        };
        let span = start.merge(self.prev_span());
        Some(Expr::Chan(ChanExpr {
            elem_ty,
            capacity,
            span,
        }))
    }

    // ── Postfix position ─────────────────────────────────────────────────

    /// Parse a parenthesized argument list (the `(` is current).
    pub(crate) fn parse_args(&mut self) -> Option<Vec<Expr>> {
        self.expect_lparen()?;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_eof() {
            args.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_rparen()?;
        Some(args)
    }

    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        let args = self.parse_args()?;
        let span = callee.span().merge(self.prev_span());
        Some(Expr::Call(CallExpr {
            callee: Box::new(callee),
            args,
            span,
        }))
    }

    fn parse_index(&mut self, object: Expr) -> Option<Expr> {
        self.expect_lbracket()?;
        let index = self.parse_expr()?;
        self.expect_rbracket()?;
        let span = object.span().merge(self.prev_span());
        Some(Expr::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(index)),
            optional: false,
            span,
        }))
    }

    fn parse_member(&mut self, object: Expr, optional: bool) -> Option<Expr> {
        self.advance(); // `.` or `?.`
        let (name, name_span) = self.expect_ident("member name")?;
        // Hard-private members are only reachable through `this`.
        if name.as_str().starts_with('_') && !matches!(object, Expr::This(_)) {
            self.handler.error(
                codes::E_STRUCT_PRIVATE_ACCESS,
                format!("`{}` is private and only accessible through `this`", name),
                name_span,
            );
        }
        let span = object.span().merge(name_span);
        Some(Expr::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProp::Named(name),
            optional,
            span,
        }))
    }

    // ── Literals ─────────────────────────────────────────────────────────

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect_lbracket()?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.at_eof() {
            elements.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_rbracket()?;
        let span = start.merge(self.prev_span());
        Some(Expr::Array(ArrayLit { elements, span }))
    }

    fn parse_object_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(TokenKind::LBrace)?;
        let mut properties = Vec::new();
        loop {
            self.skip_stmt_separators();
            if self.check(&TokenKind::RBrace) || self.at_eof() {
                break;
            }
            let key_span = self.current_span();
            let key = match self.current() {
                TokenKind::Ident(name) => {
                    self.advance();
                    name
                }
                TokenKind::Str(value) => {
                    self.advance();
                    value
                }
                other => {
                    self.handler.error(
                        codes::E_PAR_EXPECTED_TOKEN,
                        format!("expected property name, found {}", other.describe()),
                        key_span,
                    );
                    return None;
                }
            };
            let value = if self.eat(&TokenKind::Colon) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let span = key_span.merge(self.prev_span());
            properties.push(ObjectProp { key, value, span });
            self.skip_stmt_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.skip_stmt_separators();
        self.expect(TokenKind::RBrace)?;
        let span = start.merge(self.prev_span());
        Some(Expr::Object(ObjectLit { properties, span }))
    }

    /// Build a template literal, re-lexing each `${...}` placeholder at
    /// its recorded origin so positions stay absolute.
    fn parse_template(&mut self, parts: Vec<TemplatePart>, span: Span) -> Expr {
        let mut elems = Vec::new();
        for part in parts {
            match part {
                TemplatePart::Chunk(text) => elems.push(TemplateElem::Chunk(text)),
                TemplatePart::Expr {
                    source,
                    offset,
                    line,
                    column,
                } => {
                    let mut lexer =
                        Lexer::with_origin(&source, self.handler, self.file_id, offset, line, column);
                    let mut tokens = Vec::new();
                    loop {
                        let token = lexer.next_token();
                        let done = token.kind == TokenKind::Eof;
                        tokens.push(token);
                        if done {
                            break;
                        }
                    }
                    let mut sub = Parser::new(tokens, self.handler, self.file_id);
                    // Placeholders behave like parenthesized contexts.
                    sub.group_depth = 1;
                    sub.class_depth = self.class_depth;
                    sub.fn_depth = self.fn_depth;
                    if let Some(expr) = sub.parse_expr() {
                        if !sub.at_eof() {
                            self.handler.error(
                                codes::E_PAR_UNEXPECTED_TOKEN,
                                "unexpected token in template placeholder",
                                sub.current_span(),
                            );
                        }
                        elems.push(TemplateElem::Expr(Box::new(expr)));
                    }
                }
            }
        }
        Expr::Template(TemplateLit { parts: elems, span })
    }

    // ── Arrow functions ──────────────────────────────────────────────────

    /// Speculatively parse `(params) => body` / `(params): T => body`,
    /// optionally prefixed with `async`. On failure the token cursor and
    /// the diagnostic count are restored, so a failed attempt leaks
    /// nothing; the caller then re-parses as a parenthesized expression.
    fn try_parse_arrow(&mut self) -> Option<Expr> {
        let saved_position = self.position;
        let saved_depth = self.group_depth;
        let mark = self.handler.checkpoint();
        let start = self.current_span();

        let result = self.parse_arrow_tail(start);
        if result.is_none() {
            self.position = saved_position;
            self.group_depth = saved_depth;
            self.handler.rollback(mark);
        }
        result
    }

    fn parse_arrow_tail(&mut self, start: Span) -> Option<Expr> {
        let is_async = self.eat(&TokenKind::Async);
        if !self.check(&TokenKind::LParen) {
            return None;
        }
        self.expect_lparen()?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_eof() {
            let (name, pspan) = self.expect_ident("parameter name")?;
            let ty = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param {
                name,
                ty,
                span: pspan,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_rparen()?;
        let return_ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        if !self.eat(&TokenKind::FatArrow) {
            return None;
        }

        // Committed to an arrow from here on.
        self.check_duplicate_params(&params);
        let body = if self.check(&TokenKind::LBrace) {
            let saved_loop = std::mem::replace(&mut self.loop_depth, 0);
            self.fn_depth += 1;
            let block = self.parse_block();
            self.fn_depth -= 1;
            self.loop_depth = saved_loop;
            ArrowBody::Block(block?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_expr_bp(bp::MIN)?))
        };
        let end = match &body {
            ArrowBody::Block(b) => b.span,
            ArrowBody::Expr(e) => e.span(),
        };
        Some(Expr::Arrow(ArrowFn {
            params,
            return_ty,
            body,
            is_async,
            span: start.merge(end),
        }))
    }
}

/// True for tokens that can begin a type annotation.
pub(crate) fn starts_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Nul
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::LParen
    )
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::Parser;
    use ljc_util::{FileId, Handler};

    /// Helper to parse a single expression statement.
    fn parse_expr_source(source: &str) -> (Option<Expr>, Handler) {
        let handler = Handler::new();
        let program = Parser::parse_source(source, &handler, FileId::DUMMY);
        let expr = program.statements.into_iter().next().and_then(|s| match s {
            Stmt::Expr(e) => Some(e.expr),
            _ => None,
        });
        (expr, handler)
    }

    fn expr_ok(source: &str) -> Expr {
        let (expr, handler) = parse_expr_source(source);
        assert!(
            !handler.has_errors(),
            "errors for {:?}: {:?}",
            source,
            handler.diagnostics()
        );
        expr.unwrap_or_else(|| panic!("no expression for {:?}", source))
    }

    fn assert_is_binary(expr: &Expr, op: BinOp) {
        match expr {
            Expr::Binary(b) => assert_eq!(b.op, op, "expected operator {:?}", op),
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    // =========================================================================
    // PRECEDENCE
    // =========================================================================

    #[test]
    fn test_precedence_mul_over_add() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = expr_ok("1 + 2 * 3");
        assert_is_binary(&expr, BinOp::Add);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.right, BinOp::Mul);
        }
    }

    #[test]
    fn test_precedence_pairs() {
        // One probe per adjacent level of the table in §bp.
        let cases: Vec<(&str, BinOp, BinOp)> = vec![
            // a lo b hi c => lo(a, hi(b, c))
            ("a || b && c", BinOp::Or, BinOp::And),
            ("a && b | c", BinOp::And, BinOp::BitOr),
            ("a | b ^ c", BinOp::BitOr, BinOp::BitXor),
            ("a ^ b & c", BinOp::BitXor, BinOp::BitAnd),
            ("a & b == c", BinOp::BitAnd, BinOp::Eq),
            ("a == b < c", BinOp::Eq, BinOp::Lt),
            ("a < b << c", BinOp::Lt, BinOp::Shl),
            ("a + b * c", BinOp::Add, BinOp::Mul),
            ("a * b ** c", BinOp::Mul, BinOp::Pow),
            ("a ?? b || c", BinOp::Nullish, BinOp::Or),
        ];
        for (source, outer, inner) in cases {
            let expr = expr_ok(source);
            assert_is_binary(&expr, outer);
            if let Expr::Binary(b) = &expr {
                assert_is_binary(&b.right, inner);
            }
        }
    }

    #[test]
    fn test_shift_binds_looser_than_additive() {
        // a + b << c parses as (a + b) << c
        let expr = expr_ok("a + b << c");
        assert_is_binary(&expr, BinOp::Shl);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Add);
        }
    }

    #[test]
    fn test_range_sits_between_shift_and_additive() {
        // a + b .. c + d parses as (a + b) .. (c + d)
        let expr = expr_ok("a + b .. c + d");
        match expr {
            Expr::Range(r) => {
                assert_is_binary(&r.start, BinOp::Add);
                assert_is_binary(&r.end, BinOp::Add);
                assert!(!r.inclusive);
            }
            other => panic!("expected range, got {:?}", other),
        }
    }

    #[test]
    fn test_inclusive_range() {
        let expr = expr_ok("1..=5");
        match expr {
            Expr::Range(r) => assert!(r.inclusive),
            other => panic!("expected range, got {:?}", other),
        }
    }

    // =========================================================================
    // ASSOCIATIVITY
    // =========================================================================

    #[test]
    fn test_left_associativity() {
        // a - b - c parses as (a - b) - c
        let expr = expr_ok("a - b - c");
        assert_is_binary(&expr, BinOp::Sub);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Sub);
        }
    }

    #[test]
    fn test_exponent_right_associativity() {
        // 2 ** 3 ** 2 parses as 2 ** (3 ** 2)
        let expr = expr_ok("2 ** 3 ** 2");
        assert_is_binary(&expr, BinOp::Pow);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.right, BinOp::Pow);
        }
    }

    #[test]
    fn test_assignment_right_associativity() {
        // a = b = c parses as a = (b = c)
        let expr = expr_ok("a = b = c");
        match expr {
            Expr::Assign(a) => assert!(matches!(*a.value, Expr::Assign(_))),
            other => panic!("expected assign, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assignment() {
        let expr = expr_ok("x **= 2");
        match expr {
            Expr::Assign(a) => assert_eq!(a.op, AssignOp::Pow),
            other => panic!("expected assign, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (_, handler) = parse_expr_source("1 + 2 = 3");
        assert!(handler.has_errors());
    }

    // =========================================================================
    // UNARY, CAST, TYPE CHECK
    // =========================================================================

    #[test]
    fn test_unary_chain() {
        let expr = expr_ok("!-~x");
        match expr {
            Expr::Unary(u) => assert_eq!(u.op, UnOp::Not),
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_cast_binds_tighter_than_multiplication() {
        // x of int * 2 parses as (x of int) * 2
        let expr = expr_ok("x of int * 2");
        assert_is_binary(&expr, BinOp::Mul);
        if let Expr::Binary(b) = &expr {
            assert!(matches!(*b.left, Expr::Cast(_)));
        }
    }

    #[test]
    fn test_is_at_comparison_level() {
        // v is int && ok parses as (v is int) && ok
        let expr = expr_ok("v is int && ok");
        assert_is_binary(&expr, BinOp::And);
        if let Expr::Binary(b) = &expr {
            assert!(matches!(*b.left, Expr::TypeCheck(_)));
        }
    }

    #[test]
    fn test_typeof_and_instanceof() {
        let expr = expr_ok("typeof x");
        assert!(matches!(expr, Expr::Unary(u) if u.op == UnOp::Typeof));
        let expr = expr_ok("a instanceof B");
        assert_is_binary(&expr, BinOp::Instanceof);
    }

    // =========================================================================
    // POSTFIX
    // =========================================================================

    #[test]
    fn test_call_index_member_chain() {
        let expr = expr_ok("obj.items[0].get(1, 2)");
        match expr {
            Expr::Call(c) => {
                assert_eq!(c.args.len(), 2);
                assert!(matches!(*c.callee, Expr::Member(_)));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_member() {
        let expr = expr_ok("a?.b");
        match expr {
            Expr::Member(m) => assert!(m.optional),
            other => panic!("expected member, got {:?}", other),
        }
    }

    #[test]
    fn test_new_expression() {
        let expr = expr_ok("new Point(1, 2)");
        match expr {
            Expr::New(n) => assert_eq!(n.args.len(), 2),
            other => panic!("expected new, got {:?}", other),
        }
    }

    #[test]
    fn test_new_member_callee() {
        // new ns.Point(1) - the argument list belongs to new
        let expr = expr_ok("new ns.Point(1)");
        match expr {
            Expr::New(n) => {
                assert_eq!(n.args.len(), 1);
                assert!(matches!(*n.callee, Expr::Member(_)));
            }
            other => panic!("expected new, got {:?}", other),
        }
    }

    // =========================================================================
    // ARROWS
    // =========================================================================

    #[test]
    fn test_arrow_function() {
        let expr = expr_ok("(a, b) => a + b");
        match expr {
            Expr::Arrow(f) => {
                assert_eq!(f.params.len(), 2);
                assert!(matches!(f.body, ArrowBody::Expr(_)));
            }
            other => panic!("expected arrow, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_arrow_with_block() {
        let expr = expr_ok("(x: int): int => { return x * 2 }");
        match expr {
            Expr::Arrow(f) => {
                assert!(f.return_ty.is_some());
                assert!(matches!(f.body, ArrowBody::Block(_)));
            }
            other => panic!("expected arrow, got {:?}", other),
        }
    }

    #[test]
    fn test_async_arrow() {
        let expr = expr_ok("async (x) => await x");
        match expr {
            Expr::Arrow(f) => assert!(f.is_async),
            other => panic!("expected arrow, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_arrow_leaves_no_diagnostics() {
        // Looks like it could be an arrow until `+`; must backtrack
        // cleanly and parse as a parenthesized expression.
        let (expr, handler) = parse_expr_source("(a) + 1");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert_is_binary(&expr.unwrap(), BinOp::Add);
    }

    // =========================================================================
    // TERNARY AND NULLISH
    // =========================================================================

    #[test]
    fn test_ternary() {
        let expr = expr_ok("a ? b : c");
        assert!(matches!(expr, Expr::Ternary(_)));
    }

    #[test]
    fn test_ternary_chains_rightward() {
        let expr = expr_ok("a ? b : c ? d : e");
        match expr {
            Expr::Ternary(t) => assert!(matches!(*t.alternate, Expr::Ternary(_))),
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    // =========================================================================
    // LITERALS
    // =========================================================================

    #[test]
    fn test_array_and_object_literals() {
        let expr = expr_ok("[1, 2, 3]");
        assert!(matches!(expr, Expr::Array(a) if a.elements.len() == 3));

        let expr = expr_ok("({x: 1, y, \"k\": 2})");
        match expr {
            Expr::Object(o) => {
                assert_eq!(o.properties.len(), 3);
                assert!(o.properties[1].value.is_none()); // shorthand
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_template_literal() {
        let expr = expr_ok("\"sum: ${1 + 2}!\"");
        match expr {
            Expr::Template(t) => {
                assert_eq!(t.parts.len(), 3);
                match &t.parts[1] {
                    TemplateElem::Expr(e) => assert!(matches!(**e, Expr::Binary(_))),
                    other => panic!("expected expr part, got {:?}", other),
                }
            }
            other => panic!("expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_yield_forms() {
        let handler = Handler::new();
        let program = Parser::parse_source("fn g() { yield* xs }", &handler, FileId::DUMMY);
        assert!(!handler.has_errors());
        match &program.statements[0] {
            Stmt::Fn(f) => match &f.body.statements[0] {
                Stmt::Expr(e) => match &e.expr {
                    Expr::Yield(y) => assert!(y.delegate),
                    other => panic!("expected yield, got {:?}", other),
                },
                other => panic!("expected expr stmt, got {:?}", other),
            },
            other => panic!("expected fn, got {:?}", other),
        }
    }
}
