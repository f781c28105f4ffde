//! Pattern parsing for `when` arms.
//!
//! Grammar: literals match by value, identifiers bind, `n is T` is a
//! type-test binding, `[a, b]` and `{k: p}` are structural, `a | b` is an
//! or-pattern, and `else` matches anything. Comma-separated pattern lists
//! are not a thing; `|` is the only combinator.

use ljc_lex::TokenKind;
use ljc_util::diagnostic::codes;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse a pattern, including `|` or-patterns.
    pub(crate) fn parse_pattern(&mut self) -> Option<Pattern> {
        let first = self.parse_pattern_primary()?;
        if !self.check(&TokenKind::Pipe) {
            return Some(first);
        }

        let start = first.span();
        let mut alternatives = vec![first];
        while self.eat(&TokenKind::Pipe) {
            alternatives.push(self.parse_pattern_primary()?);
        }

        // Bindings inside alternatives would be conditionally bound;
        // reject them instead of guessing a semantics.
        for alt in &alternatives {
            if pattern_binds(alt) {
                self.handler.error(
                    codes::E_PAR_INVALID_PATTERN,
                    "or-pattern alternatives may not contain bindings",
                    alt.span(),
                );
            }
        }

        let span = start.merge(self.prev_span());
        Some(Pattern::Or(OrPattern {
            alternatives,
            span,
        }))
    }

    fn parse_pattern_primary(&mut self) -> Option<Pattern> {
        let span = self.current_span();
        match self.current() {
            TokenKind::Int(value) => {
                self.advance();
                Some(Pattern::Literal(LiteralPattern {
                    value: PatternLiteral::Int(value),
                    span,
                }))
            }
            TokenKind::Float(value) => {
                self.advance();
                Some(Pattern::Literal(LiteralPattern {
                    value: PatternLiteral::Float(value),
                    span,
                }))
            }
            TokenKind::Minus => {
                // Negative numeric literal.
                self.advance();
                let span = span.merge(self.current_span());
                match self.current() {
                    TokenKind::Int(value) => {
                        self.advance();
                        Some(Pattern::Literal(LiteralPattern {
                            value: PatternLiteral::Int(-value),
                            span,
                        }))
                    }
                    TokenKind::Float(value) => {
                        self.advance();
                        Some(Pattern::Literal(LiteralPattern {
                            value: PatternLiteral::Float(-value),
                            span,
                        }))
                    }
                    other => {
                        self.handler.error(
                            codes::E_PAR_INVALID_PATTERN,
                            format!("expected numeric literal after `-`, found {}", other.describe()),
                            span,
                        );
                        None
                    }
                }
            }
            TokenKind::Str(value) => {
                self.advance();
                Some(Pattern::Literal(LiteralPattern {
                    value: PatternLiteral::Str(value),
                    span,
                }))
            }
            TokenKind::True => {
                self.advance();
                Some(Pattern::Literal(LiteralPattern {
                    value: PatternLiteral::Bool(true),
                    span,
                }))
            }
            TokenKind::False => {
                self.advance();
                Some(Pattern::Literal(LiteralPattern {
                    value: PatternLiteral::Bool(false),
                    span,
                }))
            }
            TokenKind::Nul => {
                self.advance();
                Some(Pattern::Literal(LiteralPattern {
                    value: PatternLiteral::Nul,
                    span,
                }))
            }
            TokenKind::Else => {
                self.advance();
                Some(Pattern::Else(ElsePattern { span }))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.eat(&TokenKind::Is) {
                    let ty = self.parse_type()?;
                    let span = span.merge(self.prev_span());
                    Some(Pattern::TypeTest(TypeTestPattern { name, ty, span }))
                } else {
                    Some(Pattern::Binding(BindingPattern { name, span }))
                }
            }
            TokenKind::LBracket => {
                self.expect_lbracket()?;
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RBracket) && !self.at_eof() {
                    elements.push(self.parse_pattern()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_rbracket()?;
                let span = span.merge(self.prev_span());
                Some(Pattern::Array(ArrayPattern { elements, span }))
            }
            TokenKind::LBrace => {
                self.expect(TokenKind::LBrace)?;
                let mut fields = Vec::new();
                loop {
                    self.skip_stmt_separators();
                    if self.check(&TokenKind::RBrace) || self.at_eof() {
                        break;
                    }
                    let fspan = self.current_span();
                    let (key, _) = self.expect_ident("field name")?;
                    let pattern = if self.eat(&TokenKind::Colon) {
                        self.parse_pattern()?
                    } else {
                        // `{x}` shorthand binds the field to its own name.
                        Pattern::Binding(BindingPattern { name: key, span: fspan })
                    };
                    fields.push(FieldPattern {
                        key,
                        pattern,
                        span: fspan.merge(self.prev_span()),
                    });
                    self.skip_stmt_separators();
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.skip_stmt_separators();
                self.expect(TokenKind::RBrace)?;
                let span = span.merge(self.prev_span());
                Some(Pattern::Object(ObjectPattern { fields, span }))
            }
            other => {
                self.handler.error(
                    codes::E_PAR_INVALID_PATTERN,
                    format!("invalid pattern: {}", other.describe()),
                    span,
                );
                None
            }
        }
    }
}

/// True when the pattern introduces at least one binding.
fn pattern_binds(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Binding(_) | Pattern::TypeTest(_) => true,
        Pattern::Array(a) => a.elements.iter().any(pattern_binds),
        Pattern::Object(o) => o.fields.iter().any(|f| pattern_binds(&f.pattern)),
        Pattern::Or(o) => o.alternatives.iter().any(pattern_binds),
        Pattern::Literal(_) | Pattern::Else(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::Parser;
    use ljc_util::{FileId, Handler};

    /// Parse a `when` statement and return its arms.
    fn parse_arms(source: &str) -> (Vec<WhenArm>, Handler) {
        let handler = Handler::new();
        let program = Parser::parse_source(source, &handler, FileId::DUMMY);
        let arms = program
            .statements
            .into_iter()
            .find_map(|s| match s {
                Stmt::When(w) => Some(w.arms),
                _ => None,
            })
            .unwrap_or_default();
        (arms, handler)
    }

    #[test]
    fn test_spec_example_arms() {
        let (arms, handler) = parse_arms(
            "when (v) { 1 | 2 => \"a\", n is int where n > 10 => \"b\", else => \"c\" }",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert_eq!(arms.len(), 3);

        match &arms[0].pattern {
            Pattern::Or(o) => assert_eq!(o.alternatives.len(), 2),
            other => panic!("expected or-pattern, got {:?}", other),
        }
        match &arms[1].pattern {
            Pattern::TypeTest(t) => assert_eq!(t.name.as_str(), "n"),
            other => panic!("expected type-test, got {:?}", other),
        }
        assert!(arms[1].guard.is_some());
        assert!(matches!(arms[2].pattern, Pattern::Else(_)));
    }

    #[test]
    fn test_structural_patterns() {
        let (arms, handler) =
            parse_arms("when (v) { [1, x] => x, {kind: \"a\", n} => n, else => 0 }");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        match &arms[0].pattern {
            Pattern::Array(a) => {
                assert_eq!(a.elements.len(), 2);
                assert!(matches!(a.elements[1], Pattern::Binding(_)));
            }
            other => panic!("expected array pattern, got {:?}", other),
        }
        match &arms[1].pattern {
            Pattern::Object(o) => {
                assert_eq!(o.fields.len(), 2);
                assert!(matches!(o.fields[0].pattern, Pattern::Literal(_)));
                // shorthand binds to its own name
                assert!(matches!(o.fields[1].pattern, Pattern::Binding(_)));
            }
            other => panic!("expected object pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_literal_pattern() {
        let (arms, handler) = parse_arms("when (v) { -1 => \"neg\", else => \"other\" }");
        assert!(!handler.has_errors());
        match &arms[0].pattern {
            Pattern::Literal(l) => assert_eq!(l.value, PatternLiteral::Int(-1)),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_or_pattern_with_binding_is_invalid() {
        let (_, handler) = parse_arms("when (v) { 1 | x => x, else => 0 }");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.code == ljc_util::diagnostic::codes::E_PAR_INVALID_PATTERN));
    }

    #[test]
    fn test_nul_pattern() {
        let (arms, handler) = parse_arms("when (v) { nul => \"n\", else => \"o\" }");
        assert!(!handler.has_errors());
        assert!(matches!(
            &arms[0].pattern,
            Pattern::Literal(LiteralPattern {
                value: PatternLiteral::Nul,
                ..
            })
        ));
    }
}
