//! Type annotation parsing.
//!
//! Annotations are recorded, not validated. Union (`A | B`) binds loosest,
//! then intersection (`A & B`), then the primaries: names, generic
//! instantiations, `[T]` arrays, `{...}` maps/objects, and parenthesized
//! tuple/function types.
//!
//! The braced form is ambiguous between a map and an object. The rule: a
//! single `key: V` entry whose key names a primitive (`int`, `float`,
//! `str`, `bool`, `nul`) and has no `?` marker is a map; everything else
//! is an object type.

use ljc_lex::TokenKind;
use ljc_util::diagnostic::codes;
use ljc_util::Symbol;

use crate::ast::*;
use crate::Parser;

const PRIMITIVE_TYPE_NAMES: [&str; 5] = ["int", "float", "str", "bool", "nul"];

impl<'a> Parser<'a> {
    /// Parse a full type annotation (handles `|` and `&`).
    pub(crate) fn parse_type(&mut self) -> Option<TypeAnn> {
        let first = self.parse_type_intersection()?;
        if !self.check(&TokenKind::Pipe) {
            return Some(first);
        }
        let start = first.span();
        let mut members = vec![first];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_type_intersection()?);
        }
        let span = start.merge(self.prev_span());
        Some(TypeAnn::Union(UnionType { members, span }))
    }

    fn parse_type_intersection(&mut self) -> Option<TypeAnn> {
        let first = self.parse_type_primary()?;
        if !self.check(&TokenKind::Amp) {
            return Some(first);
        }
        let start = first.span();
        let mut members = vec![first];
        while self.eat(&TokenKind::Amp) {
            members.push(self.parse_type_primary()?);
        }
        let span = start.merge(self.prev_span());
        Some(TypeAnn::Intersection(IntersectionType { members, span }))
    }

    /// Parse a primary (non-composite) type.
    pub(crate) fn parse_type_primary(&mut self) -> Option<TypeAnn> {
        let span = self.current_span();
        match self.current() {
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::Lt) {
                    self.advance();
                    let mut args = Vec::new();
                    loop {
                        args.push(self.parse_type()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect_type_gt()?;
                    let span = span.merge(self.prev_span());
                    Some(TypeAnn::Generic(GenericType {
                        base: name,
                        args,
                        span,
                    }))
                } else {
                    Some(TypeAnn::Simple(SimpleType { name, span }))
                }
            }
            // `nul` is a keyword but also a type name in unions like `str | nul`.
            TokenKind::Nul => {
                self.advance();
                Some(TypeAnn::Simple(SimpleType {
                    name: Symbol::intern("nul"),
                    span,
                }))
            }
            TokenKind::LBracket => {
                self.expect_lbracket()?;
                let element = self.parse_type()?;
                let size = if self.eat(&TokenKind::Semicolon) {
                    match self.current() {
                        TokenKind::Int(n) if n >= 0 => {
                            self.advance();
                            Some(n as u64)
                        }
                        other => {
                            self.handler.error(
                                codes::E_PAR_EXPECTED_TOKEN,
                                format!("expected array size, found {}", other.describe()),
                                self.current_span(),
                            );
                            return None;
                        }
                    }
                } else {
                    None
                };
                self.expect_rbracket()?;
                let span = span.merge(self.prev_span());
                Some(TypeAnn::Array(ArrayType {
                    element: Box::new(element),
                    size,
                    span,
                }))
            }
            TokenKind::LBrace => self.parse_braced_type(span),
            TokenKind::LParen => {
                self.expect_lparen()?;
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RParen) && !self.at_eof() {
                    elements.push(self.parse_type()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_rparen()?;
                if self.eat(&TokenKind::Arrow) {
                    let ret = self.parse_type()?;
                    let span = span.merge(self.prev_span());
                    return Some(TypeAnn::Function(FunctionType {
                        params: elements,
                        ret: Box::new(ret),
                        span,
                    }));
                }
                let span = span.merge(self.prev_span());
                if elements.len() == 1 {
                    // `(T)` is just parenthesized, not a 1-tuple.
                    return elements.into_iter().next();
                }
                Some(TypeAnn::Tuple(TupleType { elements, span }))
            }
            other => {
                self.handler.error(
                    codes::E_PAR_EXPECTED_TOKEN,
                    format!("expected type, found {}", other.describe()),
                    span,
                );
                None
            }
        }
    }

    /// Close a generic argument list. `>>` ends two nested lists at once
    /// (the lexer munches it as a shift), so split it into two `>`.
    fn expect_type_gt(&mut self) -> Option<()> {
        if self.eat(&TokenKind::Gt) {
            return Some(());
        }
        if self.check(&TokenKind::Shr) {
            let index = self.peek_index();
            self.tokens[index].kind = TokenKind::Gt;
            return Some(());
        }
        self.expect(TokenKind::Gt).map(|_| ())
    }

    /// `{...}` - map type or object type, per the module-level rule.
    fn parse_braced_type(&mut self, start: ljc_util::Span) -> Option<TypeAnn> {
        self.expect(TokenKind::LBrace)?;
        let mut fields: Vec<ObjectTypeField> = Vec::new();
        loop {
            self.skip_stmt_separators();
            if self.check(&TokenKind::RBrace) || self.at_eof() {
                break;
            }
            let fspan = self.current_span();
            let name = match self.current() {
                TokenKind::Ident(name) => {
                    self.advance();
                    name
                }
                TokenKind::Nul => {
                    self.advance();
                    Symbol::intern("nul")
                }
                other => {
                    self.handler.error(
                        codes::E_PAR_EXPECTED_TOKEN,
                        format!("expected field name, found {}", other.describe()),
                        fspan,
                    );
                    return None;
                }
            };
            // `name?: T` lexes the marker either as `?:` or as `?` `:`.
            let optional = if self.eat(&TokenKind::QuestionColon) {
                true
            } else {
                let optional = self.eat(&TokenKind::Question);
                self.expect(TokenKind::Colon)?;
                optional
            };
            let ty = self.parse_type()?;
            fields.push(ObjectTypeField {
                name,
                ty,
                optional,
                span: fspan.merge(self.prev_span()),
            });
            self.skip_stmt_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.skip_stmt_separators();
        self.expect(TokenKind::RBrace)?;
        let span = start.merge(self.prev_span());

        if fields.len() == 1
            && !fields[0].optional
            && PRIMITIVE_TYPE_NAMES.contains(&fields[0].name.as_str())
        {
            let field = fields.into_iter().next().unwrap();
            let key_span = field.span;
            return Some(TypeAnn::Map(MapType {
                key: Box::new(TypeAnn::Simple(SimpleType {
                    name: field.name,
                    span: key_span,
                })),
                value: Box::new(field.ty),
                span,
            }));
        }

        Some(TypeAnn::Object(ObjectType { fields, span }))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::Parser;
    use ljc_util::{FileId, Handler};

    /// Parse `mut x: <ty>` and extract the annotation.
    fn parse_type_source(source: &str) -> (Option<TypeAnn>, Handler) {
        let handler = Handler::new();
        let program = Parser::parse_source(
            &format!("mut x: {}", source),
            &handler,
            FileId::DUMMY,
        );
        let ty = program.statements.into_iter().next().and_then(|s| match s {
            Stmt::Var(v) => v.ty,
            _ => None,
        });
        (ty, handler)
    }

    fn type_ok(source: &str) -> TypeAnn {
        let (ty, handler) = parse_type_source(source);
        assert!(
            !handler.has_errors(),
            "errors for {:?}: {:?}",
            source,
            handler.diagnostics()
        );
        ty.unwrap_or_else(|| panic!("no type for {:?}", source))
    }

    #[test]
    fn test_simple_and_generic() {
        assert!(matches!(type_ok("int"), TypeAnn::Simple(_)));
        match type_ok("Map<str, int>") {
            TypeAnn::Generic(g) => {
                assert_eq!(g.base.as_str(), "Map");
                assert_eq!(g.args.len(), 2);
            }
            other => panic!("expected generic, got {:?}", other),
        }
    }

    #[test]
    fn test_array_types() {
        match type_ok("[int]") {
            TypeAnn::Array(a) => assert!(a.size.is_none()),
            other => panic!("expected array, got {:?}", other),
        }
        match type_ok("[int; 4]") {
            TypeAnn::Array(a) => assert_eq!(a.size, Some(4)),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_map_vs_object() {
        assert!(matches!(type_ok("{str: int}"), TypeAnn::Map(_)));
        assert!(matches!(type_ok("{name: str}"), TypeAnn::Object(_)));
        match type_ok("{name: str, age?: int}") {
            TypeAnn::Object(o) => {
                assert_eq!(o.fields.len(), 2);
                assert!(o.fields[1].optional);
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_tuple_and_function() {
        match type_ok("(int, str)") {
            TypeAnn::Tuple(t) => assert_eq!(t.elements.len(), 2),
            other => panic!("expected tuple, got {:?}", other),
        }
        match type_ok("(int, int) -> int") {
            TypeAnn::Function(f) => assert_eq!(f.params.len(), 2),
            other => panic!("expected function, got {:?}", other),
        }
        // Parenthesized single type is not a 1-tuple.
        assert!(matches!(type_ok("(int)"), TypeAnn::Simple(_)));
    }

    #[test]
    fn test_union_and_intersection() {
        match type_ok("str | nul") {
            TypeAnn::Union(u) => assert_eq!(u.members.len(), 2),
            other => panic!("expected union, got {:?}", other),
        }
        match type_ok("A & B | C") {
            // `&` binds tighter: (A & B) | C
            TypeAnn::Union(u) => {
                assert_eq!(u.members.len(), 2);
                assert!(matches!(u.members[0], TypeAnn::Intersection(_)));
            }
            other => panic!("expected union, got {:?}", other),
        }
    }
}
