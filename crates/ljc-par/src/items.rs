//! Declaration parsing - functions, classes, enums, type aliases, modules.

use ljc_lex::TokenKind;
use ljc_util::diagnostic::codes;
use ljc_util::Symbol;
use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    // ── Functions ────────────────────────────────────────────────────────

    pub(crate) fn parse_fn_stmt(&mut self, is_async: bool) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Fn)?;
        let (name, _) = self.expect_ident("function name")?;
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let return_ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_fn_body(false)?;
        let span = start.merge(self.prev_span());
        Some(Stmt::Fn(FnDecl {
            name,
            type_params,
            params,
            return_ty,
            body,
            is_async,
            span,
        }))
    }

    /// `<T, U>` generic parameter list, empty when absent.
    pub(crate) fn parse_type_params(&mut self) -> Option<Vec<Symbol>> {
        let mut type_params = Vec::new();
        if self.eat(&TokenKind::Lt) {
            loop {
                let (name, _) = self.expect_ident("type parameter")?;
                type_params.push(name);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt)?;
        }
        Some(type_params)
    }

    /// Parenthesized parameter list with duplicate-name checking.
    pub(crate) fn parse_params(&mut self) -> Option<Vec<Param>> {
        self.expect_lparen()?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_eof() {
            let (name, span) = self.expect_ident("parameter name")?;
            let ty = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param { name, ty, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_rparen()?;
        self.check_duplicate_params(&params);
        Some(params)
    }

    /// Report `duplicate_parameter` for every repeated name.
    pub(crate) fn check_duplicate_params(&mut self, params: &[Param]) {
        let mut seen = FxHashSet::default();
        for param in params {
            if !seen.insert(param.name) {
                self.handler.error(
                    codes::E_PAR_DUPLICATE_PARAMETER,
                    format!("duplicate parameter name `{}`", param.name),
                    param.span,
                );
            }
        }
    }

    // ── Classes ──────────────────────────────────────────────────────────

    pub(crate) fn parse_class_stmt(&mut self, is_abstract: bool) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Class)?;
        let (name, _) = self.expect_ident("class name")?;
        let type_params = self.parse_type_params()?;

        let superclass = if self.eat(&TokenKind::Extends) {
            Some(self.expect_ident("superclass name")?.0)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.eat(&TokenKind::Implements) {
            loop {
                implements.push(self.expect_ident("interface name")?.0);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::LBrace)?;
        self.class_depth += 1;
        let mut members = Vec::new();
        loop {
            self.skip_stmt_separators();
            if self.check(&TokenKind::RBrace) || self.at_eof() {
                break;
            }
            let before = self.position;
            match self.parse_class_member() {
                Some(member) => members.push(member),
                None => {
                    self.synchronize();
                    if self.position == before {
                        self.advance();
                    }
                }
            }
        }
        self.class_depth -= 1;
        self.expect(TokenKind::RBrace)?;

        let span = start.merge(self.prev_span());
        Some(Stmt::Class(ClassDecl {
            name,
            is_abstract,
            type_params,
            superclass,
            implements,
            members,
            decorators: Vec::new(),
            span,
        }))
    }

    fn parse_class_member(&mut self) -> Option<ClassMember> {
        let start = self.current_span();
        let modifiers = self.parse_member_modifiers();

        let (name, _) = self.expect_ident("member name")?;

        let kind = if self.check(&TokenKind::LParen) || self.check(&TokenKind::Lt) {
            // Method or constructor.
            let type_params = self.parse_type_params()?;
            let params = self.parse_params()?;
            let return_ty = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            let body = self.parse_fn_body(true)?;
            if name.as_str() == "constructor" {
                MemberKind::Constructor { params, body }
            } else {
                MemberKind::Method {
                    type_params,
                    params,
                    return_ty,
                    body,
                }
            }
        } else {
            // Field.
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
            self.expect_terminator();
            MemberKind::Field { ty, init }
        };

        let span = start.merge(self.prev_span());
        Some(ClassMember {
            name,
            kind,
            modifiers,
            decorators: Vec::new(),
            span,
        })
    }

    /// Collect member modifiers, reporting duplicates.
    fn parse_member_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        let mut seen: FxHashSet<&'static str> = FxHashSet::default();
        loop {
            let key = match self.current() {
                TokenKind::Public => {
                    modifiers.visibility = Visibility::Public;
                    "visibility"
                }
                TokenKind::Private => {
                    modifiers.visibility = Visibility::Private;
                    "visibility"
                }
                TokenKind::Protected => {
                    modifiers.visibility = Visibility::Protected;
                    "visibility"
                }
                TokenKind::Static => {
                    modifiers.is_static = true;
                    "static"
                }
                TokenKind::Abstract => {
                    modifiers.is_abstract = true;
                    "abstract"
                }
                TokenKind::Readonly => {
                    modifiers.is_readonly = true;
                    "readonly"
                }
                TokenKind::Async => {
                    modifiers.is_async = true;
                    "async"
                }
                _ => return modifiers,
            };
            if !seen.insert(key) {
                self.handler.error(
                    codes::E_STRUCT_DUPLICATE_MODIFIER,
                    format!("duplicate `{}` modifier", self.current().describe()),
                    self.current_span(),
                );
            }
            self.advance();
        }
    }

    // ── Enums and type aliases ───────────────────────────────────────────

    pub(crate) fn parse_enum_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Enum)?;
        let (name, _) = self.expect_ident("enum name")?;
        self.expect(TokenKind::LBrace)?;
        let mut variants = Vec::new();
        loop {
            self.skip_stmt_separators();
            if self.check(&TokenKind::RBrace) || self.at_eof() {
                break;
            }
            let vspan = self.current_span();
            let (vname, _) = self.expect_ident("enum variant")?;
            let value = if self.eat(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            variants.push(EnumVariant {
                name: vname,
                value,
                span: vspan.merge(self.prev_span()),
            });
            self.skip_stmt_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.skip_stmt_separators();
        self.expect(TokenKind::RBrace)?;
        let span = start.merge(self.prev_span());
        Some(Stmt::Enum(EnumDecl {
            name,
            variants,
            span,
        }))
    }

    pub(crate) fn parse_type_alias_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Type)?;
        let (name, _) = self.expect_ident("type name")?;
        let type_params = self.parse_type_params()?;
        self.expect(TokenKind::Eq)?;
        let ty = self.parse_type()?;
        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Some(Stmt::TypeAlias(TypeAlias {
            name,
            type_params,
            ty,
            span,
        }))
    }

    // ── Modules ──────────────────────────────────────────────────────────

    pub(crate) fn parse_import_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Import)?;

        let mut specifiers = Vec::new();
        match self.current() {
            TokenKind::Star => {
                self.advance();
                self.expect(TokenKind::As)?;
                let (name, _) = self.expect_ident("namespace alias")?;
                specifiers.push(ImportSpecifier::Namespace(name));
            }
            TokenKind::LBrace => {
                self.parse_named_import_list(&mut specifiers)?;
            }
            TokenKind::Ident(name) => {
                self.advance();
                specifiers.push(ImportSpecifier::Default(name));
                if self.eat(&TokenKind::Comma) {
                    if self.check(&TokenKind::LBrace) {
                        self.parse_named_import_list(&mut specifiers)?;
                    } else {
                        self.expect(TokenKind::Star)?;
                        self.expect(TokenKind::As)?;
                        let (ns, _) = self.expect_ident("namespace alias")?;
                        specifiers.push(ImportSpecifier::Namespace(ns));
                    }
                }
            }
            other => {
                self.handler.error(
                    codes::E_PAR_EXPECTED_TOKEN,
                    format!("expected import specifier, found {}", other.describe()),
                    self.current_span(),
                );
                return None;
            }
        }

        self.expect(TokenKind::From)?;
        let source = self.expect_str("module path string")?;
        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Some(Stmt::Import(ImportDecl {
            specifiers,
            source,
            span,
        }))
    }

    fn parse_named_import_list(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> Option<()> {
        self.expect(TokenKind::LBrace)?;
        loop {
            self.skip_stmt_separators();
            if self.check(&TokenKind::RBrace) || self.at_eof() {
                break;
            }
            let (name, _) = self.expect_ident("import name")?;
            let alias = if self.eat(&TokenKind::As) {
                Some(self.expect_ident("import alias")?.0)
            } else {
                None
            };
            specifiers.push(ImportSpecifier::Named { name, alias });
            self.skip_stmt_separators();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.skip_stmt_separators();
        self.expect(TokenKind::RBrace)?;
        Some(())
    }

    pub(crate) fn parse_export_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect(TokenKind::Export)?;

        let kind = match self.current() {
            TokenKind::Default => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect_terminator();
                ExportKind::Default(expr)
            }
            TokenKind::LBrace => {
                let mut specifiers = Vec::new();
                self.expect(TokenKind::LBrace)?;
                loop {
                    self.skip_stmt_separators();
                    if self.check(&TokenKind::RBrace) || self.at_eof() {
                        break;
                    }
                    let (name, _) = self.expect_ident("export name")?;
                    let alias = if self.eat(&TokenKind::As) {
                        Some(self.expect_ident("export alias")?.0)
                    } else {
                        None
                    };
                    specifiers.push(ExportSpecifier { name, alias });
                    self.skip_stmt_separators();
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.skip_stmt_separators();
                self.expect(TokenKind::RBrace)?;
                let source = if self.eat(&TokenKind::From) {
                    Some(self.expect_str("module path string")?)
                } else {
                    None
                };
                self.expect_terminator();
                ExportKind::Named { specifiers, source }
            }
            TokenKind::Const | TokenKind::Mut => {
                ExportKind::Declaration(Box::new(self.parse_var_decl(true)?))
            }
            TokenKind::Fn => ExportKind::Declaration(Box::new(self.parse_fn_stmt(false)?)),
            TokenKind::Async if self.peek() == TokenKind::Fn => {
                self.advance();
                ExportKind::Declaration(Box::new(self.parse_fn_stmt(true)?))
            }
            TokenKind::Class => ExportKind::Declaration(Box::new(self.parse_class_stmt(false)?)),
            TokenKind::Abstract if self.peek() == TokenKind::Class => {
                self.advance();
                ExportKind::Declaration(Box::new(self.parse_class_stmt(true)?))
            }
            TokenKind::Enum => ExportKind::Declaration(Box::new(self.parse_enum_stmt()?)),
            TokenKind::Type => ExportKind::Declaration(Box::new(self.parse_type_alias_stmt()?)),
            other => {
                self.handler.error(
                    codes::E_STRUCT_EXPORT_WITHOUT_TARGET,
                    format!("`export` requires a declaration, found {}", other.describe()),
                    self.current_span(),
                );
                return None;
            }
        };

        let span = start.merge(self.prev_span());
        Some(Stmt::Export(ExportDecl { kind, span }))
    }
}
