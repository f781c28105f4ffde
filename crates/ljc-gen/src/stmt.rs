//! Statement emission, including the defer and using lowerings.

use ljc_par::ast::*;
use ljc_util::diagnostic::codes;
use rustc_hash::FxHashSet;

use crate::resolve::ResolveImport;
use crate::scan::{block_contains, expr_contains, Needle};
use crate::Generator;

impl<'a> Generator<'a> {
    pub(crate) fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var(v) => self.emit_var(v, false),
            Stmt::Fn(f) => self.emit_fn(f, false),
            Stmt::Class(c) => self.emit_class(c, false),
            Stmt::Enum(e) => self.emit_enum(e, false),
            // Type aliases are type-level only; nothing to emit.
            Stmt::TypeAlias(_) => {}
            Stmt::Expr(e) => self.emit_expr_stmt(&e.expr),
            Stmt::If(i) => self.emit_if(i),
            Stmt::For(f) => self.emit_for(f),
            Stmt::While(w) => {
                let cond = self.expr_str(&w.condition);
                self.out.open(&format!("while ({}) {{", cond));
                self.emit_block_stmts(&w.body);
                self.out.close("}");
            }
            Stmt::DoWhile(d) => {
                self.out.open("do {");
                self.emit_block_stmts(&d.body);
                let cond = self.expr_str(&d.condition);
                self.out.close(&format!("}} while ({});", cond));
            }
            Stmt::When(w) => self.emit_when_stmt(w),
            Stmt::Return(r) => match &r.value {
                Some(value) => {
                    let v = self.expr_str(value);
                    self.out.line(&format!("return {};", v));
                }
                None => self.out.line("return;"),
            },
            Stmt::Break(b) => {
                // Blocks-as-expressions put a value slot in the AST, but
                // no surface construct consumes it.
                if b.value.is_some() {
                    self.handler.warning(
                        codes::W_BREAK_VALUE,
                        "`break` value is ignored in loop context",
                        b.span,
                    );
                }
                self.out.line("break;");
            }
            Stmt::Continue(_) => self.out.line("continue;"),
            Stmt::Throw(t) => {
                let v = self.expr_str(&t.value);
                self.out.line(&format!("throw {};", v));
            }
            Stmt::Try(t) => self.emit_try(t),
            Stmt::Import(i) => self.emit_import(i),
            Stmt::Export(e) => self.emit_export(e),
            Stmt::Block(b) => {
                self.out.open("{");
                self.emit_block_stmts(b);
                self.out.close("}");
            }
            Stmt::Defer(d) => self.emit_defer(d),
            Stmt::Using(u) => self.emit_using(u),
        }
    }

    pub(crate) fn emit_block_stmts(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.emit_stmt(stmt);
        }
    }

    fn emit_expr_stmt(&mut self, expr: &Expr) {
        // A send in statement position is the one place `<-` means send.
        if let Expr::Send(s) = expr {
            let channel = self.expr_str(&s.channel);
            let value = self.expr_str(&s.value);
            self.out
                .line(&format!("await {}.send({});", channel, value));
            return;
        }
        let text = self.expr_str(expr);
        self.out.line(&format!("{};", text));
    }

    // ── Declarations ─────────────────────────────────────────────────────

    pub(crate) fn emit_var(&mut self, v: &VarDecl, exported: bool) {
        self.check_declared_name(v.name, v.span);
        let prefix = if exported { "export " } else { "" };
        match (&v.kind, &v.init) {
            (VarKind::Const, Some(init)) => {
                let value = self.expr_str(init);
                self.out
                    .line(&format!("{}const {} = {};", prefix, v.name, value));
            }
            (VarKind::Mut, Some(init)) => {
                let value = self.expr_str(init);
                self.out
                    .line(&format!("{}let {} = {};", prefix, v.name, value));
            }
            // `const` without init was already diagnosed by the parser;
            // fall back to a mutable slot so the artifact stays parseable.
            (_, None) => self.out.line(&format!("{}let {};", prefix, v.name)),
        }
    }

    /// Inline form for for-loop init headers.
    fn var_inline(&mut self, v: &VarDecl) -> String {
        self.check_declared_name(v.name, v.span);
        let kw = match v.kind {
            VarKind::Const => "const",
            VarKind::Mut => "let",
        };
        match &v.init {
            Some(init) => {
                let value = self.expr_str(init);
                format!("{} {} = {}", kw, v.name, value)
            }
            None => format!("let {}", v.name),
        }
    }

    pub(crate) fn emit_fn(&mut self, f: &FnDecl, exported: bool) {
        self.check_declared_name(f.name, f.span);
        for param in &f.params {
            self.check_declared_name(param.name, param.span);
        }
        let is_async = f.is_async || block_contains(&f.body, Needle::Async);
        let is_generator = block_contains(&f.body, Needle::Yield);
        let params: Vec<String> = f.params.iter().map(|p| p.name.to_string()).collect();
        self.out.open(&format!(
            "{}{}function{} {}({}) {{",
            if exported { "export " } else { "" },
            if is_async { "async " } else { "" },
            if is_generator { "*" } else { "" },
            f.name,
            params.join(", ")
        ));
        self.emit_fn_body_inner(&f.body);
        self.out.close("}");
    }

    /// Emit a function body, synthesizing the defer drain when needed.
    ///
    /// Deferred expressions run on every exit path in LIFO order; an
    /// exception from one is swallowed so it can never mask an in-flight
    /// exception from the body.
    pub(crate) fn emit_fn_body_inner(&mut self, body: &Block) {
        let has_defer = block_contains(body, Needle::Defer);
        self.defer_ctx.push(has_defer);
        if has_defer {
            self.handler.warning(
                codes::W_DEFER_SWALLOW,
                "exceptions thrown by deferred expressions are swallowed",
                body.span,
            );
            self.out.line("const __defers = [];");
            self.out.open("try {");
            self.emit_block_stmts(body);
            self.out.close_open("} finally {");
            self.out
                .open("for (let __i = __defers.length - 1; __i >= 0; __i--) {");
            self.out.line("try { __defers[__i](); } catch (__err) { }");
            self.out.close("}");
            self.out.close("}");
        } else {
            self.emit_block_stmts(body);
        }
        self.defer_ctx.pop();
    }

    fn emit_defer(&mut self, d: &DeferStmt) {
        let value = self.expr_str(&d.expr);
        if self.defer_ctx.last().copied().unwrap_or(false) {
            let arrow = if expr_contains(&d.expr, Needle::Async) {
                "async () =>"
            } else {
                "() =>"
            };
            self.out.line(&format!("__defers.push({} {});", arrow, value));
        } else {
            // Outside a function (already diagnosed); degrade to a plain
            // statement so the artifact stays runnable.
            self.out.line(&format!("{};", value));
        }
    }

    fn emit_using(&mut self, u: &UsingStmt) {
        self.check_declared_name(u.name, u.span);
        let init = self.expr_str(&u.init);
        self.out.open("{");
        self.out.line(&format!("const {} = {};", u.name, init));
        self.out.open("try {");
        self.emit_block_stmts(&u.body);
        self.out.close_open("} finally {");
        self.out.line(&format!(
            "if ({} && typeof {}.dispose === \"function\") {{ {}.dispose(); }}",
            u.name, u.name, u.name
        ));
        self.out.line(&format!(
            "else if ({} && typeof {}.close === \"function\") {{ {}.close(); }}",
            u.name, u.name, u.name
        ));
        self.out.close("}");
        self.out.close("}");
    }

    pub(crate) fn emit_class(&mut self, c: &ClassDecl, exported: bool) {
        self.check_declared_name(c.name, c.span);

        // Private members: declared `private`, or named with a leading
        // underscore. Both compile to hard-private `#` members.
        let mut private: FxHashSet<ljc_util::Symbol> = FxHashSet::default();
        for member in &c.members {
            if member.modifiers.visibility == Visibility::Private
                || member.name.as_str().starts_with('_')
            {
                private.insert(member.name);
            }
        }
        self.private_members.push(private);

        let mut head = String::new();
        if exported {
            head.push_str("export ");
        }
        head.push_str("class ");
        head.push_str(c.name.as_str());
        if let Some(superclass) = c.superclass {
            head.push_str(" extends ");
            head.push_str(superclass.as_str());
        }
        head.push_str(" {");
        self.out.open(&head);
        for member in &c.members {
            self.emit_member(member);
        }
        self.out.close("}");
        self.private_members.pop();
    }

    fn emit_member(&mut self, m: &ClassMember) {
        let name = if self.is_private_member(m.name) {
            format!("#{}", m.name)
        } else {
            m.name.to_string()
        };
        let static_prefix = if m.modifiers.is_static { "static " } else { "" };

        match &m.kind {
            MemberKind::Field { init, .. } => match init {
                Some(init) => {
                    let value = self.expr_str(init);
                    self.out
                        .line(&format!("{}{} = {};", static_prefix, name, value));
                }
                None => self.out.line(&format!("{}{};", static_prefix, name)),
            },
            MemberKind::Constructor { params, body } => {
                for param in params {
                    self.check_declared_name(param.name, param.span);
                }
                let params: Vec<String> = params.iter().map(|p| p.name.to_string()).collect();
                self.out
                    .open(&format!("constructor({}) {{", params.join(", ")));
                self.emit_fn_body_inner(body);
                self.out.close("}");
            }
            MemberKind::Method { params, body, .. } => {
                for param in params {
                    self.check_declared_name(param.name, param.span);
                }
                let is_async = m.modifiers.is_async || block_contains(body, Needle::Async);
                let is_generator = block_contains(body, Needle::Yield);
                let params: Vec<String> = params.iter().map(|p| p.name.to_string()).collect();
                self.out.open(&format!(
                    "{}{}{}{}({}) {{",
                    static_prefix,
                    if is_async { "async " } else { "" },
                    if is_generator { "*" } else { "" },
                    name,
                    params.join(", ")
                ));
                self.emit_fn_body_inner(body);
                self.out.close("}");
            }
        }
    }

    pub(crate) fn emit_enum(&mut self, e: &EnumDecl, exported: bool) {
        self.check_declared_name(e.name, e.span);
        let prefix = if exported { "export " } else { "" };
        self.out
            .open(&format!("{}const {} = Object.freeze({{", prefix, e.name));
        let mut next_implicit: i64 = 0;
        for variant in &e.variants {
            match &variant.value {
                Some(Expr::Int(lit)) => {
                    self.out
                        .line(&format!("{}: {},", variant.name, lit.value));
                    next_implicit = lit.value + 1;
                }
                Some(value) => {
                    let text = self.expr_str(value);
                    self.out.line(&format!("{}: {},", variant.name, text));
                    next_implicit += 1;
                }
                None => {
                    self.out
                        .line(&format!("{}: {},", variant.name, next_implicit));
                    next_implicit += 1;
                }
            }
        }
        self.out.close("});");
    }

    // ── Control flow ─────────────────────────────────────────────────────

    fn emit_if(&mut self, i: &IfStmt) {
        let cond = self.expr_str(&i.condition);
        self.out.open(&format!("if ({}) {{", cond));
        self.emit_block_stmts(&i.consequence);

        let mut current = i.alternate.as_deref();
        loop {
            match current {
                Some(Stmt::If(next)) => {
                    let cond = self.expr_str(&next.condition);
                    self.out.close_open(&format!("}} else if ({}) {{", cond));
                    self.emit_block_stmts(&next.consequence);
                    current = next.alternate.as_deref();
                }
                Some(Stmt::Block(block)) => {
                    self.out.close_open("} else {");
                    self.emit_block_stmts(block);
                    current = None;
                }
                Some(other) => {
                    // The parser only chains `if` or a block here.
                    self.internal(
                        "if alternate is neither a chained if nor a block",
                        other.span(),
                    );
                    current = None;
                }
                None => break,
            }
        }
        self.out.close("}");
    }

    fn emit_for(&mut self, f: &ForStmt) {
        match &f.kind {
            ForKind::CStyle {
                init: None,
                condition: None,
                update: None,
            } => {
                self.out.open("while (true) {");
            }
            ForKind::CStyle {
                init,
                condition,
                update,
            } => {
                let init_str = match init.as_deref() {
                    Some(Stmt::Var(v)) => self.var_inline(v),
                    Some(Stmt::Expr(e)) => self.expr_str(&e.expr),
                    Some(other) => {
                        self.internal("for-loop init is not a declaration or expression", other.span());
                        String::new()
                    }
                    None => String::new(),
                };
                let cond_str = condition
                    .as_ref()
                    .map(|e| self.expr_str(e))
                    .unwrap_or_default();
                let update_str = update
                    .as_ref()
                    .map(|e| self.expr_str(e))
                    .unwrap_or_default();
                self.out.open(&format!(
                    "for ({}; {}; {}) {{",
                    init_str, cond_str, update_str
                ));
            }
            ForKind::ForIn { variable, iterable } => {
                self.check_declared_name(*variable, f.span);
                let iter = self.expr_str(iterable);
                self.out
                    .open(&format!("for (const {} of {}) {{", variable, iter));
            }
        }
        self.emit_block_stmts(&f.body);
        self.out.close("}");
    }

    /// Typed catch clauses become an if-ladder on the caught value's
    /// runtime type; without a catch-all the value is rethrown.
    fn emit_try(&mut self, t: &TryStmt) {
        self.out.open("try {");
        self.emit_block_stmts(&t.block);

        // The single untyped catch keeps its own binding directly.
        if t.catches.len() == 1 && t.catches[0].ty.is_none() {
            let clause = &t.catches[0];
            self.out
                .close_open(&format!("}} catch ({}) {{", clause.name));
            self.emit_block_stmts(&clause.body);
            self.out.close("}");
            return;
        }

        let err = self.fresh("__err");
        self.out.close_open(&format!("}} catch ({}) {{", err));
        let mut first = true;
        let mut has_catch_all = false;
        for clause in &t.catches {
            let header = match &clause.ty {
                Some(ty) => {
                    let check = self.type_check_js(&err, ty);
                    if first {
                        format!("if ({}) {{", check)
                    } else {
                        format!("}} else if ({}) {{", check)
                    }
                }
                None => {
                    has_catch_all = true;
                    if first {
                        "if (true) {".to_string()
                    } else {
                        "} else {".to_string()
                    }
                }
            };
            if first {
                self.out.open(&header);
                first = false;
            } else {
                self.out.close_open(&header);
            }
            self.out.line(&format!("const {} = {};", clause.name, err));
            self.emit_block_stmts(&clause.body);
            if has_catch_all {
                break;
            }
        }
        if !first {
            if !has_catch_all {
                self.out.close_open("} else {");
                self.out.line(&format!("throw {};", err));
            }
            self.out.close("}");
        } else {
            self.out.line(&format!("throw {};", err));
        }
        self.out.close("}");
    }

    // ── Modules ──────────────────────────────────────────────────────────

    fn emit_import(&mut self, i: &ImportDecl) {
        if i.source.as_str().trim().is_empty() {
            self.handler.error(
                codes::E_GEN_UNRESOLVED_IMPORT,
                "import source is empty",
                i.span,
            );
        }
        let specifier = self
            .opts
            .module_resolution
            .resolve(i.source.as_str(), self.source_name);

        let mut default_part: Option<String> = None;
        let mut named_parts: Vec<String> = Vec::new();
        let mut namespace_part: Option<String> = None;
        for spec in &i.specifiers {
            match spec {
                ImportSpecifier::Default(name) => default_part = Some(name.to_string()),
                ImportSpecifier::Named { name, alias } => match alias {
                    Some(alias) => named_parts.push(format!("{} as {}", name, alias)),
                    None => named_parts.push(name.to_string()),
                },
                ImportSpecifier::Namespace(name) => {
                    namespace_part = Some(format!("* as {}", name))
                }
            }
        }

        let mut clauses: Vec<String> = Vec::new();
        if let Some(default) = default_part {
            clauses.push(default);
        }
        if let Some(namespace) = namespace_part {
            clauses.push(namespace);
        }
        if !named_parts.is_empty() {
            clauses.push(format!("{{ {} }}", named_parts.join(", ")));
        }

        self.out.line(&format!(
            "import {} from \"{}\";",
            clauses.join(", "),
            specifier
        ));
    }

    fn emit_export(&mut self, e: &ExportDecl) {
        match &e.kind {
            ExportKind::Declaration(inner) => match &**inner {
                Stmt::Var(v) => self.emit_var(v, true),
                Stmt::Fn(f) => self.emit_fn(f, true),
                Stmt::Class(c) => self.emit_class(c, true),
                Stmt::Enum(en) => self.emit_enum(en, true),
                Stmt::TypeAlias(_) => {}
                other => {
                    self.internal("export wraps a non-declaration statement", other.span());
                }
            },
            ExportKind::Default(expr) => {
                let value = self.expr_str(expr);
                self.out.line(&format!("export default {};", value));
            }
            ExportKind::Named { specifiers, source } => {
                let parts: Vec<String> = specifiers
                    .iter()
                    .map(|s| match s.alias {
                        Some(alias) => format!("{} as {}", s.name, alias),
                        None => s.name.to_string(),
                    })
                    .collect();
                match source {
                    Some(source) => {
                        let specifier = self
                            .opts
                            .module_resolution
                            .resolve(source.as_str(), self.source_name);
                        self.out.line(&format!(
                            "export {{ {} }} from \"{}\";",
                            parts.join(", "),
                            specifier
                        ));
                    }
                    None => self
                        .out
                        .line(&format!("export {{ {} }};", parts.join(", "))),
                }
            }
        }
    }
}
