//! ljc-gen - JavaScript code generator for the Ljos compiler.
//!
//! The generator is a pure function of the AST: it walks the tree
//! exhaustively and emits target text. Surface-only constructs are
//! rewritten into target idioms here - `when` into predicate cascades,
//! `defer` into a synthesized try/finally drain, `using` into acquire/
//! release, channels and `go` into runtime calls, `is`/`of` into runtime
//! type checks.
//!
//! Runtime helper imports are tracked in an insertion-ordered set and
//! emitted only when referenced; import specifiers go through the
//! pluggable [`resolve::ResolveImport`] strategy, never hard-coded.
//!
//! # Examples
//!
//! ```
//! use ljc_gen::{generate, EmitOptions};
//! use ljc_par::Parser;
//! use ljc_util::{FileId, Handler};
//!
//! let handler = Handler::new();
//! let program = Parser::parse_source("const x = 1 + 2", &handler, FileId::DUMMY);
//! let code = generate(&program, &handler, &EmitOptions::default(), "main.lj").unwrap();
//!
//! assert!(code.contains("const x = (1 + 2);"));
//! ```

pub mod emitter;
pub mod error;
pub mod reserved;
pub mod resolve;

mod expr;
mod pattern;
mod scan;
mod stmt;

pub use error::GenError;
pub use resolve::{ModuleResolution, ResolveImport, RUNTIME_MODULE};

use indexmap::IndexSet;
use ljc_par::ast::{ExportKind, Program, Stmt};
use ljc_util::diagnostic::codes;
use ljc_util::{Handler, Span, Symbol};
use rustc_hash::FxHashSet;

use emitter::Emitter;

/// Runtime helper symbols the generator may reference.
const RUNTIME_SYMBOLS: [&str; 6] = ["println", "print", "typeOf", "Channel", "range", "spawn"];

/// Options that shape emission without changing semantics.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Target tag; affects only a header comment.
    pub target: Option<String>,
    /// When set, append a `//# sourceMappingURL=` trailer naming this file.
    pub source_map_hint: Option<String>,
    /// Import specifier translation strategy.
    pub module_resolution: ModuleResolution,
}

/// Generate target code for a whole program.
pub fn generate(
    program: &Program,
    handler: &Handler,
    opts: &EmitOptions,
    source_name: &str,
) -> Result<String, GenError> {
    Generator::new(handler, opts, source_name).generate(program)
}

/// The code generator. One instance emits one program.
pub struct Generator<'a> {
    handler: &'a Handler,
    opts: &'a EmitOptions,
    /// Source file name, handed to the import resolver.
    source_name: &'a str,
    out: Emitter,
    /// Runtime symbols referenced so far, in first-use order.
    runtime: IndexSet<&'static str>,
    /// Stack of per-class private member tables.
    private_members: Vec<FxHashSet<Symbol>>,
    /// Stack of per-function defer contexts (true = body drains defers).
    defer_ctx: Vec<bool>,
    /// Fresh-name counter for synthesized locals.
    tmp: usize,
    /// First internal invariant violation, if any.
    internal_error: Option<GenError>,
}

impl<'a> Generator<'a> {
    /// Create a generator.
    pub fn new(handler: &'a Handler, opts: &'a EmitOptions, source_name: &'a str) -> Self {
        Self {
            handler,
            opts,
            source_name,
            out: Emitter::new(),
            runtime: IndexSet::new(),
            private_members: Vec::new(),
            defer_ctx: Vec::new(),
            tmp: 0,
            internal_error: None,
        }
    }

    /// Emit the program, returning the target text.
    ///
    /// User-level problems surface as diagnostics on the handler; `Err`
    /// is reserved for internal invariant violations (compiler bugs).
    pub fn generate(mut self, program: &Program) -> Result<String, GenError> {
        for stmt in &program.statements {
            self.emit_stmt(stmt);
        }
        if let Some(err) = self.internal_error.take() {
            return Err(err);
        }

        // Names bound at the top level shadow runtime helpers; they must
        // not be re-imported over the user's own binding.
        let shadowed = top_level_bindings(program);

        let mut assembled = String::new();
        if let Some(target) = &self.opts.target {
            assembled.push_str(&format!("// target: {}\n", target));
        }
        let imports: Vec<&str> = self
            .runtime
            .iter()
            .copied()
            .filter(|sym| !shadowed.contains(*sym))
            .collect();
        if !imports.is_empty() {
            let specifier = self
                .opts
                .module_resolution
                .resolve(RUNTIME_MODULE, self.source_name);
            assembled.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                imports.join(", "),
                specifier
            ));
        }
        if !assembled.is_empty() {
            assembled.push('\n');
        }
        assembled.push_str(&self.out.finish());
        if let Some(hint) = &self.opts.source_map_hint {
            assembled.push_str(&format!("//# sourceMappingURL={}\n", hint));
        }
        Ok(assembled)
    }

    // ── Shared helpers ───────────────────────────────────────────────────

    /// Record use of a runtime helper so its import gets emitted.
    pub(crate) fn mark_runtime(&mut self, symbol: &'static str) {
        self.runtime.insert(symbol);
    }

    /// An identifier reference: if it names a runtime helper, note it.
    pub(crate) fn note_runtime_ident(&mut self, name: Symbol) {
        if let Some(symbol) = RUNTIME_SYMBOLS.iter().copied().find(|s| *s == name.as_str()) {
            self.runtime.insert(symbol);
        }
    }

    /// Report `reserved_name` when a declaration collides with a target
    /// keyword.
    pub(crate) fn check_declared_name(&mut self, name: Symbol, span: Span) {
        if reserved::is_js_reserved(name.as_str()) {
            self.handler.error(
                codes::E_GEN_RESERVED_NAME,
                format!("`{}` collides with a reserved word in the target language", name),
                span,
            );
        }
    }

    /// Fresh synthesized local name.
    pub(crate) fn fresh(&mut self, prefix: &str) -> String {
        let n = self.tmp;
        self.tmp += 1;
        format!("{}{}", prefix, n)
    }

    /// True when `name` is a private member of the innermost class.
    pub(crate) fn is_private_member(&self, name: Symbol) -> bool {
        self.private_members
            .last()
            .map_or(false, |set| set.contains(&name))
    }

    /// Record an internal invariant violation; the first one wins.
    pub(crate) fn internal(&mut self, message: impl Into<String>, span: Span) {
        if self.internal_error.is_none() {
            self.internal_error = Some(GenError::Internal {
                message: message.into(),
                line: span.line,
                column: span.column,
            });
        }
    }

    /// Run `f` with a fresh emitter one level deeper and return what it
    /// wrote. Used to embed statement bodies inside expression text
    /// (arrow blocks, `when`-expression IIFEs).
    pub(crate) fn capture<F: FnOnce(&mut Self)>(&mut self, f: F) -> String {
        let depth = self.out.indent() + 1;
        let saved = std::mem::replace(&mut self.out, Emitter::with_indent(depth));
        f(self);
        let captured = std::mem::replace(&mut self.out, saved);
        captured.finish()
    }

    /// Indentation prefix at the current depth, for closing embedded
    /// blocks inside expression text.
    pub(crate) fn indent_prefix(&self) -> String {
        "    ".repeat(self.out.indent())
    }
}

/// Names bound by top-level declarations and imports.
fn top_level_bindings(program: &Program) -> FxHashSet<&'static str> {
    let mut names = FxHashSet::default();
    let mut add = |symbol: Symbol| {
        names.insert(symbol.as_str());
    };
    for stmt in &program.statements {
        collect_stmt_bindings(stmt, &mut add);
    }
    names
}

fn collect_stmt_bindings(stmt: &Stmt, add: &mut dyn FnMut(Symbol)) {
    match stmt {
        Stmt::Var(v) => add(v.name),
        Stmt::Fn(f) => add(f.name),
        Stmt::Class(c) => add(c.name),
        Stmt::Enum(e) => add(e.name),
        Stmt::Import(i) => {
            for spec in &i.specifiers {
                match spec {
                    ljc_par::ast::ImportSpecifier::Default(name) => add(*name),
                    ljc_par::ast::ImportSpecifier::Named { name, alias } => {
                        add((*alias).unwrap_or(*name))
                    }
                    ljc_par::ast::ImportSpecifier::Namespace(name) => add(*name),
                }
            }
        }
        Stmt::Export(e) => {
            if let ExportKind::Declaration(inner) = &e.kind {
                collect_stmt_bindings(inner, add);
            }
        }
        _ => {}
    }
}
