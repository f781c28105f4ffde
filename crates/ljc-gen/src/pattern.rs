//! Pattern compilation for `when`.
//!
//! Each arm compiles to `(predicate, bindings, guard, body)` and the arms
//! become a linear if-ladder against a stable binding of the subject.
//! Or-patterns OR their predicates, structural patterns check shape then
//! recurse, type patterns use the runtime type tags, and guards evaluate
//! inside the arm's bindings. In expression position the ladder is
//! wrapped in an immediately-invoked function returning the selected
//! body's value.

use ljc_par::ast::*;
use ljc_util::Symbol;

use crate::expr::js_string;
use crate::scan::{expr_contains, stmt_contains, Needle};
use crate::Generator;

/// A compiled pattern: a boolean predicate over the subject path plus the
/// bindings the pattern introduces (name, access path).
pub(crate) struct CompiledPattern {
    pub predicate: String,
    pub bindings: Vec<(Symbol, String)>,
}

impl<'a> Generator<'a> {
    /// Lower `when` in statement position.
    pub(crate) fn emit_when_stmt(&mut self, w: &WhenStmt) {
        let subject_var = self.fresh("__subject");
        let subject = self.expr_str(&w.subject);
        self.out.open("{");
        self.out
            .line(&format!("const {} = {};", subject_var, subject));

        let mut first = true;
        for arm in &w.arms {
            let (predicate, bindings) = self.compile_arm(arm, &subject_var);
            if first {
                self.out.open(&format!("if ({}) {{", predicate));
                first = false;
            } else {
                self.out
                    .close_open(&format!("}} else if ({}) {{", predicate));
            }
            for (name, path) in &bindings {
                self.out.line(&format!("const {} = {};", name, path));
            }
            match &arm.body {
                WhenBody::Block(block) => self.emit_block_stmts(block),
                WhenBody::Expr(expr) => {
                    let value = self.expr_str(expr);
                    self.out.line(&format!("{};", value));
                }
            }
        }
        if !first {
            self.out.close("}");
        }
        self.out.close("}");
    }

    /// Lower `when` in expression position to an IIFE yielding the
    /// selected body's value. The parser guarantees an `else` arm.
    pub(crate) fn when_expr_str(&mut self, w: &WhenExpr) -> String {
        let subject_var = self.fresh("__subject");
        let subject = self.expr_str(&w.subject);

        let suspends = expr_contains(&w.subject, Needle::Async)
            || w.arms.iter().any(|arm| {
                arm.guard
                    .as_ref()
                    .is_some_and(|g| expr_contains(g, Needle::Async))
                    || match &arm.body {
                        WhenBody::Expr(e) => expr_contains(e, Needle::Async),
                        WhenBody::Block(b) => b.statements.iter().any(|s| stmt_contains(s, Needle::Async)),
                    }
            });

        let inner = self.capture(|g| {
            g.out
                .line(&format!("const {} = {};", subject_var, subject));
            let mut first = true;
            for arm in &w.arms {
                let (predicate, bindings) = g.compile_arm(arm, &subject_var);
                if first {
                    g.out.open(&format!("if ({}) {{", predicate));
                    first = false;
                } else {
                    g.out
                        .close_open(&format!("}} else if ({}) {{", predicate));
                }
                for (name, path) in &bindings {
                    g.out.line(&format!("const {} = {};", name, path));
                }
                match &arm.body {
                    WhenBody::Expr(expr) => {
                        let value = g.expr_str(expr);
                        g.out.line(&format!("return {};", value));
                    }
                    WhenBody::Block(block) => {
                        g.emit_block_stmts(block);
                        g.out.line("return;");
                    }
                }
            }
            if !first {
                g.out.close("}");
            }
        });

        let prefix = self.indent_prefix();
        if suspends {
            format!("(await (async () => {{\n{}{}}})())", inner, prefix)
        } else {
            format!("((() => {{\n{}{}}})())", inner, prefix)
        }
    }

    /// Predicate and bindings for one arm, guard folded in.
    fn compile_arm(&mut self, arm: &WhenArm, subject: &str) -> (String, Vec<(Symbol, String)>) {
        let compiled = self.compile_pattern(&arm.pattern, subject);
        let mut predicate = compiled.predicate;
        if let Some(guard) = &arm.guard {
            let guard_js = self.expr_str(guard);
            if compiled.bindings.is_empty() {
                predicate = format!("{} && ({})", predicate, guard_js);
            } else {
                // Guards see the arm's bindings: apply them via a lambda.
                let params: Vec<String> = compiled
                    .bindings
                    .iter()
                    .map(|(name, _)| name.to_string())
                    .collect();
                let args: Vec<String> = compiled
                    .bindings
                    .iter()
                    .map(|(_, path)| path.clone())
                    .collect();
                predicate = format!(
                    "{} && (({}) => ({}))({})",
                    predicate,
                    params.join(", "),
                    guard_js,
                    args.join(", ")
                );
            }
        }
        (predicate, compiled.bindings)
    }

    /// Compile one pattern against an access path into the subject.
    pub(crate) fn compile_pattern(&mut self, pattern: &Pattern, path: &str) -> CompiledPattern {
        match pattern {
            Pattern::Literal(lit) => {
                let predicate = match &lit.value {
                    PatternLiteral::Int(v) => format!("{} === {}", path, v),
                    PatternLiteral::Float(v) => format!("{} === {}", path, v),
                    PatternLiteral::Str(v) => format!("{} === {}", path, js_string(v.as_str())),
                    PatternLiteral::Bool(v) => format!("{} === {}", path, v),
                    PatternLiteral::Nul => format!("{} == null", path),
                };
                CompiledPattern {
                    predicate,
                    bindings: Vec::new(),
                }
            }
            Pattern::Binding(binding) => CompiledPattern {
                predicate: "true".to_string(),
                bindings: vec![(binding.name, path.to_string())],
            },
            Pattern::TypeTest(test) => {
                let predicate = self.type_check_js(path, &test.ty);
                CompiledPattern {
                    predicate,
                    bindings: vec![(test.name, path.to_string())],
                }
            }
            Pattern::Array(array) => {
                let mut parts = vec![
                    format!("Array.isArray({})", path),
                    format!("{}.length === {}", path, array.elements.len()),
                ];
                let mut bindings = Vec::new();
                for (index, element) in array.elements.iter().enumerate() {
                    let sub_path = format!("{}[{}]", path, index);
                    let sub = self.compile_pattern(element, &sub_path);
                    if sub.predicate != "true" {
                        parts.push(sub.predicate);
                    }
                    bindings.extend(sub.bindings);
                }
                CompiledPattern {
                    predicate: parts.join(" && "),
                    bindings,
                }
            }
            Pattern::Object(object) => {
                let mut parts = vec![format!(
                    "({} !== null && typeof {} === \"object\")",
                    path, path
                )];
                let mut bindings = Vec::new();
                for field in &object.fields {
                    parts.push(format!("({} in {})", js_string(field.key.as_str()), path));
                    let sub_path = format!("{}.{}", path, field.key);
                    let sub = self.compile_pattern(&field.pattern, &sub_path);
                    if sub.predicate != "true" {
                        parts.push(sub.predicate);
                    }
                    bindings.extend(sub.bindings);
                }
                CompiledPattern {
                    predicate: parts.join(" && "),
                    bindings,
                }
            }
            Pattern::Or(or) => {
                // Alternatives cannot bind (parser-enforced); their
                // predicates are simply OR'd.
                let parts: Vec<String> = or
                    .alternatives
                    .iter()
                    .map(|alt| {
                        let sub = self.compile_pattern(alt, path);
                        format!("({})", sub.predicate)
                    })
                    .collect();
                CompiledPattern {
                    predicate: format!("({})", parts.join(" || ")),
                    bindings: Vec::new(),
                }
            }
            Pattern::Else(_) => CompiledPattern {
                predicate: "true".to_string(),
                bindings: Vec::new(),
            },
        }
    }
}
