//! AST scans that stop at function boundaries.
//!
//! The generator needs three facts about a function body: does it suspend
//! (emit `async`), does it yield (emit `function*`), does it register
//! defers (synthesize the try/finally drain). All three share one walker;
//! nested functions and arrows are separate scopes and are not entered.

use ljc_par::ast::*;

/// What the walker is looking for.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Needle {
    /// `await`, channel send, channel receive.
    Async,
    /// `yield` / `yield*`.
    Yield,
    /// `defer` statements.
    Defer,
}

pub(crate) fn block_contains(block: &Block, needle: Needle) -> bool {
    block.statements.iter().any(|s| stmt_contains(s, needle))
}

pub(crate) fn stmt_contains(stmt: &Stmt, needle: Needle) -> bool {
    match stmt {
        Stmt::Var(v) => v.init.as_ref().is_some_and(|e| expr_contains(e, needle)),
        // Declarations own their bodies; nothing in them runs in this scope.
        Stmt::Fn(_) | Stmt::Class(_) | Stmt::Enum(_) | Stmt::TypeAlias(_) | Stmt::Import(_) => {
            false
        }
        Stmt::Export(e) => match &e.kind {
            ExportKind::Declaration(inner) => stmt_contains(inner, needle),
            ExportKind::Default(expr) => expr_contains(expr, needle),
            ExportKind::Named { .. } => false,
        },
        Stmt::Expr(e) => expr_contains(&e.expr, needle),
        Stmt::If(i) => {
            expr_contains(&i.condition, needle)
                || block_contains(&i.consequence, needle)
                || i.alternate.as_deref().is_some_and(|a| stmt_contains(a, needle))
        }
        Stmt::For(f) => {
            let header = match &f.kind {
                ForKind::CStyle {
                    init,
                    condition,
                    update,
                } => {
                    init.as_deref().is_some_and(|s| stmt_contains(s, needle))
                        || condition.as_ref().is_some_and(|e| expr_contains(e, needle))
                        || update.as_ref().is_some_and(|e| expr_contains(e, needle))
                }
                ForKind::ForIn { iterable, .. } => expr_contains(iterable, needle),
            };
            header || block_contains(&f.body, needle)
        }
        Stmt::While(w) => expr_contains(&w.condition, needle) || block_contains(&w.body, needle),
        Stmt::DoWhile(d) => expr_contains(&d.condition, needle) || block_contains(&d.body, needle),
        Stmt::When(w) => {
            expr_contains(&w.subject, needle) || w.arms.iter().any(|a| arm_contains(a, needle))
        }
        Stmt::Return(r) => r.value.as_ref().is_some_and(|e| expr_contains(e, needle)),
        Stmt::Break(b) => b.value.as_ref().is_some_and(|e| expr_contains(e, needle)),
        Stmt::Continue(_) => false,
        Stmt::Throw(t) => expr_contains(&t.value, needle),
        Stmt::Try(t) => {
            block_contains(&t.block, needle)
                || t.catches.iter().any(|c| block_contains(&c.body, needle))
        }
        Stmt::Block(b) => block_contains(b, needle),
        Stmt::Defer(d) => needle == Needle::Defer || expr_contains(&d.expr, needle),
        Stmt::Using(u) => expr_contains(&u.init, needle) || block_contains(&u.body, needle),
    }
}

pub(crate) fn expr_contains(expr: &Expr, needle: Needle) -> bool {
    match expr {
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Str(_)
        | Expr::Bool(_)
        | Expr::Nul(_)
        | Expr::Ident(_)
        | Expr::This(_)
        | Expr::Super(_) => false,
        Expr::Chan(c) => c
            .capacity
            .as_deref()
            .is_some_and(|e| expr_contains(e, needle)),
        Expr::Binary(b) => expr_contains(&b.left, needle) || expr_contains(&b.right, needle),
        Expr::Unary(u) => expr_contains(&u.operand, needle),
        Expr::Assign(a) => expr_contains(&a.target, needle) || expr_contains(&a.value, needle),
        Expr::Ternary(t) => {
            expr_contains(&t.condition, needle)
                || expr_contains(&t.consequence, needle)
                || expr_contains(&t.alternate, needle)
        }
        Expr::Call(c) => {
            expr_contains(&c.callee, needle) || c.args.iter().any(|a| expr_contains(a, needle))
        }
        Expr::New(n) => {
            expr_contains(&n.callee, needle) || n.args.iter().any(|a| expr_contains(a, needle))
        }
        Expr::Member(m) => {
            expr_contains(&m.object, needle)
                || matches!(&m.property, MemberProp::Computed(e) if expr_contains(e, needle))
        }
        Expr::Array(a) => a.elements.iter().any(|e| expr_contains(e, needle)),
        Expr::Object(o) => o
            .properties
            .iter()
            .any(|p| p.value.as_ref().is_some_and(|e| expr_contains(e, needle))),
        // Function boundary.
        Expr::Arrow(_) => false,
        Expr::Template(t) => t
            .parts
            .iter()
            .any(|p| matches!(p, TemplateElem::Expr(e) if expr_contains(e, needle))),
        Expr::Cast(c) => expr_contains(&c.expr, needle),
        Expr::TypeCheck(t) => expr_contains(&t.expr, needle),
        Expr::Range(r) => expr_contains(&r.start, needle) || expr_contains(&r.end, needle),
        Expr::Await(a) => needle == Needle::Async || expr_contains(&a.expr, needle),
        // `go` runs its call inside the spawned closure; suspensions in
        // there do not make the current function async.
        Expr::Go(g) => {
            if needle == Needle::Async {
                false
            } else {
                expr_contains(&g.call, needle)
            }
        }
        Expr::Send(s) => {
            needle == Needle::Async
                || expr_contains(&s.channel, needle)
                || expr_contains(&s.value, needle)
        }
        Expr::Receive(r) => needle == Needle::Async || expr_contains(&r.channel, needle),
        Expr::When(w) => {
            expr_contains(&w.subject, needle) || w.arms.iter().any(|a| arm_contains(a, needle))
        }
        Expr::Yield(y) => {
            needle == Needle::Yield
                || y.argument.as_deref().is_some_and(|e| expr_contains(e, needle))
        }
    }
}

fn arm_contains(arm: &WhenArm, needle: Needle) -> bool {
    arm.guard.as_ref().is_some_and(|g| expr_contains(g, needle))
        || match &arm.body {
            WhenBody::Expr(e) => expr_contains(e, needle),
            WhenBody::Block(b) => block_contains(b, needle),
        }
}
