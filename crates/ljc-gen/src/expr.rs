//! Expression emission.
//!
//! Expressions render to strings; compound forms are parenthesized
//! defensively so emitted text never depends on target-language
//! precedence subtleties. Statement-shaped bodies embedded in expression
//! position (arrow blocks, `when`-expression IIFEs) are captured from a
//! nested emitter.

use ljc_par::ast::*;

use crate::scan::{block_contains, expr_contains, Needle};
use crate::Generator;

/// Render a Ljos string as a JavaScript double-quoted literal.
pub(crate) fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    push_escaped(&mut out, value, '"');
    out.push('"');
    out
}

/// Escape `value` for inclusion inside `quote`-delimited JS text.
fn push_escaped(out: &mut String, value: &str, quote: char) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

/// True when `name` can appear bare as a JS property key.
fn is_plain_key(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c == '$' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
}

fn js_binop(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
        BinOp::Pow => "**",
        BinOp::Eq => "===",
        BinOp::Ne => "!==",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::Nullish => "??",
        BinOp::BitAnd => "&",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::Shl => "<<",
        BinOp::Shr => ">>",
        BinOp::Instanceof => "instanceof",
        BinOp::In => "in",
    }
}

fn js_assign_op(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::Add => "+=",
        AssignOp::Sub => "-=",
        AssignOp::Mul => "*=",
        AssignOp::Div => "/=",
        AssignOp::Rem => "%=",
        AssignOp::Pow => "**=",
        AssignOp::And => "&&=",
        AssignOp::Or => "||=",
        AssignOp::Nullish => "??=",
    }
}

impl<'a> Generator<'a> {
    pub(crate) fn expr_str(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Int(lit) => lit.value.to_string(),
            Expr::Float(lit) => lit.value.to_string(),
            Expr::Str(lit) => js_string(lit.value.as_str()),
            Expr::Bool(lit) => lit.value.to_string(),
            Expr::Nul(_) => "null".to_string(),
            Expr::Ident(id) => {
                self.note_runtime_ident(id.name);
                id.name.to_string()
            }
            Expr::This(_) => "this".to_string(),
            Expr::Super(_) => "super".to_string(),

            Expr::Binary(b) => {
                let left = self.expr_str(&b.left);
                let right = self.expr_str(&b.right);
                format!("({} {} {})", left, js_binop(b.op), right)
            }
            Expr::Unary(u) => {
                let operand = self.expr_str(&u.operand);
                match u.op {
                    UnOp::Not => format!("(!{})", operand),
                    UnOp::Neg => format!("(-{})", operand),
                    UnOp::Pos => format!("(+{})", operand),
                    UnOp::BitNot => format!("(~{})", operand),
                    UnOp::Typeof => format!("(typeof {})", operand),
                    UnOp::Void => format!("(void {})", operand),
                    UnOp::Delete => format!("(delete {})", operand),
                }
            }
            Expr::Assign(a) => {
                let target = self.expr_str(&a.target);
                let value = self.expr_str(&a.value);
                format!("({} {} {})", target, js_assign_op(a.op), value)
            }
            Expr::Ternary(t) => {
                let condition = self.expr_str(&t.condition);
                let consequence = self.expr_str(&t.consequence);
                let alternate = self.expr_str(&t.alternate);
                format!("({} ? {} : {})", condition, consequence, alternate)
            }

            Expr::Call(c) => {
                let callee = self.expr_str(&c.callee);
                let args: Vec<String> = c.args.iter().map(|a| self.expr_str(a)).collect();
                format!("{}({})", callee, args.join(", "))
            }
            Expr::New(n) => {
                let callee = self.expr_str(&n.callee);
                let args: Vec<String> = n.args.iter().map(|a| self.expr_str(a)).collect();
                format!("new {}({})", callee, args.join(", "))
            }
            Expr::Member(m) => {
                let object = self.expr_str(&m.object);
                match &m.property {
                    MemberProp::Named(name) => {
                        // Private member accesses through `this` use the
                        // hard-private name inside the class body.
                        let rendered = if matches!(*m.object, Expr::This(_))
                            && self.is_private_member(*name)
                        {
                            format!("#{}", name)
                        } else {
                            name.to_string()
                        };
                        let sep = if m.optional { "?." } else { "." };
                        format!("{}{}{}", object, sep, rendered)
                    }
                    MemberProp::Computed(index) => {
                        let index = self.expr_str(index);
                        format!("{}[{}]", object, index)
                    }
                }
            }

            Expr::Array(a) => {
                let elements: Vec<String> = a.elements.iter().map(|e| self.expr_str(e)).collect();
                format!("[{}]", elements.join(", "))
            }
            Expr::Object(o) => {
                let props: Vec<String> = o
                    .properties
                    .iter()
                    .map(|p| {
                        let key = if is_plain_key(p.key.as_str()) {
                            p.key.to_string()
                        } else {
                            js_string(p.key.as_str())
                        };
                        match &p.value {
                            Some(value) => {
                                let value = self.expr_str(value);
                                format!("{}: {}", key, value)
                            }
                            None => key,
                        }
                    })
                    .collect();
                if props.is_empty() {
                    "({})".to_string()
                } else {
                    format!("({{ {} }})", props.join(", "))
                }
            }

            Expr::Arrow(f) => self.arrow_str(f),
            Expr::Template(t) => self.template_str(t),

            Expr::Cast(c) => {
                let value = self.expr_str(&c.expr);
                self.cast_js(&value, &c.ty)
            }
            Expr::TypeCheck(t) => {
                let value = self.expr_str(&t.expr);
                let check = self.type_check_js(&value, &t.ty);
                format!("({})", check)
            }

            Expr::Range(r) => {
                self.mark_runtime("range");
                let start = self.expr_str(&r.start);
                let end = self.expr_str(&r.end);
                if r.inclusive {
                    format!("range({}, ({}) + 1)", start, end)
                } else {
                    format!("range({}, {})", start, end)
                }
            }

            Expr::Await(a) => {
                let inner = self.expr_str(&a.expr);
                format!("(await {})", inner)
            }
            Expr::Go(g) => {
                self.mark_runtime("spawn");
                let call = self.expr_str(&g.call);
                if expr_contains(&g.call, Needle::Async) {
                    format!("spawn(async () => {})", call)
                } else {
                    format!("spawn(() => {})", call)
                }
            }
            Expr::Chan(c) => {
                self.mark_runtime("Channel");
                match &c.capacity {
                    Some(capacity) => {
                        let capacity = self.expr_str(capacity);
                        format!("new Channel({})", capacity)
                    }
                    None => "new Channel()".to_string(),
                }
            }
            Expr::Send(s) => {
                // Sends only exist in statement position; emit_expr_stmt
                // intercepts them before they can reach here.
                self.internal("channel send reached expression emission", s.span);
                let channel = self.expr_str(&s.channel);
                let value = self.expr_str(&s.value);
                format!("(await {}.send({}))", channel, value)
            }
            Expr::Receive(r) => {
                let channel = self.expr_str(&r.channel);
                format!("(await {}.receive())", channel)
            }

            Expr::When(w) => self.when_expr_str(w),

            Expr::Yield(y) => match (&y.argument, y.delegate) {
                (Some(argument), true) => {
                    let argument = self.expr_str(argument);
                    format!("(yield* {})", argument)
                }
                (Some(argument), false) => {
                    let argument = self.expr_str(argument);
                    format!("(yield {})", argument)
                }
                (None, _) => "(yield)".to_string(),
            },
        }
    }

    fn arrow_str(&mut self, f: &ArrowFn) -> String {
        for param in &f.params {
            self.check_declared_name(param.name, param.span);
        }
        let params: Vec<String> = f.params.iter().map(|p| p.name.to_string()).collect();
        let body_async = match &f.body {
            ArrowBody::Expr(e) => expr_contains(e, Needle::Async),
            ArrowBody::Block(b) => block_contains(b, Needle::Async),
        };
        let async_prefix = if f.is_async || body_async { "async " } else { "" };
        match &f.body {
            ArrowBody::Expr(e) => {
                let body = self.expr_str(e);
                format!("({}({}) => {})", async_prefix, params.join(", "), body)
            }
            ArrowBody::Block(block) => {
                let inner = self.capture(|g| g.emit_fn_body_inner(block));
                format!(
                    "({}({}) => {{\n{}{}}})",
                    async_prefix,
                    params.join(", "),
                    inner,
                    self.indent_prefix()
                )
            }
        }
    }

    fn template_str(&mut self, t: &TemplateLit) -> String {
        let mut out = String::from("`");
        for part in &t.parts {
            match part {
                TemplateElem::Chunk(text) => {
                    // Escape backtick-significant characters.
                    for c in text.chars() {
                        match c {
                            '`' => out.push_str("\\`"),
                            '\\' => out.push_str("\\\\"),
                            '$' => out.push_str("\\$"),
                            '\r' => out.push_str("\\r"),
                            c => out.push(c),
                        }
                    }
                }
                TemplateElem::Expr(e) => {
                    let inner = self.expr_str(e);
                    out.push_str("${");
                    out.push_str(&inner);
                    out.push('}');
                }
            }
        }
        out.push('`');
        out
    }

    /// Runtime type check for `expr is T`, typed catches and type
    /// patterns, per the surface-to-runtime type-tag table.
    pub(crate) fn type_check_js(&mut self, subject: &str, ty: &TypeAnn) -> String {
        match ty {
            TypeAnn::Simple(simple) => match simple.name.as_str() {
                "int" => {
                    self.mark_runtime("typeOf");
                    format!("typeOf({}) === \"Int\"", subject)
                }
                "float" => {
                    self.mark_runtime("typeOf");
                    format!(
                        "(typeOf({}) === \"Float\" || typeOf({}) === \"Int\")",
                        subject, subject
                    )
                }
                "str" => {
                    self.mark_runtime("typeOf");
                    format!("typeOf({}) === \"Str\"", subject)
                }
                "bool" => {
                    self.mark_runtime("typeOf");
                    format!("typeOf({}) === \"Bool\"", subject)
                }
                "nul" => format!("({} == null)", subject),
                class_name => format!("{} instanceof {}", subject, class_name),
            },
            TypeAnn::Array(_) | TypeAnn::Tuple(_) => {
                self.mark_runtime("typeOf");
                format!("typeOf({}) === \"Array\"", subject)
            }
            TypeAnn::Function(_) => {
                self.mark_runtime("typeOf");
                format!("typeOf({}) === \"Fn\"", subject)
            }
            TypeAnn::Map(_) | TypeAnn::Object(_) => {
                self.mark_runtime("typeOf");
                format!("typeOf({}) === \"Object\"", subject)
            }
            TypeAnn::Generic(generic) => {
                format!("{} instanceof {}", subject, generic.base)
            }
            TypeAnn::Union(union) => {
                let members: Vec<String> = union
                    .members
                    .iter()
                    .map(|m| self.type_check_js(subject, m))
                    .collect();
                format!("({})", members.join(" || "))
            }
            TypeAnn::Intersection(intersection) => {
                let members: Vec<String> = intersection
                    .members
                    .iter()
                    .map(|m| self.type_check_js(subject, m))
                    .collect();
                format!("({})", members.join(" && "))
            }
        }
    }

    /// Safe cast for `expr of T`: numeric conversions, class-guarded
    /// casts, null sentinel on failure.
    pub(crate) fn cast_js(&mut self, value: &str, ty: &TypeAnn) -> String {
        match ty {
            TypeAnn::Simple(simple) => match simple.name.as_str() {
                "int" => format!(
                    "((__v) => {{ const __n = Number(__v); return Number.isFinite(__n) ? Math.trunc(__n) : null; }})({})",
                    value
                ),
                "float" => format!(
                    "((__v) => {{ const __n = Number(__v); return Number.isNaN(__n) ? null : __n; }})({})",
                    value
                ),
                "str" => format!("String({})", value),
                "bool" => format!("Boolean({})", value),
                "nul" => "null".to_string(),
                class_name => format!(
                    "((__v) => __v instanceof {} ? __v : null)({})",
                    class_name, value
                ),
            },
            // Non-checkable annotations pass the value through.
            _ => format!("({})", value),
        }
    }
}
