//! End-to-end pipeline tests: source text through the full façade.
//!
//! These follow the compiler's concrete acceptance scenarios: arithmetic
//! precedence, function calls, `when` dispatch, `defer` ordering, `using`
//! release, and lexical error recovery.

use ljc_drv::{Compiler, Options};
use ljc_util::Level;

fn compile(source: &str) -> ljc_drv::Output {
    let mut compiler = Compiler::new();
    compiler
        .compile(source, "test.lj", &Options::default())
        .expect("driver should not fail internally")
}

#[test]
fn scenario_arithmetic_precedence() {
    let output = compile("const x = 1 + 2 * 3");
    assert!(output.ok);
    // Initializer groups as 1 + (2 * 3).
    assert!(output.code.unwrap().contains("const x = (1 + (2 * 3));"));
}

#[test]
fn scenario_function_and_call() {
    let output = compile("fn add(a: int, b: int): int { return a + b }\nadd(2, 3)");
    assert!(output.ok);
    let code = output.code.unwrap();
    assert!(code.contains("function add(a, b) {"));
    assert!(code.contains("return (a + b);"));
    assert!(code.contains("add(2, 3);"));
}

#[test]
fn scenario_when_dispatch() {
    let output = compile(
        "const r = when (v) { 1 | 2 => \"a\", n is int where n > 10 => \"b\", else => \"c\" }",
    );
    assert!(output.ok);
    let code = output.code.unwrap();
    // v = 2 would hit the or-pattern arm...
    assert!(code.contains("=== 1) || "));
    assert!(code.contains("return \"a\";"));
    // ...v = 11 the guarded type-test arm...
    assert!(code.contains("typeOf"));
    assert!(code.contains("n > 10"));
    assert!(code.contains("return \"b\";"));
    // ...anything else the default.
    assert!(code.contains("return \"c\";"));
}

#[test]
fn scenario_defer_order() {
    let output = compile(
        "fn f() {\n  defer println(\"a\")\n  defer println(\"b\")\n  println(\"c\")\n}\nf()",
    );
    assert!(output.ok);
    let code = output.code.unwrap();
    // c prints directly; the drain then runs b, a (LIFO).
    let direct = code.find("println(\"c\");").expect("direct call");
    let drain = code.find("__defers.length - 1").expect("drain loop");
    assert!(direct < drain);
}

#[test]
fn scenario_using_dispose() {
    let output = compile("fn f() { using (r = Resource.open()) { r.use() } }");
    assert!(output.ok);
    let code = output.code.unwrap();
    let body = code.find("r.use();").expect("body");
    let release = code.find("r.dispose();").expect("release");
    // Release sits in the finally, after the body.
    assert!(body < release);
    assert!(code.contains("} finally {"));
}

#[test]
fn scenario_unterminated_string() {
    let output = compile("\"abc");
    assert!(!output.ok);
    let errors: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.level == Level::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].span.line, 1);
    assert_eq!(errors[0].span.column, 1);
    // Best-effort empty program still emits (no statements).
    assert!(output.code.is_some());
}

#[test]
fn diagnostics_are_idempotent() {
    let source = "const x = \nmut y = f(,)\n\"abc";
    let first = compile(source);
    let second = compile(source);
    let render = |o: &ljc_drv::Output| {
        o.diagnostics
            .iter()
            .map(|d| format!("{}:{}:{} {}", d.span.line, d.span.column, d.code, d.message))
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&first), render(&second));
    assert_eq!(first.code, second.code);
}

#[test]
fn emitted_code_has_balanced_braces() {
    // A syntactic smoke test over a program touching every lowering.
    let source = r#"
import { helper } from "/std/fs"

enum Color { Red, Green, Blue }

class Point {
    x: int = 0
    private _tag: str = "p"
    constructor(x: int) { this.x = x }
    tag(): str { return this._tag }
}

fn classify(v): str {
    return when (v) {
        1 | 2 => "small",
        n is int where n > 10 => "large",
        [a, b] => "pair",
        {kind: "k"} => "tagged",
        else => "other"
    }
}

async fn pump() {
    const ch = chan int(4)
    go pump()
    ch <- 1
    const v = <-ch
    defer println("done")
    using (r = open()) {
        for (i in 0..10) {
            if (i % 2 == 0) { println("${i} even") } else { println("odd") }
        }
    }
}

export default classify
"#;
    let output = compile(source);
    assert!(output.ok, "diagnostics: {:?}", output.diagnostics);
    let code = output.code.unwrap();
    let opens = code.matches('{').count();
    let closes = code.matches('}').count();
    assert_eq!(opens, closes, "unbalanced braces in:\n{}", code);
    let parens_open = code.matches('(').count();
    let parens_close = code.matches(')').count();
    assert_eq!(parens_open, parens_close, "unbalanced parens in:\n{}", code);
}
