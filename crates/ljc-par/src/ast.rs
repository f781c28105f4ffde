//! AST node definitions for the Ljos language.
//!
//! The tree is a closed algebraic model in three layers: a [`Program`] of
//! statements, statement variants, and expression variants, plus the type
//! annotations and `when`-arm patterns they reference. Every node records
//! the span of the token that introduced it.
//!
//! Nodes are built by the parser, immutable afterwards, and consumed by
//! the generator. Each node is owned by exactly one parent; recursion goes
//! through `Box`.

use ljc_util::{Span, Symbol};

/// AST root - an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `const x = e` / `mut x: T = e`
    Var(VarDecl),
    /// `fn name(params): T { ... }`
    Fn(FnDecl),
    /// `class Name { ... }`
    Class(ClassDecl),
    /// `enum Name { ... }`
    Enum(EnumDecl),
    /// `type Name = T`
    TypeAlias(TypeAlias),
    /// Bare expression in statement position.
    Expr(ExprStmt),
    /// `if (c) { } else (c2) { } else { }`
    If(IfStmt),
    /// C-style, `for-in`, or infinite `for`.
    For(ForStmt),
    /// `while (c) { }`
    While(WhileStmt),
    /// `do { } while (c)`
    DoWhile(DoWhileStmt),
    /// `when (v) { arms }` in statement position.
    When(WhenStmt),
    /// `return e?`
    Return(ReturnStmt),
    /// `break e?` - the value slot exists because blocks are expressions.
    Break(BreakStmt),
    /// `continue`
    Continue(ContinueStmt),
    /// `throw e`
    Throw(ThrowStmt),
    /// `try { } catch (e: T) { } ...`
    Try(TryStmt),
    /// `import ... from "m"`
    Import(ImportDecl),
    /// `export ...`
    Export(ExportDecl),
    /// Bare block.
    Block(Block),
    /// `defer e` - run when the enclosing function exits, LIFO.
    Defer(DeferStmt),
    /// `using (x = e) { }` - scoped resource binding.
    Using(UsingStmt),
}

impl Stmt {
    /// The source span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Var(s) => s.span,
            Stmt::Fn(s) => s.span,
            Stmt::Class(s) => s.span,
            Stmt::Enum(s) => s.span,
            Stmt::TypeAlias(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::When(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Import(s) => s.span,
            Stmt::Export(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Defer(s) => s.span,
            Stmt::Using(s) => s.span,
        }
    }
}

/// Binding kind for variable declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Immutable; must carry an initializer.
    Const,
    /// Mutable; may omit the initializer.
    Mut,
}

/// Variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub name: Symbol,
    pub ty: Option<TypeAnn>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub ty: Option<TypeAnn>,
    pub span: Span,
}

/// Function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Symbol,
    pub type_params: Vec<Symbol>,
    pub params: Vec<Param>,
    pub return_ty: Option<TypeAnn>,
    pub body: Block,
    pub is_async: bool,
    pub span: Span,
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

/// Modifier set on a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_readonly: bool,
    pub is_async: bool,
}

/// Decorator attached to a declaration.
///
/// The list precedes its target in source order. The distilled surface
/// grammar reserves no marker token for decorators, so the parser never
/// populates these today; the slot is part of the data model.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub name: Symbol,
    pub args: Option<Vec<Expr>>,
    pub span: Span,
}

/// One class member. Ordering within the class is preserved as written.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub name: Symbol,
    pub kind: MemberKind,
    pub modifiers: Modifiers,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

/// What a class member is.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Field {
        ty: Option<TypeAnn>,
        init: Option<Expr>,
    },
    Method {
        type_params: Vec<Symbol>,
        params: Vec<Param>,
        return_ty: Option<TypeAnn>,
        body: Block,
    },
    Constructor {
        params: Vec<Param>,
        body: Block,
    },
}

/// Class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Symbol,
    pub is_abstract: bool,
    pub type_params: Vec<Symbol>,
    pub superclass: Option<Symbol>,
    pub implements: Vec<Symbol>,
    pub members: Vec<ClassMember>,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

/// Enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Symbol,
    pub variants: Vec<EnumVariant>,
    pub span: Span,
}

/// One enum variant, with an optional explicit value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: Symbol,
    pub value: Option<Expr>,
    pub span: Span,
}

/// Type alias declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: Symbol,
    pub type_params: Vec<Symbol>,
    pub ty: TypeAnn,
    pub span: Span,
}

/// Expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// If statement. The alternate chains exclusively through a nested
/// `Stmt::If` (the `else (cond)` form) or terminates in a `Stmt::Block`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub consequence: Block,
    pub alternate: Option<Box<Stmt>>,
    pub span: Span,
}

/// The two for-loop shapes. A node is one or the other, never both;
/// `for { }` is the C-style shape with every slot empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ForKind {
    CStyle {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Expr>,
    },
    ForIn {
        variable: Symbol,
        iterable: Expr,
    },
}

/// For statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub kind: ForKind,
    pub body: Block,
    pub span: Span,
}

/// While statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

/// Do-while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Block,
    pub condition: Expr,
    pub span: Span,
}

/// `when` arm body: a single expression or a block.
#[derive(Debug, Clone, PartialEq)]
pub enum WhenBody {
    Expr(Expr),
    Block(Block),
}

/// One `when` arm: pattern, optional `where` guard, body.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: WhenBody,
    pub span: Span,
}

/// `when` in statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenStmt {
    pub subject: Expr,
    pub arms: Vec<WhenArm>,
    pub span: Span,
}

/// Return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Break statement, optionally carrying a value.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Continue statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    pub span: Span,
}

/// Throw statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    pub value: Expr,
    pub span: Span,
}

/// One catch clause; the type annotation makes it a typed catch.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub name: Symbol,
    pub ty: Option<TypeAnn>,
    pub body: Block,
    pub span: Span,
}

/// Try statement with its ordered catch clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub block: Block,
    pub catches: Vec<CatchClause>,
    pub span: Span,
}

/// Import specifier variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import name from "m"`
    Default(Symbol),
    /// `import { name as alias } from "m"`
    Named {
        name: Symbol,
        alias: Option<Symbol>,
    },
    /// `import * as ns from "m"`
    Namespace(Symbol),
}

/// Import declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: Symbol,
    pub span: Span,
}

/// Named export specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub name: Symbol,
    pub alias: Option<Symbol>,
}

/// What an export statement exports - exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportKind {
    /// `export fn f() { }`
    Declaration(Box<Stmt>),
    /// `export { a, b as c }` with an optional `from "m"` re-export source.
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<Symbol>,
    },
    /// `export default expr`
    Default(Expr),
}

/// Export declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDecl {
    pub kind: ExportKind,
    pub span: Span,
}

/// Statement block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Defer statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Using statement: `using (x = e) { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingStmt {
    pub name: Symbol,
    pub init: Expr,
    pub body: Block,
    pub span: Span,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(IntLit),
    Float(FloatLit),
    Str(StrLit),
    Bool(BoolLit),
    Nul(NulLit),
    Ident(Ident),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Assign(AssignExpr),
    Ternary(TernaryExpr),
    Call(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    Array(ArrayLit),
    Object(ObjectLit),
    Arrow(ArrowFn),
    Template(TemplateLit),
    /// `expr of T` - safe cast.
    Cast(CastExpr),
    /// `expr is T` - runtime type check.
    TypeCheck(TypeCheckExpr),
    /// `a..b` / `a..=b`
    Range(RangeExpr),
    Await(AwaitExpr),
    /// `go f(...)` - schedule asynchronously.
    Go(GoExpr),
    /// `chan T(cap)` - channel construction.
    Chan(ChanExpr),
    /// `ch <- v` - channel send (statement position only).
    Send(SendExpr),
    /// `<-ch` - channel receive.
    Receive(ReceiveExpr),
    /// `when` in expression position; the `else` arm is required.
    When(Box<WhenExpr>),
    This(ThisExpr),
    Super(SuperExpr),
    Yield(YieldExpr),
}

impl Expr {
    /// The source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(e) => e.span,
            Expr::Float(e) => e.span,
            Expr::Str(e) => e.span,
            Expr::Bool(e) => e.span,
            Expr::Nul(e) => e.span,
            Expr::Ident(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Assign(e) => e.span,
            Expr::Ternary(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::New(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Array(e) => e.span,
            Expr::Object(e) => e.span,
            Expr::Arrow(e) => e.span,
            Expr::Template(e) => e.span,
            Expr::Cast(e) => e.span,
            Expr::TypeCheck(e) => e.span,
            Expr::Range(e) => e.span,
            Expr::Await(e) => e.span,
            Expr::Go(e) => e.span,
            Expr::Chan(e) => e.span,
            Expr::Send(e) => e.span,
            Expr::Receive(e) => e.span,
            Expr::When(e) => e.span,
            Expr::This(e) => e.span,
            Expr::Super(e) => e.span,
            Expr::Yield(e) => e.span,
        }
    }
}

/// Integer literal.
#[derive(Debug, Clone, PartialEq)]
pub struct IntLit {
    pub value: i64,
    pub span: Span,
}

/// Float literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLit {
    pub value: f64,
    pub span: Span,
}

/// String literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: Symbol,
    pub span: Span,
}

/// Boolean literal.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

/// The `nul` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct NulLit {
    pub span: Span,
}

/// Identifier reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: Symbol,
    pub span: Span,
}

/// Binary operators (logical operators included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Nullish,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Instanceof,
    In,
}

/// Binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
    Pos,
    BitNot,
    Typeof,
    Void,
    Delete,
}

/// Unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    And,
    Or,
    Nullish,
}

/// Assignment expression. The target is an identifier or member access.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Ternary conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    pub condition: Box<Expr>,
    pub consequence: Box<Expr>,
    pub alternate: Box<Expr>,
    pub span: Span,
}

/// Function call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Member access property: `.name` or `[computed]`.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Named(Symbol),
    Computed(Box<Expr>),
}

/// Member access; `optional` marks `?.`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: MemberProp,
    pub optional: bool,
    pub span: Span,
}

/// Array literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLit {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Object literal property; `value` of `None` is shorthand (`{x}`).
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProp {
    pub key: Symbol,
    pub value: Option<Expr>,
    pub span: Span,
}

/// Object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLit {
    pub properties: Vec<ObjectProp>,
    pub span: Span,
}

/// Arrow function body: bare expression or block.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Block),
}

/// Arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFn {
    pub params: Vec<Param>,
    pub return_ty: Option<TypeAnn>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

/// One piece of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateElem {
    Chunk(String),
    Expr(Box<Expr>),
}

/// Template string literal.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLit {
    pub parts: Vec<TemplateElem>,
    pub span: Span,
}

/// Safe cast: `expr of T`.
#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub expr: Box<Expr>,
    pub ty: TypeAnn,
    pub span: Span,
}

/// Runtime type check: `expr is T`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCheckExpr {
    pub expr: Box<Expr>,
    pub ty: TypeAnn,
    pub span: Span,
}

/// Range expression: `a..b` (exclusive) or `a..=b` (inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    pub start: Box<Expr>,
    pub end: Box<Expr>,
    pub inclusive: bool,
    pub span: Span,
}

/// Await expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AwaitExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

/// Go expression; the operand is always a call.
#[derive(Debug, Clone, PartialEq)]
pub struct GoExpr {
    pub call: Box<Expr>,
    pub span: Span,
}

/// Channel construction: `chan T(cap)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChanExpr {
    pub elem_ty: Option<TypeAnn>,
    pub capacity: Option<Box<Expr>>,
    pub span: Span,
}

/// Channel send.
#[derive(Debug, Clone, PartialEq)]
pub struct SendExpr {
    pub channel: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Channel receive.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiveExpr {
    pub channel: Box<Expr>,
    pub span: Span,
}

/// `when` in expression position.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenExpr {
    pub subject: Expr,
    pub arms: Vec<WhenArm>,
    pub span: Span,
}

/// `this`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThisExpr {
    pub span: Span,
}

/// `super`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperExpr {
    pub span: Span,
}

/// `yield e?` / `yield* e`.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpr {
    pub argument: Option<Box<Expr>>,
    pub delegate: bool,
    pub span: Span,
}

// ============================================================================
// PATTERNS
// ============================================================================

/// Literal values usable in patterns.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternLiteral {
    Int(i64),
    Float(f64),
    Str(Symbol),
    Bool(bool),
    Nul,
}

/// Pattern variants used in `when` arms.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Match by value.
    Literal(LiteralPattern),
    /// Bind the subject to a name; always matches.
    Binding(BindingPattern),
    /// `n is int` - type test binding `n`.
    TypeTest(TypeTestPattern),
    /// `[a, b]`
    Array(ArrayPattern),
    /// `{k: p}`
    Object(ObjectPattern),
    /// `a | b`
    Or(OrPattern),
    /// `else` - matches anything, binds nothing.
    Else(ElsePattern),
}

impl Pattern {
    /// The source span of this pattern.
    pub fn span(&self) -> Span {
        match self {
            Pattern::Literal(p) => p.span,
            Pattern::Binding(p) => p.span,
            Pattern::TypeTest(p) => p.span,
            Pattern::Array(p) => p.span,
            Pattern::Object(p) => p.span,
            Pattern::Or(p) => p.span,
            Pattern::Else(p) => p.span,
        }
    }
}

/// Literal pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralPattern {
    pub value: PatternLiteral,
    pub span: Span,
}

/// Identifier binding pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingPattern {
    pub name: Symbol,
    pub span: Span,
}

/// Type-test pattern: binds the name and checks the type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeTestPattern {
    pub name: Symbol,
    pub ty: TypeAnn,
    pub span: Span,
}

/// Array pattern: checks shape, then matches element-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    pub elements: Vec<Pattern>,
    pub span: Span,
}

/// One field in an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPattern {
    pub key: Symbol,
    pub pattern: Pattern,
    pub span: Span,
}

/// Object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    pub fields: Vec<FieldPattern>,
    pub span: Span,
}

/// Or-pattern; alternatives may not contain bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct OrPattern {
    pub alternatives: Vec<Pattern>,
    pub span: Span,
}

/// The `else` pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ElsePattern {
    pub span: Span,
}

// ============================================================================
// TYPE ANNOTATIONS
// ============================================================================

/// Type annotations. Recorded by the parser, carried through the AST, and
/// consulted by the generator for `is`/`of` lowering - never validated.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnn {
    /// `int`, `str`, `MyClass`, ...
    Simple(SimpleType),
    /// `[T]`, `[T; 4]`
    Array(ArrayType),
    /// `{K: V}`
    Map(MapType),
    /// `{a: T, b?: U}`
    Object(ObjectType),
    /// `(A, B)`
    Tuple(TupleType),
    /// `(A, B) -> C`
    Function(FunctionType),
    /// `A | B`
    Union(UnionType),
    /// `A & B`
    Intersection(IntersectionType),
    /// `Name<A, B>`
    Generic(GenericType),
}

impl TypeAnn {
    /// The source span of this type annotation.
    pub fn span(&self) -> Span {
        match self {
            TypeAnn::Simple(t) => t.span,
            TypeAnn::Array(t) => t.span,
            TypeAnn::Map(t) => t.span,
            TypeAnn::Object(t) => t.span,
            TypeAnn::Tuple(t) => t.span,
            TypeAnn::Function(t) => t.span,
            TypeAnn::Union(t) => t.span,
            TypeAnn::Intersection(t) => t.span,
            TypeAnn::Generic(t) => t.span,
        }
    }
}

/// A bare type name.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleType {
    pub name: Symbol,
    pub span: Span,
}

/// Array type with an optional fixed size.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<TypeAnn>,
    pub size: Option<u64>,
    pub span: Span,
}

/// Map type.
#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub key: Box<TypeAnn>,
    pub value: Box<TypeAnn>,
    pub span: Span,
}

/// One named field in an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeField {
    pub name: Symbol,
    pub ty: TypeAnn,
    pub optional: bool,
    pub span: Span,
}

/// Object type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub fields: Vec<ObjectTypeField>,
    pub span: Span,
}

/// Tuple type.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub elements: Vec<TypeAnn>,
    pub span: Span,
}

/// Function type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Vec<TypeAnn>,
    pub ret: Box<TypeAnn>,
    pub span: Span,
}

/// Union type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub members: Vec<TypeAnn>,
    pub span: Span,
}

/// Intersection type.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionType {
    pub members: Vec<TypeAnn>,
    pub span: Span,
}

/// Generic type instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType {
    pub base: Symbol,
    pub args: Vec<TypeAnn>,
    pub span: Span,
}
