//! AST node types for the Tern parser.
//!
//! Every AST node carries a [`Span`] of absolute positions. Error recovery is
//! represented by `Error(Span)` variants in [`Decl`], [`Stmt`] and
//! [`TypeExpr`], and by [`Expr::Bad`].

use serde::{Deserialize, Serialize};
use tern_common::Ident;
use tern_source::{Pos, Span};

// ============================================================================
// Top-level
// ============================================================================

/// A complete Tern source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// The package name, absent when the package clause is missing.
    pub package: Option<Name>,
    /// Import declarations, in source order.
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations, in source order.
    pub decls: Vec<Decl>,
    /// The span from the first byte to the end-of-file position.
    pub span: Span,
}

impl SourceFile {
    /// Returns the names declared at top level, in source order.
    ///
    /// The result is the same for a `Full` and a `Header` parse of the same
    /// content.
    pub fn top_level_names(&self) -> Vec<&Name> {
        self.decls.iter().filter_map(Decl::name).collect()
    }

    /// Returns the top-level declaration whose span contains `pos`.
    pub fn decl_at(&self, pos: Pos) -> Option<&Decl> {
        self.decls.iter().find(|d| d.span().contains(pos))
    }
}

/// An identifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// The interned identifier.
    pub ident: Ident,
    /// Source span.
    pub span: Span,
}

/// `import "path"`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSpec {
    /// The import path with quotes removed.
    pub path: String,
    /// Source span of the path literal.
    pub span: Span,
}

// ============================================================================
// Declarations
// ============================================================================

/// A top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Decl {
    /// `const NAME [Type] = Expr`
    Const(ValueDecl),
    /// `var NAME [Type] [= Expr]`
    Var(ValueDecl),
    /// `type NAME Type`
    Type(TypeDecl),
    /// A function or method.
    Func(FuncDecl),
    /// An error node produced during error recovery.
    Error(Span),
}

impl Decl {
    /// Returns the declared name, if any.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Decl::Const(d) | Decl::Var(d) => Some(&d.name),
            Decl::Type(d) => Some(&d.name),
            Decl::Func(d) => Some(&d.name),
            Decl::Error(_) => None,
        }
    }

    /// Returns the source span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Decl::Const(d) | Decl::Var(d) => d.span,
            Decl::Type(d) => d.span,
            Decl::Func(d) => d.span,
            Decl::Error(span) => *span,
        }
    }

    /// Short keyword describing the declaration kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Const(_) => "const",
            Decl::Var(_) => "var",
            Decl::Type(_) => "type",
            Decl::Func(d) if d.receiver.is_some() => "method",
            Decl::Func(_) => "func",
            Decl::Error(_) => "error",
        }
    }
}

/// A `const` or `var` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueDecl {
    /// The declared name.
    pub name: Name,
    /// Optional explicit type.
    pub ty: Option<TypeExpr>,
    /// Optional initializer.
    pub value: Option<Expr>,
    /// Source span.
    pub span: Span,
}

/// A `type` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// The declared name.
    pub name: Name,
    /// The underlying type.
    pub ty: TypeExpr,
    /// Source span.
    pub span: Span,
}

/// A function or method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    /// The receiver parameter for methods.
    pub receiver: Option<Param>,
    /// The function name.
    pub name: Name,
    /// Parameters.
    pub params: Vec<Param>,
    /// Optional result type.
    pub result: Option<TypeExpr>,
    /// The body, if present and parsed.
    pub body: FuncBody,
    /// Source span.
    pub span: Span,
}

/// The body of a function declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FuncBody {
    /// No body (external declaration).
    None,
    /// Body present but skipped by a header-only parse.
    Skipped(Span),
    /// Fully parsed body.
    Parsed(Block),
}

/// A function parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name; unnamed parameters carry only a type.
    pub name: Option<Name>,
    /// Parameter type.
    pub ty: TypeExpr,
    /// Source span.
    pub span: Span,
}

// ============================================================================
// Types
// ============================================================================

/// A type expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeExpr {
    /// `name` or `pkg.name`
    Named {
        /// Package qualifier.
        package: Option<Name>,
        /// Type name.
        name: Name,
        /// Source span.
        span: Span,
    },
    /// `*T`
    Pointer {
        /// Pointee type.
        elem: Box<TypeExpr>,
        /// Source span.
        span: Span,
    },
    /// `[]T`
    Slice {
        /// Element type.
        elem: Box<TypeExpr>,
        /// Source span.
        span: Span,
    },
    /// `struct { ... }`
    Struct {
        /// Fields in declaration order.
        fields: Vec<Field>,
        /// Source span.
        span: Span,
    },
    /// `func(params) result`
    Func {
        /// Parameters.
        params: Vec<Param>,
        /// Optional result type.
        result: Option<Box<TypeExpr>>,
        /// Source span.
        span: Span,
    },
    /// An error node produced during error recovery.
    Error(Span),
}

impl TypeExpr {
    /// Returns the source span of this type.
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named { span, .. }
            | TypeExpr::Pointer { span, .. }
            | TypeExpr::Slice { span, .. }
            | TypeExpr::Struct { span, .. }
            | TypeExpr::Func { span, .. }
            | TypeExpr::Error(span) => *span,
        }
    }
}

/// A struct field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: Name,
    /// Field type.
    pub ty: TypeExpr,
    /// Source span.
    pub span: Span,
}

// ============================================================================
// Statements
// ============================================================================

/// A `{ ... }` statement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Statements in source order.
    pub stmts: Vec<Stmt>,
    /// Source span, including both braces.
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// An expression evaluated for its effect.
    Expr(Expr),
    /// `lhs op rhs`
    Assign {
        /// Assignment targets.
        lhs: Vec<Expr>,
        /// The assignment operator.
        op: AssignOp,
        /// Assigned values.
        rhs: Vec<Expr>,
        /// Source span.
        span: Span,
    },
    /// `x++` or `x--`
    IncDec {
        /// The operand.
        target: Expr,
        /// `true` for `++`.
        increment: bool,
        /// Source span.
        span: Span,
    },
    /// A local `var` or `const`.
    Decl(Box<Decl>),
    /// `return [values]`
    Return {
        /// Returned values.
        values: Vec<Expr>,
        /// Source span.
        span: Span,
    },
    /// `if` statement.
    If(Box<IfStmt>),
    /// `for [cond] { ... }`
    For {
        /// Loop condition; `None` loops forever.
        cond: Option<Expr>,
        /// Loop body.
        body: Block,
        /// Source span.
        span: Span,
    },
    /// `break`
    Break(Span),
    /// `continue`
    Continue(Span),
    /// A nested block.
    Block(Block),
    /// An empty statement (a bare `;`).
    Empty(Span),
    /// An error node produced during error recovery.
    Error(Span),
}

impl Stmt {
    /// Returns the source span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(e) => e.span(),
            Stmt::Assign { span, .. }
            | Stmt::IncDec { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::For { span, .. } => *span,
            Stmt::Decl(d) => d.span(),
            Stmt::If(s) => s.span,
            Stmt::Block(b) => b.span,
            Stmt::Break(span) | Stmt::Continue(span) | Stmt::Empty(span) | Stmt::Error(span) => {
                *span
            }
        }
    }
}

/// `if [init;] cond { ... } [else ...]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStmt {
    /// Optional init statement.
    pub init: Option<Stmt>,
    /// The condition.
    pub cond: Expr,
    /// The taken branch.
    pub then_block: Block,
    /// Optional else branch.
    pub else_branch: Option<ElseBranch>,
    /// Source span.
    pub span: Span,
}

/// The `else` part of an `if` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElseBranch {
    /// `else if ...`
    If(Box<IfStmt>),
    /// `else { ... }`
    Block(Block),
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// A name reference.
    Name(Name),
    /// A literal, kept as its source text.
    Literal {
        /// Literal kind.
        kind: LitKind,
        /// Raw source text.
        text: String,
        /// Source span.
        span: Span,
    },
    /// A prefix operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// `callee(args)`
    Call {
        /// The called expression.
        callee: Box<Expr>,
        /// Arguments.
        args: Vec<Expr>,
        /// Source span.
        span: Span,
    },
    /// `base.selector`
    Selector {
        /// The operand.
        base: Box<Expr>,
        /// The selected name; synthetic `_` when missing.
        selector: Name,
        /// Source span.
        span: Span,
    },
    /// `base[index]`
    Index {
        /// The indexed expression.
        base: Box<Expr>,
        /// The index.
        index: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// `(inner)`
    Paren {
        /// The wrapped expression.
        inner: Box<Expr>,
        /// Source span.
        span: Span,
    },
    /// An error node produced during error recovery.
    Bad(Span),
}

impl Expr {
    /// Returns the source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Name(n) => n.span,
            Expr::Literal { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Selector { span, .. }
            | Expr::Index { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Bad(span) => *span,
        }
    }
}

/// Literal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    /// Integer literal.
    Int,
    /// Floating-point literal.
    Float,
    /// String literal.
    String,
    /// Character literal.
    Char,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `^`
    BitNot,
    /// `*`
    Deref,
    /// `&`
    AddrOf,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `||`
    LogOr,
    /// `&&`
    LogAnd,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&`
    BitAnd,
}
