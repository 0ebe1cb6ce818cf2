//! The Garnet AST. The parser desugars most surface forms into message
//! sends, so the node set stays small.

use crate::span::Span;

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expression(Expr),
    /// `class C ... end`, `class C < S ... end`, or `module M ... end`.
    ClassDef {
        name: String,
        superclass: Option<Expr>,
        body: Vec<Stmt>,
        is_module: bool,
    },
    /// `def m(a, b) ... end` or `def self.m ... end`.
    MethodDef {
        name: String,
        self_method: bool,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntegerLiteral(i64),
    StringLiteral(String),
    BooleanLiteral(bool),
    NullLiteral,
    SelfExpr,
    /// A bare lowercase name: a local read if the name was assigned earlier
    /// in scope, otherwise an implicit send to `self`. The compiler decides.
    Identifier(String),
    InstanceVariable(String),
    /// A bare constant, resolved against the lexical scope chain.
    Constant(String),
    /// `scope::Name` — strict qualified lookup.
    ScopeResolution {
        scope: Box<Expr>,
        name: String,
    },
    /// Assignment to a local, instance variable, or constant.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Short-circuit `&&` / `||`.
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A message send. Operators, indexing and attribute writes all lower
    /// to this form, so they dispatch through the method tables.
    Send {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
        block: Option<BlockLiteral>,
    },
    Yield {
        args: Vec<Expr>,
    },
    ArrayLiteral(Vec<Expr>),
    /// `{ k: v }` — keys are stored as strings.
    HashLiteral(Vec<(String, Expr)>),
    RangeLiteral {
        start: Box<Expr>,
        end: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
}

/// A block literal attached to a send: `do |p| ... end` or `{ |p| ... }`.
#[derive(Debug, Clone)]
pub struct BlockLiteral {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}
