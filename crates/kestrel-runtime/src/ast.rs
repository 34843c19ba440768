//! Abstract Syntax Tree (AST) definitions
//!
//! The parser produces this tree; the folder, resolver, and interpreter
//! consume it. Every expression the resolver can pin to a scope depth
//! (variables, assignments, `this`, `super`) carries a `NodeId` so the
//! locals table can key on node identity rather than name or position.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// AST schema version
///
/// Included in JSON dumps so tooling can detect incompatible trees.
pub const AST_VERSION: u32 = 1;

/// Identity of a resolvable expression node, unique per interpreter session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Top-level program: a statement sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Versioned AST wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    /// The actual program AST
    #[serde(flatten)]
    pub program: Program,
}

impl VersionedProgram {
    /// Create a new versioned program wrapper
    pub fn new(program: Program) -> Self {
        Self {
            ast_version: AST_VERSION,
            program,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Program> for VersionedProgram {
    fn from(program: Program) -> Self {
        Self::new(program)
    }
}

/// Function or method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: Identifier,
    /// Superclass reference (`class Circle : Shape`)
    pub superclass: Option<VariableExpr>,
    pub methods: Vec<Rc<FunctionDecl>>,
    pub span: Span,
}

/// Block of statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    VarDecl(VarDecl),
    FunctionDecl(Rc<FunctionDecl>),
    ClassDecl(ClassDecl),
    Print(PrintStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Throw(ThrowStmt),
    Try(TryStmt),
    Block(Block),
    Expr(ExprStmt),
}

/// Variable declaration; a missing initializer defaults to null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: Identifier,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Print statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintStmt {
    pub expr: Expr,
    pub span: Span,
}

/// If statement; the else branch is another if (else-if chain) or a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// While loop
///
/// `increment` is the synthetic step statement attached by the `for`
/// desugar. It runs after each completed iteration and again when the
/// body ends in `continue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub increment: Option<Box<Stmt>>,
    pub span: Span,
}

/// Return statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Throw statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowStmt {
    pub value: Expr,
    pub span: Span,
}

/// Try statement with optional catch and finally clauses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStmt {
    pub body: Block,
    pub catch: Option<CatchClause>,
    pub finally: Option<Block>,
    pub span: Span,
}

/// Catch clause; the binding is optional (`catch { ... }` is legal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub binding: Option<Identifier>,
    pub body: Block,
    pub span: Span,
}

/// Expression statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal, Span),
    Variable(VariableExpr),
    Assign(AssignExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Index(IndexExpr),
    IndexSet(IndexSetExpr),
    Get(GetExpr),
    Set(SetExpr),
    ListLiteral(ListLiteral),
    Group(GroupExpr),
    This(ThisExpr),
    Super(SuperExpr),
}

/// Variable reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpr {
    pub id: NodeId,
    pub name: Identifier,
}

/// Assignment to a name (`x = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub id: NodeId,
    pub name: Identifier,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Unary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
    pub span: Span,
}

/// Binary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Function call expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// List index read (`xs[i]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// List index write (`xs[i] = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSetExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Property read (`obj.name`); on lists this reaches the builtin methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetExpr {
    pub object: Box<Expr>,
    pub name: Identifier,
    pub span: Span,
}

/// Property write (`obj.name = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetExpr {
    pub object: Box<Expr>,
    pub name: Identifier,
    pub value: Box<Expr>,
    pub span: Span,
}

/// List literal expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLiteral {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Grouped expression (parenthesized)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

/// `this` expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThisExpr {
    pub id: NodeId,
    pub span: Span,
}

/// `super.method` expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperExpr {
    pub id: NodeId,
    pub method: Identifier,
    pub span: Span,
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate, // -
    Not,    // !
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical (short-circuit, result is an operand value)
    And,
    Or,
}

// Helper methods for getting spans from AST nodes

impl Expr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Variable(v) => v.name.span,
            Expr::Assign(a) => a.span,
            Expr::Unary(u) => u.span,
            Expr::Binary(b) => b.span,
            Expr::Call(c) => c.span,
            Expr::Index(i) => i.span,
            Expr::IndexSet(i) => i.span,
            Expr::Get(g) => g.span,
            Expr::Set(s) => s.span,
            Expr::ListLiteral(l) => l.span,
            Expr::Group(g) => g.span,
            Expr::This(t) => t.span,
            Expr::Super(s) => s.span,
        }
    }
}

impl Stmt {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(v) => v.span,
            Stmt::FunctionDecl(f) => f.span,
            Stmt::ClassDecl(c) => c.span,
            Stmt::Print(p) => p.span,
            Stmt::If(i) => i.span,
            Stmt::While(w) => w.span,
            Stmt::Return(r) => r.span,
            Stmt::Break(span) => *span,
            Stmt::Continue(span) => *span,
            Stmt::Throw(t) => t.span,
            Stmt::Try(t) => t.span,
            Stmt::Block(b) => b.span,
            Stmt::Expr(e) => e.span,
        }
    }
}
