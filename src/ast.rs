//! The Jerboa abstract syntax tree.
//!
//! Every node is a plain Rust enum variant (tag + payload) rather than a class
//! hierarchy, so the interpreter's statement/expression dispatch is exhaustive pattern
//! matching instead of a dynamic-dispatch or `instanceof`-style chain. The tree is
//! immutable after parsing: nothing under `src/parse.rs` ever hands back a `&mut`
//! reference into one of these nodes.

use crate::token::Position;
use crate::Identifier;
use smallvec::SmallVec;

/// Small inline vector for AST children, mirroring the teacher's `StaticVec`: most
/// statement lists, `write` argument lists, and `if`/`elseif` chains hold a handful of
/// items, so four inline slots avoid a heap allocation for the common case.
pub type NodeVec<T> = SmallVec<[T; 4]>;

/// `STMT_LIST` — an ordered sequence of statements forming a program or a block body.
pub type Block = NodeVec<Stmt>;

/// The parser's top-level product: a `STMT_LIST` rooted at the program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program(pub Block);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
    Not,
}

/// One argument of a `write(...)` call: `cr`, a string literal, or an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteArg {
    /// `CR_OUT`
    Cr,
    /// `STRLIT_OUT` — text retains its surrounding quote characters.
    StrLit(Identifier),
    Expr(Expr),
}

/// The two lvalue forms an assignment can target.
#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    /// `SIMPLE_VAR`
    Simple(Identifier),
    /// `ARRAY_VAR`
    Array(Identifier, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `WRITE_STMT`
    Write(NodeVec<WriteArg>, Position),
    /// `FUNC_DEF`
    FuncDef(Identifier, Block, Position),
    /// `FUNC_CALL` used as a statement: the return value, if any, is discarded.
    FuncCall(Identifier, Position),
    /// `IF_STMT` — `branches` holds the `if`/`elseif` `(cond, body)` pairs in order;
    /// `else_body`, if present, is the trailing unconditional branch.
    If {
        branches: NodeVec<(Expr, Block)>,
        else_body: Option<Block>,
        position: Position,
    },
    /// `WHILE_STMT`
    While(Expr, Block, Position),
    /// `RETURN_STMT`
    Return(Expr, Position),
    /// `ASSN_STMT`
    Assign(LValue, Expr, Position),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `BIN_OP` — left-nested, so `a + b - c` is `BinOp(Sub, BinOp(Add, a, b), c)`.
    BinOp(BinOp, Box<Expr>, Box<Expr>, Position),
    /// `UN_OP`
    UnOp(UnOp, Box<Expr>, Position),
    /// `NUMLIT_VAL`, already coerced to its integer value (see `crate::value::text_to_int`).
    NumLit(i64, Position),
    /// `BOOLLIT_VAL`
    BoolLit(bool, Position),
    /// `READNUM_CALL`
    ReadNum(Position),
    /// `SIMPLE_VAR` used in expression position.
    Var(Identifier, Position),
    /// `ARRAY_VAR` used in expression position.
    ArrayVar(Identifier, Box<Expr>, Position),
    /// `FUNC_CALL` used in expression position: its value is whatever `return` last
    /// evaluated inside the call, or 0 if the function body never returned.
    FuncCall(Identifier, Position),
}

impl Expr {
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Expr::BinOp(_, _, _, p)
            | Expr::UnOp(_, _, p)
            | Expr::NumLit(_, p)
            | Expr::BoolLit(_, p)
            | Expr::ReadNum(p)
            | Expr::Var(_, p)
            | Expr::ArrayVar(_, _, p)
            | Expr::FuncCall(_, p) => *p,
        }
    }
}
