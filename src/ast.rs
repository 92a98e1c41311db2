//! Abstract syntax tree for Minim.
//!
//! The AST is produced by an external parser (out of scope for this crate)
//! and is read-only from here on: the checker and code generator only ever
//! borrow it. Every node derives `Serialize`/`Deserialize` so a parser can
//! hand a program to the `minimc` binary as JSON.

use serde::{Deserialize, Serialize};

/// A full Minim program: a sequence of class declarations plus the
/// top-level statement that runs as the entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub decls: Vec<ClassDecl>,
    pub instr: Stmt,
}

/// `super` clause of a class declaration: the superclass name plus the
/// argument expressions passed to its constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperSpec {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub super_spec: Option<SuperSpec>,
    pub ctor: CtorDecl,
    pub inst_attrs: Vec<Param>,
    pub static_attrs: Vec<Param>,
    pub inst_methods: Vec<MethodDecl>,
    pub static_methods: Vec<MethodDecl>,
}

/// A formal parameter, local variable, or attribute: a name typed by the
/// name of a declared class (never `Integer`/`String`/`_Void` for
/// attributes/params that must name a concrete class, though the parser is
/// free to hand those through here, the checker is what rejects them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtorDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret_type: Option<String>,
    pub is_override: bool,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// A scope introducing `vars` ahead of its body statements.
    Block { vars: Vec<Param>, body: Vec<Stmt> },
    Assign { lhs: Expr, rhs: Expr },
    Return,
    Ite {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Id(String),
    Cste(i64),
    Str(String),
    Attr(Box<Expr>, String),
    StaticAttr(String, String),
    UMinus(Box<Expr>),
    BinOp(Box<Expr>, Op, Box<Expr>),
    StrCat(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, String, Vec<Expr>),
    StaticCall(String, String, Vec<Expr>),
    New(String, Vec<Expr>),
    StaticCast(String, Box<Expr>),
}

/// Reserved identifiers that can never name a parameter, local variable, or
/// be assigned to directly: `this`, `super`, `result`.
pub const RESERVED_NAMES: [&str; 3] = ["this", "super", "result"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

impl Program {
    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.decls.iter().find(|d| d.name == name)
    }
}
