//! Type utilities (C3): expression typing, the subtype test `is_base`, and
//! the identifier environment shared by the checker and (for `this`/`super`
//! resolution only) the code generator.

use crate::ast::Expr;
use crate::class_index::ClassIndex;

/// Built-in pseudo-class names. No `ClassDecl` exists for these; they are
/// recognized by name comparison wherever the checker or generator needs to
/// special-case them.
pub const INTEGER: &str = "Integer";
pub const STRING: &str = "String";
/// Pseudo-type of an expression that produces no value (a call whose method
/// has no declared return type). Never assignable, never a valid argument.
pub const VOID: &str = "_Void";

/// Ordered identifier -> type-name environment. A plain association list
/// rather than a `HashMap`: scopes are built by `extended`, which clones and
/// appends cheaply without disturbing the outer scope's own view, and
/// lookup is last-wins so an inner binding correctly shadows an outer one of
/// the same name.
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: Vec<(String, String)>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn bind(&mut self, name: impl Into<String>, class_name: impl Into<String>) {
        self.bindings.push((name.into(), class_name.into()));
    }

    /// Returns a new environment extending `self` with `bindings`, leaving
    /// `self` untouched.
    pub fn extended(&self, bindings: impl IntoIterator<Item = (String, String)>) -> Env {
        let mut next = self.clone();
        next.bindings.extend(bindings);
        next
    }
}

/// `is_base(derived, base)`: true iff `derived == base` or `base` appears in
/// `ancestors(get_class(derived))`. Both arguments must name concrete
/// classes; callers must gate `Integer`/`String`/`_Void` before calling.
pub fn is_base(index: &ClassIndex, derived: &str, base: &str) -> bool {
    index.is_base(derived, base)
}

/// Type of an expression under `env`. Panics are never used here: every
/// lookup that can fail under a checked program is instead routed through
/// the checker first, so by the time the generator calls this the AST is
/// known-good; the one exception (`Id` not bound) is guarded by the
/// checker's `UnknownIdentifier` rule before generation ever begins.
pub fn get_expr_type(index: &ClassIndex, env: &Env, expr: &Expr) -> Option<String> {
    Some(match expr {
        Expr::Cste(_) | Expr::BinOp(..) | Expr::UMinus(_) => INTEGER.to_string(),
        Expr::Str(_) | Expr::StrCat(..) => STRING.to_string(),
        Expr::Id(name) => env.get(name)?.to_string(),
        Expr::Attr(base, field) => {
            let base_ty = get_expr_type(index, env, base)?;
            let base_decl = index.get_class_opt(&base_ty)?;
            let attr = index.find_inst_attr(field, base_decl)?;
            attr.class_name.clone()
        }
        Expr::StaticAttr(class_name, field) => {
            let decl = index.get_class_opt(class_name)?;
            let attr = index.get_static_attr(field, decl)?;
            attr.class_name.clone()
        }
        Expr::Call(receiver, method, _) => {
            let recv_ty = get_expr_type(index, env, receiver)?;
            if recv_ty == INTEGER || recv_ty == STRING {
                // Built-in methods never produce a value the checker lets
                // flow anywhere but `Expr`-statement position in practice,
                // but typing still falls out of the same rule: toString
                // yields String, print/println yield the receiver's type.
                match (recv_ty.as_str(), method.as_str()) {
                    (INTEGER, "toString") => STRING.to_string(),
                    (STRING, "print" | "println") => STRING.to_string(),
                    _ => return None,
                }
            } else {
                let decl = index.get_class_opt(&recv_ty)?;
                let meth = index.find_method(method, decl)?;
                meth.ret_type.clone().unwrap_or_else(|| VOID.to_string())
            }
        }
        Expr::StaticCall(class_name, method, _) => {
            let decl = index.get_class_opt(class_name)?;
            let meth = index.get_static_method(method, decl)?;
            meth.ret_type.clone().unwrap_or_else(|| VOID.to_string())
        }
        Expr::New(class_name, _) => class_name.clone(),
        Expr::StaticCast(class_name, _) => class_name.clone(),
    })
}
