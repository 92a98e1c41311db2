//! Class index (C2): lookup by name, ancestor chains, and method/attribute
//! resolution through inheritance.
//!
//! Class lookup is a linear scan by design: declaration order is
//! semantically load-bearing for static-attribute layout and vtable global
//! indexing (see `codegen::layout`), so nothing here is permitted to change
//! the *order* decls are visited in. A name->index map is used purely as a
//! lookup accelerator and never changes observable iteration order.

use std::collections::HashMap;

use crate::ast::{ClassDecl, MethodDecl, Param, Program};
use crate::error::{CheckResult, ContextualError, ContextualErrorKind};

pub struct ClassIndex<'a> {
    program: &'a Program,
    by_name: HashMap<&'a str, usize>,
}

impl<'a> ClassIndex<'a> {
    pub fn new(program: &'a Program) -> Self {
        let by_name = program
            .decls
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.as_str(), i))
            .collect();
        ClassIndex { program, by_name }
    }

    pub fn decls(&self) -> &'a [ClassDecl] {
        &self.program.decls
    }

    pub fn get_class_opt(&self, name: &str) -> Option<&'a ClassDecl> {
        self.by_name.get(name).map(|&i| &self.program.decls[i])
    }

    pub fn get_class(&self, name: &str) -> CheckResult<&'a ClassDecl> {
        self.get_class_opt(name).ok_or_else(|| {
            ContextualError::new(
                ContextualErrorKind::UnknownClass,
                format!("unknown class '{name}'"),
            )
        })
    }

    /// Bottom-to-top ancestor chain (immediate superclass first). Terminates
    /// because the checker has already ruled out inheritance cycles before
    /// any other component relies on this.
    pub fn ancestors(&self, decl: &'a ClassDecl) -> Vec<&'a ClassDecl> {
        let mut chain = Vec::new();
        let mut current = decl;
        while let Some(super_spec) = &current.super_spec {
            match self.get_class_opt(&super_spec.name) {
                Some(super_decl) => {
                    chain.push(super_decl);
                    current = super_decl;
                }
                None => break,
            }
        }
        chain
    }

    /// True iff `base` is `derived` or appears in `derived`'s ancestor chain.
    pub fn is_base(&self, derived: &str, base: &str) -> bool {
        if derived == base {
            return true;
        }
        let Some(decl) = self.get_class_opt(derived) else {
            return false;
        };
        self.ancestors(decl).iter().any(|a| a.name == base)
    }

    /// Search `decl.inst_methods`, falling back to ancestors; instance
    /// methods shadow same-named ancestor methods.
    pub fn find_method(&self, name: &str, decl: &'a ClassDecl) -> Option<&'a MethodDecl> {
        if let Some(m) = decl.inst_methods.iter().find(|m| m.name == name) {
            return Some(m);
        }
        let super_spec = decl.super_spec.as_ref()?;
        let super_decl = self.get_class_opt(&super_spec.name)?;
        self.find_method(name, super_decl)
    }

    /// Search `decl.inst_attrs`, falling back to ancestors.
    pub fn find_inst_attr(&self, name: &str, decl: &'a ClassDecl) -> Option<&'a Param> {
        if let Some(a) = decl.inst_attrs.iter().find(|a| a.name == name) {
            return Some(a);
        }
        let super_spec = decl.super_spec.as_ref()?;
        let super_decl = self.get_class_opt(&super_spec.name)?;
        self.find_inst_attr(name, super_decl)
    }

    /// Static attributes are never inherited: only `decl.static_attrs` is
    /// searched.
    pub fn get_static_attr(&self, name: &str, decl: &'a ClassDecl) -> Option<&'a Param> {
        decl.static_attrs.iter().find(|a| a.name == name)
    }

    /// Static methods are never inherited: only `decl.static_methods` is
    /// searched.
    pub fn get_static_method(&self, name: &str, decl: &'a ClassDecl) -> Option<&'a MethodDecl> {
        decl.static_methods.iter().find(|m| m.name == name)
    }

    /// All instance attributes of `decl`, ancestor-first (the layout order
    /// C5 depends on): `all_attrs(super) ++ decl.inst_attrs`.
    pub fn all_attrs(&self, decl: &'a ClassDecl) -> Vec<&'a Param> {
        let mut attrs = Vec::new();
        let mut chain = self.ancestors(decl);
        chain.reverse(); // root-most ancestor first
        for ancestor in chain {
            attrs.extend(ancestor.inst_attrs.iter());
        }
        attrs.extend(decl.inst_attrs.iter());
        attrs
    }
}
