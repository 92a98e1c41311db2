//! Layout & naming (C5): instance attribute offsets, the static-attribute
//! global region, vtable construction, and label mangling. A stateless set
//! of pure functions over a `ClassIndex`, no fresh-label counter lives
//! here, that belongs to the `Emitter` (C6).

use crate::ast::ClassDecl;
use crate::class_index::ClassIndex;

/// Offset of instance attribute `attr_name` within objects of `class_name`,
/// counting from slot 0 (the vtable pointer). Attributes are laid out
/// ancestor-first; when a name is redeclared down the chain the most
/// derived declaration wins, so the search runs from the end of the
/// ancestor-first list.
pub fn attr_offset(index: &ClassIndex, class_name: &str, attr_name: &str) -> Option<usize> {
    let decl = index.get_class_opt(class_name)?;
    let attrs = index.all_attrs(decl);
    let pos = attrs.iter().rposition(|a| a.name == attr_name)?;
    Some(pos + 1)
}

/// Global slot holding class `class_name`'s vtable pointer: its position in
/// declaration order.
pub fn vtable_index_of(index: &ClassIndex, class_name: &str) -> Option<usize> {
    index.decls().iter().position(|d| d.name == class_name)
}

/// Global slot holding static attribute `attr_name` of `class_name`. The
/// globals `[0, N)` are vtable pointers (`N` = number of declared classes);
/// `[N, ..)` are static attributes, grouped by declaring class in
/// declaration order.
pub fn static_attr_offset(index: &ClassIndex, class_name: &str, attr_name: &str) -> Option<usize> {
    let decls = index.decls();
    let class_pos = decls.iter().position(|d| d.name == class_name)?;
    let prefix: usize = decls[..class_pos]
        .iter()
        .map(|d| d.static_attrs.len())
        .sum();
    let attr_pos = decls[class_pos]
        .static_attrs
        .iter()
        .position(|a| a.name == attr_name)?;
    Some(decls.len() + prefix + attr_pos)
}

/// Total size of the static-attribute region (the `PUSHN` operand emitted
/// once, up front, for all classes' statics).
pub fn static_region_size(index: &ClassIndex) -> usize {
    index.decls().iter().map(|d| d.static_attrs.len()).sum()
}

/// An instance method's label: `<className>_<len(methName)>_<methName>`.
/// Static methods share the same scheme by design of the VM's flat label
/// space.
pub fn method_label(class_name: &str, method_name: &str) -> String {
    format!("{class_name}_{}_{method_name}", method_name.len())
}

/// A constructor's label: `_CTOR_<className>_`.
pub fn ctor_label(class_name: &str) -> String {
    format!("_CTOR_{class_name}_")
}

/// `Vtable(C)`: the ordered `(methodName, definingClass)` table covering
/// every instance method visible from `C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vtable {
    slots: Vec<(String, String)>,
}

impl Vtable {
    /// Builds the vtable for `decl`: ancestor-first, each class contributing
    /// its `inst_methods` in declared order. A name already present keeps
    /// its slot (no duplication) but has its defining class updated to the
    /// most-derived owner: the override case.
    pub fn make(index: &ClassIndex, decl: &ClassDecl) -> Vtable {
        let mut chain = index.ancestors(decl);
        chain.reverse();
        chain.push(decl);

        let mut slots: Vec<(String, String)> = Vec::new();
        for class in chain {
            for m in &class.inst_methods {
                match slots.iter_mut().find(|(name, _)| *name == m.name) {
                    Some(entry) => entry.1 = class.name.clone(),
                    None => slots.push((m.name.clone(), class.name.clone())),
                }
            }
        }
        Vtable { slots }
    }

    pub fn offset(&self, method_name: &str) -> Option<usize> {
        self.slots.iter().position(|(name, _)| name == method_name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `(slot index, method name, defining class)` in slot order, the
    /// traversal order program-level emission needs to build the vtable.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, (name, class))| (i, name.as_str(), class.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CtorDecl, MethodDecl, Param, Program, Stmt, SuperSpec};

    fn empty_body() -> Stmt {
        Stmt::Block {
            vars: vec![],
            body: vec![],
        }
    }

    fn class(
        name: &str,
        super_name: Option<&str>,
        attrs: &[&str],
        static_attrs: &[&str],
        methods: &[(&str, bool)],
    ) -> ClassDecl {
        ClassDecl {
            name: name.to_string(),
            super_spec: super_name.map(|s| SuperSpec {
                name: s.to_string(),
                args: vec![],
            }),
            ctor: CtorDecl {
                name: name.to_string(),
                params: vec![],
                body: empty_body(),
            },
            inst_attrs: attrs
                .iter()
                .map(|a| Param {
                    name: a.to_string(),
                    class_name: "Integer".to_string(),
                })
                .collect(),
            static_attrs: static_attrs
                .iter()
                .map(|a| Param {
                    name: a.to_string(),
                    class_name: "Integer".to_string(),
                })
                .collect(),
            inst_methods: methods
                .iter()
                .map(|(m, is_override)| MethodDecl {
                    name: m.to_string(),
                    params: vec![],
                    ret_type: None,
                    is_override: *is_override,
                    body: empty_body(),
                })
                .collect(),
            static_methods: vec![],
        }
    }

    #[test]
    fn attr_offsets_are_ancestor_first_and_one_based() {
        let program = Program {
            decls: vec![
                class("A", None, &["x"], &[], &[]),
                class("B", Some("A"), &["y"], &[], &[]),
            ],
            instr: empty_body(),
        };
        let index = ClassIndex::new(&program);
        assert_eq!(attr_offset(&index, "B", "x"), Some(1));
        assert_eq!(attr_offset(&index, "B", "y"), Some(2));
        assert_eq!(attr_offset(&index, "A", "x"), Some(1));
    }

    #[test]
    fn static_attrs_follow_vtable_globals_grouped_by_class() {
        let program = Program {
            decls: vec![
                class("A", None, &[], &["s1", "s2"], &[]),
                class("B", None, &[], &["s3"], &[]),
            ],
            instr: empty_body(),
        };
        let index = ClassIndex::new(&program);
        // 2 classes -> globals 0,1 are vtables; statics start at 2.
        assert_eq!(static_attr_offset(&index, "A", "s1"), Some(2));
        assert_eq!(static_attr_offset(&index, "A", "s2"), Some(3));
        assert_eq!(static_attr_offset(&index, "B", "s3"), Some(4));
        assert_eq!(static_region_size(&index), 3);
    }

    #[test]
    fn vtable_is_ancestor_first_and_override_keeps_slot() {
        let program = Program {
            decls: vec![
                class("A", None, &[], &[], &[("m", false), ("n", false)]),
                class("B", Some("A"), &[], &[], &[("m", true), ("p", false)]),
            ],
            instr: empty_body(),
        };
        let index = ClassIndex::new(&program);
        let b = index.get_class("B").unwrap();
        let vt = Vtable::make(&index, b);
        assert_eq!(vt.offset("m"), Some(0));
        assert_eq!(vt.offset("n"), Some(1));
        assert_eq!(vt.offset("p"), Some(2));

        let entries: Vec<_> = vt.entries().collect();
        assert_eq!(entries[0], (0, "m", "B"));
        assert_eq!(entries[1], (1, "n", "A"));
    }

    #[test]
    fn labels_follow_the_mangling_scheme() {
        assert_eq!(method_label("Point", "dist"), "Point_4_dist");
        assert_eq!(ctor_label("Point"), "_CTOR_Point_");
    }
}
