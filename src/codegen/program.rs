//! Program-level emission order, constructor emission, and method
//! emission: the outermost layer of C7.

use super::layout::{self, Vtable};
use super::state::{Addrs, GenState};
use super::{CodeGenError, GenResult, Generator};
use crate::ast::{ClassDecl, MethodDecl, Program};
use crate::typeutil::Env;

impl<'a> Generator<'a> {
    pub(super) fn emit_program(&mut self, program: &'a Program) -> GenResult<()> {
        self.emitter.comment("vtables");
        for decl in &program.decls {
            self.emit_vtable(decl)?;
        }

        self.emitter
            .comment("static attribute region");
        self.emitter
            .pushn(layout::static_region_size(&self.index));

        self.emitter.start();
        self.emit_stmt(&GenState::new(), &program.instr)?;
        self.emitter.stop();

        for decl in &program.decls {
            self.emit_ctor(decl)?;
            for m in &decl.inst_methods {
                self.emit_inst_method(decl, m)?;
            }
            for m in &decl.static_methods {
                self.emit_static_method(&decl.name, m)?;
            }
        }
        Ok(())
    }

    fn emit_vtable(&mut self, decl: &'a ClassDecl) -> GenResult<()> {
        let vt = Vtable::make(&self.index, decl);
        self.emitter.alloc(vt.len());
        for (slot, method_name, defining_class) in vt.entries() {
            self.emitter.dupn(1);
            self.emitter
                .pusha(&layout::method_label(defining_class, method_name));
            self.emitter.store(slot);
        }
        tracing::debug!("built vtable for {} ({} slots)", decl.name, vt.len());
        Ok(())
    }

    fn emit_ctor(&mut self, decl: &'a ClassDecl) -> GenResult<()> {
        self.emitter.label(&layout::ctor_label(&decl.name));

        let addrs = Addrs::make_ctor_addrs(&decl.ctor.params);
        let mut env = Env::new();
        env.bind("this", &decl.name);
        if let Some(super_spec) = &decl.super_spec {
            env.bind("super", &super_spec.name);
        }
        for p in &decl.ctor.params {
            env.bind(&p.name, &p.class_name);
        }
        let state = GenState {
            addrs: addrs.clone(),
            env,
        };

        if let Some(super_spec) = &decl.super_spec {
            let this_slot = addrs
                .get("this")
                .ok_or_else(|| CodeGenError::new("constructor frame has no 'this' slot"))?;
            self.emitter.pushl(this_slot);
            for arg in &super_spec.args {
                self.emit_expr(&state, arg)?;
            }
            self.emitter
                .pusha(&layout::ctor_label(&super_spec.name));
            self.emitter.call();
            self.emitter.popn(super_spec.args.len() + 1);
        }

        self.emit_stmt(&state, &decl.ctor.body)?;
        self.emitter.return_();
        Ok(())
    }

    fn emit_inst_method(&mut self, decl: &'a ClassDecl, m: &'a MethodDecl) -> GenResult<()> {
        self.emitter
            .label(&layout::method_label(&decl.name, &m.name));

        let has_result = m.ret_type.is_some();
        let addrs = Addrs::make_method_addrs(&m.params, has_result);
        let mut env = Env::new();
        env.bind("this", &decl.name);
        if let Some(super_spec) = &decl.super_spec {
            env.bind("super", &super_spec.name);
        }
        for p in &m.params {
            env.bind(&p.name, &p.class_name);
        }
        if let Some(ret) = &m.ret_type {
            env.bind("result", ret);
        }

        let state = GenState { addrs, env };
        self.emit_stmt(&state, &m.body)?;
        self.emitter.return_();
        Ok(())
    }

    fn emit_static_method(&mut self, class_name: &str, m: &'a MethodDecl) -> GenResult<()> {
        // Static methods share the instance-method label namespace by
        // design: `StaticCall` emission mangles with the same scheme, so
        // dispatch finds this label regardless of which kind of method
        // produced it.
        self.emitter
            .label(&layout::method_label(class_name, &m.name));

        let has_result = m.ret_type.is_some();
        let addrs = Addrs::make_static_method_addrs(&m.params, has_result);
        let mut env = Env::new();
        for p in &m.params {
            env.bind(&p.name, &p.class_name);
        }
        if let Some(ret) = &m.ret_type {
            env.bind("result", ret);
        }

        let state = GenState { addrs, env };
        self.emit_stmt(&state, &m.body)?;
        self.emitter.return_();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CtorDecl, Expr, Param, Stmt};
    use crate::codegen::generate;
    use crate::typeutil::INTEGER;

    fn empty_body() -> Stmt {
        Stmt::Block {
            vars: vec![],
            body: vec![],
        }
    }

    #[test]
    fn new_instance_then_virtual_dispatch_emits_the_full_program() {
        let class_a = ClassDecl {
            name: "A".to_string(),
            super_spec: None,
            ctor: CtorDecl {
                name: "A".to_string(),
                params: vec![],
                body: empty_body(),
            },
            inst_attrs: vec![],
            static_attrs: vec![],
            inst_methods: vec![MethodDecl {
                name: "m".to_string(),
                params: vec![],
                ret_type: Some(INTEGER.to_string()),
                is_override: false,
                body: Stmt::Block {
                    vars: vec![],
                    body: vec![Stmt::Assign {
                        lhs: Expr::Id("result".to_string()),
                        rhs: Expr::Cste(42),
                    }],
                },
            }],
            static_methods: vec![],
        };

        let program = Program {
            decls: vec![class_a],
            instr: Stmt::Block {
                vars: vec![Param {
                    name: "a".to_string(),
                    class_name: "A".to_string(),
                }],
                body: vec![
                    Stmt::Assign {
                        lhs: Expr::Id("a".to_string()),
                        rhs: Expr::New("A".to_string(), vec![]),
                    },
                    Stmt::Expr(Expr::Call(
                        Box::new(Expr::Id("a".to_string())),
                        "m".to_string(),
                        vec![],
                    )),
                ],
            },
        };

        let vm = generate(&program).unwrap();
        assert_eq!(
            vm,
            "\
-- vtables
ALLOC 1
DUPN 1
PUSHA A_1_m
STORE 0
-- static attribute region
PUSHN 0
START
PUSHN 1
ALLOC 1
DUPN 1
PUSHG 0
STORE 0
PUSHA _CTOR_A_
CALL
POPN 0
STOREL 0
PUSHI 0
PUSHL 0
DUPN 1
LOAD 0
LOAD 0
CALL
POPN 1
POPN 1
POPN 1
STOP
_CTOR_A_: NOP
PUSHN 0
POPN 0
RETURN
A_1_m: NOP
PUSHN 0
PUSHI 42
STOREL 1
POPN 0
RETURN
"
        );
    }
}

