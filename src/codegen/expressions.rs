//! Expression emission: every rule here leaves exactly one extra value on
//! the VM stack (stack effect +1).

use super::layout::{self, Vtable};
use super::state::GenState;
use super::{CodeGenError, GenResult, Generator};
use crate::ast::{Expr, Op};
use crate::typeutil::{self, INTEGER, STRING};

impl<'a> Generator<'a> {
    pub(super) fn emit_expr(&mut self, state: &GenState, expr: &Expr) -> GenResult<()> {
        match expr {
            Expr::Id(name) => {
                let slot = state
                    .addrs
                    .get(name)
                    .ok_or_else(|| CodeGenError::new(format!("no frame slot for '{name}'")))?;
                self.emitter.pushl(slot);
                Ok(())
            }
            Expr::Cste(n) => {
                self.emitter.pushi(*n);
                Ok(())
            }
            Expr::Str(s) => {
                self.emitter.pushs(s);
                Ok(())
            }
            Expr::UMinus(e) => {
                self.emitter.pushi(0);
                self.emit_expr(state, e)?;
                self.emitter.sub();
                Ok(())
            }
            Expr::BinOp(lhs, op, rhs) => {
                self.emit_expr(state, lhs)?;
                self.emit_expr(state, rhs)?;
                self.emit_op(*op);
                Ok(())
            }
            Expr::StrCat(lhs, rhs) => {
                self.emit_expr(state, lhs)?;
                self.emit_expr(state, rhs)?;
                self.emitter.concat();
                Ok(())
            }
            Expr::Attr(base, field) => self.emit_attr(state, base, field),
            Expr::StaticAttr(class_name, field) => {
                let offset = layout::static_attr_offset(&self.index, class_name, field)
                    .ok_or_else(|| missing_static_attr(class_name, field))?;
                self.emitter.pushg(offset);
                Ok(())
            }
            Expr::Call(receiver, method, args) => self.emit_call(state, receiver, method, args),
            Expr::StaticCall(class_name, method, args) => {
                self.emitter.pushi(0);
                for arg in args {
                    self.emit_expr(state, arg)?;
                }
                self.emitter.pusha(&layout::method_label(class_name, method));
                self.emitter.call();
                self.emitter.popn(args.len());
                Ok(())
            }
            Expr::New(class_name, args) => self.emit_new(state, class_name, args),
            Expr::StaticCast(_, e) => self.emit_expr(state, e),
        }
    }

    fn emit_op(&mut self, op: Op) {
        match op {
            Op::Eq => self.emitter.equal(),
            Op::Neq => {
                self.emitter.equal();
                self.emitter.not();
            }
            Op::Lt => self.emitter.inf(),
            Op::Le => self.emitter.infeq(),
            Op::Gt => self.emitter.sup(),
            Op::Ge => self.emitter.supeq(),
            Op::Add => self.emitter.add(),
            Op::Sub => self.emitter.sub(),
            Op::Mul => self.emitter.mul(),
            Op::Div => self.emitter.div(),
        }
    }

    fn emit_attr(&mut self, state: &GenState, base: &Expr, field: &str) -> GenResult<()> {
        if let Expr::Id(name) = base {
            if name == "super" {
                let this_class = state
                    .env
                    .get("this")
                    .ok_or_else(|| CodeGenError::new("'this' unbound while resolving 'super'"))?;
                let this_decl = self
                    .index
                    .get_class_opt(this_class)
                    .ok_or_else(|| unknown_class(this_class))?;
                let super_name = &this_decl
                    .super_spec
                    .as_ref()
                    .ok_or_else(|| CodeGenError::new(format!("'{this_class}' has no superclass")))?
                    .name;
                let offset = layout::attr_offset(&self.index, super_name, field)
                    .ok_or_else(|| missing_attr(super_name, field))?;
                let this_slot = state
                    .addrs
                    .get("this")
                    .ok_or_else(|| CodeGenError::new("no frame slot for 'this'"))?;
                self.emitter.pushl(this_slot);
                self.emitter.load(offset);
                return Ok(());
            }
        }

        let base_ty = typeutil::get_expr_type(&self.index, &state.env, base)
            .ok_or_else(|| CodeGenError::new("could not resolve type of attribute base"))?;
        self.emit_expr(state, base)?;
        let offset = layout::attr_offset(&self.index, &base_ty, field)
            .ok_or_else(|| missing_attr(&base_ty, field))?;
        self.emitter.load(offset);
        Ok(())
    }

    fn emit_call(
        &mut self,
        state: &GenState,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
    ) -> GenResult<()> {
        if let Expr::Id(name) = receiver {
            if name == "super" {
                let this_class = state
                    .env
                    .get("this")
                    .ok_or_else(|| CodeGenError::new("'this' unbound while resolving 'super'"))?;
                let this_decl = self
                    .index
                    .get_class_opt(this_class)
                    .ok_or_else(|| unknown_class(this_class))?;
                let super_name = this_decl
                    .super_spec
                    .as_ref()
                    .ok_or_else(|| CodeGenError::new(format!("'{this_class}' has no superclass")))?
                    .name
                    .clone();
                let this_slot = state
                    .addrs
                    .get("this")
                    .ok_or_else(|| CodeGenError::new("no frame slot for 'this'"))?;

                self.emitter.pushi(0);
                for arg in args {
                    self.emit_expr(state, arg)?;
                }
                self.emitter.pushl(this_slot);
                self.emitter
                    .pusha(&layout::method_label(&super_name, method));
                self.emitter.call();
                self.emitter.popn(args.len() + 1);
                return Ok(());
            }
        }

        let recv_ty = typeutil::get_expr_type(&self.index, &state.env, receiver)
            .ok_or_else(|| CodeGenError::new("could not resolve type of call receiver"))?;

        if recv_ty == INTEGER && method == "toString" {
            self.emit_expr(state, receiver)?;
            self.emitter.str_();
            return Ok(());
        }
        if recv_ty == STRING && (method == "print" || method == "println") {
            self.emit_expr(state, receiver)?;
            self.emitter.dupn(1);
            self.emitter.writes();
            if method == "println" {
                self.emitter.pushs("\n");
                self.emitter.writes();
            }
            return Ok(());
        }

        let decl = self
            .index
            .get_class_opt(&recv_ty)
            .ok_or_else(|| unknown_class(&recv_ty))?;
        let vt = Vtable::make(&self.index, decl);
        let slot = vt
            .offset(method)
            .ok_or_else(|| missing_vtable_slot(&recv_ty, method))?;

        self.emitter.pushi(0);
        for arg in args {
            self.emit_expr(state, arg)?;
        }
        self.emit_expr(state, receiver)?;
        self.emitter.dupn(1);
        self.emitter.load(0);
        self.emitter.load(slot);
        self.emitter.call();
        self.emitter.popn(args.len() + 1);
        Ok(())
    }

    fn emit_new(&mut self, state: &GenState, class_name: &str, args: &[Expr]) -> GenResult<()> {
        let decl = self
            .index
            .get_class_opt(class_name)
            .ok_or_else(|| unknown_class(class_name))?;
        let size = self.index.all_attrs(decl).len() + 1;
        let vt_index = layout::vtable_index_of(&self.index, class_name)
            .ok_or_else(|| unknown_class(class_name))?;

        self.emitter.alloc(size);
        self.emitter.dupn(1);
        self.emitter.pushg(vt_index);
        self.emitter.store(0);
        for arg in args {
            self.emit_expr(state, arg)?;
        }
        self.emitter
            .pusha(&layout::ctor_label(class_name));
        self.emitter.call();
        self.emitter.popn(args.len());
        Ok(())
    }
}

fn unknown_class(name: &str) -> CodeGenError {
    CodeGenError::new(format!("unknown class '{name}' during code generation"))
}

fn missing_attr(class_name: &str, attr_name: &str) -> CodeGenError {
    CodeGenError::new(format!(
        "class '{class_name}' has no attribute '{attr_name}'"
    ))
}

fn missing_static_attr(class_name: &str, attr_name: &str) -> CodeGenError {
    CodeGenError::new(format!(
        "class '{class_name}' has no static attribute '{attr_name}'"
    ))
}

fn missing_vtable_slot(class_name: &str, method_name: &str) -> CodeGenError {
    CodeGenError::new(format!(
        "class '{class_name}' has no vtable slot for '{method_name}'"
    ))
}
