//! Statement emission: every rule here leaves the VM stack exactly where
//! it found it (net stack effect 0).

use super::layout;
use super::state::GenState;
use super::{CodeGenError, GenResult, Generator};
use crate::ast::{Expr, Stmt};
use crate::typeutil;

impl<'a> Generator<'a> {
    pub(super) fn emit_stmt(&mut self, state: &GenState, stmt: &Stmt) -> GenResult<()> {
        match stmt {
            Stmt::Block { vars, body } => {
                let inner = state.extended_with_block(vars);
                self.emitter.pushn(vars.len());
                for s in body {
                    self.emit_stmt(&inner, s)?;
                }
                self.emitter.popn(vars.len());
                Ok(())
            }
            Stmt::Assign { lhs, rhs } => self.emit_assign(state, lhs, rhs),
            Stmt::Return => {
                self.emitter.return_();
                Ok(())
            }
            Stmt::Ite {
                cond,
                then_branch,
                else_branch,
            } => {
                let l_else = self.emitter.fresh_label();
                let l_end = self.emitter.fresh_label();
                self.emit_expr(state, cond)?;
                self.emitter.jz(&l_else);
                self.emit_stmt(state, then_branch)?;
                self.emitter.jump(&l_end);
                self.emitter.label(&l_else);
                self.emit_stmt(state, else_branch)?;
                self.emitter.label(&l_end);
                Ok(())
            }
            Stmt::Expr(e) => {
                self.emit_expr(state, e)?;
                self.emitter.popn(1);
                Ok(())
            }
        }
    }

    fn emit_assign(&mut self, state: &GenState, lhs: &Expr, rhs: &Expr) -> GenResult<()> {
        match lhs {
            Expr::Id(name) => {
                self.emit_expr(state, rhs)?;
                let slot = state
                    .addrs
                    .get(name)
                    .ok_or_else(|| CodeGenError::new(format!("no frame slot for '{name}'")))?;
                self.emitter.storel(slot);
                Ok(())
            }
            Expr::Attr(base, field) => {
                let base_ty = typeutil::get_expr_type(&self.index, &state.env, base).ok_or_else(
                    || CodeGenError::new("could not resolve type of assignment base"),
                )?;
                self.emit_expr(state, base)?;
                self.emit_expr(state, rhs)?;
                let offset = layout::attr_offset(&self.index, &base_ty, field).ok_or_else(|| {
                    CodeGenError::new(format!("class '{base_ty}' has no attribute '{field}'"))
                })?;
                self.emitter.store(offset);
                Ok(())
            }
            Expr::StaticAttr(class_name, field) => {
                self.emit_expr(state, rhs)?;
                let offset =
                    layout::static_attr_offset(&self.index, class_name, field).ok_or_else(
                        || {
                            CodeGenError::new(format!(
                                "class '{class_name}' has no static attribute '{field}'"
                            ))
                        },
                    )?;
                self.emitter.storeg(offset);
                Ok(())
            }
            _ => Err(CodeGenError::new("assignment target is not an lvalue")),
        }
    }
}
