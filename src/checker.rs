//! Contextual checker (C4): a single pass that walks the program and, on
//! the first rule violation, raises a `ContextualError`. Fail-fast: no
//! recovery, no accumulation of further errors.

use crate::ast::{ClassDecl, CtorDecl, Expr, MethodDecl, Param, Program, Stmt, is_reserved};
use crate::class_index::ClassIndex;
use crate::error::{CheckResult, ContextualError, ContextualErrorKind as K};
use crate::typeutil::{self, Env, INTEGER, STRING, VOID};

pub struct Checker<'a> {
    program: &'a Program,
    index: ClassIndex<'a>,
}

impl<'a> Checker<'a> {
    pub fn new(program: &'a Program) -> Self {
        Checker {
            program,
            index: ClassIndex::new(program),
        }
    }

    pub fn check_program(&self) -> CheckResult<()> {
        self.check_no_reserved_class()?;
        self.check_no_dup_class()?;
        self.check_no_cycles()?;
        for decl in &self.program.decls {
            tracing::debug!("checking class {}", decl.name);
            self.check_decl(decl)?;
        }
        self.check_main_instr()?;
        tracing::debug!("check_program succeeded");
        Ok(())
    }

    fn err(&self, kind: K, message: impl Into<String>) -> ContextualError {
        ContextualError::new(kind, message)
    }

    // ---- program-level ----------------------------------------------

    fn check_no_reserved_class(&self) -> CheckResult<()> {
        for decl in &self.program.decls {
            if decl.name == INTEGER || decl.name == STRING {
                return Err(self.err(
                    K::ReservedClassName,
                    format!("class cannot be named '{}'", decl.name),
                ));
            }
        }
        Ok(())
    }

    fn check_no_dup_class(&self) -> CheckResult<()> {
        for (i, a) in self.program.decls.iter().enumerate() {
            for b in &self.program.decls[..i] {
                if a.name == b.name {
                    return Err(self.err(
                        K::DuplicateClass,
                        format!("class '{}' is declared more than once", a.name),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_no_cycles(&self) -> CheckResult<()> {
        for decl in &self.program.decls {
            let mut path = vec![decl.name.as_str()];
            let mut current = decl;
            while let Some(super_spec) = &current.super_spec {
                if path.contains(&super_spec.name.as_str()) {
                    return Err(self.err(
                        K::InheritanceCycle,
                        format!(
                            "inheritance cycle involving '{}' and '{}'",
                            decl.name, super_spec.name
                        ),
                    ));
                }
                let super_decl = self.index.get_class(&super_spec.name)?;
                path.push(super_spec.name.as_str());
                current = super_decl;
            }
        }
        Ok(())
    }

    fn check_main_instr(&self) -> CheckResult<()> {
        self.check_instr(&Env::new(), &self.program.instr)
    }

    // ---- per-class ----------------------------------------------------

    fn check_decl(&self, decl: &'a ClassDecl) -> CheckResult<()> {
        self.check_reserved_params(&decl.inst_attrs)?;
        self.check_reserved_params(&decl.static_attrs)?;
        self.check_no_dup_members(decl)?;
        self.check_ctor(decl)?;
        self.check_overrides(decl)?;

        for meth in &decl.inst_methods {
            self.check_reserved_params(&meth.params)?;
            let env = self.inst_method_env(decl, meth);
            self.check_instr(&env, &meth.body)?;
            self.check_returns(meth)?;
        }
        for meth in &decl.static_methods {
            self.check_reserved_params(&meth.params)?;
            let env = self.static_method_env(meth);
            self.check_instr(&env, &meth.body)?;
            self.check_returns(meth)?;
        }
        Ok(())
    }

    fn check_reserved_params(&self, params: &[Param]) -> CheckResult<()> {
        for p in params {
            if is_reserved(&p.name) {
                return Err(self.err(
                    K::ReservedName,
                    format!("'{}' is a reserved name", p.name),
                ));
            }
        }
        Ok(())
    }

    fn check_no_dup_members(&self, decl: &ClassDecl) -> CheckResult<()> {
        check_no_dup_names(decl.inst_attrs.iter().map(|p| p.name.as_str()), self, decl)?;
        check_no_dup_names(
            decl.static_attrs.iter().map(|p| p.name.as_str()),
            self,
            decl,
        )?;
        check_no_dup_names(
            decl.inst_methods.iter().map(|m| m.name.as_str()),
            self,
            decl,
        )?;
        check_no_dup_names(
            decl.static_methods.iter().map(|m| m.name.as_str()),
            self,
            decl,
        )?;
        return Ok(());

        fn check_no_dup_names<'a>(
            names: impl Iterator<Item = &'a str>,
            checker: &Checker,
            decl: &ClassDecl,
        ) -> CheckResult<()> {
            let names: Vec<&str> = names.collect();
            for (i, a) in names.iter().enumerate() {
                if names[..i].contains(a) {
                    return Err(checker.err(
                        K::DuplicateMember,
                        format!("'{}' is declared more than once in class '{}'", a, decl.name),
                    ));
                }
            }
            Ok(())
        }
    }

    // ---- constructor ----------------------------------------------------

    fn check_ctor(&self, decl: &'a ClassDecl) -> CheckResult<()> {
        let ctor = &decl.ctor;
        if ctor.name != decl.name {
            return Err(self.err(
                K::CtorNameMismatch,
                format!(
                    "constructor name '{}' does not match class name '{}'",
                    ctor.name, decl.name
                ),
            ));
        }
        self.check_reserved_params(&ctor.params)?;

        let env = self.ctor_env(decl, ctor);

        if let Some(super_spec) = &decl.super_spec {
            let super_decl = self.index.get_class(&super_spec.name)?;
            self.check_ctor_args(&env, &super_spec.args, &super_decl.ctor)?;
        }

        self.check_instr(&env, &ctor.body)
    }

    fn check_ctor_args(
        &self,
        env: &Env,
        args: &[Expr],
        target_ctor: &CtorDecl,
    ) -> CheckResult<()> {
        if args.len() != target_ctor.params.len() {
            return Err(self.err(
                K::CtorArgMismatch,
                format!(
                    "constructor '{}' expects {} argument(s), got {}",
                    target_ctor.name,
                    target_ctor.params.len(),
                    args.len()
                ),
            ));
        }
        for (arg, param) in args.iter().zip(&target_ctor.params) {
            let arg_ty = self.check_expr(env, arg)?;
            if !typeutil::is_base(&self.index, &arg_ty, &param.class_name) {
                return Err(self.err(
                    K::CtorArgMismatch,
                    format!(
                        "argument of type '{}' is not compatible with parameter '{}' of type '{}'",
                        arg_ty, param.name, param.class_name
                    ),
                ));
            }
        }
        Ok(())
    }

    // ---- overrides ------------------------------------------------------

    fn check_overrides(&self, decl: &'a ClassDecl) -> CheckResult<()> {
        for m in &decl.inst_methods {
            let ancestor_match = decl
                .super_spec
                .as_ref()
                .and_then(|s| self.index.get_class_opt(&s.name))
                .and_then(|super_decl| self.index.find_method(&m.name, super_decl));

            match ancestor_match {
                Some(base_method) => {
                    if !m.is_override {
                        return Err(self.err(
                            K::OverrideRequired,
                            format!(
                                "method '{}' shadows an inherited method and must be declared override",
                                m.name
                            ),
                        ));
                    }
                    if !signatures_match(m, base_method) {
                        return Err(self.err(
                            K::OverrideSignatureMismatch,
                            format!(
                                "override of '{}' must match the base method's parameter arity and types",
                                m.name
                            ),
                        ));
                    }
                }
                None => {
                    if m.is_override {
                        return Err(self.err(
                            K::OverrideMissing,
                            format!(
                                "method '{}' is declared override but no ancestor declares it",
                                m.name
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    // ---- return discipline ----------------------------------------------

    fn check_returns(&self, meth: &MethodDecl) -> CheckResult<()> {
        if meth.ret_type.is_some() && !path_satisfied(&meth.body) {
            return Err(self.err(
                K::MissingReturnPath,
                format!(
                    "method '{}' does not assign 'result' or return on every path",
                    meth.name
                ),
            ));
        }
        Ok(())
    }

    // ---- statements -------------------------------------------------------

    fn check_instr(&self, env: &Env, stmt: &Stmt) -> CheckResult<()> {
        match stmt {
            Stmt::Block { vars, body } => {
                self.check_reserved_params(vars)?;
                let inner_env =
                    env.extended(vars.iter().map(|p| (p.name.clone(), p.class_name.clone())));
                for s in body {
                    self.check_instr(&inner_env, s)?;
                }
                Ok(())
            }
            Stmt::Assign { lhs, rhs } => {
                self.check_lvalue(lhs)?;
                let lhs_ty = self.check_expr(env, lhs)?;
                let rhs_ty = self.check_expr(env, rhs)?;
                if lhs_ty == VOID || rhs_ty == VOID {
                    return Err(self.err(K::AssignVoid, "cannot assign a void expression"));
                }
                if !typeutil::is_base(&self.index, &rhs_ty, &lhs_ty) {
                    return Err(self.err(
                        K::TypeMismatch,
                        format!("cannot assign value of type '{rhs_ty}' to target of type '{lhs_ty}'"),
                    ));
                }
                Ok(())
            }
            Stmt::Return => Ok(()),
            Stmt::Ite {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_ty = self.check_expr(env, cond)?;
                if cond_ty != INTEGER {
                    return Err(self.err(K::ConditionNotInteger, "condition must be an Integer"));
                }
                self.check_instr(env, then_branch)?;
                self.check_instr(env, else_branch)
            }
            Stmt::Expr(e) => self.check_expr(env, e).map(|_| ()),
        }
    }

    fn check_lvalue(&self, lhs: &Expr) -> CheckResult<()> {
        match lhs {
            Expr::Id(name) if name == "this" || name == "super" => {
                Err(self.err(K::AssignToReserved, format!("cannot assign to '{name}'")))
            }
            Expr::Id(_) | Expr::Attr(..) | Expr::StaticAttr(..) => Ok(()),
            _ => Err(self.err(K::AssignToNonLValue, "left-hand side is not assignable")),
        }
    }

    // ---- expressions --------------------------------------------------

    fn check_expr(&self, env: &Env, expr: &Expr) -> CheckResult<String> {
        match expr {
            Expr::Id(name) if name == "super" && !env.contains("super") => {
                Err(self.err(K::SuperMissing, "'super' used in a class with no superclass"))
            }
            Expr::Id(name) => env
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| self.err(K::UnknownIdentifier, format!("unknown identifier '{name}'"))),
            Expr::Cste(_) => Ok(INTEGER.to_string()),
            Expr::Str(_) => Ok(STRING.to_string()),
            Expr::Attr(base, field) => {
                let base_ty = self.check_expr(env, base)?;
                if base_ty == VOID {
                    return Err(self.err(
                        K::UnknownAttribute,
                        format!("type '{base_ty}' has no attribute '{field}'"),
                    ));
                }
                let base_decl = self.index.get_class(&base_ty)?;
                let attr = self.index.find_inst_attr(field, base_decl).ok_or_else(|| {
                    self.err(
                        K::UnknownAttribute,
                        format!("class '{base_ty}' has no attribute '{field}'"),
                    )
                })?;
                Ok(attr.class_name.clone())
            }
            Expr::StaticAttr(class_name, field) => {
                let decl = self.index.get_class(class_name)?;
                let attr = self.index.get_static_attr(field, decl).ok_or_else(|| {
                    self.err(
                        K::UnknownStaticAttribute,
                        format!("class '{class_name}' has no static attribute '{field}'"),
                    )
                })?;
                Ok(attr.class_name.clone())
            }
            Expr::UMinus(e) => {
                let ty = self.check_expr(env, e)?;
                if ty != INTEGER {
                    return Err(self.err(K::OperandsNotInteger, "unary '-' requires an Integer"));
                }
                Ok(INTEGER.to_string())
            }
            Expr::BinOp(lhs, _, rhs) => {
                let lhs_ty = self.check_expr(env, lhs)?;
                let rhs_ty = self.check_expr(env, rhs)?;
                if lhs_ty != INTEGER || rhs_ty != INTEGER {
                    return Err(self.err(K::OperandsNotInteger, "operands must be Integer"));
                }
                Ok(INTEGER.to_string())
            }
            Expr::StrCat(lhs, rhs) => {
                let lhs_ty = self.check_expr(env, lhs)?;
                let rhs_ty = self.check_expr(env, rhs)?;
                if lhs_ty != STRING || rhs_ty != STRING {
                    return Err(self.err(K::OperandsNotString, "operands must be String"));
                }
                Ok(STRING.to_string())
            }
            Expr::Call(receiver, method, args) => self.check_call(env, receiver, method, args),
            Expr::StaticCall(class_name, method, args) => {
                let decl = self.index.get_class(class_name)?;
                let meth = self.index.get_static_method(method, decl).ok_or_else(|| {
                    self.err(
                        K::UnknownStaticMethod,
                        format!("class '{class_name}' has no static method '{method}'"),
                    )
                })?;
                self.check_args(env, args, &meth.params)?;
                Ok(meth.ret_type.clone().unwrap_or_else(|| VOID.to_string()))
            }
            Expr::New(class_name, args) => {
                let decl = self.index.get_class(class_name)?;
                self.check_ctor_args(env, args, &decl.ctor)?;
                Ok(class_name.clone())
            }
            Expr::StaticCast(class_name, e) => {
                self.index.get_class(class_name)?;
                let ty = self.check_expr(env, e)?;
                if !typeutil::is_base(&self.index, &ty, class_name) {
                    return Err(self.err(
                        K::CastNotUpCast,
                        format!("cannot cast '{ty}' to unrelated type '{class_name}'"),
                    ));
                }
                Ok(class_name.clone())
            }
        }
    }

    fn check_call(
        &self,
        env: &Env,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
    ) -> CheckResult<String> {
        let recv_ty = self.check_expr(env, receiver)?;
        if recv_ty == VOID {
            return Err(self.err(
                K::UnknownMethod,
                format!("cannot call '{method}' on a void expression"),
            ));
        }
        if recv_ty == INTEGER {
            return match method {
                "toString" if args.is_empty() => Ok(STRING.to_string()),
                "toString" => Err(self.err(
                    K::BuiltinArityMismatch,
                    "Integer.toString takes no arguments",
                )),
                _ => Err(self.err(
                    K::UnknownMethod,
                    format!("Integer has no method '{method}'"),
                )),
            };
        }
        if recv_ty == STRING {
            return match method {
                "print" | "println" if args.is_empty() => Ok(STRING.to_string()),
                "print" | "println" => Err(self.err(
                    K::BuiltinArityMismatch,
                    format!("String.{method} takes no arguments"),
                )),
                _ => Err(self.err(
                    K::UnknownMethod,
                    format!("String has no method '{method}'"),
                )),
            };
        }
        let decl = self.index.get_class(&recv_ty)?;
        let meth = self.index.find_method(method, decl).ok_or_else(|| {
            self.err(
                K::UnknownMethod,
                format!("class '{recv_ty}' has no method '{method}'"),
            )
        })?;
        self.check_args(env, args, &meth.params)?;
        Ok(meth.ret_type.clone().unwrap_or_else(|| VOID.to_string()))
    }

    fn check_args(&self, env: &Env, args: &[Expr], params: &[Param]) -> CheckResult<()> {
        if args.len() != params.len() {
            return Err(self.err(
                K::TypeMismatch,
                format!("expected {} argument(s), got {}", params.len(), args.len()),
            ));
        }
        for (arg, param) in args.iter().zip(params) {
            let arg_ty = self.check_expr(env, arg)?;
            if !typeutil::is_base(&self.index, &arg_ty, &param.class_name) {
                return Err(self.err(
                    K::TypeMismatch,
                    format!(
                        "argument of type '{arg_ty}' is not compatible with parameter '{}' of type '{}'",
                        param.name, param.class_name
                    ),
                ));
            }
        }
        Ok(())
    }

    // ---- environment builders -------------------------------------------

    fn ctor_env(&self, decl: &ClassDecl, ctor: &CtorDecl) -> Env {
        let mut env = Env::new();
        env.bind("this", &decl.name);
        if let Some(super_spec) = &decl.super_spec {
            env.bind("super", &super_spec.name);
        }
        for p in &ctor.params {
            env.bind(&p.name, &p.class_name);
        }
        env
    }

    fn inst_method_env(&self, decl: &ClassDecl, meth: &MethodDecl) -> Env {
        let mut env = Env::new();
        env.bind("this", &decl.name);
        if let Some(super_spec) = &decl.super_spec {
            env.bind("super", &super_spec.name);
        }
        for p in &meth.params {
            env.bind(&p.name, &p.class_name);
        }
        if let Some(ret) = &meth.ret_type {
            env.bind("result", ret);
        }
        env
    }

    fn static_method_env(&self, meth: &MethodDecl) -> Env {
        let mut env = Env::new();
        for p in &meth.params {
            env.bind(&p.name, &p.class_name);
        }
        if let Some(ret) = &meth.ret_type {
            env.bind("result", ret);
        }
        env
    }
}

fn signatures_match(derived: &MethodDecl, base: &MethodDecl) -> bool {
    derived.params.len() == base.params.len()
        && derived
            .params
            .iter()
            .zip(&base.params)
            .all(|(d, b)| d.class_name == b.class_name)
}

/// Whether every control-flow path through `stmt` reaches an assignment to
/// `result` or an explicit `Return`.
fn path_satisfied(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return => true,
        Stmt::Assign { lhs: Expr::Id(name), .. } if name == "result" => true,
        Stmt::Assign { .. } | Stmt::Expr(_) => false,
        Stmt::Ite {
            then_branch,
            else_branch,
            ..
        } => path_satisfied(then_branch) && path_satisfied(else_branch),
        Stmt::Block { body, .. } => {
            for s in body {
                if matches!(s, Stmt::Return) {
                    return true;
                }
                if path_satisfied(s) {
                    return true;
                }
            }
            false
        }
    }
}

pub fn check_program(program: &Program) -> CheckResult<()> {
    Checker::new(program).check_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Op, Param, SuperSpec};

    fn empty_body() -> Stmt {
        Stmt::Block {
            vars: vec![],
            body: vec![],
        }
    }

    fn ctor(name: &str, params: Vec<Param>, body: Stmt) -> CtorDecl {
        CtorDecl {
            name: name.to_string(),
            params,
            body,
        }
    }

    fn base_class(name: &str) -> ClassDecl {
        ClassDecl {
            name: name.to_string(),
            super_spec: None,
            ctor: ctor(name, vec![], empty_body()),
            inst_attrs: vec![],
            static_attrs: vec![],
            inst_methods: vec![],
            static_methods: vec![],
        }
    }

    #[test]
    fn empty_program_checks_ok() {
        let program = Program {
            decls: vec![],
            instr: Stmt::Block {
                vars: vec![],
                body: vec![Stmt::Expr(Expr::Cste(0))],
            },
        };
        assert!(check_program(&program).is_ok());
    }

    #[test]
    fn new_and_virtual_call_check_ok() {
        let mut class_a = base_class("A");
        class_a.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![],
            ret_type: Some(INTEGER.to_string()),
            is_override: false,
            body: Stmt::Assign {
                lhs: Expr::Id("result".to_string()),
                rhs: Expr::Cste(42),
            },
        });

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
        assert!(check_program(&program).is_ok());
    }

    #[test]
    fn inheritance_cycle_is_rejected() {
        let mut class_a = base_class("A");
        class_a.super_spec = Some(SuperSpec {
            name: "B".to_string(),
            args: vec![],
        });
        let mut class_b = base_class("B");
        class_b.super_spec = Some(SuperSpec {
            name: "A".to_string(),
            args: vec![],
        });

        let program = Program {
            decls: vec![class_a, class_b],
            instr: empty_body(),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::InheritanceCycle);
    }

    #[test]
    fn override_signature_mismatch_is_rejected() {
        let mut class_a = base_class("A");
        class_a.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![Param {
                name: "x".to_string(),
                class_name: STRING.to_string(),
            }],
            ret_type: Some(INTEGER.to_string()),
            is_override: false,
            body: Stmt::Assign {
                lhs: Expr::Id("result".to_string()),
                rhs: Expr::Cste(0),
            },
        });

        let mut class_b = base_class("B");
        class_b.super_spec = Some(SuperSpec {
            name: "A".to_string(),
            args: vec![],
        });
        class_b.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![Param {
                name: "x".to_string(),
                class_name: INTEGER.to_string(),
            }],
            ret_type: Some(INTEGER.to_string()),
            is_override: true,
            body: Stmt::Assign {
                lhs: Expr::Id("result".to_string()),
                rhs: Expr::Cste(0),
            },
        });

        let program = Program {
            decls: vec![class_a, class_b],
            instr: empty_body(),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::OverrideSignatureMismatch);
    }

    #[test]
    fn missing_return_path_is_rejected() {
        let mut class_a = base_class("A");
        class_a.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![],
            ret_type: Some(INTEGER.to_string()),
            is_override: false,
            body: Stmt::Ite {
                cond: Expr::Cste(1),
                then_branch: Box::new(Stmt::Assign {
                    lhs: Expr::Id("result".to_string()),
                    rhs: Expr::Cste(1),
                }),
                else_branch: Box::new(Stmt::Block {
                    vars: vec![],
                    body: vec![],
                }),
            },
        });

        let program = Program {
            decls: vec![class_a],
            instr: empty_body(),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::MissingReturnPath);
    }

    #[test]
    fn builtin_string_println_checks_ok() {
        let program = Program {
            decls: vec![],
            instr: Stmt::Expr(Expr::Call(
                Box::new(Expr::Str("hi".to_string())),
                "println".to_string(),
                vec![],
            )),
        };
        assert!(check_program(&program).is_ok());
    }

    #[test]
    fn method_param_named_this_is_rejected() {
        let mut class_a = base_class("A");
        class_a.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![Param {
                name: "this".to_string(),
                class_name: "A".to_string(),
            }],
            ret_type: None,
            is_override: false,
            body: empty_body(),
        });

        let program = Program {
            decls: vec![class_a],
            instr: empty_body(),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::ReservedName);
    }

    #[test]
    fn static_method_param_named_result_is_rejected() {
        let mut class_a = base_class("A");
        class_a.static_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![Param {
                name: "result".to_string(),
                class_name: INTEGER.to_string(),
            }],
            ret_type: None,
            is_override: false,
            body: empty_body(),
        });

        let program = Program {
            decls: vec![class_a],
            instr: empty_body(),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::ReservedName);
    }

    #[test]
    fn override_without_flag_is_rejected() {
        let mut class_a = base_class("A");
        class_a.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![],
            ret_type: None,
            is_override: false,
            body: empty_body(),
        });
        let mut class_b = base_class("B");
        class_b.super_spec = Some(SuperSpec {
            name: "A".to_string(),
            args: vec![],
        });
        class_b.inst_methods.push(MethodDecl {
            name: "m".to_string(),
            params: vec![],
            ret_type: None,
            is_override: false,
            body: empty_body(),
        });

        let program = Program {
            decls: vec![class_a, class_b],
            instr: empty_body(),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::OverrideRequired);
    }

    #[test]
    fn assign_type_mismatch_is_rejected() {
        let class_a = base_class("A");
        let program = Program {
            decls: vec![class_a],
            instr: Stmt::Block {
                vars: vec![Param {
                    name: "x".to_string(),
                    class_name: INTEGER.to_string(),
                }],
                body: vec![Stmt::Assign {
                    lhs: Expr::Id("x".to_string()),
                    rhs: Expr::Str("oops".to_string()),
                }],
            },
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::TypeMismatch);
    }

    #[test]
    fn bin_op_requires_integer_operands() {
        let program = Program {
            decls: vec![],
            instr: Stmt::Expr(Expr::BinOp(
                Box::new(Expr::Cste(1)),
                Op::Add,
                Box::new(Expr::Str("x".to_string())),
            )),
        };
        let err = check_program(&program).unwrap_err();
        assert_eq!(err.kind, K::OperandsNotInteger);
    }

    #[test]
    fn upcast_is_allowed_downcast_is_not() {
        let base = base_class("A");
        let mut derived = base_class("B");
        derived.super_spec = Some(SuperSpec {
            name: "A".to_string(),
            args: vec![],
        });

        let program_ok = Program {
            decls: vec![base.clone(), derived.clone()],
            instr: Stmt::Block {
                vars: vec![Param {
                    name: "b".to_string(),
                    class_name: "B".to_string(),
                }],
                body: vec![Stmt::Expr(Expr::StaticCast(
                    "A".to_string(),
                    Box::new(Expr::Id("b".to_string())),
                ))],
            },
        };
        assert!(check_program(&program_ok).is_ok());

        let program_bad = Program {
            decls: vec![base, derived],
            instr: Stmt::Block {
                vars: vec![Param {
                    name: "a".to_string(),
                    class_name: "A".to_string(),
                }],
                body: vec![Stmt::Expr(Expr::StaticCast(
                    "B".to_string(),
                    Box::new(Expr::Id("a".to_string())),
                ))],
            },
        };
        let err = check_program(&program_bad).unwrap_err();
        assert_eq!(err.kind, K::CastNotUpCast);
    }
}
