//! Code generator state (C7 support): the local-slot map (`Addrs`) and the
//! per-scope `(Addrs, Env)` pair threaded through expression/statement
//! emission. `Env` itself lives in `typeutil` and is reused unchanged here
//! (it is only ever consulted by the generator to resolve `this`/`super`).

use crate::ast::Param;
use crate::typeutil::Env;

/// Ordered identifier -> local stack-frame slot offset, relative to the
/// frame pointer. A plain association list for the same reason `Env` is
/// one: scopes are built by cheap clone-and-extend rather than shared
/// mutation, so a `Block`'s locals never leak into a sibling scope.
#[derive(Debug, Clone, Default)]
pub struct Addrs {
    bindings: Vec<(String, usize)>,
    next_slot: usize,
}

impl Addrs {
    pub fn new() -> Self {
        Addrs::default()
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, slot)| *slot)
    }

    fn bind(&mut self, name: impl Into<String>) -> usize {
        let slot = self.next_slot;
        self.bindings.push((name.into(), slot));
        self.next_slot += 1;
        slot
    }

    /// Extends `self` with one fresh slot per `name`, returning the new
    /// `Addrs` and leaving `self` untouched. Used for `Block`'s locals,
    /// which occupy the next free slots above the current frame top.
    pub fn extended(&self, names: impl IntoIterator<Item = String>) -> Addrs {
        let mut next = self.clone();
        for name in names {
            next.bind(name);
        }
        next
    }

    /// Frame shape for a constructor: slot 0 is `this`, slots 1..=n are
    /// `params` in order.
    pub fn make_ctor_addrs(params: &[Param]) -> Addrs {
        let mut addrs = Addrs::new();
        addrs.bind("this");
        for p in params {
            addrs.bind(&p.name);
        }
        addrs
    }

    /// Frame shape for an instance method: slot 0 is `this`, then `params`,
    /// then `result` if the method declares a return type.
    pub fn make_method_addrs(params: &[Param], has_result: bool) -> Addrs {
        let mut addrs = Addrs::new();
        addrs.bind("this");
        for p in params {
            addrs.bind(&p.name);
        }
        if has_result {
            addrs.bind("result");
        }
        addrs
    }

    /// Frame shape for a static method: no `this`; `params` from slot 0,
    /// then `result` if declared.
    pub fn make_static_method_addrs(params: &[Param], has_result: bool) -> Addrs {
        let mut addrs = Addrs::new();
        for p in params {
            addrs.bind(&p.name);
        }
        if has_result {
            addrs.bind("result");
        }
        addrs
    }
}

/// The pair of maps carried through one lexical scope of code generation.
#[derive(Debug, Clone, Default)]
pub struct GenState {
    pub addrs: Addrs,
    pub env: Env,
}

impl GenState {
    pub fn new() -> Self {
        GenState::default()
    }

    /// Extends both maps with a `Block`'s declared locals, each getting the
    /// next free slot and its declared type.
    pub fn extended_with_block(&self, vars: &[Param]) -> GenState {
        GenState {
            addrs: self.addrs.extended(vars.iter().map(|p| p.name.clone())),
            env: self
                .env
                .extended(vars.iter().map(|p| (p.name.clone(), p.class_name.clone()))),
        }
    }
}
