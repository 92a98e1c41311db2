//! Code generator (C7): walks a checked AST and produces a textual VM
//! program. Split across focused submodules the way a single monolithic
//! generator rarely stays readable: `state` (frame shapes), `layout` (C5),
//! `emitter` (C6), `expressions`/`statements` (emission rules), `program`
//! (top-level emission order), `error` (the two internal-invariant sites).

mod emitter;
mod error;
mod expressions;
mod layout;
mod program;
mod state;
mod statements;

pub use emitter::Emitter;
pub use error::{CodeGenError, GenResult};
pub use layout::Vtable;
pub use state::{Addrs, GenState};

use crate::ast::Program;
use crate::class_index::ClassIndex;

/// Holds the read-only class view and the mutable instruction sink for one
/// compilation. Not `Clone`: a `Generator` is used once, via [`generate`].
pub struct Generator<'a> {
    pub(crate) index: ClassIndex<'a>,
    pub(crate) emitter: Emitter,
}

impl<'a> Generator<'a> {
    pub fn new(program: &'a Program) -> Self {
        Generator {
            index: ClassIndex::new(program),
            emitter: Emitter::new(),
        }
    }

    /// Generates the full VM program for `program` and returns it as text.
    pub fn generate(mut self, program: &'a Program) -> GenResult<String> {
        self.emit_program(program)?;
        let instructions = self.emitter.instruction_count();
        tracing::info!(
            "compiled {} classes to {instructions} instructions",
            program.decls.len()
        );
        Ok(self.emitter.into_output())
    }
}

/// Convenience entry point: generate VM text for an already-checked
/// program. Re-initializes a fresh `Generator` (and therefore a fresh
/// label counter) per call, so two calls on the same input are guaranteed
/// byte-identical.
pub fn generate(program: &Program) -> GenResult<String> {
    Generator::new(program).generate(program)
}
