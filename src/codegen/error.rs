//! Code generator error (C9 extension). Generation is specified as
//! infallible given a checked AST; `CodeGenError` exists only for the two
//! internal invariants whose violation would mean the checker and
//! generator disagree with each other, not that the input program is
//! malformed. Never raised on a well-checked program.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenError {
    pub message: String,
}

impl CodeGenError {
    pub fn new(message: impl Into<String>) -> Self {
        CodeGenError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "internal code generator error: {}", self.message)
    }
}

impl std::error::Error for CodeGenError {}

pub type GenResult<T> = Result<T, CodeGenError>;
