//! Contextual-checker error types (C9).
//!
//! A single error type, `ContextualError`, is raised by the checker. It
//! carries a closed-set `ContextualErrorKind` plus a human-readable message.
//! The policy is fail-fast: the first error raised anywhere aborts the whole
//! `check_program` call, and no recovery or accumulation of further errors
//! is attempted (an explicit Non-goal).

/// The closed set of categories a `ContextualError` can carry. Every
/// checker rule in this crate raises exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextualErrorKind {
    ReservedName,
    DuplicateClass,
    UnknownClass,
    InheritanceCycle,
    ReservedClassName,
    DuplicateMember,
    OverrideMissing,
    OverrideRequired,
    OverrideSignatureMismatch,
    UnknownIdentifier,
    UnknownAttribute,
    UnknownStaticAttribute,
    UnknownMethod,
    UnknownStaticMethod,
    BuiltinArityMismatch,
    AssignToReserved,
    AssignToNonLValue,
    AssignVoid,
    TypeMismatch,
    ConditionNotInteger,
    OperandsNotInteger,
    OperandsNotString,
    CtorNameMismatch,
    CtorArgMismatch,
    SuperMissing,
    CastNotUpCast,
    MissingReturnPath,
}

impl std::fmt::Display for ContextualErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContextualErrorKind::ReservedName => "ReservedName",
            ContextualErrorKind::DuplicateClass => "DuplicateClass",
            ContextualErrorKind::UnknownClass => "UnknownClass",
            ContextualErrorKind::InheritanceCycle => "InheritanceCycle",
            ContextualErrorKind::ReservedClassName => "ReservedClassName",
            ContextualErrorKind::DuplicateMember => "DuplicateMember",
            ContextualErrorKind::OverrideMissing => "OverrideMissing",
            ContextualErrorKind::OverrideRequired => "OverrideRequired",
            ContextualErrorKind::OverrideSignatureMismatch => "OverrideSignatureMismatch",
            ContextualErrorKind::UnknownIdentifier => "UnknownIdentifier",
            ContextualErrorKind::UnknownAttribute => "UnknownAttribute",
            ContextualErrorKind::UnknownStaticAttribute => "UnknownStaticAttribute",
            ContextualErrorKind::UnknownMethod => "UnknownMethod",
            ContextualErrorKind::UnknownStaticMethod => "UnknownStaticMethod",
            ContextualErrorKind::BuiltinArityMismatch => "BuiltinArityMismatch",
            ContextualErrorKind::AssignToReserved => "AssignToReserved",
            ContextualErrorKind::AssignToNonLValue => "AssignToNonLValue",
            ContextualErrorKind::AssignVoid => "AssignVoid",
            ContextualErrorKind::TypeMismatch => "TypeMismatch",
            ContextualErrorKind::ConditionNotInteger => "ConditionNotInteger",
            ContextualErrorKind::OperandsNotInteger => "OperandsNotInteger",
            ContextualErrorKind::OperandsNotString => "OperandsNotString",
            ContextualErrorKind::CtorNameMismatch => "CtorNameMismatch",
            ContextualErrorKind::CtorArgMismatch => "CtorArgMismatch",
            ContextualErrorKind::SuperMissing => "SuperMissing",
            ContextualErrorKind::CastNotUpCast => "CastNotUpCast",
            ContextualErrorKind::MissingReturnPath => "MissingReturnPath",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualError {
    pub kind: ContextualErrorKind,
    pub message: String,
}

impl ContextualError {
    pub fn new(kind: ContextualErrorKind, message: impl Into<String>) -> Self {
        ContextualError {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ContextualError {}

/// Shorthand used throughout the checker.
pub type CheckResult<T> = Result<T, ContextualError>;
