//! Error types for lowering.

use loopdown_parser::parser::ParseDiagnostic;
use thiserror::Error;

/// An internal inconsistency found while lowering a call. Fatal for the file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoweringError {
    #[error("loop skeleton for `{kind}` was built without a callback statement")]
    MissingCallbackSlot { kind: &'static str },

    #[error("call at offset {pos} has no enclosing statement")]
    MissingEnclosingStatement { pos: u32 },

    #[error("malformed call site at offset {pos}: {reason}")]
    MalformedCallSite { pos: u32, reason: &'static str },
}

/// Failure of [`lower_source`](crate::lower_source).
#[derive(Debug, Error)]
pub enum LowerSourceError {
    #[error("{file}: {} syntax error(s); file not lowered", diagnostics.len())]
    Syntax {
        file: String,
        diagnostics: Vec<ParseDiagnostic>,
    },

    #[error(transparent)]
    Lowering(#[from] LoweringError),
}
