//! JavaScript scanner/tokenizer for loopdown.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine
//! - `char_codes` - Character classification utilities

pub mod char_codes;
mod scanner;
mod syntax_kind;

pub use scanner::{ScannerDiagnostic, ScannerSnapshot, ScannerState};
pub use syntax_kind::{SyntaxKind, text_to_keyword, token_to_text};
