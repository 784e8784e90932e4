//! Diagnostic types reported by the scanner, parser and driver.
//!
//! Codes are grouped by phase: 1xxx for scanning/parsing, 5xxx for
//! driver-level problems (unreadable files, bad configuration).

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 3,
}

/// A diagnostic message anchored at a byte range of a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(file, start, length, message, code)
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const UNSUPPORTED_SYNTAX: u32 = 1200;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1201;
    pub const INVALID_ASSIGNMENT_TARGET: u32 = 2364;

    pub const CANNOT_READ_FILE: u32 = 5001;
    pub const INVALID_CONFIG: u32 = 5002;
    pub const LOWERING_FAILED: u32 = 5003;
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
