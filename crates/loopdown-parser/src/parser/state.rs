//! Parser state: token handling, diagnostics and recursion guards.
//!
//! The grammar itself lives in `state_statements.rs` and
//! `state_expressions.rs`, both `impl ParserState` blocks.

use super::base::NodeIndex;
use super::node::{IdentifierData, NodeArena};
use loopdown_common::diagnostic_codes;
use loopdown_common::diagnostics::format_message;
use loopdown_common::limits::MAX_PARSER_RECURSION_DEPTH;
use loopdown_scanner::{ScannerState, SyntaxKind, token_to_text};
use tracing::trace;

/// A syntax error found while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

/// Recursive descent parser producing a [`NodeArena`].
pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) recursion_depth: u32,
    /// Set once the nesting limit is hit; parsing stops and later errors
    /// are not reported.
    pub(crate) nesting_exceeded: bool,
    /// End of the most recently consumed token.
    pub(crate) prev_token_end: u32,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let arena = NodeArena::with_capacity_for_source(source_text.len());
        ParserState {
            scanner: ScannerState::new(source_text),
            arena,
            file_name,
            parse_diagnostics: Vec::new(),
            recursion_depth: 0,
            nesting_exceeded: false,
            prev_token_end: 0,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ParseDiagnostic> {
        std::mem::take(&mut self.parse_diagnostics)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.u32_from_usize(self.scanner.token_start())
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.u32_from_usize(self.scanner.token_end())
    }

    #[inline]
    pub(crate) fn u32_from_usize(&self, value: usize) -> u32 {
        u32::try_from(value).unwrap_or(u32::MAX)
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.token_end();
        self.scanner.scan()
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind`, reporting `'x' expected.` when it is missing.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let message = format_message("'{0}' expected.", &[token_to_text(kind)]);
        self.parse_error_at_current_token(&message, diagnostic_codes::TOKEN_EXPECTED);
        false
    }

    /// Whether automatic semicolon insertion applies here.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    /// Run `f` with the scanner rewound afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let prev_token_end = self.prev_token_end;
        let diagnostics_len = self.parse_diagnostics.len();
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.prev_token_end = prev_token_end;
        self.parse_diagnostics.truncate(diagnostics_len);
        result
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        // One error per position keeps cascades out of the output.
        if self.nesting_exceeded
            || self
                .parse_diagnostics
                .last()
                .is_some_and(|last| last.start == start)
        {
            return;
        }
        trace!(file = %self.file_name, start, code, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, code);
    }

    /// Placeholder identifier for a missing expression or name.
    pub(crate) fn create_missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            pos,
            pos,
            IdentifierData {
                escaped_text: String::new(),
            },
        )
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    /// Enter one level of nesting; returns false (after reporting) when the
    /// limit is exceeded.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            self.parse_error_at_current_token(
                "Maximum nesting depth exceeded.",
                diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
            );
            self.nesting_exceeded = true;
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.exit_recursion_by(1);
    }

    /// Release the levels charged by a loop that nested its result
    /// (`a + b + c`, `a.b.c`) one node per iteration.
    pub(crate) fn exit_recursion_by(&mut self, levels: u32) {
        self.recursion_depth = self.recursion_depth.saturating_sub(levels);
    }
}
