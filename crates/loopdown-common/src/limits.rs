//! Centralized limits and thresholds.
//!
//! Recursion limits shared by the parser, the lowering pass, the printer and
//! the conformance interpreter. Exceeding a limit degrades gracefully: the
//! parser reports a diagnostic, the lowering pass stops descending, the
//! interpreter raises a `RangeError`.

/// Maximum nesting depth the parser accepts for expressions and statements.
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 500;

/// Maximum AST depth visited by the lowering pass.
pub const MAX_AST_DEPTH: u32 = 500;

/// Maximum call depth of the conformance interpreter.
pub const MAX_CALL_DEPTH: u32 = 256;

/// Maximum number of loop iterations the interpreter runs before giving up.
pub const MAX_LOOP_ITERATIONS: u64 = 1_000_000;
