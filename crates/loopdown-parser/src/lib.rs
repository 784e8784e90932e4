//! JavaScript parser and arena AST for loopdown.
//!
//! - `parser` - `ParserState` (recursive descent) and the thin-node `NodeArena`
//! - `syntax` - read-only AST utilities shared by the lowering pass

pub mod parser;
pub mod syntax;
