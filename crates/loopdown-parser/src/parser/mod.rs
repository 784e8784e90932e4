//! Parser and arena AST.

pub mod base;
pub mod flags;
pub mod node;
mod node_access;
mod node_arena;
mod state;
mod state_expressions;
mod state_statements;
pub mod syntax_kind_ext;

pub use base::{NodeIndex, NodeList};
pub use flags::NodeFlags;
pub use node::{NodeAccess, NodeArena};
pub use state::{ParseDiagnostic, ParserState};

/// Parse `source` into a fresh arena, returning the arena, the source file
/// node and the parse diagnostics.
pub fn parse_source(
    file_name: impl Into<String>,
    source: impl Into<String>,
) -> (NodeArena, NodeIndex, Vec<ParseDiagnostic>) {
    let mut parser = ParserState::new(file_name.into(), source.into());
    let root = parser.parse_source_file();
    let diagnostics = parser.take_diagnostics();
    (parser.into_arena(), root, diagnostics)
}
