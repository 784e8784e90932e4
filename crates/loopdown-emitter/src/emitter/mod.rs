//! JavaScript printer.
//!
//! Emits an arena AST back to JavaScript with four-space indentation and one
//! statement per line. When a [`TransformContext`] is attached, statements
//! and expressions carrying a directive are emitted through the IR printer
//! instead of from their source form.

use crate::source_writer::SourceWriter;
use crate::transform_context::{TransformContext, TransformDirective};
use loopdown_parser::parser::{NodeArena, NodeIndex};

mod expressions;
mod helpers;
mod statements;

pub(crate) use helpers::escape_string;

const INDENT_WIDTH: u32 = 4;

pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) transforms: Option<&'a TransformContext>,
    pub(crate) writer: SourceWriter,
}

impl<'a> Printer<'a> {
    /// Printer that emits the AST exactly as parsed.
    pub fn new(arena: &'a NodeArena) -> Self {
        Printer {
            arena,
            transforms: None,
            writer: SourceWriter::with_capacity(INDENT_WIDTH, arena.len() * 4),
        }
    }

    /// Printer that applies the directives in `transforms`.
    pub fn with_transforms(arena: &'a NodeArena, transforms: &'a TransformContext) -> Self {
        Printer {
            transforms: Some(transforms),
            ..Printer::new(arena)
        }
    }

    /// Emit a source file, statement or expression.
    pub fn emit(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        if let Some(source_file) = self.arena.get_source_file(node) {
            for statement in source_file.statements.iter() {
                self.emit_statement(statement);
            }
        } else if loopdown_parser::parser::syntax_kind_ext::is_statement(node.kind) {
            self.emit_statement(idx);
        } else {
            self.emit_expression(idx);
        }
    }

    pub fn get_output(&self) -> &str {
        self.writer.get_output()
    }

    pub fn take_output(&mut self) -> String {
        self.writer.take_output()
    }

    #[inline]
    pub(crate) fn directive(&self, idx: NodeIndex) -> Option<&'a TransformDirective> {
        self.transforms.and_then(|t| t.get(idx))
    }
}
