//! Array higher-order function lowering and JavaScript printing.
//!
//! The pipeline has two phases, mirroring a classic transform/print split:
//!
//! 1. [`LoweringPass`] walks the read-only AST, classifies every call
//!    expression and records [`TransformDirective`]s for the calls it lowers.
//! 2. [`Printer`] emits JavaScript, consulting the directives to splice the
//!    generated loops and substitute each lowered call's value.
//!
//! [`lower_source`] runs parse, lowering and printing for one file.

pub mod emitter;
pub mod error;
pub mod lowering_pass;
pub mod options;
pub mod source_writer;
pub mod transform_context;
pub mod transforms;

pub use emitter::Printer;
pub use error::{LowerSourceError, LoweringError};
pub use lowering_pass::{LoweringPass, LoweringResult, RewriteRecord};
pub use options::{LoweringOptions, ThisArgPolicy};
pub use transform_context::{TransformContext, TransformDirective};
pub use transforms::hof_loops_ir::HofKind;

use loopdown_parser::parser::parse_source;
use tracing::debug_span;

/// Output of lowering a single file.
#[derive(Debug)]
pub struct LoweredFile {
    pub output: String,
    pub rewrites: Vec<RewriteRecord>,
}

/// Parse, lower and print `source`.
///
/// Files with syntax errors are rejected before lowering.
pub fn lower_source(
    file_name: &str,
    source: &str,
    options: &LoweringOptions,
) -> Result<LoweredFile, LowerSourceError> {
    let _span = debug_span!("lower_source", file = file_name).entered();

    let (arena, root, diagnostics) = parse_source(file_name, source);
    if !diagnostics.is_empty() {
        return Err(LowerSourceError::Syntax {
            file: file_name.to_string(),
            diagnostics,
        });
    }

    let LoweringResult {
        transforms,
        rewrites,
    } = LoweringPass::new(&arena, options).run(root)?;

    let mut printer = Printer::with_transforms(&arena, &transforms);
    printer.emit(root);
    Ok(LoweredFile {
        output: printer.take_output(),
        rewrites,
    })
}
