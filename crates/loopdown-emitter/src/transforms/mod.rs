//! Transforms that produce IR for the printer.
//!
//! - `ir` - the IR tree and its builders
//! - `ir_printer` - IR emission on the shared [`Printer`](crate::Printer)
//! - `hof_call_site` - decides which calls are lowered
//! - `loop_skeleton` - the fixed shape every lowered call fills
//! - `hof_loops_ir` - the six operation variants
//! - `name_allocator` - collision-free temporaries

pub mod hof_call_site;
pub mod hof_loops_ir;
pub mod ir;
mod ir_printer;
pub mod loop_skeleton;
pub mod name_allocator;
