//! loopdown: lowers JavaScript array higher-order function calls into
//! index-based loops.
//!
//! The work is split across the workspace crates:
//!
//! - `loopdown-scanner` / `loopdown-parser`: JavaScript subset to arena AST
//! - `loopdown-emitter`: the lowering pass and the printer
//! - `loopdown-conformance`: interpreter-backed equivalence checks
//!
//! This crate holds the command-line driver.

pub mod cli;
pub mod tracing_config;

pub use loopdown_emitter::{
    HofKind, LowerSourceError, LoweredFile, LoweringError, LoweringOptions, RewriteRecord,
    ThisArgPolicy, lower_source,
};
