//! Tracing configuration for debugging lowering decisions.
//!
//! Supports three output formats controlled by `LOOPDOWN_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Every rewritten call site
//! LOOPDOWN_LOG=debug loopdown src/
//!
//! # Rejected call sites too, as a tree of per-file spans
//! LOOPDOWN_LOG=trace LOOPDOWN_LOG_FORMAT=tree loopdown src/app.js
//!
//! # Only the lowering pass
//! LOOPDOWN_LOG="loopdown_emitter::lowering_pass=trace" loopdown src/
//! ```
//!
//! The subscriber is only initialised when `LOOPDOWN_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a `LOOPDOWN_LOG_FORMAT` value; unknown values mean `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("LOOPDOWN_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `LOOPDOWN_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("LOOPDOWN_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `LOOPDOWN_LOG` nor `RUST_LOG` is set. All
/// output goes to stderr; stdout carries lowered code and reports.
pub fn init_tracing() {
    let has_loopdown_log = std::env::var("LOOPDOWN_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_loopdown_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
