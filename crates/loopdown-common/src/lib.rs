//! Common types and utilities for loopdown.
//!
//! This crate provides foundational types used across all loopdown crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, diagnostic codes)
//! - Line/column mapping for byte offsets (`LineMap`)
//! - Recursion limits shared by the parser, lowering pass and printer

// Diagnostic types and codes
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, diagnostic_codes};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits and thresholds
pub mod limits;
