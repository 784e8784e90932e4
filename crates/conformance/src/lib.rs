//! Conformance checking for loopdown.
//!
//! Runs JavaScript programs before and after lowering on a small
//! interpreter and compares their observable behaviour.

pub mod equivalence;
pub mod fixture;
pub mod interpreter;
pub mod runner;

pub use equivalence::{Divergence, EquivalenceError, EquivalenceReport, check_equivalence};
pub use interpreter::{InterpreterError, ProgramCompletion, RunOutcome, run_source};
pub use runner::{CaseOutcome, CaseResult, FixtureCase, run_fixture_dir};
