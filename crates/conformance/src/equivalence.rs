//! Before/after execution of a lowered program.

use std::fmt;

use loopdown_emitter::{LowerSourceError, LoweringOptions, RewriteRecord, lower_source};
use thiserror::Error;
use tracing::debug;

use crate::interpreter::{InterpreterError, ProgramCompletion, RunOutcome, run_source};

#[derive(Debug, Error)]
pub enum EquivalenceError {
    #[error(transparent)]
    Lowering(#[from] LowerSourceError),

    #[error("original program: {0}")]
    Original(InterpreterError),

    #[error("lowered program: {0}")]
    Lowered(InterpreterError),
}

/// The first observable difference between two runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    Log {
        line: usize,
        original: Option<String>,
        lowered: Option<String>,
    },
    Completion {
        original: ProgramCompletion,
        lowered: ProgramCompletion,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |line: &Option<String>| line.clone().unwrap_or_else(|| "<missing>".into());
        match self {
            Divergence::Log {
                line,
                original,
                lowered,
            } => write!(
                f,
                "log line {line}: original `{}`, lowered `{}`",
                show(original),
                show(lowered)
            ),
            Divergence::Completion { original, lowered } => {
                write!(f, "completion: original {original:?}, lowered {lowered:?}")
            }
        }
    }
}

#[derive(Debug)]
pub struct EquivalenceReport {
    pub original: RunOutcome,
    pub lowered: RunOutcome,
    pub lowered_source: String,
    pub rewrites: Vec<RewriteRecord>,
}

impl EquivalenceReport {
    pub fn divergence(&self) -> Option<Divergence> {
        let (original, lowered) = (&self.original, &self.lowered);
        let lines = original.log.len().max(lowered.log.len());
        for line in 0..lines {
            let (a, b) = (original.log.get(line), lowered.log.get(line));
            if a != b {
                return Some(Divergence::Log {
                    line,
                    original: a.cloned(),
                    lowered: b.cloned(),
                });
            }
        }
        (original.completion != lowered.completion).then(|| Divergence::Completion {
            original: original.completion.clone(),
            lowered: lowered.completion.clone(),
        })
    }

    pub fn is_equivalent(&self) -> bool {
        self.divergence().is_none()
    }
}

/// Run `source`, lower it with `options`, run the result, and report both.
pub fn check_equivalence(
    source: &str,
    options: &LoweringOptions,
) -> Result<EquivalenceReport, EquivalenceError> {
    let original = run_source(source).map_err(EquivalenceError::Original)?;
    let lowered_file = lower_source("program.js", source, options)?;
    let lowered = run_source(&lowered_file.output).map_err(EquivalenceError::Lowered)?;
    debug!(
        rewrites = lowered_file.rewrites.len(),
        original_log = original.log.len(),
        lowered_log = lowered.log.len(),
        "equivalence run"
    );
    Ok(EquivalenceReport {
        original,
        lowered,
        lowered_source: lowered_file.output,
        rewrites: lowered_file.rewrites,
    })
}
