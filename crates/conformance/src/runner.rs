//! Fixture discovery and parallel execution.

use std::path::{Path, PathBuf};

use anyhow::Context;
use loopdown_emitter::{HofKind, LoweringOptions};
use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::equivalence::{Divergence, check_equivalence};
use crate::fixture;

/// One program to check: a plain fixture or one instantiation of a template.
#[derive(Debug, Clone)]
pub struct FixtureCase {
    pub path: PathBuf,
    pub kind: Option<HofKind>,
    pub source: String,
    pub options: LoweringOptions,
}

impl FixtureCase {
    /// `path` or `path [kind]`.
    pub fn name(&self) -> String {
        match self.kind {
            Some(kind) => format!("{} [{kind}]", self.path.display()),
            None => self.path.display().to_string(),
        }
    }
}

#[derive(Debug)]
pub enum CaseOutcome {
    Passed { rewrites: usize },
    Diverged {
        divergence: Divergence,
        lowered_source: String,
    },
    /// Lowering or interpretation failed.
    Failed(String),
}

#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Passed { .. })
    }
}

/// Whether `path` contains `filter` (all paths match without a filter).
pub fn matches_path_filter(path: &Path, filter: Option<&str>) -> bool {
    filter.is_none_or(|filter| path.to_string_lossy().contains(filter))
}

/// `.js` files under `dir`, sorted.
pub fn discover_fixtures(dir: &Path, filter: Option<&str>) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "js")
            && matches_path_filter(path, filter)
        {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read a fixture and expand it into cases. Skipped fixtures expand to none.
pub fn expand_fixture(path: &Path) -> anyhow::Result<Vec<FixtureCase>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let directives = fixture::parse_directives(&content);
    if let Some(reason) = fixture::should_skip(&directives) {
        debug!(path = %path.display(), reason, "skipping fixture");
        return Ok(Vec::new());
    }
    let options = fixture::lowering_options(&directives)
        .with_context(|| format!("in {}", path.display()))?;

    if !fixture::is_template(&content) {
        return Ok(vec![FixtureCase {
            path: path.to_path_buf(),
            kind: None,
            source: content,
            options,
        }]);
    }
    let kinds = fixture::template_kinds(&directives)
        .with_context(|| format!("in {}", path.display()))?;
    Ok(kinds
        .into_iter()
        .map(|kind| FixtureCase {
            path: path.to_path_buf(),
            kind: Some(kind),
            source: fixture::instantiate(&content, kind),
            options: options.clone(),
        })
        .collect())
}

pub fn run_case(case: &FixtureCase) -> CaseResult {
    let outcome = match check_equivalence(&case.source, &case.options) {
        Ok(report) => match report.divergence() {
            None => CaseOutcome::Passed {
                rewrites: report.rewrites.len(),
            },
            Some(divergence) => CaseOutcome::Diverged {
                divergence,
                lowered_source: report.lowered_source,
            },
        },
        Err(err) => CaseOutcome::Failed(err.to_string()),
    };
    CaseResult {
        name: case.name(),
        outcome,
    }
}

/// Run every case in parallel; results keep the input order.
pub fn run_cases(cases: &[FixtureCase]) -> Vec<CaseResult> {
    let results: Vec<_> = cases.par_iter().map(run_case).collect();
    let passed = results.iter().filter(|r| r.passed()).count();
    info!(total = results.len(), passed, "conformance run finished");
    results
}

/// Discover, expand and run all fixtures under `dir`.
pub fn run_fixture_dir(dir: &Path, filter: Option<&str>) -> anyhow::Result<Vec<CaseResult>> {
    let mut cases = Vec::new();
    for path in discover_fixtures(dir, filter)? {
        cases.extend(expand_fixture(&path)?);
    }
    Ok(run_cases(&cases))
}

#[cfg(test)]
#[path = "tests/runner.rs"]
mod tests;
