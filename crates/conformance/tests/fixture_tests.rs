//! Runs every fixture under `fixtures/` through the equivalence check.

use std::path::PathBuf;

use loopdown_conformance::runner::{discover_fixtures, expand_fixture};
use loopdown_conformance::{CaseOutcome, run_fixture_dir};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[test]
fn test_all_fixtures_are_equivalent() {
    let results = run_fixture_dir(&fixtures_dir(), None).expect("fixtures run");
    assert!(!results.is_empty(), "no fixtures found");

    let failures: Vec<String> = results
        .iter()
        .filter_map(|result| match &result.outcome {
            CaseOutcome::Passed { .. } => None,
            CaseOutcome::Diverged {
                divergence,
                lowered_source,
            } => Some(format!("{}: {divergence}\n{lowered_source}", result.name)),
            CaseOutcome::Failed(message) => Some(format!("{}: {message}", result.name)),
        })
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn test_templates_rewrite_every_instantiation() {
    let results = run_fixture_dir(&fixtures_dir(), Some("callback_arguments")).unwrap();
    assert_eq!(results.len(), 6);
    for result in &results {
        assert!(
            matches!(result.outcome, CaseOutcome::Passed { rewrites: 1 }),
            "{}: {:?}",
            result.name,
            result.outcome
        );
    }
}

#[test]
fn test_kinds_directive_limits_instantiations() {
    let path = fixtures_dir().join("templates").join("short_circuit.js");
    let cases = expand_fixture(&path).unwrap();
    let names: Vec<_> = cases.iter().map(|case| case.name()).collect();
    assert_eq!(names.len(), 2, "{names:?}");
    assert!(names[0].ends_with("[every]"));
    assert!(names[1].ends_with("[some]"));
}

#[test]
fn test_skipped_fixtures_are_discovered_but_not_run() {
    let paths = discover_fixtures(&fixtures_dir(), Some("skipped")).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(expand_fixture(&paths[0]).unwrap().is_empty());
}

#[test]
fn test_rejected_this_arg_fixture_has_no_rewrites() {
    let results = run_fixture_dir(&fixtures_dir(), Some("this_arg_rejected")).unwrap();
    assert_eq!(results.len(), 5);
    assert!(
        results
            .iter()
            .all(|r| matches!(r.outcome, CaseOutcome::Passed { rewrites: 0 }))
    );
}
