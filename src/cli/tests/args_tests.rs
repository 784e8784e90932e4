use clap::Parser;

use super::args::CliArgs;
use loopdown_emitter::{HofKind, ThisArgPolicy};

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["loopdown"]).expect("default args should parse");

    assert!(args.paths.is_empty());
    assert!(args.out_dir.is_none());
    assert!(args.config.is_none());
    assert!(args.only.is_none());
    assert!(args.this_arg.is_none());
    assert!(args.exclude.is_empty());
    assert!(!args.report);
}

#[test]
fn parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "loopdown",
        "--out-dir",
        "dist",
        "--config",
        "configs/loopdown.json",
        "--only",
        "map,reduce",
        "--this-arg",
        "reject",
        "--exclude",
        "**/vendor/**",
        "--exclude",
        "*.min.js",
        "--report",
        "src",
        "lib/a.js",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.out_dir.as_deref(), Some(std::path::Path::new("dist")));
    assert_eq!(
        args.config.as_deref(),
        Some(std::path::Path::new("configs/loopdown.json"))
    );
    assert_eq!(args.only, Some(vec![HofKind::Map, HofKind::Reduce]));
    assert_eq!(args.this_arg, Some(ThisArgPolicy::Reject));
    assert_eq!(args.exclude, vec!["**/vendor/**", "*.min.js"]);
    assert!(args.report);
    assert_eq!(
        args.paths,
        vec![
            std::path::PathBuf::from("src"),
            std::path::PathBuf::from("lib/a.js")
        ]
    );
}

#[test]
fn rejects_unknown_operation_names() {
    assert!(CliArgs::try_parse_from(["loopdown", "--only", "map,flatMap"]).is_err());
    assert!(CliArgs::try_parse_from(["loopdown", "--this-arg", "bind"]).is_err());
}
