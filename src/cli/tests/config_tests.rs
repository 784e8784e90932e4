use clap::Parser;
use std::fs;
use tempfile::TempDir;

use super::args::CliArgs;
use super::config::{CONFIG_FILE_NAME, resolve_config_path, resolve_options};
use loopdown_emitter::{HofKind, LoweringOptions, ThisArgPolicy};

fn args(extra: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("loopdown").chain(extra.iter().copied()))
        .expect("args should parse")
}

#[test]
fn defaults_without_config_file() {
    let temp = TempDir::new().unwrap();
    assert!(resolve_config_path(temp.path(), None).unwrap().is_none());
    let options = resolve_options(&args(&[]), temp.path()).unwrap();
    assert_eq!(options, LoweringOptions::default());
}

#[test]
fn finds_config_in_working_directory() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        r#"{ "operations": ["filter"], "thisArg": "reject" }"#,
    )
    .unwrap();

    let options = resolve_options(&args(&[]), temp.path()).unwrap();
    assert_eq!(options.operations, vec![HofKind::Filter]);
    assert_eq!(options.this_arg, ThisArgPolicy::Reject);
}

#[test]
fn flags_override_config_file() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("conf")).unwrap();
    fs::write(
        temp.path().join("conf").join(CONFIG_FILE_NAME),
        r#"{ "operations": ["filter"], "thisArg": "reject" }"#,
    )
    .unwrap();

    let options = resolve_options(
        &args(&["--config", "conf", "--only", "some,map,some", "--this-arg", "thread"]),
        temp.path(),
    )
    .unwrap();
    assert_eq!(options.operations, vec![HofKind::Map, HofKind::Some]);
    assert_eq!(options.this_arg, ThisArgPolicy::Thread);
}

#[test]
fn missing_or_invalid_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = resolve_options(&args(&["--config", "nope.json"]), temp.path()).unwrap_err();
    assert!(err.to_string().contains("config file not found"));

    fs::write(temp.path().join("bad.json"), r#"{ "target": "es5" }"#).unwrap();
    let err = resolve_options(&args(&["--config", "bad.json"]), temp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config"));
}
