//! End-to-end tests for the loopdown binary.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn loopdown(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_loopdown"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("LOOPDOWN_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run loopdown")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_prints_lowered_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.js"), "[1, 2].forEach(function (x) { log(x); });\n").unwrap();

    let output = loopdown(&dir, &["app.js"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("var _a = [1, 2];\n"), "{text}");
    assert!(text.contains("_f(_a[_i], _i, _a);"), "{text}");
    assert!(!text.contains("forEach"), "{text}");
}

#[test]
fn test_writes_out_dir_and_report() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/sub")).unwrap();
    fs::write(
        dir.path().join("src/a.js"),
        "var ok = [1].some(function (x) { return x; });\n",
    )
    .unwrap();
    fs::write(dir.path().join("src/sub/b.js"), "var n = 1;\n").unwrap();

    let output = loopdown(&dir, &["src", "--out-dir", "dist", "--report"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["totalRewrites"], 1);
    assert_eq!(report["files"][0]["rewrites"][0]["kind"], "some");
    assert_eq!(report["files"][0]["rewrites"][0]["mode"], "hoistBefore");

    let lowered = fs::read_to_string(dir.path().join("dist/a.js")).unwrap();
    assert!(lowered.contains("var ok = _r;"), "{lowered}");
    assert_eq!(fs::read_to_string(dir.path().join("dist/sub/b.js")).unwrap(), "var n = 1;\n");
}

#[test]
fn test_config_file_and_flag_override() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("loopdown.json"), r#"{ "operations": ["map"] }"#).unwrap();
    fs::write(
        dir.path().join("a.js"),
        "var m = [1].map(function (x) { return x; });\nvar f = [1].filter(function (x) { return x; });\n",
    )
    .unwrap();

    let from_file = stdout(&loopdown(&dir, &["a.js"]));
    assert!(!from_file.contains(".map("), "{from_file}");
    assert!(from_file.contains(".filter("), "{from_file}");

    let overridden = stdout(&loopdown(&dir, &["a.js", "--only", "filter"]));
    assert!(overridden.contains(".map("), "{overridden}");
    assert!(!overridden.contains(".filter("), "{overridden}");
}

#[test]
fn test_syntax_errors_are_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.js"), "var x = ;\n").unwrap();
    fs::write(dir.path().join("good.js"), "var y = 2;\n").unwrap();

    let output = loopdown(&dir, &["bad.js", "good.js", "--no-color"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("bad.js:1:9 - error LD1109"), "{}", stderr(&output));
    assert_eq!(stdout(&output), "// good.js\nvar y = 2;\n");
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = loopdown(&dir, &["missing.js"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no such file or directory"));
}
