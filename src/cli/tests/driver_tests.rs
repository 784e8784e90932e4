use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::args::CliArgs;
use super::driver::{
    build_exclude_set, collect_inputs, lower_file, render_outputs, run, write_outputs,
};
use loopdown_common::diagnostics::diagnostic_codes;
use loopdown_emitter::{HofKind, LoweringOptions};

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn args(extra: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("loopdown").chain(extra.iter().copied()))
        .expect("args should parse")
}

fn relative_paths(temp: &TempDir, paths: &[&str], exclude: &[&str]) -> Vec<PathBuf> {
    let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
    let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    collect_inputs(&paths, &build_exclude_set(&exclude).unwrap(), temp.path())
        .unwrap()
        .into_iter()
        .map(|input| input.relative)
        .collect()
}

#[test]
fn collects_js_files_sorted() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/b.js", "");
    write(temp.path(), "src/a.js", "");
    write(temp.path(), "src/nested/c.js", "");
    write(temp.path(), "src/readme.md", "");

    assert_eq!(
        relative_paths(&temp, &["src"], &[]),
        vec![
            PathBuf::from("a.js"),
            PathBuf::from("b.js"),
            PathBuf::from("nested/c.js")
        ]
    );
}

#[test]
fn excludes_matching_globs() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/app.js", "");
    write(temp.path(), "src/app.min.js", "");
    write(temp.path(), "src/vendor/lib.js", "");

    assert_eq!(
        relative_paths(&temp, &["src"], &["*.min.js", "vendor/**"]),
        vec![PathBuf::from("app.js")]
    );
}

#[test]
fn explicit_files_are_kept_once() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "one.js", "");
    write(temp.path(), "two.js", "");

    let inputs = relative_paths(&temp, &["two.js", "one.js", "two.js"], &[]);
    assert_eq!(inputs, vec![PathBuf::from("two.js"), PathBuf::from("one.js")]);
}

#[test]
fn missing_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let exclude = build_exclude_set(&[]).unwrap();
    let err = collect_inputs(&[PathBuf::from("nope")], &exclude, temp.path()).unwrap_err();
    assert!(err.to_string().contains("no such file or directory"));
}

#[test]
fn invalid_exclude_glob_is_an_error() {
    assert!(build_exclude_set(&["src/[".to_string()]).is_err());
}

#[test]
fn syntax_errors_become_diagnostics() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.js", "var x = ;\n");
    let exclude = build_exclude_set(&[]).unwrap();
    let inputs = collect_inputs(&[PathBuf::from("bad.js")], &exclude, temp.path()).unwrap();

    let result = lower_file(&inputs[0], &LoweringOptions::default());
    let diagnostics = result.outcome.unwrap_err();
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics[0].file, "bad.js");
    assert_eq!(diagnostics[0].code, diagnostic_codes::EXPRESSION_EXPECTED);
}

#[test]
fn runs_and_writes_outputs() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/app.js",
        "var xs = [1, 2];\nvar ys = xs.map(function (x) { return x * 2; });\n",
    );
    write(temp.path(), "src/lib/util.js", "[1].forEach(log);\n");
    write(temp.path(), "src/broken.js", "var = 1;\n");

    let lowering = run(&args(&["src"]), temp.path()).unwrap();
    assert_eq!(lowering.files.len(), 3);
    assert!(lowering.has_errors());
    assert!(!lowering.diagnostics().is_empty());

    let out_dir = temp.path().join("dist");
    assert_eq!(write_outputs(&lowering, &out_dir).unwrap(), 2);
    let app = fs::read_to_string(out_dir.join("app.js")).unwrap();
    assert!(app.contains("for (; _i < _a.length; _i++)"), "{app}");
    assert!(app.contains("var ys = _r;"), "{app}");
    let util = fs::read_to_string(out_dir.join("lib").join("util.js")).unwrap();
    assert!(!util.contains("forEach"), "{util}");
    assert!(!out_dir.join("broken.js").exists());
}

#[test]
fn report_lists_rewrites_with_positions() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "a.js",
        "var ok = [1].every(function (x) { return x; });\n[2].forEach(log);\n",
    );

    let lowering = run(&args(&["a.js", "--only", "forEach"]), temp.path()).unwrap();
    let report = lowering.report();
    assert_eq!(report.total_rewrites, 1);
    assert_eq!(report.failed_files, 0);
    let site = &report.files[0].rewrites[0];
    assert_eq!(site.kind, HofKind::ForEach);
    assert_eq!((site.line, site.column), (2, 1));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["totalRewrites"], 1);
    assert_eq!(json["files"][0]["path"], "a.js");
    assert_eq!(json["files"][0]["rewrites"][0]["kind"], "forEach");
    assert_eq!(json["files"][0]["rewrites"][0]["mode"], "replaceStatement");
}

#[test]
fn stdout_headers_only_for_several_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.js", "var a = 1;\n");
    write(temp.path(), "b.js", "var b = 2;\n");

    let single = run(&args(&["a.js"]), temp.path()).unwrap();
    assert_eq!(render_outputs(&single), "var a = 1;\n");

    let both = run(&args(&["a.js", "b.js"]), temp.path()).unwrap();
    assert_eq!(render_outputs(&both), "// a.js\nvar a = 1;\n// b.js\nvar b = 2;\n");
}

#[test]
fn empty_input_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(run(&args(&[]), temp.path()).is_err());
}
