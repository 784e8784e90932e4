//! Input discovery, parallel lowering and output.

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use loopdown_common::diagnostics::diagnostic_codes;
use loopdown_common::{Diagnostic, LineMap};
use loopdown_emitter::lowering_pass::RewriteMode;
use loopdown_emitter::{HofKind, LowerSourceError, LoweredFile, LoweringOptions, lower_source};

use super::args::CliArgs;
use super::config::resolve_options;

/// A `.js` file selected for lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// Path used in diagnostics and reports.
    pub display: String,
    /// Destination relative to `--out-dir`.
    pub relative: PathBuf,
}

#[derive(Debug)]
pub struct FileResult {
    pub input: InputFile,
    pub source: String,
    pub outcome: Result<LoweredFile, Vec<Diagnostic>>,
}

impl FileResult {
    pub fn rewrite_count(&self) -> usize {
        self.outcome.as_ref().map_or(0, |lowered| lowered.rewrites.len())
    }
}

#[derive(Debug)]
pub struct LoweringRun {
    pub options: LoweringOptions,
    pub files: Vec<FileResult>,
}

impl LoweringRun {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.files
            .iter()
            .filter_map(|file| file.outcome.as_ref().err())
            .flatten()
            .cloned()
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|file| file.outcome.is_err())
    }

    pub fn report(&self) -> Report {
        let files: Vec<FileReport> = self.files.iter().map(FileReport::from_result).collect();
        Report {
            total_rewrites: files.iter().map(|file| file.rewrites.len()).sum(),
            failed_files: files.iter().filter(|file| !file.lowered).count(),
            files,
        }
    }
}

/// JSON summary printed by `--report`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub files: Vec<FileReport>,
    pub total_rewrites: usize,
    pub failed_files: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub lowered: bool,
    pub rewrites: Vec<RewriteSite>,
}

/// A rewritten call with a 1-based line and column.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSite {
    pub kind: HofKind,
    pub mode: RewriteMode,
    pub line: u32,
    pub column: u32,
}

impl FileReport {
    fn from_result(result: &FileResult) -> Self {
        let rewrites = match &result.outcome {
            Ok(lowered) => {
                let line_map = LineMap::build(&result.source);
                lowered
                    .rewrites
                    .iter()
                    .map(|record| {
                        let position = line_map.offset_to_position(record.pos);
                        RewriteSite {
                            kind: record.kind,
                            mode: record.mode,
                            line: position.line + 1,
                            column: position.character + 1,
                        }
                    })
                    .collect()
            }
            Err(_) => Vec::new(),
        };
        FileReport {
            path: result.input.display.clone(),
            lowered: result.outcome.is_ok(),
            rewrites,
        }
    }
}

pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid --exclude pattern `{pattern}`"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build --exclude set")
}

fn is_js_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "js")
}

fn is_excluded(exclude: &GlobSet, path: &Path, relative: &Path) -> bool {
    exclude.is_match(path) || exclude.is_match(relative)
}

/// Expand `paths` (relative to `cwd`) into the `.js` files to lower.
///
/// Directory contents are sorted; a file reached twice is kept once.
pub fn collect_inputs(paths: &[PathBuf], exclude: &GlobSet, cwd: &Path) -> Result<Vec<InputFile>> {
    let default_root = [PathBuf::from(".")];
    let roots = if paths.is_empty() { &default_root[..] } else { paths };

    let mut seen = FxHashSet::default();
    let mut inputs = Vec::new();
    for root in roots {
        let resolved = if root.is_absolute() {
            root.clone()
        } else {
            cwd.join(root)
        };

        if resolved.is_file() {
            let relative = PathBuf::from(resolved.file_name().unwrap_or(resolved.as_os_str()));
            if seen.insert(resolved.clone()) {
                inputs.push(InputFile {
                    display: root.display().to_string(),
                    path: resolved,
                    relative,
                });
            }
            continue;
        }
        if !resolved.is_dir() {
            bail!("no such file or directory: {}", root.display());
        }

        for entry in WalkDir::new(&resolved).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_js_file(path) {
                continue;
            }
            let relative = path.strip_prefix(&resolved).unwrap_or(path).to_path_buf();
            if is_excluded(exclude, path, &relative) {
                debug!(path = %path.display(), "excluded");
                continue;
            }
            if seen.insert(path.to_path_buf()) {
                inputs.push(InputFile {
                    display: root.join(&relative).display().to_string(),
                    path: path.to_path_buf(),
                    relative,
                });
            }
        }
    }
    Ok(inputs)
}

/// Lower one file. Unreadable files and files that fail to lower produce
/// diagnostics instead of output.
pub fn lower_file(input: &InputFile, options: &LoweringOptions) -> FileResult {
    let source = match std::fs::read_to_string(&input.path) {
        Ok(source) => source,
        Err(err) => {
            let diagnostic = Diagnostic::error(
                input.display.clone(),
                0,
                0,
                format!("Cannot read file: {err}"),
                diagnostic_codes::CANNOT_READ_FILE,
            );
            return FileResult {
                input: input.clone(),
                source: String::new(),
                outcome: Err(vec![diagnostic]),
            };
        }
    };

    let outcome = lower_source(&input.display, &source, options).map_err(|err| {
        warn!(file = %input.display, error = %err, "file not lowered");
        match err {
            LowerSourceError::Syntax { file, diagnostics } => diagnostics
                .into_iter()
                .map(|d| Diagnostic::error(file.clone(), d.start, d.length, d.message, d.code))
                .collect(),
            LowerSourceError::Lowering(err) => vec![Diagnostic::error(
                input.display.clone(),
                0,
                0,
                err.to_string(),
                diagnostic_codes::LOWERING_FAILED,
            )],
        }
    });

    FileResult {
        input: input.clone(),
        source,
        outcome,
    }
}

/// Parsing and printing recurse once per nesting level.
const LOWERING_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Lower every input in parallel; results keep the input order.
pub fn lower_files(inputs: &[InputFile], options: &LoweringOptions) -> Result<Vec<FileResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .thread_name(|index| format!("lower-{index}"))
        .stack_size(LOWERING_STACK_SIZE)
        .build()
        .context("failed to start lowering workers")?;
    Ok(pool.install(|| {
        inputs
            .par_iter()
            .map(|input| lower_file(input, options))
            .collect()
    }))
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<LoweringRun> {
    let options = resolve_options(args, cwd)?;
    let exclude = build_exclude_set(&args.exclude)?;
    let inputs = collect_inputs(&args.paths, &exclude, cwd)?;
    if inputs.is_empty() {
        bail!("no .js files found");
    }

    let files = lower_files(&inputs, &options)?;
    let run = LoweringRun { options, files };
    info!(
        files = run.files.len(),
        rewrites = run.files.iter().map(FileResult::rewrite_count).sum::<usize>(),
        failed = run.files.iter().filter(|f| f.outcome.is_err()).count(),
        "lowering finished"
    );
    Ok(run)
}

/// Write every lowered file under `out_dir`. Returns the number written.
pub fn write_outputs(run: &LoweringRun, out_dir: &Path) -> Result<usize> {
    let mut written = 0;
    for file in &run.files {
        let Ok(lowered) = &file.outcome else {
            continue;
        };
        let destination = out_dir.join(&file.input.relative);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&destination, &lowered.output)
            .with_context(|| format!("failed to write {}", destination.display()))?;
        written += 1;
    }
    Ok(written)
}

/// Lowered code for stdout. Each file gets a `// path` header when there
/// is more than one.
pub fn render_outputs(run: &LoweringRun) -> String {
    let lowered: Vec<_> = run
        .files
        .iter()
        .filter_map(|file| file.outcome.as_ref().ok().map(|l| (file, l)))
        .collect();
    let with_headers = run.files.len() > 1;

    let mut out = String::new();
    for (file, lowered) in lowered {
        if with_headers {
            out.push_str("// ");
            out.push_str(&file.input.display);
            out.push('\n');
        }
        out.push_str(&lowered.output);
        if !lowered.output.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
