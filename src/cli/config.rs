//! Lowering options: `loopdown.json` plus command-line overrides.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use loopdown_emitter::LoweringOptions;

use super::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "loopdown.json";

pub fn find_config(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// The explicit `--config` path, or `loopdown.json` in `cwd` if present.
pub fn resolve_config_path(cwd: &Path, config: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(config) = config else {
        return Ok(find_config(cwd));
    };

    let mut candidate = if config.is_absolute() {
        config.to_path_buf()
    } else {
        cwd.join(config)
    };

    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }

    if !candidate.is_file() {
        bail!("config file not found at {}", candidate.display());
    }

    Ok(Some(candidate))
}

pub fn load_options(path: &Path) -> Result<LoweringOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    LoweringOptions::from_json_str(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Options from the config file (if any) with `--only` and `--this-arg` applied on top.
pub fn resolve_options(args: &CliArgs, cwd: &Path) -> Result<LoweringOptions> {
    let mut options = match resolve_config_path(cwd, args.config.as_deref())? {
        Some(path) => load_options(&path)?,
        None => LoweringOptions::default(),
    };

    if let Some(only) = &args.only {
        let mut operations = only.clone();
        operations.sort();
        operations.dedup();
        options.operations = operations;
    }
    if let Some(policy) = args.this_arg {
        options.this_arg = policy;
    }
    Ok(options)
}
