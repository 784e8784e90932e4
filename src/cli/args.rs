use clap::Parser;
use std::path::PathBuf;

use loopdown_emitter::{HofKind, ThisArgPolicy};

/// CLI arguments for the loopdown binary.
#[derive(Parser, Debug)]
#[command(
    name = "loopdown",
    version,
    about = "Lower array higher-order function calls into index loops"
)]
pub struct CliArgs {
    /// Files or directories to lower. Directories are searched for `.js` files.
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Write lowered files here, mirroring the input layout, instead of stdout.
    #[arg(short = 'o', long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// Lowering options file. Defaults to `loopdown.json` in the current directory.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Only lower these operations (comma-separated, e.g. `map,filter`).
    #[arg(long, value_delimiter = ',', value_parser = parse_hof_kind)]
    pub only: Option<Vec<HofKind>>,

    /// What to do with calls that pass a `thisArg`.
    #[arg(long = "this-arg", alias = "thisArg", value_parser = parse_this_arg)]
    pub this_arg: Option<ThisArgPolicy>,

    /// Skip paths matching this glob. May be repeated.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Print a JSON summary of rewritten call sites instead of the lowered code.
    #[arg(long)]
    pub report: bool,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

fn parse_hof_kind(value: &str) -> Result<HofKind, String> {
    value.trim().parse()
}

fn parse_this_arg(value: &str) -> Result<ThisArgPolicy, String> {
    value.trim().parse()
}
