#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use loopdown::cli::args::CliArgs;
use loopdown::cli::driver;
use loopdown::cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
/// Some files had syntax errors or failed to lower; the rest were processed.
const EXIT_FILES_SKIPPED: i32 = 1;

fn main() -> Result<()> {
    // LOOPDOWN_LOG / RUST_LOG enable tracing; see src/tracing_config.rs.
    loopdown::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let run = driver::run(&args, &cwd)?;

    let diagnostics = run.diagnostics();
    if !diagnostics.is_empty() {
        let color = !args.no_color && std::io::stderr().is_terminal();
        let mut reporter = Reporter::new(color);
        for file in &run.files {
            reporter.add_source(file.input.display.clone(), file.source.clone());
        }
        eprintln!("{}", reporter.render(&diagnostics));
    }

    if let Some(out_dir) = &args.out_dir {
        let out_dir = cwd.join(out_dir);
        let written = driver::write_outputs(&run, &out_dir)?;
        tracing::info!(written, out_dir = %out_dir.display(), "outputs written");
    }

    let mut stdout = std::io::stdout().lock();
    if args.report {
        let report = serde_json::to_string_pretty(&run.report()).context("failed to serialize report")?;
        writeln!(stdout, "{report}").context("failed to write report")?;
    } else if args.out_dir.is_none() {
        stdout
            .write_all(driver::render_outputs(&run).as_bytes())
            .context("failed to write output")?;
    }
    stdout.flush().context("failed to flush stdout")?;

    std::process::exit(if run.has_errors() {
        EXIT_FILES_SKIPPED
    } else {
        EXIT_SUCCESS
    });
}
