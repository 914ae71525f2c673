//! lsif-inspect - inspect LSIF index dumps.
//!
//! Usage:
//!   lsif-inspect validate                     # Ordering and usage checks
//!   lsif-inspect validate --schema s.json     # ... plus element shapes
//!   lsif-inspect visualize 12 -d 2 -v         # DOT neighborhood of element 12
//!   lsif-inspect search --label range         # Matching elements as JSON lines
//!
//! Exit status: 0 on success, 1 when validation finds errors, 2 on fatal
//! errors (unreadable or malformed input, bad pattern, missing vertex).

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use lsif_inspect::cli::{execute, Cli};

fn main() -> ExitCode {
    // stdout carries the report or the DOT text, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let output = execute(cli)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.text.as_bytes())?;
    stdout.flush()?;
    Ok(output.success)
}
