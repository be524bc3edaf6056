use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trip_ledger::run::run;
use trip_ledger::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr, the report goes to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let participants = File::open(&cli.participants).with_context(|| {
        format!(
            "failed to open participants file {}",
            cli.participants.display()
        )
    })?;
    let expenses = File::open(&cli.expenses)
        .with_context(|| format!("failed to open expenses file {}", cli.expenses.display()))?;

    match &cli.output {
        Some(path) => {
            let output = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut output = BufWriter::new(output);
            run(&cli.trip, participants, expenses, &mut output)?;
            output.flush().context("failed to write report")?;
        }
        None => {
            run(&cli.trip, participants, expenses, io::stdout().lock())?;
        }
    }

    Ok(())
}
