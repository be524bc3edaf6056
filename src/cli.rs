//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Split a trip's expenses and suggest who should pay whom.
///
/// Reads the trip's participants and expenses from CSV files, and writes every
/// participant's balance followed by the payments that settle them.
#[derive(Debug, Parser)]
#[command(name = "trip-ledger", version, about, long_about = None)]
pub struct Cli {
    /// CSV file of participants, with an `id,name` header.
    #[arg(short, long)]
    pub participants: PathBuf,

    /// CSV file of expenses, with a `description,amount,payer,participants`
    /// header. Participants are `;`-separated ids.
    #[arg(short, long)]
    pub expenses: PathBuf,

    /// Where to write the report. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the trip, used in logs.
    #[arg(short, long, default_value = "trip")]
    pub trip: String,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
