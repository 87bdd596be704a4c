//! Data-preparation CLI (argument schema only).

use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "districtlens", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch congressional district boundaries for a state
    Districts(DistrictsArgs),

    /// Fetch precinct boundaries, assign districts, and join attributes
    Precincts(PrecinctsArgs),

    /// Generate seeded synthetic ensemble summaries for a state
    Ensemble(EnsembleArgs),
}

#[derive(Args, Debug)]
pub struct DistrictsArgs {
    /// Two-letter postal code of a supported state, e.g. MS, MD
    pub state: String,

    /// Output directory for {STATE}.json
    #[arg(value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct PrecinctsArgs {
    /// Two-letter postal code of a supported state, e.g. MS, MD
    pub state: String,

    /// Output directory for {STATE}-precincts.json
    #[arg(value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// District boundary file (defaults to {out}/{STATE}.json)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub districts: Option<PathBuf>,

    /// Demographics/election CSV to join onto precincts
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub stats: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct EnsembleArgs {
    /// Two-letter postal code of a supported state, e.g. MS, MD
    pub state: String,

    /// Output directory for {STATE}-ensemble.json
    #[arg(value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Number of plans each ensemble summarizes
    #[arg(long, default_value_t = 5000)]
    pub plans: u32,

    /// RNG seed; identical seeds reproduce identical output
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}
