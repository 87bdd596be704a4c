use anyhow::Result;
use clap::Parser;

use districtlens::cli::{Cli, Commands};
use districtlens::commands::{districts, ensemble, precincts};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Districts(args) => districts::run(&cli, args),
        Commands::Precincts(args) => precincts::run(&cli, args),
        Commands::Ensemble(args) => ensemble::run(&cli, args),
    }
}
