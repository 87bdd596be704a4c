use anyhow::Result;

use crate::cli::{Cli, EnsembleArgs};
use crate::commands::resolve_state;
use crate::ensemble::StateEnsembles;
use crate::io::{ensure_dir_exists, write_json};

pub fn run(cli: &Cli, args: &EnsembleArgs) -> Result<()> {
    let state = resolve_state(&args.state)?;
    ensure_dir_exists(&args.out)?;

    if cli.verbose > 0 {
        eprintln!(
            "[ensemble] state={} districts={} plans={} seed={}",
            state.abbr, state.num_districts, args.plans, args.seed
        );
    }
    let ensembles = StateEnsembles::synthetic(state.num_districts, args.plans, args.seed);

    let out_path = args.out.join(format!("{}-ensemble.json", state.abbr));
    write_json(&out_path, &ensembles, args.force)?;
    println!("Saved ensemble summaries -> {}", out_path.display());
    Ok(())
}
