use anyhow::{Context, Result};

use crate::cli::{Cli, DistrictsArgs};
use crate::commands::resolve_state;
use crate::fetch::fetch_json;
use crate::geojson::{Feature, FeatureCollection};
use crate::io::{ensure_dir_exists, write_feature_collection};
use crate::states::district_color;

const DISTRICTS_BASE_URL: &str =
    "https://raw.githubusercontent.com/unitedstates/districts/gh-pages/cds/2016";

pub fn run(cli: &Cli, args: &DistrictsArgs) -> Result<()> {
    let state = resolve_state(&args.state)?;
    ensure_dir_exists(&args.out)?;

    // One fetch per district, sequential and fail-fast: the first error
    // aborts the run before anything is written.
    let mut features = Vec::with_capacity(state.num_districts as usize);
    for number in 1..=state.num_districts {
        let url = format!("{DISTRICTS_BASE_URL}/{}-{number}/shape.geojson", state.abbr);
        if cli.verbose > 0 {
            eprintln!("[districts] fetching {url}");
        }
        let mut feature: Feature = fetch_json(&url)
            .with_context(|| format!("fetch district {number} of {}", state.name))?;

        // Attach display properties alongside whatever the source carried.
        feature.set_property("district", number);
        feature.set_property("name", format!("District {number}"));
        feature.set_property("color", district_color(number));
        features.push(feature);
    }

    let out_path = args.out.join(format!("{}.json", state.abbr));
    write_feature_collection(&out_path, &FeatureCollection::new(features), args.force)?;
    println!("Saved {} districts -> {}", state.num_districts, out_path.display());
    Ok(())
}
