use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::attributes::{join_attributes, read_stats_csv};
use crate::cli::{Cli, PrecinctsArgs};
use crate::commands::resolve_state;
use crate::fetch::download_file;
use crate::io::{ensure_dir_exists, extract_zip, read_feature_collection, write_feature_collection};
use crate::join::assign_districts;
use crate::shp::read_precinct_shapefile;

const TIGER_VTD_BASE_URL: &str = "https://www2.census.gov/geo/tiger/TIGER2020PL/LAYER/VTD/2020";

pub fn run(cli: &Cli, args: &PrecinctsArgs) -> Result<()> {
    let state = resolve_state(&args.state)?;
    ensure_dir_exists(&args.out)?;

    // The district file must exist before precincts can be assigned.
    let districts_path = args.districts.clone()
        .unwrap_or_else(|| args.out.join(format!("{}.json", state.abbr)));
    let districts = read_feature_collection(&districts_path).with_context(|| {
        format!(
            "load districts for {} (run `districtlens districts {}` first?)",
            state.name, state.abbr
        )
    })?;

    let shp_path = fetch_vtd_shapefile(cli, args, state.fips)?;
    if cli.verbose > 0 {
        eprintln!("[precincts] reading {}", shp_path.display());
    }
    let precincts = read_precinct_shapefile(&shp_path)?;
    if cli.verbose > 0 {
        eprintln!("[precincts] {} precincts loaded", precincts.len());
    }

    let mut joined = assign_districts(&districts, &precincts);
    if cli.verbose > 0 {
        eprintln!("[precincts] {} precincts fall within congressional districts", joined.len());
    }

    if let Some(stats_path) = &args.stats {
        let records = read_stats_csv(stats_path)?;
        if cli.verbose > 0 {
            eprintln!("[precincts] joining {} attribute records", records.len());
        }
        joined = join_attributes(&joined, &records);
    }

    let out_path = args.out.join(format!("{}-precincts.json", state.abbr));
    write_feature_collection(&out_path, &joined, args.force)?;
    println!("Saved {} precincts -> {}", joined.len(), out_path.display());
    Ok(())
}

/// Download and extract the TIGER 2020 PL VTD layer for a state, returning
/// the path of the extracted `.shp`. Skips the download when the file is
/// already present from an earlier run.
fn fetch_vtd_shapefile(cli: &Cli, args: &PrecinctsArgs, fips: &str) -> Result<PathBuf> {
    let stem = format!("tl_2020_{fips}_vtd20");
    let download_dir = args.out.join("download");
    ensure_dir_exists(&download_dir)?;

    let extract_dir = download_dir.join(&stem);
    let shp_path = extract_dir.join(format!("{stem}.shp"));
    if shp_path.exists() {
        if cli.verbose > 0 {
            eprintln!("[precincts] reusing {}", shp_path.display());
        }
        return Ok(shp_path);
    }

    let zip_url = format!("{TIGER_VTD_BASE_URL}/{stem}.zip");
    let zip_path = download_dir.join(format!("{stem}.zip"));
    if cli.verbose > 0 {
        eprintln!("[download] {zip_url} -> {}", zip_path.display());
    }
    download_file(&zip_url, &zip_path, true)?;

    if cli.verbose > 0 {
        eprintln!("[extract] {} -> {}", zip_path.display(), extract_dir.display());
    }
    extract_zip(&zip_path, &extract_dir, true)?;

    anyhow::ensure!(shp_path.exists(), "extracted archive is missing {}", shp_path.display());
    Ok(shp_path)
}
