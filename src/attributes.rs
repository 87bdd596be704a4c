//! Demographic/election attribute join.
//!
//! Source rows are comma-separated with a header line: a geographic-id
//! column plus integer count/vote columns. Counts that are missing or
//! unparsable default to 0 before ratio computation; a ratio whose
//! denominator is 0 is absent on the precinct, never 0 or NaN.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use anyhow::{Context, Result};
use polars::frame::DataFrame;
use polars::io::SerReader;
use polars::prelude::{CsvReadOptions, CsvReader, DataType, Field, Schema};

use crate::geojson::FeatureCollection;

/// Per-precinct derived percentages. A `None` means the source record had a
/// zero denominator for that ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrecinctStats {
    pub minority_pct: Option<f64>,
    pub dem_pct: Option<f64>,
}

/// Attribute records keyed by normalized (trimmed) geographic id.
pub type StatsById = AHashMap<String, PrecinctStats>;

const GEOID_COL: &str = "geoid";
const TOTAL_POP_COL: &str = "total_pop";
const MINORITY_POP_COL: &str = "minority_pop";
const DEM_VOTES_COL: &str = "dem_votes";
const REP_VOTES_COL: &str = "rep_votes";

/// Read a demographics/election CSV into attribute records.
///
/// Expected columns: `geoid,total_pop,minority_pop,dem_votes,rep_votes`.
/// The id column is forced to string type so zero-padded ids survive.
pub fn read_stats_csv(path: &Path) -> Result<StatsById> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open attribute CSV: {}", path.display()))?;

    // Force geoid to be read as a string to preserve leading zeros
    let schema = Arc::new(Schema::from_iter([Field::new(GEOID_COL.into(), DataType::String)]));
    let df = CsvReader::new(file)
        .with_options(CsvReadOptions::default().with_schema_overwrite(Some(schema)))
        .finish()
        .with_context(|| format!("Failed to read attribute CSV: {}", path.display()))?;

    stats_from_frame(&df)
}

fn stats_from_frame(df: &DataFrame) -> Result<StatsById> {
    let geoids = df.column(GEOID_COL)
        .context("Attribute CSV is missing the geoid column")?
        .cast(&DataType::String)?;
    let geoids = geoids.str()?;

    // Non-strict casts turn unparsable values into nulls, which read as 0.
    let count_column = |name: &str| -> Result<polars::prelude::Column> {
        Ok(df.column(name)
            .with_context(|| format!("Attribute CSV is missing the {name} column"))?
            .cast(&DataType::Int64)?)
    };
    let total_pop = count_column(TOTAL_POP_COL)?;
    let minority_pop = count_column(MINORITY_POP_COL)?;
    let dem_votes = count_column(DEM_VOTES_COL)?;
    let rep_votes = count_column(REP_VOTES_COL)?;

    let mut records = StatsById::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(geoid) = geoids.get(row) else { continue };
        let geoid = geoid.trim();
        if geoid.is_empty() {
            continue;
        }

        let total = total_pop.i64()?.get(row).unwrap_or(0);
        let minority = minority_pop.i64()?.get(row).unwrap_or(0);
        let dem = dem_votes.i64()?.get(row).unwrap_or(0);
        let rep = rep_votes.i64()?.get(row).unwrap_or(0);

        records.insert(geoid.to_string(), PrecinctStats {
            minority_pct: ratio_pct(minority, total),
            dem_pct: ratio_pct(dem, dem + rep),
        });
    }
    Ok(records)
}

/// `100 * numerator / denominator`, absent when the denominator is 0.
fn ratio_pct(numerator: i64, denominator: i64) -> Option<f64> {
    (denominator > 0).then(|| 100.0 * numerator as f64 / denominator as f64)
}

/// Attach `minorityPct` / `demPct` onto each precinct by exact id match.
///
/// Ids are compared after trimming whitespace, case-sensitively (source ids
/// are already zero-padded numeric strings). Precincts with no matching
/// record are kept, just without these fields. Absent ratios stay absent.
pub fn join_attributes(precincts: &FeatureCollection, records: &StatsById) -> FeatureCollection {
    let features = precincts.features.iter()
        .map(|precinct| {
            let mut joined = precinct.clone();
            let stats = precinct.property_str("geoid")
                .map(str::trim)
                .and_then(|geoid| records.get(geoid));
            if let Some(stats) = stats {
                if let Some(pct) = stats.minority_pct {
                    joined.set_property("minorityPct", pct);
                }
                if let Some(pct) = stats.dem_pct {
                    joined.set_property("demPct", pct);
                }
            }
            joined
        })
        .collect();
    FeatureCollection::new(features)
}
