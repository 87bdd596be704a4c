//! Ensemble analysis data contract.
//!
//! A real pipeline would fill these from thousands of sampled plans; this
//! crate only fabricates plausible summaries behind a seedable generator,
//! so the synthetic numbers are reproducible and consumers never see the
//! randomness directly.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Minority voting-age population share above which a district is counted
/// as an opportunity district.
pub const OPPORTUNITY_THRESHOLD_PCT: f64 = 37.0;

/// Which constraint set the ensemble was sampled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsembleKind {
    RaceBlind,
    Vra,
}

/// Five-number summary of minority population share for one district slot,
/// across every plan in the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictQuantiles {
    pub district: String,
    pub min: u32,
    pub q1: u32,
    pub median: u32,
    pub q3: u32,
    pub max: u32,
}

/// How many plans produced a given R/D seat split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatSplit {
    pub split: String,
    pub frequency: u32,
}

/// How many plans produced a given number of opportunity districts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityBin {
    pub opportunity_districts: u32,
    pub plans: u32,
}

/// Summary statistics for one ensemble of alternative plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleResult {
    pub box_plot: Vec<DistrictQuantiles>,
    pub seat_share: Vec<SeatSplit>,
    pub opportunity_districts: Vec<OpportunityBin>,
    pub total_plans: u32,
    pub avg_opportunity_districts: f64,
}

/// The race-blind and VRA-constrained ensembles for one state, as written
/// to disk for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEnsembles {
    pub race_blind: EnsembleResult,
    pub vra: EnsembleResult,
}

impl StateEnsembles {
    /// Both ensembles from one seed, with fixed per-kind offsets so the
    /// pair is deterministic as a whole.
    pub fn synthetic(num_districts: u32, total_plans: u32, seed: u64) -> Self {
        StateEnsembles {
            race_blind: EnsembleResult::synthetic(
                EnsembleKind::RaceBlind, num_districts, total_plans, seed,
            ),
            vra: EnsembleResult::synthetic(
                EnsembleKind::Vra, num_districts, total_plans, seed.wrapping_add(1),
            ),
        }
    }
}

impl EnsembleResult {
    /// Generate a synthetic ensemble summary. Identical arguments always
    /// produce identical output.
    pub fn synthetic(kind: EnsembleKind, num_districts: u32, total_plans: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let box_plot = synthetic_box_plot(kind, num_districts, &mut rng);
        let seat_share = synthetic_seat_share(num_districts, &mut rng);
        let opportunity_districts = synthetic_opportunity(kind, num_districts, &mut rng);
        let avg_opportunity_districts = histogram_mean(&opportunity_districts);
        EnsembleResult {
            box_plot,
            seat_share,
            opportunity_districts,
            total_plans,
            avg_opportunity_districts,
        }
    }
}

/// Weighted mean of an opportunity-district histogram, rounded to one
/// decimal place for display.
pub fn histogram_mean(bins: &[OpportunityBin]) -> f64 {
    let plans: u64 = bins.iter().map(|bin| bin.plans as u64).sum();
    if plans == 0 {
        return 0.0;
    }
    let weighted: u64 = bins.iter()
        .map(|bin| bin.opportunity_districts as u64 * bin.plans as u64)
        .sum();
    (10.0 * weighted as f64 / plans as f64).round() / 10.0
}

/// Count opportunity districts in an enacted plan from per-district
/// minority shares (in percent).
pub fn count_opportunity_districts(minority_pcts: &[f64]) -> usize {
    minority_pcts.iter().filter(|&&pct| pct >= OPPORTUNITY_THRESHOLD_PCT).count()
}

fn synthetic_box_plot(kind: EnsembleKind, num_districts: u32, rng: &mut StdRng) -> Vec<DistrictQuantiles> {
    let mut rows: Vec<DistrictQuantiles> = (1..=num_districts)
        .map(|d| {
            // VRA-constrained ensembles push minority share higher in some
            // district slots.
            let base = match kind {
                EnsembleKind::Vra => 12.0 + 3.0 * d as f64,
                EnsembleKind::RaceBlind => 8.0 + 2.0 * d as f64,
            };
            let spread = 20.0 + rng.random_range(0.0..15.0);
            DistrictQuantiles {
                district: format!("D{d}"),
                min: base.round() as u32,
                q1: (base + spread * 0.2).round() as u32,
                median: (base + spread * 0.45).round() as u32,
                q3: (base + spread * 0.7).round() as u32,
                max: (base + spread * 0.95).round() as u32,
            }
        })
        .collect();
    // Sort by median for cleaner display
    rows.sort_by_key(|row| row.median);
    rows
}

fn synthetic_seat_share(num_districts: u32, rng: &mut StdRng) -> Vec<SeatSplit> {
    let bins = num_districts + 1;
    let center = bins / 2;
    (0..bins)
        .map(|i| {
            let split = if i == 0 {
                "All D".to_string()
            } else if i == num_districts {
                "All R".to_string()
            } else {
                format!("{i}R")
            };
            let dist = center.abs_diff(i) as f64;
            let frequency = 40.0 * (-0.5 * dist * dist).exp() + rng.random_range(0.0..10.0);
            SeatSplit { split, frequency: (frequency.round() as u32).max(2) }
        })
        .collect()
}

fn synthetic_opportunity(kind: EnsembleKind, num_districts: u32, rng: &mut StdRng) -> Vec<OpportunityBin> {
    let max_opportunity = match kind {
        EnsembleKind::Vra => num_districts.min(4),
        EnsembleKind::RaceBlind => num_districts.min(3),
    };
    (0..=max_opportunity)
        .map(|count| {
            let base: i64 = match (kind, count) {
                (EnsembleKind::Vra, 2) => 3200,
                (EnsembleKind::Vra, 1) => 1200,
                (EnsembleKind::Vra, 3) => 500,
                (EnsembleKind::Vra, _) => 100,
                (EnsembleKind::RaceBlind, 1) => 3500,
                (EnsembleKind::RaceBlind, 0) => 800,
                (EnsembleKind::RaceBlind, 2) => 600,
                (EnsembleKind::RaceBlind, _) => 100,
            };
            let jitter: i64 = rng.random_range(-100..=100);
            OpportunityBin {
                opportunity_districts: count,
                plans: (base + jitter).max(0) as u32,
            }
        })
        .collect()
}
