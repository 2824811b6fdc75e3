//! Joining ACS and health tables and scoring each tract.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::census::AcsTract;
use crate::health::HealthTract;
use crate::indicators::adversity::{AdversityLevel, equal_width_bin};
use crate::indicators::types::TractRecord;
use crate::indicators::utility::{mean, mean_present, sample_stddev};

/// Weight applied to `agg_health` in tracts whose life expectancy is below
/// the citywide mean.
pub const EARLY_DEATH_WEIGHT: f64 = 1.1;

/// Number of tracts returned by [`healthiest_under_budget`].
pub const HEALTHIEST_LIMIT: usize = 5;

/// Inner-joins ACS and health tracts on geoid, then scores them.
/// Order follows `acs`.
pub fn combine(acs: &[AcsTract], health: &[HealthTract]) -> Vec<TractRecord> {
    let mut index: HashMap<&str, &HealthTract> = HashMap::with_capacity(health.len());
    for tract in health {
        index.entry(tract.geoid.as_str()).or_insert(tract);
    }

    let mut records: Vec<TractRecord> = acs
        .iter()
        .filter_map(|a| {
            index
                .get(a.geoid.as_str())
                .map(|h| TractRecord::from_parts(a, h))
        })
        .collect();

    info!(
        acs = acs.len(),
        health = health.len(),
        joined = records.len(),
        "Joined ACS and health indicators"
    );

    calculate_adversity_index(&mut records);
    records
}

/// Fills `agg_health`, `adv_no_norm`, `agg_health_norm` and `adv_norm`.
///
/// `agg_health` is the mean of the present percentage indicators, weighted
/// by [`EARLY_DEATH_WEIGHT`] when life expectancy is below average. Higher
/// means more adversity. The normalized score is its negated z-score, so
/// there lower means more adversity.
pub fn calculate_adversity_index(records: &mut [TractRecord]) {
    let life: Vec<f64> = records.iter().filter_map(|r| r.life_expectancy).collect();
    let avg_life = (!life.is_empty()).then(|| mean(&life));

    for r in records.iter_mut() {
        r.agg_health = mean_present(r.health_aggregators()).map(|score| {
            match (r.life_expectancy, avg_life) {
                (Some(le), Some(avg)) if le < avg => score * EARLY_DEATH_WEIGHT,
                _ => score,
            }
        });
    }

    let scores: Vec<f64> = records.iter().filter_map(|r| r.agg_health).collect();
    let Some((min, max)) = min_max(&scores) else {
        debug!("No tract has an aggregated health score");
        return;
    };

    for r in records.iter_mut() {
        r.adv_no_norm = r
            .agg_health
            .and_then(|s| equal_width_bin(s, min, max))
            .map(AdversityLevel::from_bin);
    }

    let avg = mean(&scores);
    let Some(sd) = sample_stddev(&scores, avg).filter(|sd| *sd > 0.0) else {
        debug!(tracts = scores.len(), "Scores have no spread, skipping normalization");
        return;
    };

    for r in records.iter_mut() {
        r.agg_health_norm = r.agg_health.map(|s| -((s - avg) / sd));
    }

    let norms: Vec<f64> = records.iter().filter_map(|r| r.agg_health_norm).collect();
    if let Some((nmin, nmax)) = min_max(&norms) {
        for r in records.iter_mut() {
            r.adv_norm = r
                .agg_health_norm
                .and_then(|s| equal_width_bin(s, nmin, nmax))
                .map(AdversityLevel::from_bin_reversed);
        }
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// The (at most five) healthiest tracts whose median rent fits `budget`.
///
/// Lower `agg_health` is healthier; tracts without a score sort last.
pub fn healthiest_under_budget(records: &[TractRecord], budget: f64) -> Vec<&TractRecord> {
    let mut cheap: Vec<&TractRecord> = records
        .iter()
        .filter(|r| r.median_rent.is_some_and(|rent| rent <= budget))
        .collect();

    cheap.sort_by(|a, b| match (a.agg_health, b.agg_health) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    cheap.truncate(HEALTHIEST_LIMIT);
    cheap
}
