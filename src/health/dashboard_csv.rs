//! The dashboard's downloadable tract CSV (`CHDB_data_tract_IL`).
//!
//! The file is long-format: one row per tract, metric and population group.
//! Only Chicago rows for the total population are kept, and estimates are
//! pivoted to one [`HealthTract`] per geoid.

use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::health::{HealthMetric, HealthTract};

const CITY: &str = "Chicago";
const GROUP: &str = "total population";

/// Loads and pivots the dashboard CSV at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or lacks a required column.
pub fn load_dashboard_csv(path: &Path) -> Result<Vec<HealthTract>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let tracts =
        read_dashboard(file).with_context(|| format!("Failed to load {}", path.display()))?;
    info!(tracts = tracts.len(), path = %path.display(), "Loaded dashboard CSV");
    Ok(tracts)
}

fn read_dashboard<R: std::io::Read>(reader: R) -> Result<Vec<HealthTract>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow!("missing column {name}"))
    };

    let state = col("state_fips")?;
    let county = col("county_fips")?;
    let tract = col("tract_code")?;
    let city = col("city_name")?;
    let metric_name = col("metric_name")?;
    let group = col("group_name")?;
    let est = col("est")?;

    // geoid -> metric -> (sum, count)
    let mut pivot: BTreeMap<String, BTreeMap<HealthMetric, (f64, usize)>> = BTreeMap::new();

    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        if field(city) != CITY || field(group) != GROUP {
            continue;
        }
        let Some(metric) = HealthMetric::from_csv_name(field(metric_name)) else {
            continue;
        };

        let geoid = format!("{}{}{}", field(state), field(county), field(tract));
        let slots = pivot.entry(geoid).or_default();

        if let Some(v) = field(est).parse::<f64>().ok().filter(|v| v.is_finite()) {
            let slot = slots.entry(metric).or_insert((0.0, 0));
            slot.0 += v;
            slot.1 += 1;
        }
    }

    let tracts = pivot
        .into_iter()
        .filter(|(_, slots)| !slots.is_empty())
        .map(|(geoid, slots)| {
            let mut tract = HealthTract::new(geoid);
            for (metric, (sum, count)) in slots {
                tract.set(metric, Some(sum / count as f64));
            }
            tract
        })
        .collect();

    Ok(tracts)
}
