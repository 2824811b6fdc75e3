//! Tables built from the dashboard `tract-metric` API.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::health::{HealthMetric, HealthTract};
use crate::parser::{TractMetricRow, value_as_f64, value_as_text};

/// `(geoid, estimate)` pairs for one metric.
pub type MetricTable = Vec<(String, Option<f64>)>;

/// Extracts the geoid and estimate of every row that has a geoid.
pub fn metric_table(metric: HealthMetric, rows: &[TractMetricRow]) -> MetricTable {
    let table: MetricTable = rows
        .iter()
        .filter_map(|row| {
            let Some(geoid) = value_as_text(&row.stcotr_fips) else {
                warn!(metric = metric.api_slug(), ?row, "Metric row without a tract id");
                return None;
            };
            Some((geoid, value_as_f64(&row.est)))
        })
        .collect();

    debug!(metric = metric.api_slug(), tracts = table.len(), "Built metric table");
    table
}

/// Joins per-metric tables on geoid, keeping only tracts present in all of
/// them. Order follows the first table.
pub fn join_metrics(tables: &[(HealthMetric, MetricTable)]) -> Vec<HealthTract> {
    let Some(((first_metric, first), rest)) = tables.split_first() else {
        return Vec::new();
    };

    let indexes: Vec<HashMap<&str, Option<f64>>> = rest
        .iter()
        .map(|(_, table)| {
            let mut index = HashMap::with_capacity(table.len());
            for (geoid, est) in table {
                index.entry(geoid.as_str()).or_insert(*est);
            }
            index
        })
        .collect();

    let mut seen = std::collections::HashSet::new();
    let mut tracts = Vec::new();

    'rows: for (geoid, est) in first {
        if !seen.insert(geoid.as_str()) {
            continue;
        }

        let mut tract = HealthTract::new(geoid.clone());
        tract.set(*first_metric, *est);

        for ((metric, _), index) in rest.iter().zip(&indexes) {
            match index.get(geoid.as_str()) {
                Some(v) => tract.set(*metric, *v),
                None => continue 'rows,
            }
        }
        tracts.push(tract);
    }

    tracts
}
