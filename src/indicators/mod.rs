//! The per-tract indicator table: joining, scoring and lookup.

pub mod adversity;
pub mod combine;
pub mod indicator;
pub mod types;
pub mod utility;

pub use adversity::AdversityLevel;
pub use combine::{calculate_adversity_index, combine, healthiest_under_budget};
pub use indicator::{Indicator, IndicatorGroup};
pub use types::TractRecord;

use std::collections::HashMap;

/// Scored tract records with lookup by geoid.
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    records: Vec<TractRecord>,
    by_geoid: HashMap<String, usize>,
}

impl IndicatorTable {
    pub fn new(records: Vec<TractRecord>) -> Self {
        let mut by_geoid = HashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            by_geoid.entry(r.geoid.clone()).or_insert(i);
        }
        Self { records, by_geoid }
    }

    pub fn get(&self, geoid: &str) -> Option<&TractRecord> {
        self.by_geoid.get(geoid).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[TractRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
