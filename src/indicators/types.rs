//! The combined per-tract table.

use serde::Serialize;

use crate::census::AcsTract;
use crate::health::HealthTract;
use crate::indicators::adversity::AdversityLevel;

/// Demographic, health and derived indicators for one census tract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TractRecord {
    pub geoid: String,

    // ACS
    pub nhwhite_pct: Option<f64>,
    pub nhblack_pct: Option<f64>,
    pub hisp_pct: Option<f64>,
    pub nhasian_pct: Option<f64>,
    pub poc_pct: Option<f64>,
    pub under5_pct: Option<f64>,
    #[serde(rename = "65over_pct")]
    pub over65_pct: Option<f64>,
    pub median_rent: Option<f64>,
    pub poverty_pct: Option<f64>,

    // City Health Dashboard
    pub life_expectancy: Option<f64>,
    pub diabetes: Option<f64>,
    pub high_bp: Option<f64>,
    pub lead_risk: Option<f64>,
    pub uninsured: Option<f64>,

    // derived
    pub agg_health: Option<f64>,
    pub adv_no_norm: Option<AdversityLevel>,
    pub agg_health_norm: Option<f64>,
    pub adv_norm: Option<AdversityLevel>,
}

impl TractRecord {
    pub fn from_parts(acs: &AcsTract, health: &HealthTract) -> Self {
        Self {
            geoid: acs.geoid.clone(),
            nhwhite_pct: acs.nhwhite_pct,
            nhblack_pct: acs.nhblack_pct,
            hisp_pct: acs.hisp_pct,
            nhasian_pct: acs.nhasian_pct,
            poc_pct: acs.poc_pct,
            under5_pct: acs.under5_pct,
            over65_pct: acs.over65_pct,
            median_rent: acs.median_rent,
            poverty_pct: acs.poverty_pct,
            life_expectancy: health.life_expectancy,
            diabetes: health.diabetes,
            high_bp: health.high_bp,
            lead_risk: health.lead_risk,
            uninsured: health.uninsured,
            ..Default::default()
        }
    }

    /// The percentage indicators averaged into `agg_health`.
    pub fn health_aggregators(&self) -> [Option<f64>; 5] {
        [
            self.diabetes,
            self.high_bp,
            self.lead_risk,
            self.poverty_pct,
            self.uninsured,
        ]
    }
}
