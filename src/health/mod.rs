//! City Health Dashboard tract metrics.
//!
//! The same five metrics can come from the dashboard's JSON API
//! ([`api`]) or from its downloadable tract CSV ([`dashboard_csv`]).

pub mod api;
pub mod dashboard_csv;

use serde::Serialize;

/// The dashboard metrics used by the adversity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthMetric {
    Diabetes,
    HighBloodPressure,
    Uninsured,
    LifeExpectancy,
    LeadRisk,
}

impl HealthMetric {
    /// In request order.
    pub const ALL: [HealthMetric; 5] = [
        HealthMetric::Diabetes,
        HealthMetric::HighBloodPressure,
        HealthMetric::Uninsured,
        HealthMetric::LifeExpectancy,
        HealthMetric::LeadRisk,
    ];

    /// Path segment of the `tract-metric` endpoint.
    pub fn api_slug(self) -> &'static str {
        match self {
            HealthMetric::Diabetes => "diabetes",
            HealthMetric::HighBloodPressure => "high-blood-pressure",
            HealthMetric::Uninsured => "uninsured",
            HealthMetric::LifeExpectancy => "life-expectancy",
            HealthMetric::LeadRisk => "housing-with-potential-lead-risk",
        }
    }

    /// The estimate vintage requested from the API.
    pub fn data_yr_type(self) -> &'static str {
        match self {
            HealthMetric::Diabetes | HealthMetric::HighBloodPressure => {
                "2017, 1 Year Modeled Estimate"
            }
            HealthMetric::Uninsured | HealthMetric::LeadRisk => "2017, 5 Year Estimate",
            HealthMetric::LifeExpectancy => "2010-2015, 6 Year Modeled Estimate",
        }
    }

    /// `metric_name` as written in the dashboard CSV.
    pub fn csv_name(self) -> &'static str {
        match self {
            HealthMetric::Diabetes => "Diabetes",
            HealthMetric::HighBloodPressure => "High blood pressure",
            HealthMetric::Uninsured => "Uninsured",
            HealthMetric::LifeExpectancy => "Life expectancy",
            HealthMetric::LeadRisk => "Housing with potential lead risk",
        }
    }

    pub fn from_csv_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|m| m.csv_name() == name)
    }
}

/// Health indicators for one census tract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthTract {
    pub geoid: String,
    pub life_expectancy: Option<f64>,
    pub diabetes: Option<f64>,
    pub high_bp: Option<f64>,
    pub lead_risk: Option<f64>,
    pub uninsured: Option<f64>,
}

impl HealthTract {
    pub fn new(geoid: String) -> Self {
        Self {
            geoid,
            ..Default::default()
        }
    }

    pub fn set(&mut self, metric: HealthMetric, value: Option<f64>) {
        let slot = match metric {
            HealthMetric::Diabetes => &mut self.diabetes,
            HealthMetric::HighBloodPressure => &mut self.high_bp,
            HealthMetric::Uninsured => &mut self.uninsured,
            HealthMetric::LifeExpectancy => &mut self.life_expectancy,
            HealthMetric::LeadRisk => &mut self.lead_risk,
        };
        *slot = value;
    }
}
