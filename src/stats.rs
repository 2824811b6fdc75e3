use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::indicators::utility::mean;
use crate::transit::{LinkReport, MetroLine};

/// One row of per-line run statistics.
#[derive(Debug, Default, Serialize)]
pub struct LineStats {
    pub timestamp: DateTime<Utc>,
    pub line: Option<String>,

    // linkage
    pub scraped_stops: usize,
    pub linked_stops: usize,
    pub located_stops: usize,
    pub linked_pct: f64,

    // tracts
    pub tracts: usize,
    pub tracts_with_rent: usize,
    pub tracts_with_score: usize,
    pub mean_agg_health: Option<f64>,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl LineStats {
    pub fn from_line(line: &MetroLine, report: &LinkReport) -> Self {
        let scores: Vec<f64> = line.tracts.iter().filter_map(|t| t.agg_health).collect();

        LineStats {
            timestamp: Utc::now(),
            line: Some(line.name().to_string()),
            scraped_stops: report.scraped,
            linked_stops: report.linked,
            located_stops: line.located_stops().count(),
            linked_pct: Self::pct(report.linked, report.scraped),
            tracts: line.tracts.len(),
            tracts_with_rent: line.tracts.iter().filter(|t| t.median_rent.is_some()).count(),
            tracts_with_score: scores.len(),
            mean_agg_health: (!scores.is_empty()).then(|| mean(&scores)),
            error_type: None,
            error_message: None,
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        LineStats {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_line(mut self, line: &str) -> Self {
        self.line = Some(line.to_string());
        self
    }
}
