//! JSON payload parsers for the City of Chicago and City Health Dashboard APIs.
//!
//! Both APIs are loose about scalar types (Socrata sends coordinates as
//! strings, the dashboard sends FIPS codes as numbers or strings and
//! estimates as numbers, strings or null), so fields are kept as raw
//! [`Value`]s and converted with [`value_as_f64`] / [`value_as_text`].

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// One row of the CTA 'L' stops dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationRow {
    #[serde(default)]
    pub map_id: Value,
    #[serde(default)]
    pub station_descriptive_name: Option<String>,
    #[serde(default)]
    pub location: Option<LocationRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRow {
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
}

/// One tract estimate from the dashboard `tract-metric` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TractMetricRow {
    #[serde(default)]
    pub stcotr_fips: Value,
    #[serde(default)]
    pub est: Value,
}

#[derive(Debug, Deserialize)]
struct TractMetricResponse {
    #[serde(default)]
    rows: Vec<TractMetricRow>,
}

/// Decodes the stops dataset, a bare JSON array of rows.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON array of objects.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<StationRow>> {
    serde_json::from_slice(bytes).context("Failed to parse station rows")
}

/// Decodes a `tract-metric` response and returns its `rows`.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON object.
pub fn parse_tract_metric(bytes: &[u8]) -> Result<Vec<TractMetricRow>> {
    let resp: TractMetricResponse =
        serde_json::from_slice(bytes).context("Failed to parse tract metric response")?;
    Ok(resp.rows)
}

pub fn value_as_f64(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    f.filter(|f| f.is_finite())
}

/// Renders an identifier-like value as text. Integral floats lose their
/// fractional part so `17031010100.0` and `"17031010100"` agree.
pub fn value_as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| format!("{f:.0}"))
            }
        }
        _ => None,
    }
}
