//! Output formatting and persistence for run statistics and tract tables.
//!
//! Supports JSON logging, CSV append and full CSV writes.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::context::MapContext;
use crate::transit::MetroLine;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends `record` as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Writes `rows` to `path`, replacing any existing file.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// Writes one row per tract under each line: the line, the tract, the two
/// selected indicators and the combined scores.
pub fn write_map_rows(path: &Path, context: &MapContext, lines: &[MetroLine]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        "line",
        "geoid",
        context.ph_indicator.key(),
        context.se_indicator.key(),
        "agg_health",
        "adv_norm",
    ])?;

    let mut rows = 0;
    for line in lines {
        for tract in &line.tracts {
            writer.write_record([
                line.name().to_string(),
                tract.geoid.clone(),
                cell(context.ph_indicator.value(tract)),
                cell(context.se_indicator.value(tract)),
                cell(tract.agg_health),
                tract.adv_norm.map(|a| a.to_string()).unwrap_or_default(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    info!(path = %path.display(), rows, %context, "Map rows written");
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{AdversityLevel, Indicator, TractRecord};
    use crate::stats::LineStats;
    use crate::transit::LineColor;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_print_json_does_not_panic() {
        let stats = LineStats::default();
        print_json(&stats).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.csv");

        append_record(&path, &LineStats::default()).unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.csv");

        append_record(&path, &LineStats::default()).unwrap();
        append_record(&path, &LineStats::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_write_records_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "stale\n").unwrap();

        let rows = vec![
            TractRecord {
                geoid: "17031010100".into(),
                median_rent: Some(950.0),
                ..Default::default()
            },
            TractRecord {
                geoid: "17031010201".into(),
                ..Default::default()
            },
        ];
        write_records(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.lines().next().unwrap().starts_with("geoid,"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_write_map_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.csv");

        let context = MapContext::new(
            vec![LineColor::Red],
            Indicator::Diabetes,
            Indicator::MedianRent,
        )
        .unwrap();
        let mut line = MetroLine::from_stop_names(LineColor::Red, ["Howard", "Jarvis"]);
        line.tracts = vec![TractRecord {
            geoid: "17031010100".into(),
            diabetes: Some(8.5),
            median_rent: Some(1200.0),
            agg_health: Some(14.0),
            adv_norm: Some(AdversityLevel::High),
            ..Default::default()
        }];

        write_map_rows(&path, &context, &[line]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "line,geoid,diabetes,median_rent,agg_health,adv_norm");
        assert_eq!(lines[1], "red,17031010100,8.5,1200,14,high");
    }
}
