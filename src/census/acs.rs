//! Loading and joining the ACS topic tables.
//!
//! The "with_ann" downloads carry a column-code header row followed by a
//! row of human-readable labels. Label rows (and any other annotation) are
//! recognized by a `GEO.id2` that is not a FIPS code and skipped.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::census::topic::{GEO_ID_COLUMN, Topic, TopicRow, TopicTable};

/// Locations of the four ACS downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcsPaths {
    pub race: PathBuf,
    pub poverty: PathBuf,
    pub rent: PathBuf,
    pub age_sex: PathBuf,
}

impl AcsPaths {
    /// The layout under `data_dir` used by the project's data download.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Self {
        let acs = data_dir.as_ref().join("acs");
        Self {
            race: acs.join("race-ethn/ACS_17_5YR_B03002_with_ann.csv"),
            poverty: acs.join("poverty/ACS_17_5YR_S1701_with_ann.csv"),
            rent: acs.join("rent/ACS_17_5YR_B25064_with_ann.csv"),
            age_sex: acs.join("age_sex/ACS_17_5YR_B01001_with_ann.csv"),
        }
    }

    pub fn for_topic(&self, topic: Topic) -> &Path {
        match topic {
            Topic::Race => &self.race,
            Topic::Poverty => &self.poverty,
            Topic::Rent => &self.rent,
            Topic::Age | Topic::Sex => &self.age_sex,
        }
    }
}

/// Demographic indicators for one census tract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AcsTract {
    pub geoid: String,
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
}

/// Reads one topic from its CSV and reduces it to per-tract columns.
///
/// # Errors
///
/// Fails if the file cannot be read or lacks one of the topic's columns.
pub fn load_topic(path: &Path, topic: Topic) -> Result<TopicTable> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table =
        read_topic(file, topic).with_context(|| format!("Failed to load {}", path.display()))?;
    debug!(topic = topic.as_str(), rows = table.rows.len(), "Loaded ACS topic");
    Ok(table)
}

fn read_topic<R: std::io::Read>(reader: R, topic: Topic) -> Result<TopicTable> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let position = |code: &str| {
        headers
            .iter()
            .position(|h| h.trim() == code)
            .ok_or_else(|| anyhow!("missing column {code}"))
    };
    let geo_idx = position(GEO_ID_COLUMN)?;
    let value_idx = topic
        .codes()
        .iter()
        .map(|c| position(c.as_str()))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let geoid = record.get(geo_idx).unwrap_or_default().trim();
        if !is_fips(geoid) {
            continue;
        }

        let raw: Vec<Option<f64>> = value_idx
            .iter()
            .map(|&i| {
                let cell = record.get(i).unwrap_or_default();
                if topic == Topic::Rent {
                    clean_rent(cell)
                } else {
                    parse_count(cell)
                }
            })
            .collect();

        let values = if topic.aggregates_by_sex() {
            aggregate_by_sex(&raw)
        } else {
            raw
        };

        rows.push(TopicRow {
            geoid: geoid.to_string(),
            tract_code: tract_code(geoid).to_string(),
            values,
        });
    }

    let names = topic.names();
    let mut table = TopicTable {
        topic,
        columns: names.iter().map(|n| n.to_string()).collect(),
        rows,
    };

    if topic.computes_pct() {
        compute_percentages(&mut table);
    }
    Ok(table)
}

/// Sums male and female bands. `values` holds the total followed by the
/// male bands and then the female bands, in the same order.
fn aggregate_by_sex(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let Some((total, bands)) = values.split_first() else {
        return Vec::new();
    };
    let (male, female) = bands.split_at(bands.len() / 2);

    std::iter::once(*total)
        .chain(male.iter().zip(female).map(|(m, f)| Some((*m)? + (*f)?)))
        .collect()
}

/// Replaces the count columns with `<name>_pct` shares of the first
/// (total) column and drops the total.
fn compute_percentages(table: &mut TopicTable) {
    table.columns = table
        .columns
        .get(1..)
        .unwrap_or_default()
        .iter()
        .map(|c| format!("{c}_pct"))
        .collect();

    for row in &mut table.rows {
        let total = row.values.first().copied().flatten();
        row.values = row
            .values
            .get(1..)
            .unwrap_or_default()
            .iter()
            .map(|v| match (*v, total) {
                (Some(v), Some(t)) if t != 0.0 => Some(v / t * 100.0),
                _ => None,
            })
            .collect();
    }
}

/// Joins every topic on tract code and derives the summary columns.
///
/// Tracts missing from any topic are dropped. Row order follows the age table.
///
/// # Errors
///
/// Fails if any topic file cannot be loaded.
pub fn compile_acs(paths: &AcsPaths) -> Result<Vec<AcsTract>> {
    let tables = Topic::ALL
        .iter()
        .map(|&t| load_topic(paths.for_topic(t), t))
        .collect::<Result<Vec<_>>>()?;

    let tracts = join_topics(&tables);
    info!(tracts = tracts.len(), "Compiled ACS indicators");
    Ok(tracts)
}

fn join_topics(tables: &[TopicTable]) -> Vec<AcsTract> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };
    let indexes: Vec<_> = rest.iter().map(TopicTable::index_by_tract).collect();

    let mut tracts = Vec::new();
    'rows: for row in &first.rows {
        let mut joined = vec![(first, row)];
        for (table, index) in rest.iter().zip(&indexes) {
            match index.get(row.tract_code.as_str()) {
                Some(&i) => joined.push((table, &table.rows[i])),
                None => continue 'rows,
            }
        }

        let get = |name: &str| {
            joined.iter().find_map(|(table, row)| {
                table
                    .column_index(name)
                    .map(|i| row.values.get(i).copied().flatten())
            })
        };
        let col = |name: &str| get(name).flatten();

        let over65 = ["65-66_pct", "67-69_pct", "70-74_pct", "75-79_pct", "80-84_pct", "85+_pct"]
            .iter()
            .map(|&c| col(c))
            .sum::<Option<f64>>();
        let nhwhite = col("nhwhite_pct");

        tracts.push(AcsTract {
            geoid: row.geoid.clone(),
            nhwhite_pct: nhwhite,
            nhblack_pct: col("nhblack_pct"),
            hisp_pct: col("hisp_pct"),
            nhasian_pct: col("nhasian_pct"),
            poc_pct: nhwhite.map(|w| 100.0 - w),
            under5_pct: col("under5_pct"),
            over65_pct: over65,
            median_rent: col("median_rent"),
            poverty_pct: col("poverty_pct"),
        });
    }

    tracts
}

fn is_fips(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn tract_code(geoid: &str) -> &str {
    geoid.get(5..).filter(|t| !t.is_empty()).unwrap_or(geoid)
}

fn parse_count(cell: &str) -> Option<f64> {
    cell.trim().replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Median rent cells look like `1,234`, `3,500+` (top-coded) or `-` (no
/// estimate).
fn clean_rent(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell == "-" {
        return None;
    }
    cell.replace(',', "")
        .trim_matches('+')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
