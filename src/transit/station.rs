use std::collections::HashSet;
use tracing::{debug, warn};

use crate::parser::{StationRow, value_as_f64, value_as_text};

/// Stations whose dataset name differs from the name on the CTA line pages:
/// `(dataset name, page name, descriptive name)`.
const NAME_ALIASES: &[(&str, &str, &str)] = &[
    ("South Boulevard", "South Blvd", "South Blvd (Purple Line)"),
    (
        "Conservatory",
        "Conservatory-Central Park Drive",
        "Conservatory-Central Park Drive (Green Line)",
    ),
];

/// A cleaned row of the 'L' stops dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub map_id: String,
    /// e.g. `Belmont (Red, Brown & Purple lines)`.
    pub descriptive_name: String,
    /// The descriptive name up to its first parenthesis, e.g. `Belmont`.
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Cleans raw dataset rows into [`Station`]s.
///
/// The dataset has one row per platform direction, so stations repeat;
/// only the first row at each coordinate pair is kept.
pub fn clean_stations(rows: &[StationRow]) -> Vec<Station> {
    let mut seen = HashSet::new();
    let mut stations = Vec::new();

    for row in rows {
        let Some(map_id) = value_as_text(&row.map_id) else {
            warn!(?row, "Station row without map_id, skipping");
            continue;
        };
        let Some(descriptive_name) = row
            .station_descriptive_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            warn!(map_id = %map_id, "Station row without a name, skipping");
            continue;
        };
        let coords = row.location.as_ref().and_then(|loc| {
            Some((value_as_f64(&loc.latitude)?, value_as_f64(&loc.longitude)?))
        });
        let Some((latitude, longitude)) = coords else {
            warn!(map_id = %map_id, descriptive_name, "Station row without coordinates, skipping");
            continue;
        };

        if !seen.insert((latitude.to_bits(), longitude.to_bits())) {
            continue;
        }

        let mut station = Station {
            map_id,
            descriptive_name: descriptive_name.to_string(),
            name: short_name(descriptive_name),
            latitude,
            longitude,
        };
        apply_alias(&mut station);
        stations.push(station);
    }

    debug!(rows = rows.len(), stations = stations.len(), "Cleaned station rows");
    stations
}

/// The first parenthesis-free run of `descriptive_name`, trimmed.
fn short_name(descriptive_name: &str) -> String {
    descriptive_name
        .split(['(', ')'])
        .find(|part| !part.is_empty())
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn apply_alias(station: &mut Station) {
    if let Some((_, name, descriptive)) = NAME_ALIASES
        .iter()
        .find(|(dataset_name, _, _)| *dataset_name == station.name)
    {
        station.name = name.to_string();
        station.descriptive_name = descriptive.to_string();
    }
}
