//! Record linkage between scraped stop names and dataset stations.
//!
//! The CTA pages and the open-data stops dataset spell station names
//! differently ("Clark/Lake" vs "Clark/Lake (Blue, Brown, Green, Orange,
//! Purple & Pink lines)"), so stops are matched on name tokens and
//! substring containment rather than equality.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::transit::line::LineColor;
use crate::transit::station::Station;
use crate::transit::stop::MetroStop;

/// Outcome of linking one line's stops.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LinkReport {
    pub scraped: usize,
    pub linked: usize,
    pub unmatched: Vec<String>,
}

/// Links each stop of `line` to the first station that matches it.
///
/// Candidates are the stations whose descriptive name mentions the line
/// color, ordered by `map_id` as text. A stop matches a station when every
/// token of its name occurs in the station's descriptive name and one of the
/// stop name / station name contains the other. Each short name is linked
/// at most once per line.
pub fn link_stops(line: LineColor, stops: &mut [MetroStop], stations: &[Station]) -> LinkReport {
    let color = line.capitalized();
    let mut candidates: Vec<&Station> = stations
        .iter()
        .filter(|s| s.descriptive_name.contains(&color))
        .collect();
    candidates.sort_by(|a, b| a.map_id.cmp(&b.map_id));

    let mut seen: HashSet<String> = HashSet::new();
    let mut report = LinkReport {
        scraped: stops.len(),
        ..Default::default()
    };

    for stop in stops.iter_mut() {
        let short_name = stop.short_name().to_string();
        if seen.contains(&short_name) {
            debug!(stop = %short_name, line = %line, "Stop name already linked on this line");
            report.unmatched.push(short_name);
            continue;
        }

        match candidates.iter().find(|s| matches(&short_name, s)) {
            Some(station) => {
                stop.assign_station(station);
                seen.insert(short_name);
                report.linked += 1;
            }
            None => {
                warn!(stop = %short_name, line = %line, "No station matches scraped stop");
                report.unmatched.push(short_name);
            }
        }
    }

    debug!(
        line = %line,
        scraped = report.scraped,
        linked = report.linked,
        "Linked scraped stops to stations"
    );
    report
}

fn matches(short_name: &str, station: &Station) -> bool {
    let station_name = station.name.trim();
    let tokens_present = short_name
        .split_whitespace()
        .map(|t| t.trim_matches(['(', ')']))
        .all(|t| station.descriptive_name.contains(t));

    tokens_present && (station_name.contains(short_name) || short_name.contains(station_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(map_id: &str, descriptive_name: &str, name: &str, lat: f64) -> Station {
        Station {
            map_id: map_id.to_string(),
            descriptive_name: descriptive_name.to_string(),
            name: name.to_string(),
            latitude: lat,
            longitude: -87.6,
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            station("41420", "Addison (Red Line)", "Addison", 41.94),
            station("41440", "Addison (Brown Line)", "Addison", 41.947),
            station("40900", "Howard (Red, Purple & Yellow lines)", "Howard", 42.02),
            station(
                "40380",
                "Clark/Lake (Blue, Brown, Green, Orange, Purple & Pink lines)",
                "Clark/Lake",
                41.88,
            ),
            station("40560", "Jackson (Red Line)", "Jackson", 41.878),
            station("40070", "Jackson (Blue Line)", "Jackson", 41.878),
            station("41400", "Roosevelt (Red, Orange & Green lines)", "Roosevelt", 41.867),
        ]
    }

    fn stops(line: LineColor, names: &[&str]) -> Vec<MetroStop> {
        names.iter().map(|n| MetroStop::new(n.to_string(), line)).collect()
    }

    #[test]
    fn test_links_by_line_color() {
        let mut red = stops(LineColor::Red, &["Howard", "Addison", "Jackson", "Roosevelt"]);
        let report = link_stops(LineColor::Red, &mut red, &stations());

        assert_eq!(report.linked, 4);
        assert_eq!(red[1].map_id(), Some("41420"));
        assert_eq!(red[2].map_id(), Some("40560"));

        let mut blue = stops(LineColor::Blue, &["Jackson", "Clark/Lake"]);
        link_stops(LineColor::Blue, &mut blue, &stations());
        assert_eq!(blue[0].map_id(), Some("40070"));
        assert_eq!(blue[1].map_id(), Some("40380"));
    }

    #[test]
    fn test_unmatched_stops_keep_short_name() {
        let mut red = stops(LineColor::Red, &["95th/Dan Ryan", "Howard"]);
        let report = link_stops(LineColor::Red, &mut red, &stations());

        assert_eq!(report.linked, 1);
        assert_eq!(report.unmatched, vec!["95th/Dan Ryan".to_string()]);
        assert_eq!(red[0].map_id(), None);
        assert_eq!(red[0].short_name(), "95th/Dan Ryan");
    }

    #[test]
    fn test_repeated_names_link_once() {
        let mut red = stops(LineColor::Red, &["Addison", "Addison"]);
        let report = link_stops(LineColor::Red, &mut red, &stations());

        assert_eq!(report.linked, 1);
        assert_eq!(red[0].map_id(), Some("41420"));
        assert_eq!(red[1].map_id(), None);
    }

    #[test]
    fn test_parenthesized_tokens_and_containment() {
        let all = vec![
            station("40460", "Merchandise Mart (Brown & Purple lines)", "Merchandise Mart", 41.88),
            station(
                "41700",
                "Washington/Wabash (Brown, Green, Orange, Pink & Purple lines)",
                "Washington/Wabash",
                41.88,
            ),
        ];
        let mut brown = stops(
            LineColor::Brown,
            &["Merchandise Mart (Purple)", "Washington/Wabash"],
        );
        link_stops(LineColor::Brown, &mut brown, &all);

        // Name tokens all present, and station name is contained in the stop name.
        assert_eq!(brown[0].map_id(), Some("40460"));
        assert_eq!(brown[1].map_id(), Some("41700"));
    }

    #[test]
    fn test_candidates_ordered_by_map_id() {
        let all = vec![
            station("9000", "Cermak (Green Line)", "Cermak", 2.0),
            station("41000", "Cermak (Green Line)", "Cermak", 1.0),
        ];
        let mut green = stops(LineColor::Green, &["Cermak"]);
        link_stops(LineColor::Green, &mut green, &all);
        assert_eq!(green[0].map_id(), Some("41000"));
    }
}
