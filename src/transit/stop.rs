use std::fmt;

use crate::transit::line::LineColor;
use crate::transit::station::Station;

/// A stop as scraped from a line page, optionally linked to a [`Station`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetroStop {
    short_name: String,
    descriptive_name: Option<String>,
    map_id: Option<String>,
    location: Option<(f64, f64)>,
    lines: Vec<LineColor>,
}

impl MetroStop {
    pub fn new(short_name: String, line: LineColor) -> Self {
        Self {
            short_name,
            descriptive_name: None,
            map_id: None,
            location: None,
            lines: vec![line],
        }
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn descriptive_name(&self) -> Option<&str> {
        self.descriptive_name.as_deref()
    }

    pub fn map_id(&self) -> Option<&str> {
        self.map_id.as_deref()
    }

    /// `(latitude, longitude)` once linked.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    /// Copies the non-health attributes of `station` onto this stop.
    pub fn assign_station(&mut self, station: &Station) {
        self.descriptive_name = Some(station.descriptive_name.clone());
        self.map_id = Some(station.map_id.clone());
        self.location = Some((station.latitude, station.longitude));
    }
}

impl fmt::Display for MetroStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.descriptive_name.as_deref().unwrap_or(&self.short_name);
        write!(f, "{title}\n-------------\n")?;

        if let Some((lat, lon)) = self.location {
            writeln!(f, "({lat:8} N, {lon:8} W)")?;
        }

        let lines: Vec<String> = self.lines.iter().map(|l| l.capitalized()).collect();
        write!(f, "Lines: {}", lines.join(", "))
    }
}
