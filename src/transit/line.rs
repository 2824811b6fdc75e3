use anyhow::{Result, bail};
use geo::LineString;
use std::fmt;
use std::str::FromStr;

use crate::indicators::TractRecord;
use crate::transit::stop::MetroStop;

pub const DEFAULT_CTA_BASE_URL: &str = "https://www.transitchicago.com";

/// The eight CTA 'L' lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineColor {
    Red,
    Blue,
    Brown,
    Green,
    Orange,
    Pink,
    Purple,
    Yellow,
}

impl LineColor {
    pub const ALL: [LineColor; 8] = [
        LineColor::Red,
        LineColor::Blue,
        LineColor::Brown,
        LineColor::Green,
        LineColor::Orange,
        LineColor::Pink,
        LineColor::Purple,
        LineColor::Yellow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LineColor::Red => "red",
            LineColor::Blue => "blue",
            LineColor::Brown => "brown",
            LineColor::Green => "green",
            LineColor::Orange => "orange",
            LineColor::Pink => "pink",
            LineColor::Purple => "purple",
            LineColor::Yellow => "yellow",
        }
    }

    /// `Red`, `Blue`, ... as the station dataset spells them.
    pub fn capitalized(self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// The line's page on the CTA site, e.g. `{base}/redline/`.
    pub fn page_url(self, base_url: &str) -> String {
        format!("{}/{}line/", base_url.trim_end_matches('/'), self.as_str())
    }

    /// Parses a comma-separated list such as `"red, Blue"`.
    pub fn parse_list(input: &str) -> Result<Vec<LineColor>> {
        let lines = input
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<LineColor>>>()?;
        if lines.is_empty() {
            bail!("At least one line is required");
        }
        Ok(lines)
    }
}

impl FromStr for LineColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        match LineColor::ALL.iter().find(|c| c.as_str() == wanted) {
            Some(c) => Ok(*c),
            None => bail!(
                "'{}' does not currently exist in the CTA; choose from: {}",
                s.trim(),
                LineColor::ALL.map(LineColor::as_str).join(", ")
            ),
        }
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CTA line with its stops in travel order and, once joined, the census
/// tracts it passes over.
#[derive(Debug, Clone)]
pub struct MetroLine {
    pub color: LineColor,
    pub stops: Vec<MetroStop>,
    pub geometry: Option<LineString<f64>>,
    pub tracts: Vec<TractRecord>,
}

impl MetroLine {
    /// Creates an unlinked line from scraped stop names.
    pub fn from_stop_names<I, S>(color: LineColor, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            color,
            stops: names
                .into_iter()
                .map(|n| MetroStop::new(n.into(), color))
                .collect(),
            geometry: None,
            tracts: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.color.as_str()
    }

    pub fn located_stops(&self) -> impl Iterator<Item = &MetroStop> {
        self.stops.iter().filter(|s| s.location().is_some())
    }
}

const RULE: &str = "=============\n";

impl fmt::Display for MetroLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{} Line \n", self.color.capitalized())?;
        write!(f, "{RULE}{RULE}\n")?;
        for stop in &self.stops {
            writeln!(f, "{stop}")?;
        }
        write!(f, "{RULE}{RULE}")
    }
}
