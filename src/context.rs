use anyhow::{Result, bail};
use std::fmt;

use crate::indicators::{Indicator, IndicatorGroup};
use crate::transit::LineColor;

/// What the user asked to map: lines plus one indicator from each group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapContext {
    pub lines: Vec<LineColor>,
    pub ph_indicator: Indicator,
    pub se_indicator: Indicator,
}

impl MapContext {
    pub fn new(
        lines: Vec<LineColor>,
        ph_indicator: Indicator,
        se_indicator: Indicator,
    ) -> Result<Self> {
        if lines.is_empty() {
            bail!("At least one line is required");
        }
        if ph_indicator.group() != IndicatorGroup::PublicHealth {
            bail!("{ph_indicator} is not a public health indicator");
        }
        if se_indicator.group() != IndicatorGroup::Socioeconomic {
            bail!("{se_indicator} is not a socioeconomic indicator");
        }
        Ok(Self {
            lines,
            ph_indicator,
            se_indicator,
        })
    }
}

impl fmt::Display for MapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.lines.iter().map(|l| l.as_str()).collect();
        let lines = match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
            Some((last, _)) => last.to_string(),
            None => String::new(),
        };
        write!(
            f,
            "Mapping Census tracts near the {} line(s), by {} and {}",
            lines,
            self.ph_indicator.units(),
            self.se_indicator.units()
        )
    }
}
