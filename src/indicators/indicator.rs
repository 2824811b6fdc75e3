use anyhow::{Result, bail};
use std::fmt;
use std::str::FromStr;

use crate::indicators::types::TractRecord;

/// Which side of a map request an indicator may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorGroup {
    PublicHealth,
    Socioeconomic,
}

impl fmt::Display for IndicatorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndicatorGroup::PublicHealth => "public health",
            IndicatorGroup::Socioeconomic => "socioeconomic",
        })
    }
}

/// A selectable tract indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Diabetes,
    HighBp,
    LeadRisk,
    LifeExpectancy,
    Uninsured,
    AggHealthNorm,
    PovertyPct,
    NhblackPct,
    NhwhitePct,
    HispPct,
    PocPct,
    MedianRent,
    Over65Pct,
}

impl Indicator {
    pub const PUBLIC_HEALTH: [Indicator; 6] = [
        Indicator::Diabetes,
        Indicator::HighBp,
        Indicator::LeadRisk,
        Indicator::LifeExpectancy,
        Indicator::Uninsured,
        Indicator::AggHealthNorm,
    ];

    pub const SOCIOECONOMIC: [Indicator; 7] = [
        Indicator::PovertyPct,
        Indicator::NhblackPct,
        Indicator::NhwhitePct,
        Indicator::HispPct,
        Indicator::PocPct,
        Indicator::MedianRent,
        Indicator::Over65Pct,
    ];

    /// Column name in the tract table.
    pub fn key(self) -> &'static str {
        match self {
            Indicator::Diabetes => "diabetes",
            Indicator::HighBp => "high_bp",
            Indicator::LeadRisk => "lead_risk",
            Indicator::LifeExpectancy => "life_expectancy",
            Indicator::Uninsured => "uninsured",
            Indicator::AggHealthNorm => "agg_health_norm",
            Indicator::PovertyPct => "poverty_pct",
            Indicator::NhblackPct => "nhblack_pct",
            Indicator::NhwhitePct => "nhwhite_pct",
            Indicator::HispPct => "hisp_pct",
            Indicator::PocPct => "poc_pct",
            Indicator::MedianRent => "median_rent",
            Indicator::Over65Pct => "65over_pct",
        }
    }

    pub fn units(self) -> &'static str {
        match self {
            Indicator::Diabetes => "Diabetes among adults aged ≥18 years (%)",
            Indicator::HighBp => "High blood pressure among adults aged ≥18 years (%)",
            Indicator::LeadRisk => "Housing stock with potential elevated lead risk (%)",
            Indicator::LifeExpectancy => "Life expectancy at birth (yrs)",
            Indicator::Uninsured => "Lack of health insurance, people aged 0-64 years (%)",
            Indicator::AggHealthNorm => "Normalized aggregated health score",
            Indicator::PovertyPct => "Percent of people living in poverty (%)",
            Indicator::NhblackPct => "Percent non-Hispanic Black or African American (%)",
            Indicator::NhwhitePct => "Percent non-Hispanic white (%)",
            Indicator::HispPct => "Percent Hispanic or Latinx, any race (%)",
            Indicator::PocPct => "Percent people of color (%)",
            Indicator::MedianRent => "Median monthly housing cost ($USD)",
            Indicator::Over65Pct => "Percent residents 65 years old and over (%)",
        }
    }

    pub fn group(self) -> IndicatorGroup {
        if Self::PUBLIC_HEALTH.contains(&self) {
            IndicatorGroup::PublicHealth
        } else {
            IndicatorGroup::Socioeconomic
        }
    }

    pub fn value(self, record: &TractRecord) -> Option<f64> {
        match self {
            Indicator::Diabetes => record.diabetes,
            Indicator::HighBp => record.high_bp,
            Indicator::LeadRisk => record.lead_risk,
            Indicator::LifeExpectancy => record.life_expectancy,
            Indicator::Uninsured => record.uninsured,
            Indicator::AggHealthNorm => record.agg_health_norm,
            Indicator::PovertyPct => record.poverty_pct,
            Indicator::NhblackPct => record.nhblack_pct,
            Indicator::NhwhitePct => record.nhwhite_pct,
            Indicator::HispPct => record.hisp_pct,
            Indicator::PocPct => record.poc_pct,
            Indicator::MedianRent => record.median_rent,
            Indicator::Over65Pct => record.over65_pct,
        }
    }

    /// Parses `input` and checks it belongs to `group`.
    pub fn parse_in(input: &str, group: IndicatorGroup) -> Result<Self> {
        let indicator: Indicator = input.parse()?;
        if indicator.group() != group {
            bail!(
                "{} is not a valid {} indicator; choose from: {}",
                indicator.key(),
                group,
                Self::keys(group).join(", ")
            );
        }
        Ok(indicator)
    }

    pub fn keys(group: IndicatorGroup) -> Vec<&'static str> {
        Self::all()
            .filter(|i| i.group() == group)
            .map(Indicator::key)
            .collect()
    }

    pub fn all() -> impl Iterator<Item = Indicator> {
        Self::PUBLIC_HEALTH.into_iter().chain(Self::SOCIOECONOMIC)
    }
}

impl FromStr for Indicator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        match Self::all().find(|i| i.key() == wanted) {
            Some(i) => Ok(i),
            None => bail!("{} is not a valid option", wanted),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_in_group() {
        assert_eq!(
            Indicator::parse_in("diabetes", IndicatorGroup::PublicHealth).unwrap(),
            Indicator::Diabetes
        );
        assert_eq!(
            Indicator::parse_in("65over_pct", IndicatorGroup::Socioeconomic).unwrap(),
            Indicator::Over65Pct
        );
        assert!(Indicator::parse_in("median_rent", IndicatorGroup::PublicHealth).is_err());
        assert!(Indicator::parse_in("obesity", IndicatorGroup::PublicHealth).is_err());
    }

    #[test]
    fn test_groups_partition_all() {
        assert_eq!(Indicator::all().count(), 13);
        assert_eq!(Indicator::keys(IndicatorGroup::PublicHealth).len(), 6);
        assert_eq!(Indicator::keys(IndicatorGroup::Socioeconomic).len(), 7);
    }

    #[test]
    fn test_value_reads_matching_field() {
        let record = TractRecord {
            median_rent: Some(950.0),
            agg_health_norm: Some(-0.5),
            ..Default::default()
        };
        assert_eq!(Indicator::MedianRent.value(&record), Some(950.0));
        assert_eq!(Indicator::AggHealthNorm.value(&record), Some(-0.5));
        assert_eq!(Indicator::Diabetes.value(&record), None);
    }
}
