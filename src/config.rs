//! Runtime settings read from the environment (and `.env` via `dotenvy`).

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

use crate::census::AcsPaths;
use crate::infra::chicago::CTA_STOPS_ENDPOINT;
use crate::infra::cityhealth::CITY_HEALTH_ENDPOINT;
use crate::transit::line::DEFAULT_CTA_BASE_URL;

pub const DATA_DIR_VAR: &str = "CTA_DATA_DIR";
pub const CTA_BASE_URL_VAR: &str = "CTA_BASE_URL";
pub const STATIONS_ENDPOINT_VAR: &str = "CHICAGO_STOPS_ENDPOINT";
pub const HEALTH_ENDPOINT_VAR: &str = "CITY_HEALTH_ENDPOINT";
pub const CHICAGO_TOKEN_VAR: &str = "CHICAGO_APP_TOKEN";
pub const HEALTH_TOKEN_VAR: &str = "CITY_HEALTH_TOKEN";

const SHAPEFILE: &str = "ChicagoShapefiles/Chi_census_tract.shp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub cta_base_url: String,
    pub stations_endpoint: String,
    pub health_endpoint: String,
    pub chicago_app_token: Option<String>,
    pub city_health_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            data_dir: get(DATA_DIR_VAR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data")),
            cta_base_url: get(CTA_BASE_URL_VAR).unwrap_or_else(|| DEFAULT_CTA_BASE_URL.to_string()),
            stations_endpoint: get(STATIONS_ENDPOINT_VAR)
                .unwrap_or_else(|| CTA_STOPS_ENDPOINT.to_string()),
            health_endpoint: get(HEALTH_ENDPOINT_VAR)
                .unwrap_or_else(|| CITY_HEALTH_ENDPOINT.to_string()),
            chicago_app_token: get(CHICAGO_TOKEN_VAR),
            city_health_token: get(HEALTH_TOKEN_VAR),
        }
    }

    pub fn with_data_dir(mut self, data_dir: Option<&Path>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir.to_path_buf();
        }
        self
    }

    pub fn acs_paths(&self) -> AcsPaths {
        AcsPaths::from_dir(&self.data_dir)
    }

    pub fn shapefile_path(&self) -> PathBuf {
        self.data_dir.join(SHAPEFILE)
    }

    pub fn require_health_token(&self) -> Result<&str> {
        self.city_health_token.as_deref().ok_or_else(|| {
            anyhow!("{HEALTH_TOKEN_VAR} must be set to query the City Health Dashboard (or pass --health-csv)")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.cta_base_url, DEFAULT_CTA_BASE_URL);
        assert_eq!(s.stations_endpoint, CTA_STOPS_ENDPOINT);
        assert!(s.chicago_app_token.is_none());
        assert!(s.require_health_token().is_err());
        assert_eq!(
            s.shapefile_path(),
            PathBuf::from("data/ChicagoShapefiles/Chi_census_tract.shp")
        );
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let s = settings(&[
            (DATA_DIR_VAR, "/srv/cta"),
            (HEALTH_TOKEN_VAR, " tok "),
            (CHICAGO_TOKEN_VAR, "   "),
        ]);
        assert_eq!(s.data_dir, PathBuf::from("/srv/cta"));
        assert_eq!(s.require_health_token().unwrap(), "tok");
        assert!(s.chicago_app_token.is_none());

        let s = s.with_data_dir(Some(Path::new("other")));
        assert_eq!(s.acs_paths(), AcsPaths::from_dir("other"));
    }
}
