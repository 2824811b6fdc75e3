use anyhow::Result;
use async_trait::async_trait;
use cta_health::census::AcsPaths;
use cta_health::health::HealthMetric;
use cta_health::indicators::{AdversityLevel, IndicatorTable, healthiest_under_budget};
use cta_health::parser::{StationRow, TractMetricRow, parse_stations};
use cta_health::pipeline::{
    HealthSource, build_indicator_table, build_line, fetch_health, fetch_stations, load_health,
};
use cta_health::services::{HealthApi, LinePages, StationApi};
use cta_health::spatial::{CensusTract, assemble_polygons};
use cta_health::stats::LineStats;
use cta_health::transit::LineColor;
use geo::Coord;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const T1: &str = "17031010100";
const T2: &str = "17031010201";

struct Pages(&'static str);

#[async_trait]
impl LinePages for Pages {
    async fn line_page(&self, _line: LineColor) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct Stations;

#[async_trait]
impl StationApi for Stations {
    async fn list_stations(&self) -> Result<Vec<StationRow>> {
        parse_stations(
            br#"[
            {"map_id": "40900", "station_descriptive_name": "Howard (Red, Purple & Yellow lines)",
             "location": {"latitude": "42.019063", "longitude": "-87.672892"}},
            {"map_id": "40900", "station_descriptive_name": "Howard (Red, Purple & Yellow lines)",
             "location": {"latitude": "42.019063", "longitude": "-87.672892"}},
            {"map_id": "41190", "station_descriptive_name": "Jarvis (Red Line)",
             "location": {"latitude": "42.015876", "longitude": "-87.669092"}},
            {"map_id": "40980", "station_descriptive_name": "Harlem (Blue Line - O'Hare Branch)",
             "location": {"latitude": "41.98227", "longitude": "-87.8089"}}
        ]"#,
        )
    }
}

struct Health;

#[async_trait]
impl HealthApi for Health {
    async fn tract_metric(&self, metric: HealthMetric) -> Result<Vec<TractMetricRow>> {
        let rows = match metric {
            HealthMetric::Diabetes => vec![(T1, json!(10.0)), (T2, json!("20"))],
            HealthMetric::HighBloodPressure => vec![(T1, json!(30.0)), (T2, json!(40.0))],
            HealthMetric::Uninsured => vec![(T1, json!(10.0)), (T2, json!(20.0))],
            HealthMetric::LifeExpectancy => vec![(T1, json!(80.0)), (T2, json!(70.0))],
            HealthMetric::LeadRisk => vec![(T1, json!(50.0))],
        };
        Ok(rows
            .into_iter()
            .map(|(fips, est)| TractMetricRow {
                stcotr_fips: json!(fips),
                est,
            })
            .collect())
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// ACS downloads for two tracts, label rows included.
fn write_acs(dir: &Path) -> AcsPaths {
    let paths = AcsPaths::from_dir(dir);

    let vd: Vec<String> = (1..=49).map(|n| format!("HD01_VD{n:02}")).collect();
    let mut age = format!("GEO.id,GEO.id2,GEO.display-label,{}\n", vd.join(","));
    age.push_str(&format!("Id,Id2,Geography,{}\n", vec!["Estimate"; 49].join(",")));
    for geoid in [T1, T2] {
        let mut cells = vec!["2"; 49];
        cells[0] = "100";
        age.push_str(&format!("1400000US{geoid},{geoid},Tract,{}\n", cells.join(",")));
    }
    write(&paths.age_sex, &age);

    write(
        &paths.race,
        &format!(
            "GEO.id2,HD01_VD01,HD01_VD03,HD01_VD04,HD01_VD05,HD01_VD06,HD01_VD07,HD01_VD08,HD01_VD10,HD01_VD12\n\
             Id2,Total,White,Black,AIAN,Asian,NHPI,Other,Two,Hispanic\n\
             {T1},1000,400,300,0,100,0,0,0,200\n\
             {T2},1000,100,600,0,0,0,0,0,300\n"
        ),
    );
    write(
        &paths.poverty,
        &format!(
            "GEO.id2,HC01_EST_VC01,HC02_EST_VC01\n\
             Id2,Total,Below poverty\n\
             {T1},1000,300\n\
             {T2},1000,500\n"
        ),
    );
    write(
        &paths.rent,
        &format!("GEO.id2,HD01_VD01\nId2,Median gross rent\n{T1},\"1,100\"\n{T2},850\n"),
    );

    paths
}

fn write_dashboard_csv(path: &Path) {
    let mut csv =
        String::from("state_fips,county_fips,tract_code,city_name,metric_name,group_name,est\n");
    let tracts = [
        ("010100", [10.0, 30.0, 10.0, 80.0, 50.0]),
        ("010201", [20.0, 40.0, 20.0, 70.0, 70.0]),
    ];
    for (tract, values) in tracts {
        for (metric, est) in HealthMetric::ALL.iter().zip(values) {
            csv.push_str(&format!(
                "17,031,{tract},Chicago,{},total population,{est}\n",
                metric.csv_name()
            ));
        }
    }
    write(path, &csv);
}

fn close(value: Option<f64>, expected: f64) -> bool {
    value.is_some_and(|v| (v - expected).abs() < 1e-9)
}

fn square(geoid: &str, lon: f64, lat: f64, size: f64) -> CensusTract {
    CensusTract {
        geoid: geoid.to_string(),
        shape: assemble_polygons(vec![(
            true,
            [
                (lon, lat),
                (lon, lat + size),
                (lon + size, lat + size),
                (lon + size, lat),
                (lon, lat),
            ]
            .into_iter()
            .map(Coord::from)
            .collect(),
        )]),
    }
}

#[tokio::test]
async fn test_indicator_table_from_csv_sources() {
    let dir = TempDir::new().unwrap();
    let acs = write_acs(dir.path());
    let health_csv = dir.path().join("CHDB_data_tract_IL.csv");
    write_dashboard_csv(&health_csv);

    let health = load_health::<dyn HealthApi>(HealthSource::Csv(&health_csv)).await.unwrap();
    assert_eq!(health.len(), 2);

    let table = build_indicator_table(&acs, &health).unwrap();
    assert_eq!(table.len(), 2);

    let healthy = table.get(T1).unwrap();
    assert_eq!(healthy.median_rent, Some(1100.0));
    assert!(close(healthy.poverty_pct, 30.0));
    assert!(close(healthy.nhwhite_pct, 40.0));
    assert!(close(healthy.poc_pct, 60.0));
    assert!(close(healthy.under5_pct, 4.0));
    assert!(close(healthy.over65_pct, 24.0));
    assert!(close(healthy.agg_health, 26.0));
    assert_eq!(healthy.adv_no_norm, Some(AdversityLevel::VeryLow));
    assert_eq!(healthy.adv_norm, Some(AdversityLevel::VeryLow));

    // Below-average life expectancy weighs the score up.
    let unhealthy = table.get(T2).unwrap();
    assert!(close(unhealthy.agg_health, 44.0));
    assert_eq!(unhealthy.adv_norm, Some(AdversityLevel::VeryHigh));
}

#[tokio::test]
async fn test_fetch_health_inner_joins_metrics() {
    let health = fetch_health(&Health).await.unwrap();

    assert_eq!(health.len(), 1);
    assert_eq!(health[0].geoid, T1);
    assert_eq!(health[0].lead_risk, Some(50.0));
    assert_eq!(health[0].life_expectancy, Some(80.0));
}

#[tokio::test]
async fn test_build_line_links_and_selects_tracts() {
    let stations = fetch_stations(&Stations).await.unwrap();
    assert_eq!(stations.len(), 3);

    let table = IndicatorTable::new(vec![cta_health::indicators::TractRecord {
        geoid: T1.to_string(),
        median_rent: Some(900.0),
        agg_health: Some(12.0),
        ..Default::default()
    }]);
    let tracts = vec![
        square(T1, -87.68, 42.01, 0.02),
        square("17031999999", -87.671, 42.016, 0.005),
        square(T2, -87.60, 41.90, 0.01),
    ];
    let pages = Pages(
        r#"<div class="rld">
             <p class="rld-stopname">Howard</p>
             <p class="rld-stopname">Jarvis</p>
             <p class="rld-stopname">Morse</p>
           </div>"#,
    );

    let (line, report) = build_line(&pages, LineColor::Red, &stations, &tracts, &table)
        .await
        .unwrap();

    assert_eq!(report.scraped, 3);
    assert_eq!(report.linked, 2);
    assert_eq!(report.unmatched, vec!["Morse".to_string()]);
    assert_eq!(line.stops[0].map_id(), Some("40900"));
    assert!(line.geometry.is_some());

    // The second tract is crossed but has no indicators.
    assert_eq!(line.tracts.len(), 1);
    assert_eq!(line.tracts[0].geoid, T1);

    let stats = LineStats::from_line(&line, &report);
    assert_eq!(stats.located_stops, 2);
    assert_eq!(stats.tracts_with_rent, 1);

    let picks = healthiest_under_budget(&line.tracts, 1000.0);
    assert_eq!(picks.len(), 1);
    assert!(healthiest_under_budget(&line.tracts, 800.0).is_empty());
}

#[tokio::test]
async fn test_build_line_without_stops_fails() {
    let pages = Pages("<html></html>");
    let err = build_line(&pages, LineColor::Pink, &[], &[], &IndicatorTable::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("pink"));
}

#[test]
fn test_missing_acs_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = build_indicator_table(&AcsPaths::from_dir(dir.path()), &[]).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to open"));
}
