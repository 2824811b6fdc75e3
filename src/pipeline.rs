//! The end-to-end run: fetch, clean, link, join and score.

use anyhow::{Result, bail};
use std::path::Path;
use tracing::{info, warn};

use crate::census::{AcsPaths, compile_acs};
use crate::health::api::{join_metrics, metric_table};
use crate::health::dashboard_csv::load_dashboard_csv;
use crate::health::{HealthMetric, HealthTract};
use crate::indicators::{IndicatorTable, combine};
use crate::services::{HealthApi, LinePages, StationApi};
use crate::spatial::{CensusTract, join_indicators, line_geometry, tracts_under_line};
use crate::transit::{
    LineColor, LinkReport, MetroLine, Station, clean_stations, link_stops, scrape_stop_names,
};

/// Where the health metrics come from.
pub enum HealthSource<'a, H: ?Sized> {
    Api(&'a H),
    Csv(&'a Path),
}

/// Fetches every metric from the dashboard API and inner-joins them.
#[tracing::instrument(skip(api))]
pub async fn fetch_health<H: HealthApi + ?Sized>(api: &H) -> Result<Vec<HealthTract>> {
    let mut tables = Vec::with_capacity(HealthMetric::ALL.len());
    for metric in HealthMetric::ALL {
        let rows = api.tract_metric(metric).await?;
        tables.push((metric, metric_table(metric, &rows)));
    }

    let tracts = join_metrics(&tables);
    info!(tracts = tracts.len(), "Health metrics joined");
    Ok(tracts)
}

pub async fn load_health<H: HealthApi + ?Sized>(
    source: HealthSource<'_, H>,
) -> Result<Vec<HealthTract>> {
    match source {
        HealthSource::Api(api) => fetch_health(api).await,
        HealthSource::Csv(path) => load_dashboard_csv(path),
    }
}

/// Builds the scored per-tract table from the ACS files and `health`.
pub fn build_indicator_table(acs: &AcsPaths, health: &[HealthTract]) -> Result<IndicatorTable> {
    let acs_tracts = compile_acs(acs)?;
    let records = combine(&acs_tracts, health);
    if records.is_empty() {
        warn!("No tract appears in both the ACS and health data");
    }
    Ok(IndicatorTable::new(records))
}

#[tracing::instrument(skip(api))]
pub async fn fetch_stations<A: StationApi + ?Sized>(api: &A) -> Result<Vec<Station>> {
    let rows = api.list_stations().await?;
    let stations = clean_stations(&rows);
    info!(rows = rows.len(), stations = stations.len(), "Stations cleaned");
    Ok(stations)
}

/// Scrapes `color`'s page, links its stops to `stations`, and attaches
/// the indicator records of the tracts the line crosses.
///
/// # Errors
///
/// Fails if the page cannot be fetched or lists no stops.
#[tracing::instrument(skip(pages, stations, tracts, table), fields(line = %color))]
pub async fn build_line<P: LinePages + ?Sized>(
    pages: &P,
    color: LineColor,
    stations: &[Station],
    tracts: &[CensusTract],
    table: &IndicatorTable,
) -> Result<(MetroLine, LinkReport)> {
    let html = pages.line_page(color).await?;
    let names = scrape_stop_names(&html);
    if names.is_empty() {
        bail!("No stops found on the {color} line page");
    }

    let mut line = MetroLine::from_stop_names(color, names);
    let report = link_stops(color, &mut line.stops, stations);

    line.geometry = line_geometry(&line.stops);
    match &line.geometry {
        Some(geometry) => {
            let under = tracts_under_line(tracts, geometry);
            line.tracts = join_indicators(&under, table);
            info!(
                stops = line.stops.len(),
                linked = report.linked,
                tracts = under.len(),
                with_indicators = line.tracts.len(),
                "Line built"
            );
        }
        None => warn!(linked = report.linked, "Line has too few located stops to place on the map"),
    }

    Ok((line, report))
}
