//! CLI entry point for the CTA health mapper.
//!
//! Provides subcommands for listing a line's linked stops, mapping the
//! tracts along lines by two indicators, finding the healthiest affordable
//! tracts near a line, and exporting the full indicator table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cta_health::{
    config::Settings,
    context::MapContext,
    fetch::{
        BasicClient,
        auth::{ApiKey, UrlParam},
    },
    indicators::{Indicator, IndicatorGroup, IndicatorTable, healthiest_under_budget},
    infra::{chicago::ChicagoDataClient, cityhealth::CityHealthClient, cta::CtaWebClient},
    output::{append_record, print_json, write_map_rows, write_records},
    pipeline::{HealthSource, build_indicator_table, build_line, fetch_stations, load_health},
    services::HealthApi,
    spatial::load_census_tracts,
    stats::LineStats,
    transit::{LineColor, Station},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cta_health")]
#[command(about = "Map public health and demographics along CTA 'L' lines", long_about = None)]
struct Cli {
    /// Directory holding the ACS CSVs and the tract shapefile
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a line's stops and link them to station coordinates
    Stops {
        /// Line color (red, blue, brown, green, orange, pink, purple, yellow)
        line: String,
    },
    /// Write the tracts along one or more lines with two chosen indicators
    Tracts {
        /// Comma-separated line colors
        #[arg(short, long, default_value = "red")]
        lines: String,

        /// Public health indicator
        #[arg(long, default_value = "diabetes")]
        ph: String,

        /// Socioeconomic indicator
        #[arg(long, default_value = "poverty_pct")]
        se: String,

        /// CSV file to write the per-tract rows to
        #[arg(short, long, default_value = "tracts.csv")]
        output: PathBuf,

        /// Read health metrics from a dashboard CSV export instead of the API
        #[arg(long, value_name = "FILE")]
        health_csv: Option<PathBuf>,

        /// CSV file to append per-line statistics to
        #[arg(long, value_name = "FILE")]
        stats: Option<PathBuf>,
    },
    /// List the healthiest tracts near a line whose median rent fits a budget
    Healthiest {
        /// Line color
        line: String,

        /// Monthly rent budget in dollars
        #[arg(short, long)]
        budget: f64,

        /// Read health metrics from a dashboard CSV export instead of the API
        #[arg(long, value_name = "FILE")]
        health_csv: Option<PathBuf>,
    },
    /// Write the combined indicator table for every tract
    Indicators {
        /// CSV file to write
        #[arg(short, long, default_value = "indicators.csv")]
        output: PathBuf,

        /// Read health metrics from a dashboard CSV export instead of the API
        #[arg(long, value_name = "FILE")]
        health_csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cta_health.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cta_health.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env().with_data_dir(cli.data_dir.as_deref());

    match cli.command {
        Commands::Stops { line } => {
            let line: LineColor = line.parse()?;
            let stations = load_stations(&settings).await?;
            let pages = line_pages(&settings)?;

            let (metro_line, report) =
                build_line(&pages, line, &stations, &[], &IndicatorTable::default()).await?;
            println!("{metro_line}");

            if !report.unmatched.is_empty() {
                warn!(unmatched = ?report.unmatched, "Stops without a matching station");
            }
        }
        Commands::Tracts {
            lines,
            ph,
            se,
            output,
            health_csv,
            stats,
        } => {
            let context = MapContext::new(
                LineColor::parse_list(&lines)?,
                Indicator::parse_in(&ph, IndicatorGroup::PublicHealth)?,
                Indicator::parse_in(&se, IndicatorGroup::Socioeconomic)?,
            )?;
            info!(%context, "Building map rows");

            let table = indicator_table(&settings, health_csv.as_deref()).await?;
            let tracts = load_census_tracts(&settings.shapefile_path())?;
            let stations = load_stations(&settings).await?;
            let pages = line_pages(&settings)?;

            let mut metro_lines = Vec::with_capacity(context.lines.len());
            for &color in &context.lines {
                let line_stats = match build_line(&pages, color, &stations, &tracts, &table).await {
                    Ok((metro_line, report)) => {
                        let line_stats = LineStats::from_line(&metro_line, &report);
                        metro_lines.push(metro_line);
                        line_stats
                    }
                    Err(e) => {
                        error!(line = %color, error = %e, "Failed to build line");
                        LineStats::from_error("line_error", &e.to_string())
                            .with_line(color.as_str())
                    }
                };

                print_json(&line_stats)?;
                if let Some(path) = &stats {
                    append_record(path, &line_stats)?;
                }
            }

            write_map_rows(&output, &context, &metro_lines)?;
        }
        Commands::Healthiest {
            line,
            budget,
            health_csv,
        } => {
            let line: LineColor = line.parse()?;
            let table = indicator_table(&settings, health_csv.as_deref()).await?;
            let tracts = load_census_tracts(&settings.shapefile_path())?;
            let stations = load_stations(&settings).await?;
            let pages = line_pages(&settings)?;

            let (metro_line, _) = build_line(&pages, line, &stations, &tracts, &table).await?;
            let healthiest = healthiest_under_budget(&metro_line.tracts, budget);

            if healthiest.is_empty() {
                info!(line = %line, budget, "No tract near the line fits the budget");
            }
            for tract in healthiest {
                println!(
                    "{}  rent ${:.0}  agg_health {}  adversity {}",
                    tract.geoid,
                    tract.median_rent.unwrap_or_default(),
                    tract
                        .agg_health
                        .map(|s| format!("{s:.2}"))
                        .unwrap_or_else(|| "n/a".to_string()),
                    tract
                        .adv_norm
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "n/a".to_string()),
                );
            }
        }
        Commands::Indicators { output, health_csv } => {
            let table = indicator_table(&settings, health_csv.as_deref()).await?;
            write_records(&output, table.records())?;
        }
    }

    Ok(())
}

fn line_pages(settings: &Settings) -> Result<CtaWebClient<BasicClient>> {
    Ok(CtaWebClient::with_base_url(
        BasicClient::new()?,
        settings.cta_base_url.clone(),
    ))
}

/// Fetches and cleans the station list, sending the app token when one is set.
async fn load_stations(settings: &Settings) -> Result<Vec<Station>> {
    let endpoint = settings.stations_endpoint.clone();
    match &settings.chicago_app_token {
        Some(token) => {
            let client = ApiKey::app_token(BasicClient::new()?, token.clone());
            fetch_stations(&ChicagoDataClient::with_endpoint(client, endpoint)).await
        }
        None => {
            let client = BasicClient::new()?;
            fetch_stations(&ChicagoDataClient::with_endpoint(client, endpoint)).await
        }
    }
}

/// Builds the scored tract table from the ACS files and either the
/// dashboard API or a dashboard CSV export.
async fn indicator_table(
    settings: &Settings,
    health_csv: Option<&Path>,
) -> Result<IndicatorTable> {
    let client;
    let source: HealthSource<'_, dyn HealthApi> = match health_csv {
        Some(path) => HealthSource::Csv(path),
        None => {
            let token = settings.require_health_token()?;
            client = CityHealthClient::with_endpoint(
                UrlParam::token(BasicClient::new()?, token.to_string()),
                settings.health_endpoint.clone(),
            );
            HealthSource::Api(&client as &dyn HealthApi)
        }
    };

    let health = load_health(source).await?;
    build_indicator_table(&settings.acs_paths(), &health)
}
