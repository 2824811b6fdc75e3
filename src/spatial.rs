//! Census-tract polygons and the line/tract spatial join.
//!
//! The city's tract shapefile and the station coordinates are both plain
//! WGS84 longitude/latitude, so geometries are compared without reprojection.

use anyhow::{Context, Result};
use geo::{Coord, Intersects, LineString, MultiPolygon, Polygon};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::indicators::{IndicatorTable, TractRecord};
use crate::transit::MetroStop;

/// Attribute holding the 11-digit tract FIPS code.
pub const GEOID_FIELD: &str = "geoid10";

#[derive(Debug, Clone, PartialEq)]
pub struct CensusTract {
    pub geoid: String,
    pub shape: MultiPolygon<f64>,
}

/// Reads every polygon record of the tract shapefile at `path`.
///
/// Records without a geoid or with non-polygon shapes are skipped.
///
/// # Errors
///
/// Fails if the `.shp`/`.dbf` pair cannot be read.
pub fn load_census_tracts(path: &Path) -> Result<Vec<CensusTract>> {
    let shapes = shapefile::read(path)
        .with_context(|| format!("Failed to read shapefile {}", path.display()))?;

    let mut tracts = Vec::with_capacity(shapes.len());
    for (shape, record) in shapes {
        let Some(geoid) = record_geoid(&record) else {
            warn!(field = GEOID_FIELD, "Shapefile record without a geoid, skipping");
            continue;
        };

        let rings = match shape {
            Shape::Polygon(p) => ring_coords(p.rings(), |pt| (pt.x, pt.y)),
            Shape::PolygonM(p) => ring_coords(p.rings(), |pt| (pt.x, pt.y)),
            Shape::PolygonZ(p) => ring_coords(p.rings(), |pt| (pt.x, pt.y)),
            other => {
                warn!(
                    geoid = %geoid,
                    shape = ?other.shapetype(),
                    "Tract is not a polygon, skipping"
                );
                continue;
            }
        };

        tracts.push(CensusTract {
            geoid,
            shape: assemble_polygons(rings),
        });
    }

    info!(tracts = tracts.len(), path = %path.display(), "Loaded census tracts");
    Ok(tracts)
}

fn record_geoid(record: &Record) -> Option<String> {
    match record.get(GEOID_FIELD)? {
        FieldValue::Character(Some(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(format!("{n:.0}")),
        _ => None,
    }
}

fn ring_coords<P>(
    rings: &[PolygonRing<P>],
    xy: impl Fn(&P) -> (f64, f64),
) -> Vec<(bool, Vec<Coord<f64>>)> {
    rings
        .iter()
        .map(|ring| {
            let outer = matches!(ring, PolygonRing::Outer(_));
            let coords = ring
                .points()
                .iter()
                .map(|p| {
                    let (x, y) = xy(p);
                    Coord { x, y }
                })
                .collect();
            (outer, coords)
        })
        .collect()
}

/// Groups shapefile rings into polygons: each outer ring starts a polygon
/// and the inner rings after it are its holes. Leading inner rings with no
/// outer ring are treated as outer.
pub fn assemble_polygons(rings: Vec<(bool, Vec<Coord<f64>>)>) -> MultiPolygon<f64> {
    let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();

    for (outer, coords) in rings {
        let ring = LineString::new(coords);
        match polygons.last_mut() {
            Some((_, holes)) if !outer => holes.push(ring),
            _ => polygons.push((ring, Vec::new())),
        }
    }

    MultiPolygon::new(
        polygons
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    )
}

/// The polyline through the located stops, in order, as `(lon, lat)`.
/// Needs at least two located stops.
pub fn line_geometry(stops: &[MetroStop]) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = stops
        .iter()
        .filter_map(MetroStop::location)
        .map(|(lat, lon)| Coord { x: lon, y: lat })
        .collect();

    if coords.len() < 2 {
        debug!(located = coords.len(), "Too few located stops for a line geometry");
        return None;
    }
    Some(LineString::new(coords))
}

/// Tracts whose polygons intersect `line`, in shapefile order.
pub fn tracts_under_line<'a>(
    tracts: &'a [CensusTract],
    line: &LineString<f64>,
) -> Vec<&'a CensusTract> {
    tracts.iter().filter(|t| t.shape.intersects(line)).collect()
}

/// Indicator records for `tracts`; tracts missing from the table are dropped.
pub fn join_indicators(tracts: &[&CensusTract], table: &IndicatorTable) -> Vec<TractRecord> {
    let records: Vec<TractRecord> = tracts
        .iter()
        .filter_map(|t| table.get(&t.geoid).cloned())
        .collect();

    if records.len() < tracts.len() {
        debug!(
            tracts = tracts.len(),
            with_indicators = records.len(),
            "Some tracts under the line have no indicators"
        );
    }
    records
}
