//! CSV city loader with column-mapping configuration.
//!
//! Sources differ in how they label their columns and where the header row
//! sits, so the mapping is configuration rather than convention: a
//! [`CsvColumns`] names the header row index and the latitude / longitude /
//! altitude / name / time columns, plus the chrono pattern the time column is
//! written in. Rows before the header row are ignored.
//!
//! ```csv
//! exported by fleet-tool v2
//! name,lat,lon,alt,time
//! depot,32.1,34.8,15,2024-06-01 08:00:00
//! site-a,32.2,34.9,40,2024-06-01 08:05:00
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::geodetic::GeoCoord;
use crate::model::{City, Salesman};
use crate::point::Point3;
use crate::traits::Metadata;

/// Column mapping for a CSV source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvColumns {
    /// Zero-based index of the header row. Rows before it are ignored.
    pub header_row: usize,
    /// Header name of the latitude column (degrees).
    pub lat: String,
    /// Header name of the longitude column (degrees).
    pub lon: String,
    /// Header name of the altitude column (metres); absent means altitude 0.
    pub alt: Option<String>,
    /// Header name of the row-name column, if any.
    pub name: Option<String>,
    /// Header name of the timestamp column, if any.
    pub time: Option<String>,
    /// chrono pattern the timestamp column is written in.
    pub time_format: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            header_row: 0,
            lat: "lat".to_string(),
            lon: "lon".to_string(),
            alt: Some("alt".to_string()),
            name: Some("name".to_string()),
            time: Some("time".to_string()),
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// One parsed CSV row: a geographic sample with optional name and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoRecord {
    pub coord: GeoCoord,
    pub name: Option<String>,
    pub utc_ms: Option<i64>,
}

impl Metadata for GeoRecord {
    fn utc_ms(&self) -> Option<i64> {
        self.utc_ms
    }
}

/// Parse all data rows of a CSV source into [`GeoRecord`]s.
pub fn load_records<R: Read>(reader: R, columns: &CsvColumns) -> Result<Vec<GeoRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut header: Option<HashMap<String, usize>> = None;
    let mut records = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        if row < columns.header_row {
            continue;
        }
        if row == columns.header_row {
            header = Some(
                record
                    .iter()
                    .enumerate()
                    .map(|(i, field)| (field.trim().to_string(), i))
                    .collect(),
            );
            continue;
        }

        let header = header.as_ref().ok_or(LoadError::MissingHeader(columns.header_row))?;
        records.push(parse_row(&record, row, header, columns)?);
    }

    if header.is_none() {
        return Err(LoadError::MissingHeader(columns.header_row));
    }
    Ok(records)
}

/// Load cities from a CSV source, converting geographic coordinates to ECEF.
pub fn load_cities<R: Read>(reader: R, columns: &CsvColumns) -> Result<Vec<City<Point3>>, LoadError> {
    let records = load_records(reader, columns)?;
    Ok(records
        .into_iter()
        .map(|record| {
            let position = record.coord.to_ecef();
            match record.name {
                Some(name) => City::named(position, name),
                None => City::new(position),
            }
        })
        .collect())
}

/// Like [`load_cities`] but opens `path`.
pub fn load_cities_from_path(
    path: &Path,
    columns: &CsvColumns,
) -> Result<Vec<City<Point3>>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_cities(file, columns)
}

/// Load salesmen from a CSV source, all with the same `speed`.
pub fn load_salesmen<R: Read>(
    reader: R,
    columns: &CsvColumns,
    speed: f64,
) -> Result<Vec<Salesman<Point3>>, LoadError> {
    let records = load_records(reader, columns)?;
    Ok(records
        .into_iter()
        .map(|record| Salesman::new(record.coord.to_ecef(), speed))
        .collect())
}

fn parse_row(
    record: &csv::StringRecord,
    row: usize,
    header: &HashMap<String, usize>,
    columns: &CsvColumns,
) -> Result<GeoRecord, LoadError> {
    let lat = parse_f64(required_field(record, header, &columns.lat)?, row, "latitude")?;
    let lon = parse_f64(required_field(record, header, &columns.lon)?, row, "longitude")?;
    let alt = match &columns.alt {
        Some(column) => parse_f64(required_field(record, header, column)?, row, "altitude")?,
        None => 0.0,
    };

    let name = match &columns.name {
        Some(column) => optional_field(record, header, column).map(str::to_string),
        None => None,
    };

    let utc_ms = match &columns.time {
        Some(column) => match optional_field(record, header, column) {
            Some(raw) => Some(parse_time(raw, &columns.time_format, row)?),
            None => None,
        },
        None => None,
    };

    Ok(GeoRecord {
        coord: GeoCoord::new(lat, lon, alt),
        name,
        utc_ms,
    })
}

fn required_field<'a>(
    record: &'a csv::StringRecord,
    header: &HashMap<String, usize>,
    column: &str,
) -> Result<&'a str, LoadError> {
    let index = *header
        .get(column)
        .ok_or_else(|| LoadError::MissingColumn(column.to_string()))?;
    Ok(record.get(index).unwrap_or("").trim())
}

/// Missing or empty optional columns become `None` rather than an error.
fn optional_field<'a>(
    record: &'a csv::StringRecord,
    header: &HashMap<String, usize>,
    column: &str,
) -> Option<&'a str> {
    let index = *header.get(column)?;
    let value = record.get(index)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn parse_f64(value: &str, row: usize, field: &'static str) -> Result<f64, LoadError> {
    value.parse::<f64>().map_err(|_| LoadError::InvalidField {
        row,
        field,
        value: value.to_string(),
    })
}

fn parse_time(value: &str, format: &str, row: usize) -> Result<i64, LoadError> {
    NaiveDateTime::parse_from_str(value, format)
        .map(|dt| dt.and_utc().timestamp_millis())
        .map_err(|_| LoadError::InvalidField {
            row,
            field: "time",
            value: value.to_string(),
        })
}
