#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The enriched dog-run table.
//!
//! This CSV file is the only contract between the ingest and generate
//! stages. Columns, in order:
//!
//! `dogrun_name, lon, lat, borough, zipcode, surface, seating,
//! g_place_id, g_hours, g_rating, g_reviews, g_phone, g_website`
//!
//! followed by the sorted union of passthrough feed columns. Absent values
//! are empty cells. The reader works by header name, so files missing
//! optional columns (e.g. no `g_place_id`) still load.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::path::Path;

use dogrun_places_models::{EnrichedRecord, PlaceEnrichment, columns as enrichment_columns};
use dogrun_source_models::{NormalizedRecord, columns as record_columns};

/// Errors from reading or writing the enriched table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn is_fixed_column(name: &str) -> bool {
    record_columns::RECORD.contains(&name) || enrichment_columns::ENRICHMENT.contains(&name)
}

/// Returns the header row for `records`.
#[must_use]
pub fn headers(records: &[EnrichedRecord]) -> Vec<String> {
    let extras: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.record.extra.keys())
        .map(String::as_str)
        .filter(|k| !is_fixed_column(k))
        .collect();

    record_columns::RECORD
        .iter()
        .chain(enrichment_columns::ENRICHMENT)
        .copied()
        .chain(extras)
        .map(str::to_string)
        .collect()
}

fn opt_string(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn opt_display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row_values(record: &EnrichedRecord, extra_headers: &[String]) -> Vec<String> {
    let r = &record.record;
    let e = record.enrichment.as_ref();

    let mut values = vec![
        opt_string(r.name.as_deref()),
        opt_display(r.longitude),
        opt_display(r.latitude),
        opt_string(r.borough.as_deref()),
        opt_string(r.zipcode.as_deref()),
        opt_string(r.surface.as_deref()),
        opt_string(r.seating.as_deref()),
        opt_string(e.map(|e| e.place_id.as_str())),
        opt_string(e.and_then(|e| e.hours.as_deref())),
        opt_display(e.and_then(|e| e.rating)),
        opt_display(e.and_then(|e| e.review_count)),
        opt_string(e.and_then(|e| e.phone.as_deref())),
        opt_string(e.and_then(|e| e.website.as_deref())),
    ];

    values.extend(
        extra_headers
            .iter()
            .map(|h| opt_string(r.extra.get(h).map(String::as_str))),
    );

    values
}

/// Writes `records` as CSV to `writer`.
///
/// # Errors
///
/// Returns [`TableError`] if encoding or writing fails.
pub fn write_enriched<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<(), TableError> {
    let headers = headers(records);
    let fixed = record_columns::RECORD.len() + enrichment_columns::ENRICHMENT.len();
    let extra_headers = &headers[fixed..];

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&headers)?;
    for record in records {
        csv_writer.write_record(row_values(record, extra_headers))?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Writes `records` to a CSV file, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or written.
pub fn write_enriched_file(path: &Path, records: &[EnrichedRecord]) -> Result<(), TableError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_enriched(std::io::BufWriter::new(file), records)
}

/// Column lookup by header name.
struct ColumnIndex {
    positions: BTreeMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord) -> Self {
        Self {
            positions: headers
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.trim().to_string(), idx))
                .collect(),
        }
    }

    fn cell<'a>(&self, row: &'a csv::StringRecord, column: &str) -> Option<&'a str> {
        let idx = *self.positions.get(column)?;
        row.get(idx).map(str::trim).filter(|s| !s.is_empty())
    }

    fn string(&self, row: &csv::StringRecord, column: &str) -> Option<String> {
        self.cell(row, column).map(str::to_string)
    }

    fn float(&self, row: &csv::StringRecord, column: &str) -> Option<f64> {
        self.cell(row, column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Parses a count, accepting float renderings such as `"812.0"`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_cmp
    )]
    fn count(&self, row: &csv::StringRecord, column: &str) -> Option<u64> {
        let raw = self.cell(row, column)?;
        raw.parse::<u64>().ok().or_else(|| {
            let value = raw.parse::<f64>().ok()?;
            (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then(|| value as u64)
        })
    }
}

fn parse_row(index: &ColumnIndex, row: &csv::StringRecord) -> EnrichedRecord {
    let extra: BTreeMap<String, String> = index
        .positions
        .keys()
        .filter(|name| !is_fixed_column(name))
        .filter_map(|name| index.string(row, name).map(|v| (name.clone(), v)))
        .collect();

    let record = NormalizedRecord {
        name: index.string(row, record_columns::NAME),
        longitude: index.float(row, record_columns::LONGITUDE),
        latitude: index.float(row, record_columns::LATITUDE),
        borough: index.string(row, record_columns::BOROUGH),
        zipcode: index.string(row, record_columns::ZIPCODE),
        surface: index.string(row, record_columns::SURFACE),
        seating: index.string(row, record_columns::SEATING),
        extra,
    };

    let enriched = enrichment_columns::ENRICHMENT
        .iter()
        .any(|column| index.cell(row, column).is_some());

    let enrichment = enriched.then(|| PlaceEnrichment {
        place_id: index
            .string(row, enrichment_columns::PLACE_ID)
            .unwrap_or_default(),
        hours: index.string(row, enrichment_columns::HOURS),
        rating: index.float(row, enrichment_columns::RATING),
        review_count: index.count(row, enrichment_columns::REVIEWS),
        phone: index.string(row, enrichment_columns::PHONE),
        website: index.string(row, enrichment_columns::WEBSITE),
    });

    EnrichedRecord { record, enrichment }
}

/// Reads enriched records from CSV.
///
/// Missing columns and unparseable numbers become absent values.
///
/// # Errors
///
/// Returns [`TableError::Csv`] if the CSV itself is malformed.
pub fn read_enriched<R: Read>(reader: R) -> Result<Vec<EnrichedRecord>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let index = ColumnIndex::new(csv_reader.headers()?);

    if !index.positions.contains_key(record_columns::NAME) {
        log::warn!(
            "Enriched table has no {} column; every row will be skipped downstream",
            record_columns::NAME
        );
    }

    csv_reader
        .records()
        .map(|row| -> Result<EnrichedRecord, TableError> { Ok(parse_row(&index, &row?)) })
        .collect()
}

/// Reads enriched records from a CSV file.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be opened or parsed.
pub fn read_enriched_file(path: &Path) -> Result<Vec<EnrichedRecord>, TableError> {
    let file = std::fs::File::open(path)?;
    read_enriched(std::io::BufReader::new(file))
}
