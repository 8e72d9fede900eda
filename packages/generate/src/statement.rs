//! SQL insert statement rendering.
//!
//! Each enriched record becomes one [`StatementRow`] (or is skipped when it
//! has no name or no coordinates), and each row renders to one multi-line
//! `INSERT` statement. Absent values render as `NULL`.

use dogrun_places_models::EnrichedRecord;

use crate::derive::{amenities, borough_name, has_seating};
use crate::hours::{OpeningHours, parse_hours};

/// Default destination table.
pub const DEFAULT_TABLE: &str = "dog_parks";

const RULES: &str = "Please follow NYC Parks Department rules and regulations";

/// How the coordinates are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LocationStyle {
    /// Separate `latitude` and `longitude` columns.
    #[default]
    LatLng,
    /// One `location` geography column built with `ST_MakePoint`.
    Postgis,
}

/// Rendering options shared by every statement in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOptions {
    /// Destination table name.
    pub table: String,
    /// Coordinate column layout.
    pub location_style: LocationStyle,
}

impl Default for StatementOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            location_style: LocationStyle::default(),
        }
    }
}

/// Every value of one destination row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    /// Trimmed dog-run name.
    pub name: String,
    /// Fixed description, mentioning the borough when known.
    pub description: String,
    /// Name plus city, with the ZIP code appended when present.
    pub address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Derived amenity labels, possibly empty.
    pub amenities: Vec<String>,
    /// Fixed rules text.
    pub rules: String,
    /// First weekday's opening hours, when the hours text parsed.
    pub hours: Option<OpeningHours>,
    /// Place website.
    pub website: Option<String>,
    /// Place phone number.
    pub phone: Option<String>,
    /// Place rating.
    pub rating: Option<f64>,
    /// Number of place reviews.
    pub review_count: Option<u64>,
    /// Surface material from the feed.
    pub surface_type: Option<String>,
    /// Whether seating is available; `None` unless the feed says yes or no.
    pub has_seating: Option<bool>,
    /// ZIP code from the feed.
    pub zipcode: Option<String>,
    /// Full borough name, or the raw code when unrecognized.
    pub borough: Option<String>,
}

/// Derives the destination row for one record.
///
/// Returns `None` when the record has no usable name or lacks either
/// coordinate.
#[must_use]
pub fn derive_row(enriched: &EnrichedRecord) -> Option<StatementRow> {
    let record = &enriched.record;
    let name = record.display_name()?.to_string();
    let latitude = record.latitude?;
    let longitude = record.longitude?;

    let enrichment = enriched.enrichment.as_ref();
    let rating = enrichment.and_then(|e| e.rating);
    let borough = non_blank(record.borough.as_deref()).map(borough_name);
    let zipcode = non_blank(record.zipcode.as_deref()).map(str::to_string);

    let description = borough.as_ref().map_or_else(
        || "NYC Parks Department dog run".to_string(),
        |b| format!("NYC Parks Department dog run in {b}"),
    );
    let address = zipcode.as_ref().map_or_else(
        || format!("{name}, New York, NY"),
        |z| format!("{name}, New York, NY {z}"),
    );

    Some(StatementRow {
        amenities: amenities(
            record.surface.as_deref(),
            record.seating.as_deref(),
            rating,
        ),
        hours: parse_hours(enrichment.and_then(|e| e.hours.as_deref())),
        website: non_blank(enrichment.and_then(|e| e.website.as_deref())).map(str::to_string),
        phone: non_blank(enrichment.and_then(|e| e.phone.as_deref())).map(str::to_string),
        review_count: enrichment.and_then(|e| e.review_count),
        surface_type: non_blank(record.surface.as_deref()).map(str::to_string),
        has_seating: has_seating(record.seating.as_deref()),
        rules: RULES.to_string(),
        name,
        description,
        address,
        latitude,
        longitude,
        rating,
        zipcode,
        borough,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Single-quotes a string literal, doubling embedded quotes.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_or_null(value: Option<&str>) -> String {
    value.map_or_else(|| "NULL".to_string(), quote)
}

fn number_or_null<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "NULL".to_string(), |v| v.to_string())
}

/// Renders the amenity list as a quoted array literal, e.g. `'{"a","b"}'`.
fn array_literal(items: &[String]) -> String {
    if items.is_empty() {
        return "NULL".to_string();
    }
    let elements = items
        .iter()
        .map(|item| format!("\"{}\"", item.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(",");
    quote(&format!("{{{elements}}}"))
}

/// Renders one row as a complete `INSERT` statement.
#[must_use]
pub fn render_statement(row: &StatementRow, options: &StatementOptions) -> String {
    let (location_columns, location_values) = match options.location_style {
        LocationStyle::LatLng => (
            "latitude, longitude",
            vec![row.latitude.to_string(), row.longitude.to_string()],
        ),
        LocationStyle::Postgis => (
            "location",
            vec![format!(
                "ST_MakePoint({}, {})::geography",
                row.longitude, row.latitude
            )],
        ),
    };

    let hours_open = row.hours.as_ref().map(OpeningHours::open_text);
    let hours_close = row.hours.as_ref().map(OpeningHours::close_text);

    let mut values = vec![
        quote(&row.name),
        quote(&row.description),
        quote(&row.address),
    ];
    values.extend(location_values);
    values.extend([
        array_literal(&row.amenities),
        quote(&row.rules),
        quote_or_null(hours_open.as_deref()),
        quote_or_null(hours_close.as_deref()),
        quote_or_null(row.website.as_deref()),
        quote_or_null(row.phone.as_deref()),
        number_or_null(row.rating),
        number_or_null(row.review_count),
        quote_or_null(row.surface_type.as_deref()),
        number_or_null(row.has_seating),
        quote_or_null(row.zipcode.as_deref()),
        quote_or_null(row.borough.as_deref()),
        "NOW()".to_string(),
        "NOW()".to_string(),
    ]);

    let body = values
        .iter()
        .map(|value| format!("    {value}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "INSERT INTO {} (\n    \
         name, description, address, {location_columns}, amenities, rules,\n    \
         hours_open, hours_close, website, phone, rating, review_count,\n    \
         surface_type, has_seating, zipcode, borough, created_at, updated_at\n\
         ) VALUES (\n{body}\n);",
        options.table
    )
}

/// A rendered script plus its counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Full script text.
    pub text: String,
    /// Input rows seen.
    pub processed: usize,
    /// Statements emitted.
    pub emitted: usize,
}

impl Script {
    /// Rows skipped for lacking a name or coordinates.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.processed - self.emitted
    }
}

/// Renders the header and one statement per usable record.
///
/// Each statement is followed by a blank line. Skipped records leave no
/// trace in the text.
#[must_use]
pub fn render_script(
    records: &[EnrichedRecord],
    source_label: &str,
    options: &StatementOptions,
) -> Script {
    let mut lines = vec![
        "-- NYC Dog Runs Import".to_string(),
        format!("-- Generated from {source_label}"),
        String::new(),
    ];

    let mut emitted = 0;
    for row in records.iter().filter_map(derive_row) {
        lines.push(render_statement(&row, options));
        lines.push(String::new());
        emitted += 1;
    }

    Script {
        text: lines.join("\n"),
        processed: records.len(),
        emitted,
    }
}
