//! Normalizes raw feed rows into [`NormalizedRecord`] values.
//!
//! Uses the feed's [`FieldMapping`] to resolve each canonical field
//! regardless of the portal's column naming. Coordinates come from
//! explicit lat/lon fields first and fall back, per axis, to the first
//! coordinate pair found in the geometry.

use std::collections::BTreeMap;

use dogrun_source_models::NormalizedRecord;
use serde_json::Value;

use crate::RawRecord;
use crate::feed_def::FieldMapping;
use crate::parsing::{parse_coordinate, scalar_to_string};

/// Normalizes every raw row, preserving count and order.
///
/// Rows whose name or coordinates cannot be resolved are kept and logged.
#[must_use]
pub fn normalize_records(rows: &[RawRecord], fields: &FieldMapping) -> Vec<NormalizedRecord> {
    let records: Vec<NormalizedRecord> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let record = normalize_record(row, fields);
            if record.display_name().is_none() {
                log::warn!("Feed row {idx}: no name resolved");
            }
            if record.coordinates().is_none() {
                log::warn!(
                    "Feed row {idx} ({}): no coordinates resolved",
                    record.display_name().unwrap_or("unnamed")
                );
            }
            record
        })
        .collect();

    let located = records.iter().filter(|r| r.coordinates().is_some()).count();
    log::info!(
        "Normalized {} records ({located} with coordinates)",
        records.len()
    );

    records
}

/// Normalizes a single raw row.
#[must_use]
pub fn normalize_record(row: &RawRecord, fields: &FieldMapping) -> NormalizedRecord {
    let geometry_pair = fields
        .geometry
        .iter()
        .filter_map(|name| row.get(name))
        .find_map(geometry_lon_lat);

    let longitude = first_coordinate(row, &fields.longitude)
        .or_else(|| geometry_pair.map(|(lon, _)| lon));
    let latitude =
        first_coordinate(row, &fields.latitude).or_else(|| geometry_pair.map(|(_, lat)| lat));

    let extra: BTreeMap<String, String> = row
        .iter()
        .filter(|(key, _)| !fields.is_mapped(key))
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect();

    NormalizedRecord {
        name: first_string(row, &fields.name),
        longitude,
        latitude,
        borough: first_string(row, &fields.borough),
        zipcode: first_string(row, &fields.zipcode),
        surface: first_string(row, &fields.surface),
        seating: first_string(row, &fields.seating),
        extra,
    }
}

/// Searches `value` depth-first, left to right, for the first array of
/// exactly two numbers and returns it as `(longitude, latitude)`.
///
/// Returns `None` if `value` is not an array or holds no such pair.
#[must_use]
pub fn first_lon_lat(value: &Value) -> Option<(f64, f64)> {
    if !value.is_array() {
        return None;
    }

    let mut stack = vec![value];
    while let Some(item) = stack.pop() {
        let Value::Array(items) = item else {
            continue;
        };
        if let [a, b] = items.as_slice()
            && let (Some(lon), Some(lat)) = (a.as_f64(), b.as_f64())
        {
            return Some((lon, lat));
        }
        stack.extend(items.iter().rev());
    }

    None
}

/// Extracts a coordinate pair from a geometry field.
///
/// `GeoJSON` objects are searched through their `coordinates` member;
/// bare arrays are searched directly.
fn geometry_lon_lat(geometry: &Value) -> Option<(f64, f64)> {
    match geometry {
        Value::Object(obj) => obj.get("coordinates").and_then(first_lon_lat),
        other => first_lon_lat(other),
    }
}

fn first_coordinate(row: &RawRecord, names: &[String]) -> Option<f64> {
    names
        .iter()
        .filter_map(|name| row.get(name))
        .find_map(parse_coordinate)
}

fn first_string(row: &RawRecord, names: &[String]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| row.get(name))
        .find_map(scalar_to_string)
}
