#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The canonical normalized dog-run record format.
//!
//! Open-data feeds return rows with no fixed schema. The normalizer in
//! `dogrun_source` maps each raw row onto a [`NormalizedRecord`] so every
//! later stage works against one explicit set of fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Column names shared by the enriched intermediate table.
pub mod columns {
    /// Dog-run name.
    pub const NAME: &str = "dogrun_name";
    /// Longitude (WGS84).
    pub const LONGITUDE: &str = "lon";
    /// Latitude (WGS84).
    pub const LATITUDE: &str = "lat";
    /// One-letter borough code (`B`, `X`, `Q`, `M`, `R`).
    pub const BOROUGH: &str = "borough";
    /// Five-digit ZIP code.
    pub const ZIPCODE: &str = "zipcode";
    /// Surface material (e.g. "Asphalt", "Natural").
    pub const SURFACE: &str = "surface";
    /// Seating flag (`Yes` / `No`).
    pub const SEATING: &str = "seating";

    /// Canonical record columns in output order.
    pub const RECORD: &[&str] = &[NAME, LONGITUDE, LATITUDE, BOROUGH, ZIPCODE, SURFACE, SEATING];
}

/// A dog-run record normalized to the canonical schema.
///
/// Coordinates are optional: a record whose feed row carried neither
/// explicit lat/lon fields nor a usable geometry is still kept so that
/// later stages can decide what to do with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Dog-run name. `None` when the feed row had no non-empty name field.
    pub name: Option<String>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// One-letter borough code as published by the feed.
    pub borough: Option<String>,
    /// ZIP code.
    pub zipcode: Option<String>,
    /// Surface material.
    pub surface: Option<String>,
    /// Seating flag as published (`Yes` / `No`).
    pub seating: Option<String>,
    /// Every other scalar attribute of the raw row, keyed by its feed
    /// field name. Carried through to the intermediate table untouched.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl NormalizedRecord {
    /// Returns the trimmed name, or `None` if it is missing or blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns `(latitude, longitude)` when both are resolved.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
