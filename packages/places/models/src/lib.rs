#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place lookup results and the enriched dog-run record.
//!
//! [`PlaceCandidate`] and [`PlaceDetails`] mirror the places service's
//! text-search and details payloads. [`PlaceEnrichment`] is the flattened
//! subset kept per dog run, and [`EnrichedRecord`] pairs it with the
//! untouched [`NormalizedRecord`].

use dogrun_source_models::NormalizedRecord;
use serde::{Deserialize, Serialize};

/// Column names of the enrichment half of the intermediate table.
pub mod columns {
    /// Resolved place identifier. Non-empty exactly when a place matched.
    pub const PLACE_ID: &str = "g_place_id";
    /// Weekday opening hours, one line per day.
    pub const HOURS: &str = "g_hours";
    /// Average rating.
    pub const RATING: &str = "g_rating";
    /// Number of user ratings.
    pub const REVIEWS: &str = "g_reviews";
    /// Formatted phone number.
    pub const PHONE: &str = "g_phone";
    /// Website URL.
    pub const WEBSITE: &str = "g_website";

    /// Enrichment columns in output order.
    pub const ENRICHMENT: &[&str] = &[PLACE_ID, HOURS, RATING, REVIEWS, PHONE, WEBSITE];
}

/// First text-search hit for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Service-assigned place identifier.
    pub place_id: String,
    /// Display name, when the service includes it.
    #[serde(default)]
    pub name: Option<String>,
}

/// Weekly opening hours as returned by the details endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHoursText {
    /// One human-readable line per weekday (e.g. `"Monday: 6:00 AM – 9:00 PM"`).
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// The details payload for a resolved place.
///
/// Every field is optional: the service omits what it does not know, and
/// a non-success response is represented by [`PlaceDetails::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Opening hours.
    #[serde(default)]
    pub opening_hours: Option<OpeningHoursText>,
    /// Average rating.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of user ratings.
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
    /// Formatted local phone number.
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
}

/// Place metadata attached to a dog run.
///
/// Sub-fields are `None` when the service returned nothing for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceEnrichment {
    /// Identifier of the matched place.
    pub place_id: String,
    /// Weekday hours joined with `\n`.
    pub hours: Option<String>,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of user ratings.
    pub review_count: Option<u64>,
    /// Phone number.
    pub phone: Option<String>,
    /// Website URL.
    pub website: Option<String>,
}

impl PlaceEnrichment {
    /// Flattens a details payload for the given place.
    ///
    /// An empty weekday list is stored as absent hours.
    #[must_use]
    pub fn from_details(place_id: impl Into<String>, details: PlaceDetails) -> Self {
        let hours = details
            .opening_hours
            .map(|h| h.weekday_text)
            .filter(|days| !days.is_empty())
            .map(|days| days.join("\n"));

        Self {
            place_id: place_id.into(),
            hours,
            rating: details.rating,
            review_count: details.user_ratings_total,
            phone: details.formatted_phone_number.filter(|s| !s.is_empty()),
            website: details.website.filter(|s| !s.is_empty()),
        }
    }
}

/// A normalized record plus optional place metadata.
///
/// `enrichment` is `None` when no place matched (or no lookup was
/// possible); the normalized record itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    /// The record as normalized from the feed.
    pub record: NormalizedRecord,
    /// Place metadata, if a place matched.
    pub enrichment: Option<PlaceEnrichment>,
}

impl EnrichedRecord {
    /// Wraps a record with no enrichment.
    #[must_use]
    pub const fn unenriched(record: NormalizedRecord) -> Self {
        Self {
            record,
            enrichment: None,
        }
    }

    /// Returns `true` if a place matched.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        self.enrichment.is_some()
    }
}
