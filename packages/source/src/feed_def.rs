//! Config-driven feed definition.
//!
//! [`FeedDefinition`] captures everything unique about an open-data feed:
//! where to fetch it and which raw field names map onto each canonical
//! field. A single generic implementation handles fetching and
//! normalization for every feed.

use std::time::Duration;

use dogrun_source_models::NormalizedRecord;
use serde::Deserialize;

use crate::socrata::{SocrataConfig, fetch_socrata};
use crate::{FetchOptions, RawRecord, SourceError};

/// A complete, config-driven feed definition loaded from TOML.
#[derive(Debug, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g., `"nyc_dog_runs"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Human-readable portal page for the dataset.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// How to fetch raw rows.
    pub fetcher: FetcherConfig,
    /// Field-name synonyms for normalization.
    pub fields: FieldMapping,
}

/// How to fetch raw rows from the portal.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// Socrata SODA API, single `$limit`-capped request.
    Socrata {
        /// Resource URL.
        api_url: String,
        /// Maximum number of records.
        limit: u64,
        /// Request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

const fn default_timeout_secs() -> u64 {
    10
}

/// Raw field names for each canonical field, tried in order.
///
/// The first name present with a usable value wins.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Dog-run name.
    pub name: Vec<String>,
    /// Explicit longitude fields.
    #[serde(default)]
    pub longitude: Vec<String>,
    /// Explicit latitude fields.
    #[serde(default)]
    pub latitude: Vec<String>,
    /// Geometry fields searched for a fallback coordinate pair.
    #[serde(default)]
    pub geometry: Vec<String>,
    /// Borough code.
    #[serde(default)]
    pub borough: Vec<String>,
    /// ZIP code.
    #[serde(default)]
    pub zipcode: Vec<String>,
    /// Surface material.
    #[serde(default)]
    pub surface: Vec<String>,
    /// Seating flag.
    #[serde(default)]
    pub seating: Vec<String>,
}

impl FieldMapping {
    /// Returns `true` if `field` is consumed by any canonical mapping.
    #[must_use]
    pub fn is_mapped(&self, field: &str) -> bool {
        [
            &self.name,
            &self.longitude,
            &self.latitude,
            &self.geometry,
            &self.borough,
            &self.zipcode,
            &self.surface,
            &self.seating,
        ]
        .iter()
        .any(|names| names.iter().any(|n| n == field))
    }
}

impl FeedDefinition {
    /// Returns the unique feed identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable feed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured record cap.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        match &self.fetcher {
            FetcherConfig::Socrata { limit, .. } => *limit,
        }
    }

    /// Downloads the raw rows of this feed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on any transport, status, or decode failure.
    pub async fn fetch(&self, options: &FetchOptions) -> Result<Vec<RawRecord>, SourceError> {
        match &self.fetcher {
            FetcherConfig::Socrata {
                api_url,
                limit,
                timeout_secs,
            } => {
                fetch_socrata(
                    &SocrataConfig {
                        api_url,
                        limit: *limit,
                        timeout: Duration::from_secs(*timeout_secs),
                        label: &self.name,
                    },
                    options,
                )
                .await
            }
        }
    }

    /// Normalizes raw rows into canonical records, one per row, in order.
    #[must_use]
    pub fn normalize(&self, rows: &[RawRecord]) -> Vec<NormalizedRecord> {
        crate::normalize::normalize_records(rows, &self.fields)
    }
}

/// Parses a feed definition from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or does not
/// match the definition schema.
pub fn parse_feed_toml(toml_str: &str) -> Result<FeedDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}
