//! Places service configuration.
//!
//! Static service settings (endpoint, timeout, delay, field selections)
//! come from the TOML file under `services/`, embedded at compile time.
//! The API key comes from the environment and is checked once, when the
//! [`PlacesConfig`] is built.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::PlacesError;

/// Environment variable holding the places API key.
pub const API_KEY_ENV: &str = "GOOGLE_PLACES_KEY";

const SERVICE_TOML: &str = include_str!("../services/google_places.toml");

/// Static settings for a places web service.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesService {
    /// Unique identifier (e.g., `"google_places"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// API base URL; `/textsearch/json` and `/details/json` are appended.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Fixed pause after each enriched record, in milliseconds.
    pub request_delay_ms: u64,
    /// Search bias radius in meters.
    pub search_radius_m: u32,
    /// Field selection for text search.
    pub search_fields: String,
    /// Field selection for details.
    pub detail_fields: String,
}

/// Returns the embedded places service settings.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn default_service() -> PlacesService {
    toml::de::from_str(SERVICE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse places service config: {e}"))
}

/// Service settings plus the API key.
#[derive(Clone)]
pub struct PlacesConfig {
    /// Static service settings.
    pub service: PlacesService,
    api_key: String,
}

impl fmt::Debug for PlacesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesConfig")
            .field("service", &self.service)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PlacesConfig {
    /// Builds a config from the embedded service settings and the
    /// [`API_KEY_ENV`] environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingCredential`] if the variable is unset
    /// or blank.
    pub fn from_env() -> Result<Self, PlacesError> {
        Self::new(default_service(), std::env::var(API_KEY_ENV).ok())
    }

    /// Builds a config from explicit settings and an optional key.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingCredential`] if `api_key` is `None`
    /// or blank.
    pub fn new(service: PlacesService, api_key: Option<String>) -> Result<Self, PlacesError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(PlacesError::MissingCredential {
                variable: API_KEY_ENV,
            })?;

        Ok(Self { service, api_key })
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Returns the fixed inter-record delay.
    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.service.request_delay_ms)
    }

    /// Returns the search bias radius in meters.
    #[must_use]
    pub const fn search_radius_m(&self) -> u32 {
        self.service.search_radius_m
    }
}
