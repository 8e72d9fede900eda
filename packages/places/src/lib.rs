#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Places lookup used to enrich dog-run records.
//!
//! Two operations against the places web service:
//!
//! 1. **Text search**: finds the first place matching a free-form query,
//!    optionally biased to a radius around a coordinate.
//! 2. **Details**: fetches hours, rating, review count, phone, and
//!    website for a resolved place.
//!
//! Both sit behind the [`PlaceLookup`] trait so that [`enrich`] can be
//! driven by the HTTP [`client::PlacesClient`] or by an in-memory fake.
//! A non-success answer from the service is not an error: it yields
//! "no candidate" or empty details. Only transport failures surface as
//! [`PlacesError`], and [`enrich::enrich_record`] degrades those too.

pub mod client;
pub mod config;
pub mod enrich;

use async_trait::async_trait;
use dogrun_places_models::{PlaceCandidate, PlaceDetails};
use thiserror::Error;

/// Errors from places operations.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// The API key was not supplied. Fatal, raised before any request.
    #[error(
        "{variable} environment variable not set. Set it with: export {variable}='your-api-key'"
    )]
    MissingCredential {
        /// Name of the environment variable that should hold the key.
        variable: &'static str,
    },

    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// A places service capable of text search and details lookup.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Returns the first place matching `query`, or `None` if the service
    /// found nothing or answered with a non-success status.
    ///
    /// When both `latitude` and `longitude` are given the search is biased
    /// to `radius_m` meters around that point; otherwise it is a pure text
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] on transport failure or a malformed body.
    async fn search(
        &self,
        query: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_m: u32,
    ) -> Result<Option<PlaceCandidate>, PlacesError>;

    /// Returns the details of a resolved place, or
    /// [`PlaceDetails::default`] on a non-success status.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] on transport failure or a malformed body.
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError>;
}
