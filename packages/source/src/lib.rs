#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Open-data feed definitions, fetching, and normalization.
//!
//! Each feed is described by a TOML [`feed_def::FeedDefinition`] embedded
//! at compile time (see [`registry`]). The definition knows how to pull
//! raw rows from the portal and which field-name synonyms map onto the
//! canonical [`dogrun_source_models::NormalizedRecord`].

pub mod feed_def;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod socrata;

use std::path::PathBuf;

/// A raw feed row: field name to JSON value, no fixed schema.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur while fetching or decoding a feed.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (snapshot write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown feed or malformed feed definition.
    #[error("Feed configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Options for a single feed fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Lower the feed's configured record cap. Values above the cap are
    /// clamped to it.
    pub limit: Option<u64>,
    /// When set, the raw JSON response body is also written here.
    pub raw_output: Option<PathBuf>,
}
