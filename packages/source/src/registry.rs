//! Feed registry: loads all feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`].

use crate::SourceError;
use crate::feed_def::{FeedDefinition, parse_feed_toml};

/// TOML configs embedded at compile time.
const FEED_TOMLS: &[(&str, &str)] = &[(
    "nyc_dog_runs",
    include_str!("../sources/nyc_dog_runs.toml"),
)];

/// Identifier of the feed used when none is specified.
pub const DEFAULT_FEED: &str = "nyc_dog_runs";

/// Returns all configured feed definitions.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed.
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_feed_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a feed definition by identifier.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if no feed has that identifier.
pub fn feed(id: &str) -> Result<FeedDefinition, SourceError> {
    all_feeds()
        .into_iter()
        .find(|f| f.id() == id)
        .ok_or_else(|| SourceError::Config {
            message: format!(
                "Unknown feed '{id}'. Available: {}",
                FEED_TOMLS
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_def::FetcherConfig;

    #[test]
    fn loads_all_feeds() {
        assert_eq!(all_feeds().len(), FEED_TOMLS.len());
    }

    #[test]
    fn feed_ids_match_file_names() {
        for ((name, _), feed) in FEED_TOMLS.iter().zip(all_feeds()) {
            assert_eq!(*name, feed.id());
        }
    }

    #[test]
    fn default_feed_is_nyc_dog_runs() {
        let feed = feed(DEFAULT_FEED).unwrap();
        assert_eq!(feed.limit(), 5000);
        let FetcherConfig::Socrata {
            api_url,
            timeout_secs,
            ..
        } = &feed.fetcher;
        assert!(api_url.ends_with("/resource/hxx3-bwgv.json"));
        assert_eq!(*timeout_secs, 10);
        assert_eq!(feed.fields.name, vec!["name".to_string()]);
        assert_eq!(feed.fields.longitude, [":@longitude", "longitude", "lon"]);
        assert_eq!(feed.fields.latitude, [":@latitude", "latitude", "lat"]);
    }

    #[test]
    fn unknown_feed_is_a_config_error() {
        assert!(matches!(feed("nope"), Err(SourceError::Config { .. })));
    }
}
