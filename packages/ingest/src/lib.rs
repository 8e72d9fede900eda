#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stage one of the dog-run pipeline: collect and enrich.
//!
//! Fetches the open-data feed, normalizes each row, looks every dog run up
//! in the places service, and writes the enriched table consumed by
//! `dogrun_generate`.

pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dogrun_places::client::PlacesClient;
use dogrun_places::config::PlacesConfig;
use dogrun_places::enrich::enrich_record;
use dogrun_places::{PlaceLookup, PlacesError};
use dogrun_places_models::EnrichedRecord;
use dogrun_source::feed_def::FeedDefinition;
use dogrun_source::progress::{ProgressCallback, null_progress};
use dogrun_source::{FetchOptions, SourceError, registry};
use dogrun_source_models::NormalizedRecord;
use dogrun_table::TableError;

/// Default path of the enriched table.
pub const DEFAULT_OUTPUT: &str = "dog_runs_enriched.csv";

/// Errors that abort the ingest stage.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Places configuration or client construction failed.
    #[error(transparent)]
    Places(#[from] PlacesError),

    /// Feed lookup, fetch, or decode failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing the enriched table failed.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Parameters for one ingest run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Feed identifier from the registry.
    pub feed_id: String,
    /// Path of the enriched CSV to write.
    pub output: PathBuf,
    /// Optional lower record cap.
    pub limit: Option<u64>,
    /// Optional path for a raw feed snapshot.
    pub raw_output: Option<PathBuf>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            feed_id: registry::DEFAULT_FEED.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            limit: None,
            raw_output: None,
        }
    }
}

/// Outcome of an ingest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    /// Rows written to the enriched table.
    pub rows: usize,
    /// Rows that matched a place.
    pub enriched: usize,
    /// Where the table was written.
    pub output: PathBuf,
}

/// Returns all configured feeds.
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    registry::all_feeds()
}

/// Settings for [`enrich_all`].
#[derive(Debug, Clone, Copy)]
pub struct EnrichSettings {
    /// Search bias radius in meters.
    pub radius_m: u32,
    /// Fixed pause after each looked-up record.
    pub request_delay: Duration,
}

impl EnrichSettings {
    /// Takes radius and delay from a places config.
    #[must_use]
    pub const fn from_config(config: &PlacesConfig) -> Self {
        Self {
            radius_m: config.search_radius_m(),
            request_delay: config.request_delay(),
        }
    }
}

/// Enriches every record in order, one at a time.
///
/// Every input row produces exactly one output row; failed lookups yield
/// unenriched rows. After each record that was looked up the driver
/// sleeps for the fixed `request_delay`.
pub async fn enrich_all(
    lookup: &dyn PlaceLookup,
    records: Vec<NormalizedRecord>,
    settings: EnrichSettings,
    progress: &dyn ProgressCallback,
) -> Vec<EnrichedRecord> {
    progress.set_total(records.len() as u64);
    progress.set_message("Enriching".to_string());

    let mut enriched = Vec::with_capacity(records.len());
    for record in records {
        let looked_up = record.display_name().is_some();
        enriched.push(enrich_record(lookup, record, settings.radius_m).await);
        progress.inc(1);

        if looked_up && !settings.request_delay.is_zero() {
            tokio::time::sleep(settings.request_delay).await;
        }
    }

    let matched = enriched.iter().filter(|r| r.is_enriched()).count();
    progress.finish(format!("Enriched {matched}/{} records", enriched.len()));
    log::info!(
        "Enrichment complete: {matched} matched, {} unmatched",
        enriched.len() - matched
    );

    enriched
}

/// Runs the whole ingest stage: fetch, normalize, enrich, write.
///
/// The places credential is checked before any network or file I/O.
///
/// # Errors
///
/// Returns [`IngestError`] if the credential is missing, the feed is
/// unknown or cannot be fetched, or the table cannot be written.
/// Individual lookup failures never abort the run.
pub async fn run(
    options: &IngestOptions,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<IngestSummary, IngestError> {
    let start = Instant::now();

    let config = PlacesConfig::from_env()?;
    let settings = EnrichSettings::from_config(&config);
    let client = PlacesClient::new(config)?;

    let feed = registry::feed(&options.feed_id)?;
    log::info!("Collecting {} ({})", feed.name(), feed.id());

    let rows = feed
        .fetch(&FetchOptions {
            limit: options.limit,
            raw_output: options.raw_output.clone(),
        })
        .await?;
    let records = feed.normalize(&rows);

    let progress = progress.unwrap_or_else(null_progress);
    let enriched = enrich_all(&client, records, settings, progress.as_ref()).await;

    dogrun_table::write_enriched_file(&options.output, &enriched)?;

    log::info!(
        "{} written \u{2013} {} rows ({:.1}s)",
        options.output.display(),
        enriched.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(IngestSummary {
        rows: enriched.len(),
        enriched: enriched.iter().filter(|r| r.is_enriched()).count(),
        output: options.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use dogrun_places_models::{PlaceCandidate, PlaceDetails};

    use super::*;

    /// Matches only queries that start with one of `known`.
    struct FakeLookup {
        known: Vec<&'static str>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PlaceLookup for FakeLookup {
        async fn search(
            &self,
            query: &str,
            _latitude: Option<f64>,
            _longitude: Option<f64>,
            _radius_m: u32,
        ) -> Result<Option<PlaceCandidate>, PlacesError> {
            self.queries.lock().unwrap().push(query.to_string());
            if query.starts_with("Broken") {
                return Err(PlacesError::Parse {
                    message: "timeout".to_string(),
                });
            }
            Ok(self
                .known
                .iter()
                .find(|k| query.starts_with(**k))
                .map(|k| PlaceCandidate {
                    place_id: format!("id-{k}"),
                    name: None,
                }))
        }

        async fn details(&self, _place_id: &str) -> Result<PlaceDetails, PlacesError> {
            Ok(PlaceDetails {
                rating: Some(4.7),
                ..PlaceDetails::default()
            })
        }
    }

    #[derive(Default)]
    struct CountingProgress {
        total: AtomicU64,
        done: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }
        fn inc(&self, delta: u64) {
            self.done.fetch_add(delta, Ordering::SeqCst);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    fn named(name: &str) -> NormalizedRecord {
        NormalizedRecord {
            name: Some(name.to_string()),
            ..NormalizedRecord::default()
        }
    }

    const NO_DELAY: EnrichSettings = EnrichSettings {
        radius_m: 200,
        request_delay: Duration::ZERO,
    };

    #[tokio::test]
    async fn preserves_every_row_in_order() {
        let lookup = FakeLookup {
            known: vec!["Alpha", "Gamma"],
            queries: Mutex::new(Vec::new()),
        };
        let records = vec![
            named("Alpha"),
            named("Beta"),
            named("Broken"),
            NormalizedRecord::default(),
            named("Gamma"),
        ];

        let progress = CountingProgress::default();
        let enriched = enrich_all(&lookup, records.clone(), NO_DELAY, &progress).await;

        assert_eq!(enriched.len(), 5);
        for (out, input) in enriched.iter().zip(&records) {
            assert_eq!(&out.record, input);
        }
        let matched: Vec<bool> = enriched.iter().map(EnrichedRecord::is_enriched).collect();
        assert_eq!(matched, vec![true, false, false, false, true]);
        assert_eq!(
            enriched[4].enrichment.as_ref().unwrap().place_id,
            "id-Gamma"
        );

        assert_eq!(progress.total.load(Ordering::SeqCst), 5);
        assert_eq!(progress.done.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn unnamed_rows_issue_no_requests() {
        let lookup = FakeLookup {
            known: vec![],
            queries: Mutex::new(Vec::new()),
        };
        let records = vec![NormalizedRecord::default(), named("Beta")];
        enrich_all(&lookup, records, NO_DELAY, &CountingProgress::default()).await;
        assert_eq!(
            lookup.queries.lock().unwrap().as_slice(),
            ["Beta dog run"]
        );
    }

    #[tokio::test]
    async fn empty_feed_yields_empty_table() {
        let lookup = FakeLookup {
            known: vec![],
            queries: Mutex::new(Vec::new()),
        };
        let enriched = enrich_all(&lookup, Vec::new(), NO_DELAY, &CountingProgress::default()).await;
        assert!(enriched.is_empty());
    }

    #[tokio::test]
    async fn raw_row_flows_through_to_an_insert_statement() {
        let rows = dogrun_source::socrata::decode_records(
            r#"[{"name": "Tompkins Square Dog Run", "borough": "M", "lat": 40.73, "lon": -73.98}]"#,
        )
        .unwrap();
        let records = registry::feed(registry::DEFAULT_FEED)
            .unwrap()
            .normalize(&rows);

        let lookup = FakeLookup {
            known: vec![],
            queries: Mutex::new(Vec::new()),
        };
        let enriched = enrich_all(&lookup, records, NO_DELAY, &CountingProgress::default()).await;

        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join(DEFAULT_OUTPUT);
        dogrun_table::write_enriched_file(&table, &enriched).unwrap();
        let reloaded = dogrun_table::read_enriched_file(&table).unwrap();
        assert_eq!(reloaded, enriched);

        let script = dogrun_generate::statement::render_script(
            &reloaded,
            DEFAULT_OUTPUT,
            &dogrun_generate::statement::StatementOptions::default(),
        );
        assert_eq!(script.processed, 1);
        assert_eq!(script.emitted, 1);
        assert!(script.text.contains(
            "    'Tompkins Square Dog Run, New York, NY',\n    \
             40.73,\n    \
             -73.98,\n    \
             NULL,\n    \
             'Please follow NYC Parks Department rules and regulations',\n    \
             NULL,\n    NULL,\n    NULL,\n    NULL,\n    NULL,\n    NULL,\n    \
             NULL,\n    NULL,\n    NULL,\n    \
             'Manhattan',\n"
        ));
    }

    #[test]
    fn default_options_target_nyc_feed() {
        let options = IngestOptions::default();
        assert_eq!(options.feed_id, "nyc_dog_runs");
        assert_eq!(options.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(options.limit.is_none());
    }
}
