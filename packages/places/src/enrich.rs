//! Per-record enrichment step.
//!
//! Searches for `"<name> dog run"` near the record's coordinates and, on
//! a match, attaches the place's details. Every failure degrades to an
//! unenriched record; this step never errors.

use dogrun_places_models::{EnrichedRecord, PlaceEnrichment};
use dogrun_source_models::NormalizedRecord;

use crate::PlaceLookup;

/// Builds the text-search query for a dog run.
#[must_use]
pub fn search_query(name: &str) -> String {
    format!("{name} dog run")
}

/// Enriches one record with place metadata.
///
/// Returns the record unenriched when it has no name, the search finds
/// nothing, or any request fails.
pub async fn enrich_record(
    lookup: &dyn PlaceLookup,
    record: NormalizedRecord,
    radius_m: u32,
) -> EnrichedRecord {
    let Some(query) = record.display_name().map(search_query) else {
        log::debug!("Skipping place lookup for unnamed record");
        return EnrichedRecord::unenriched(record);
    };

    let candidate = match lookup
        .search(&query, record.latitude, record.longitude, radius_m)
        .await
    {
        Ok(Some(candidate)) => candidate,
        Ok(None) => {
            log::debug!("No place found for {query:?}");
            return EnrichedRecord::unenriched(record);
        }
        Err(e) => {
            log::warn!("Place search failed for {query:?}: {e}");
            return EnrichedRecord::unenriched(record);
        }
    };

    let details = match lookup.details(&candidate.place_id).await {
        Ok(details) => details,
        Err(e) => {
            log::warn!(
                "Place details failed for {query:?} ({}): {e}",
                candidate.place_id
            );
            return EnrichedRecord::unenriched(record);
        }
    };

    log::debug!("Matched {query:?} to place {}", candidate.place_id);

    EnrichedRecord {
        record,
        enrichment: Some(PlaceEnrichment::from_details(candidate.place_id, details)),
    }
}
