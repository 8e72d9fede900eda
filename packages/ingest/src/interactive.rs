#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the collection and enrichment stage.
//!
//! Lets the user pick a feed, an output path, and an optional record
//! limit with `dialoguer` instead of remembering CLI flags.

use dialoguer::Select;
use dogrun_cli_utils::{IndicatifProgress, MultiProgress, prompt_optional_u64, prompt_path};

use crate::{DEFAULT_OUTPUT, IngestOptions};

/// Top-level actions available in the ingest menu.
enum IngestAction {
    Enrich,
    ListFeeds,
}

impl IngestAction {
    const ALL: &[Self] = &[Self::Enrich, Self::ListFeeds];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Enrich => "Fetch and enrich a feed",
            Self::ListFeeds => "List feeds",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = IngestAction::ALL.iter().map(IngestAction::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match IngestAction::ALL[idx] {
        IngestAction::Enrich => enrich(multi).await?,
        IngestAction::ListFeeds => list_feeds(),
    }

    Ok(())
}

/// Prompts for a feed and run parameters, then runs the ingest stage.
async fn enrich(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let feeds = crate::all_feeds();
    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    let labels: Vec<String> = feeds
        .iter()
        .map(|f| format!("{} ({})", f.id(), f.name()))
        .collect();

    let idx = Select::new()
        .with_prompt("Feed")
        .items(&labels)
        .default(0)
        .interact()?;

    let output = prompt_path("Enriched CSV path", DEFAULT_OUTPUT)?;
    let limit = prompt_optional_u64("Record limit (empty for the feed's cap)")?;

    let options = IngestOptions {
        feed_id: feeds[idx].id().to_string(),
        output,
        limit,
        raw_output: None,
    };

    let progress = IndicatifProgress::records_bar(multi, "Fetching feed...");
    let summary = crate::run(&options, Some(progress)).await?;
    println!(
        "Wrote {} rows ({} enriched) to {}",
        summary.rows,
        summary.enriched,
        summary.output.display()
    );

    Ok(())
}

fn list_feeds() {
    println!("{:<20} NAME", "ID");
    println!("{}", "-".repeat(50));
    for feed in &crate::all_feeds() {
        println!("{:<20} {}", feed.id(), feed.name());
    }
}
