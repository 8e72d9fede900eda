#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the dog-run collection and enrichment stage.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dogrun_cli_utils::IndicatifProgress;
use dogrun_ingest::{DEFAULT_OUTPUT, IngestOptions, all_feeds};
use dogrun_source::registry::DEFAULT_FEED;

#[derive(Parser)]
#[command(
    name = "dogrun_ingest",
    about = "Collect dog runs and enrich them with place metadata"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a feed, enrich every record, and write the enriched CSV
    Enrich {
        /// Feed identifier (e.g., "`nyc_dog_runs`")
        #[arg(long, default_value = DEFAULT_FEED)]
        feed: String,
        /// Path of the enriched CSV
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Maximum number of records to fetch (clamped to the feed's cap)
        #[arg(long)]
        limit: Option<u64>,
        /// Also save the raw feed response to this path
        #[arg(long)]
        raw_output: Option<PathBuf>,
    },
    /// List all configured feeds
    Feeds,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let multi = dogrun_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return dogrun_ingest::interactive::run(&multi).await;
    };

    match command {
        Commands::Feeds => {
            println!("{:<20} NAME", "ID");
            println!("{}", "-".repeat(50));
            for feed in &all_feeds() {
                println!("{:<20} {}", feed.id(), feed.name());
            }
        }
        Commands::Enrich {
            feed,
            output,
            limit,
            raw_output,
        } => {
            let options = IngestOptions {
                feed_id: feed,
                output,
                limit,
                raw_output,
            };
            let progress = IndicatifProgress::records_bar(&multi, "Fetching feed...");
            dogrun_ingest::run(&options, Some(progress)).await?;
        }
    }

    Ok(())
}
