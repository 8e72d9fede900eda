#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI orchestrator for the dog-run toolchain.
//!
//! One entry point that lets the user run either stage on its own or both
//! back to back. Uses `indicatif-log-bridge` (via
//! [`dogrun_cli_utils::init_logger`]) so log lines and progress bars share
//! the terminal.

mod pipeline;

use dialoguer::Select;

/// Top-level tool selection.
enum Tool {
    RunPipeline,
    Ingest,
    Generate,
}

impl Tool {
    const ALL: &[Self] = &[Self::RunPipeline, Self::Ingest, Self::Generate];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunPipeline => "Run full pipeline",
            Self::Ingest => "Collect & enrich dog runs",
            Self::Generate => "Generate SQL import script",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let multi = dogrun_cli_utils::init_logger();

    println!("Dog Run Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::RunPipeline => pipeline::run(&multi).await?,
        Tool::Ingest => dogrun_ingest::interactive::run(&multi).await?,
        Tool::Generate => dogrun_generate::interactive::run()?,
    }

    Ok(())
}
