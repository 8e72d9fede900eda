//! Full pipeline orchestrator.
//!
//! Chains collect/enrich -> generate in one interactive flow. The enriched
//! CSV written by the first step is the input of the second.

use std::time::Instant;

use dialoguer::{Confirm, MultiSelect, Select};
use dogrun_cli_utils::{IndicatifProgress, MultiProgress, prompt_optional_u64, prompt_path};
use dogrun_generate::GenerateOptions;
use dogrun_generate::statement::{LocationStyle, StatementOptions};
use dogrun_ingest::IngestOptions;

/// Steps available in the pipeline.
enum PipelineStep {
    Enrich,
    Generate,
}

impl PipelineStep {
    const ALL: &[Self] = &[Self::Enrich, Self::Generate];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Enrich => "Collect & enrich dog runs",
            Self::Generate => "Generate SQL import script",
        }
    }
}

/// Runs the pipeline orchestrator.
///
/// Prompts for the steps and their parameters, then runs each selected
/// step in order.
///
/// # Errors
///
/// Returns an error if a prompt fails or a selected step fails.
#[allow(clippy::future_not_send)]
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline_start = Instant::now();

    let step_labels: Vec<&str> = PipelineStep::ALL.iter().map(PipelineStep::label).collect();
    let defaults = vec![true; PipelineStep::ALL.len()];

    let selected_steps = MultiSelect::new()
        .with_prompt("Pipeline steps (space=toggle, a=all, enter=confirm)")
        .items(&step_labels)
        .defaults(&defaults)
        .interact()?;

    if selected_steps.is_empty() {
        println!("No steps selected.");
        return Ok(());
    }

    let has_enrich = selected_steps
        .iter()
        .any(|&i| matches!(PipelineStep::ALL[i], PipelineStep::Enrich));
    let has_generate = selected_steps
        .iter()
        .any(|&i| matches!(PipelineStep::ALL[i], PipelineStep::Generate));

    let enriched_csv = prompt_path("Enriched CSV path", dogrun_ingest::DEFAULT_OUTPUT)?;

    let mut ingest = IngestOptions {
        output: enriched_csv.clone(),
        ..IngestOptions::default()
    };
    if has_enrich {
        ingest.limit = prompt_optional_u64("Record limit (empty for the feed's cap)")?;
    }

    let mut generate = GenerateOptions {
        input: enriched_csv,
        ..GenerateOptions::default()
    };
    if has_generate {
        generate.output = prompt_path("SQL output path", dogrun_generate::DEFAULT_OUTPUT)?;

        let postgis = Confirm::new()
            .with_prompt("Write a PostGIS location column instead of latitude/longitude?")
            .default(false)
            .interact()?;
        generate.statement = StatementOptions {
            location_style: if postgis {
                LocationStyle::Postgis
            } else {
                LocationStyle::LatLng
            },
            ..StatementOptions::default()
        };
    }

    println!();
    log::info!("Starting pipeline ({} steps)...", selected_steps.len());

    let total_steps = selected_steps.len();
    let mut current_step = 0usize;
    let steps_bar = IndicatifProgress::steps_bar(multi, "Pipeline", total_steps as u64);

    if has_enrich {
        current_step += 1;
        steps_bar.set_message(format!("[{current_step}/{total_steps}] Enriching"));

        let records_bar = IndicatifProgress::records_bar(multi, "Fetching feed...");
        let summary = dogrun_ingest::run(&ingest, Some(records_bar)).await?;
        log::info!(
            "[{current_step}/{total_steps}] {} of {} dog runs matched a place",
            summary.enriched,
            summary.rows
        );

        steps_bar.inc(1);

        if has_generate && summary.rows == 0 && !ask_continue()? {
            return Ok(());
        }
    }

    if has_generate {
        current_step += 1;
        steps_bar.set_message(format!("[{current_step}/{total_steps}] Generating"));

        let summary = dogrun_generate::run(&generate)?;
        log::info!(
            "[{current_step}/{total_steps}] {} statements from {} rows",
            summary.emitted,
            summary.processed
        );

        steps_bar.inc(1);
    }

    steps_bar.finish(format!(
        "Pipeline complete in {:.1}s",
        pipeline_start.elapsed().as_secs_f64()
    ));

    Ok(())
}

/// Asks whether to continue after an empty enrichment run.
fn ask_continue() -> Result<bool, Box<dyn std::error::Error>> {
    let choice = Select::new()
        .with_prompt("The enriched table is empty. Generate anyway?")
        .items(["Continue", "Abort"])
        .default(0)
        .interact()?;
    Ok(choice == 0)
}
