//! Interactive prompts for the generate tool.

use dialoguer::{Input, Select};
use dogrun_cli_utils::prompt_path;

use crate::statement::{DEFAULT_TABLE, LocationStyle, StatementOptions};
use crate::{DEFAULT_INPUT, DEFAULT_OUTPUT, GenerateOptions};

/// Prompts for input, output, table, and coordinate layout, then runs the
/// generate stage.
///
/// # Errors
///
/// Returns an error if a prompt fails or generation fails.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Enriched CSV path", DEFAULT_INPUT)?;
    let output = prompt_path("SQL output path", DEFAULT_OUTPUT)?;

    let table: String = Input::new()
        .with_prompt("Destination table")
        .default(DEFAULT_TABLE.to_string())
        .interact_text()?;

    let styles = &[
        "latitude/longitude columns",
        "PostGIS location column",
    ];
    let location_style = match Select::new()
        .with_prompt("Coordinate layout")
        .items(styles)
        .default(0)
        .interact()?
    {
        1 => LocationStyle::Postgis,
        _ => LocationStyle::LatLng,
    };

    let options = GenerateOptions {
        input,
        output,
        statement: StatementOptions {
            table: table.trim().to_string(),
            location_style,
        },
    };

    let summary = crate::run(&options)?;
    println!(
        "Wrote {} statements ({} rows processed) to {}",
        summary.emitted,
        summary.processed,
        options.output.display()
    );

    Ok(())
}
