#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the SQL script generator.

use std::path::PathBuf;

use clap::Parser;
use dogrun_generate::statement::{DEFAULT_TABLE, LocationStyle, StatementOptions};
use dogrun_generate::{DEFAULT_INPUT, DEFAULT_OUTPUT, GenerateOptions};

#[derive(Parser)]
#[command(
    name = "dogrun_generate",
    about = "Generate SQL insert statements from the enriched dog-run table"
)]
struct Cli {
    /// Enriched CSV written by `dogrun_ingest`
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Path of the generated SQL script
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Destination table
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,
    /// Coordinate column layout
    #[arg(long, value_enum, default_value_t = LocationStyle::LatLng)]
    location_style: LocationStyle,
    /// Prompt for every option instead of using flags
    #[arg(long)]
    interactive: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _multi = dogrun_cli_utils::init_logger();
    let cli = Cli::parse();

    if cli.interactive {
        return dogrun_generate::interactive::run();
    }

    let options = GenerateOptions {
        input: cli.input,
        output: cli.output,
        statement: StatementOptions {
            table: cli.table,
            location_style: cli.location_style,
        },
    };

    let summary = dogrun_generate::run(&options)?;
    println!("Generated SQL import script: {}", options.output.display());
    println!("Ready to import {} NYC dog runs", summary.processed);

    Ok(())
}
