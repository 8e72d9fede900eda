#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stage two of the dog-run pipeline: enriched table to SQL.
//!
//! Reads the CSV written by `dogrun_ingest`, derives borough names,
//! opening hours and amenity tags for every usable row, and writes one
//! `INSERT` statement per row into a SQL script.

pub mod derive;
pub mod hours;
pub mod interactive;
pub mod statement;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use dogrun_table::TableError;
use regex::Regex;

use crate::statement::{Script, StatementOptions, render_script};

/// Default path of the enriched table to read.
pub const DEFAULT_INPUT: &str = "dog_runs_enriched.csv";

/// Default path of the generated script.
pub const DEFAULT_OUTPUT: &str = "import-nyc-dog-runs.sql";

/// Plain or schema-qualified SQL identifier.
static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("valid regex")
});

/// Errors that abort the generate stage.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The enriched table could not be read.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The script could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Destination script path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The destination table is not a valid identifier.
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),
}

/// Parameters for one generate run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Enriched CSV to read.
    pub input: PathBuf,
    /// SQL script to write.
    pub output: PathBuf,
    /// Table name and coordinate layout.
    pub statement: StatementOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            statement: StatementOptions::default(),
        }
    }
}

/// Outcome of a generate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Rows read from the enriched table.
    pub processed: usize,
    /// Statements written.
    pub emitted: usize,
}

/// Runs the whole generate stage: read, render, write.
///
/// # Errors
///
/// Returns [`GenerateError`] if the table name is invalid, the input
/// cannot be read, or the output cannot be written.
pub fn run(options: &GenerateOptions) -> Result<GenerateSummary, GenerateError> {
    if !TABLE_NAME.is_match(&options.statement.table) {
        return Err(GenerateError::InvalidTable(options.statement.table.clone()));
    }

    let records = dogrun_table::read_enriched_file(&options.input)?;
    log::info!("Processing {} dog runs", records.len());

    let Script {
        text,
        processed,
        emitted,
    } = render_script(&records, &source_label(&options.input), &options.statement);

    write_script(&options.output, &text)?;

    log::info!(
        "Generated {}: {emitted} statements, {} rows skipped",
        options.output.display(),
        processed - emitted
    );

    Ok(GenerateSummary { processed, emitted })
}

/// File name shown in the script header.
fn source_label(input: &Path) -> String {
    input.file_name().map_or_else(
        || input.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn write_script(path: &Path, text: &str) -> Result<(), GenerateError> {
    let io_err = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::statement::LocationStyle;

    const CSV: &str = "\
dogrun_name,lon,lat,borough,zipcode,surface,seating,g_place_id,g_hours,g_rating,g_reviews,g_phone,g_website
Tompkins Square Dog Run,-73.98,40.73,M,,,,,,,,,
Nowhere Run,,,Q,11101,,,,,,,,
Hudson River Park Dog Run,-74.01,40.72,M,10014,Asphalt,Yes,p2,\"Monday: 6:00 AM – 9:00 PM\",4.6,120,,
";

    fn options_in(dir: &Path) -> GenerateOptions {
        let input = dir.join("dog_runs_enriched.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        GenerateOptions {
            input,
            output: dir.join("out/import.sql"),
            statement: StatementOptions::default(),
        }
    }

    #[test]
    fn writes_script_and_counts_processed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());

        let summary = run(&options).unwrap();
        assert_eq!(
            summary,
            GenerateSummary {
                processed: 3,
                emitted: 2
            }
        );

        let sql = std::fs::read_to_string(&options.output).unwrap();
        assert!(sql.starts_with("-- NYC Dog Runs Import\n-- Generated from dog_runs_enriched.csv\n\n"));
        assert_eq!(sql.matches("INSERT INTO dog_parks (").count(), 2);
        assert!(!sql.contains("Nowhere Run"));
        assert!(sql.contains("    '06:00:00',\n    '21:00:00',\n"));
        assert!(sql.contains("    '{\"Asphalt surface\",\"Seating available\",\"Highly rated\"}',\n"));
    }

    #[test]
    fn postgis_style_and_custom_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        options.statement = StatementOptions {
            table: "public.parks".to_string(),
            location_style: LocationStyle::Postgis,
        };

        run(&options).unwrap();
        let sql = std::fs::read_to_string(&options.output).unwrap();
        assert!(sql.contains("INSERT INTO public.parks ("));
        assert!(sql.contains("ST_MakePoint(-73.98, 40.73)::geography"));
    }

    #[test]
    fn rejects_injected_table_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        options.statement.table = "parks; DROP TABLE users".to_string();

        assert!(matches!(run(&options), Err(GenerateError::InvalidTable(_))));
        assert!(!options.output.exists());
    }

    #[test]
    fn missing_input_is_a_table_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = GenerateOptions {
            input: dir.path().join("absent.csv"),
            output: dir.path().join("out.sql"),
            statement: StatementOptions::default(),
        };
        assert!(matches!(run(&options), Err(GenerateError::Table(_))));
    }

    #[test]
    fn unwritable_output_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        options.output = blocker.join("import.sql");

        let err = run(&options).unwrap_err();
        let GenerateError::Io { path, .. } = &err else {
            panic!("expected an I/O error, got {err:?}");
        };
        assert_eq!(path, &options.output);
        assert!(err.to_string().starts_with(&format!(
            "Failed to write {}:",
            options.output.display()
        )));
    }
}
