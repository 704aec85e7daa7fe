//! Command-line argument definitions for the year splitter
//!
//! Every path and the candidate list fall back to environment variables,
//! which may themselves come from a `.env` file loaded at start-up.

use crate::config::{PartitionConfig, parse_candidate_list};
use crate::constants::{ENV_DATE_COLUMN_NAME, ENV_INPUT_PATH, ENV_OUTPUT_PATH};
use crate::{Error, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the year splitter
///
/// Splits large job-listing files (JSON `{"jobs": [...]}` documents or CSV
/// tables) into one output file per calendar year, inferring each record's
/// year from its date field.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "year-splitter",
    version,
    about = "Partition JSON and CSV job-listing files into one file per calendar year",
    long_about = "Streams a job-listing file, or every JSON/CSV file directly inside a \
                  directory, and writes each record to <stem>_<year>.json or \
                  <stem>_<year>.csv in the output directory. The year is inferred from \
                  the first date-bearing field of each record, accepting ISO dates, \
                  bare years, month names and slash or dash separated layouts."
)]
pub struct Args {
    /// Input file or directory
    ///
    /// A directory is listed non-recursively; only files ending in .json or
    /// .csv (any case) are processed, in file-name order.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        env = ENV_INPUT_PATH,
        help = "Input file or directory"
    )]
    pub input_path: PathBuf,

    /// Output directory for per-year files
    ///
    /// Created if it doesn't exist.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        env = ENV_OUTPUT_PATH,
        help = "Output directory for per-year files"
    )]
    pub output_path: PathBuf,

    /// Candidate date field names (comma-separated, in priority order)
    ///
    /// Replaces the built-in lists for both formats. JSON keys must match
    /// exactly; CSV header columns match case-insensitively by substring.
    #[arg(
        short = 'd',
        long = "date-column-name",
        value_name = "LIST",
        env = ENV_DATE_COLUMN_NAME,
        help = "Comma-separated candidate date field names"
    )]
    pub date_column_name: Option<String>,

    /// Remove partial outputs of files that abort mid-stream
    ///
    /// By default staging and partially written files are left in the
    /// output directory for inspection.
    #[arg(
        long = "discard-partial",
        help = "Remove partial outputs of files that abort mid-stream"
    )]
    pub discard_partial: bool,

    /// Perform a dry run without actual processing
    ///
    /// Lists the files that would be partitioned without creating any output.
    #[arg(
        long = "dry-run",
        help = "Show what would be processed without creating output files"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Hides the progress bar.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if progress bars should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::file_not_found(self.input_path.display().to_string()));
        }

        if let Some(raw) = &self.date_column_name {
            parse_candidate_list(raw)?;
        }

        Ok(())
    }

    /// Build the partitioning configuration
    pub fn to_config(&self) -> Result<PartitionConfig> {
        let mut config = PartitionConfig::new(&self.output_path)
            .with_discard_partial(self.discard_partial);

        if let Some(raw) = &self.date_column_name {
            config = config.with_date_candidates(parse_candidate_list(raw)?);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("year-splitter").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_minimal_arguments() {
        let args = parse(&["-i", "in", "-o", "out"]).unwrap();

        assert_eq!(args.input_path, PathBuf::from("in"));
        assert_eq!(args.output_path, PathBuf::from("out"));
        assert_eq!(args.output_format, OutputFormat::Human);
        assert!(!args.dry_run);
        assert!(!args.discard_partial);
        assert_eq!(args.get_log_level(), "warn");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(parse(&["-i", "in", "-o", "out", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_levels() {
        let args = parse(&["-i", "in", "-o", "out", "-vv"]).unwrap();
        assert_eq!(args.get_log_level(), "debug");

        let args = parse(&["-i", "in", "-o", "out", "--quiet"]).unwrap();
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_to_config_with_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");
        let args = parse(&[
            "-i",
            "in",
            "-o",
            out.to_str().unwrap(),
            "-d",
            " published_at, ,date ",
            "--discard-partial",
        ])
        .unwrap();

        let config = args.to_config().unwrap();

        assert_eq!(config.output_dir(), out.as_path());
        assert_eq!(config.json_candidates(), vec!["published_at", "date"]);
        assert_eq!(config.csv_candidates(), vec!["published_at", "date"]);
        assert!(config.discard_partial_on_abort);
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let args = parse(&["-i", missing.to_str().unwrap(), "-o", "out"]).unwrap();

        assert!(matches!(args.validate(), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_rejects_blank_candidate_list() {
        let temp_dir = TempDir::new().unwrap();
        let args = parse(&[
            "-i",
            temp_dir.path().to_str().unwrap(),
            "-o",
            "out",
            "-d",
            " , ",
        ])
        .unwrap();

        assert!(matches!(args.validate(), Err(Error::Configuration { .. })));
    }
}
