//! Data models for year partitioning
//!
//! This module contains the core data structures shared by the partitioning
//! services: input format detection, parsed dates, per-year counts and the
//! per-file and per-batch reports handed back to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{CSV_EXTENSION, JSON_EXTENSION};

/// Number of records written per calendar year for one input file
pub type YearCounts = BTreeMap<i32, usize>;

/// Input formats understood by the partitioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Detect the format from a file extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            JSON_EXTENSION => Some(SourceFormat::Json),
            CSV_EXTENSION => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    /// Extension used for artifacts of this format
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Json => JSON_EXTENSION,
            SourceFormat::Csv => CSV_EXTENSION,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Date format strategies, listed in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateStrategy {
    /// `2004`
    BareYear,
    /// `2020-05-01T10:00:00Z`
    Iso8601,
    /// `2020-05-01`
    IsoDate,
    /// `Jan 5, 2004`
    AbbreviatedMonthComma,
    /// `January 5, 2004`
    FullMonthComma,
    /// `Jan 5 2004`
    AbbreviatedMonth,
    /// `January 5 2004`
    FullMonth,
    /// `01/15/2005`
    UsSlash,
    /// `15/01/2005`
    EuropeanSlash,
    /// `15-01-2005`
    DayMonthYearDash,
}

impl DateStrategy {
    /// Short name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DateStrategy::BareYear => "bare-year",
            DateStrategy::Iso8601 => "iso-8601",
            DateStrategy::IsoDate => "iso-date",
            DateStrategy::AbbreviatedMonthComma => "mon-d-comma-yyyy",
            DateStrategy::FullMonthComma => "month-d-comma-yyyy",
            DateStrategy::AbbreviatedMonth => "mon-d-yyyy",
            DateStrategy::FullMonth => "month-d-yyyy",
            DateStrategy::UsSlash => "mm/dd/yyyy",
            DateStrategy::EuropeanSlash => "dd/mm/yyyy",
            DateStrategy::DayMonthYearDash => "dd-mm-yyyy",
        }
    }
}

/// A successfully parsed date
///
/// `year` always equals `date.year()`; bare years resolve to January 1st.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub year: i32,
    pub date: NaiveDate,
    pub strategy: DateStrategy,
}

/// Record-level counters collected while streaming one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Records (JSON elements or CSV data rows) read from the input
    pub records_seen: usize,
    /// Records written to a year artifact
    pub records_routed: usize,
    /// Records skipped because no strategy could parse their date
    pub unparseable_dates: usize,
    /// CSV rows too short to contain the date column
    pub malformed_rows: usize,
    /// Date field (JSON, first record located) or column (CSV) used for inference
    pub date_field: Option<String>,
}

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Stream fully consumed and every year artifact finalized
    Partitioned {
        counts: YearCounts,
        artifacts: Vec<PathBuf>,
        stats: FileStats,
    },
    /// File intentionally not processed (unsupported extension, no date field)
    Skipped { reason: String },
    /// File aborted by an I/O or structural failure
    Failed { reason: String },
}

/// Report for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub format: Option<SourceFormat>,
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Report for a file that was partitioned to completion
    pub fn partitioned(
        path: impl Into<PathBuf>,
        format: SourceFormat,
        counts: YearCounts,
        artifacts: Vec<PathBuf>,
        stats: FileStats,
    ) -> Self {
        Self {
            path: path.into(),
            format: Some(format),
            outcome: FileOutcome::Partitioned {
                counts,
                artifacts,
                stats,
            },
        }
    }

    /// Report for a file that was skipped
    pub fn skipped(
        path: impl Into<PathBuf>,
        format: Option<SourceFormat>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            format,
            outcome: FileOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    /// Report for a file that failed mid-processing
    pub fn failed(
        path: impl Into<PathBuf>,
        format: Option<SourceFormat>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            format,
            outcome: FileOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Per-year counts; empty unless the file was partitioned
    pub fn year_counts(&self) -> YearCounts {
        match &self.outcome {
            FileOutcome::Partitioned { counts, .. } => counts.clone(),
            _ => YearCounts::new(),
        }
    }

    /// File name used in summaries
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Aggregated result of a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub processing_time_ms: u128,
}

impl BatchReport {
    /// Files that produced at least one year artifact, in processing order
    pub fn summary_entries(&self) -> impl Iterator<Item = (&FileReport, YearCounts)> {
        self.files
            .iter()
            .map(|report| (report, report.year_counts()))
            .filter(|(_, counts)| !counts.is_empty())
    }

    /// Number of files partitioned to completion
    pub fn files_partitioned(&self) -> usize {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Partitioned { .. }))
            .count()
    }

    /// Number of files skipped
    pub fn files_skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Skipped { .. }))
            .count()
    }

    /// Number of files that failed
    pub fn files_failed(&self) -> usize {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Failed { .. }))
            .count()
    }

    /// Total records written across all files and years
    pub fn total_records(&self) -> usize {
        self.files
            .iter()
            .flat_map(|r| r.year_counts().into_values())
            .sum()
    }
}
