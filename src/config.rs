//! Configuration management and validation.
//!
//! Provides the configuration consumed by the partitioning core: where
//! artifacts are written, which field names are considered date-bearing,
//! and how aborted files are cleaned up.

use crate::constants::{DEFAULT_CSV_DATE_CANDIDATES, DEFAULT_JSON_DATE_CANDIDATES};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for partitioning input files by year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Directory receiving `<stem>_<year>.json` / `<stem>_<year>.csv` artifacts
    pub output_dir: PathBuf,

    /// Custom ordered candidate list; replaces both JSON and CSV defaults when set
    pub date_candidates: Option<Vec<String>>,

    /// Remove staging and partial artifacts when a file aborts mid-stream
    pub discard_partial_on_abort: bool,
}

impl PartitionConfig {
    /// Create configuration writing into `output_dir` with default candidates
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            date_candidates: None,
            discard_partial_on_abort: false,
        }
    }

    /// Override the candidate list for both JSON keys and CSV columns
    pub fn with_date_candidates(mut self, candidates: Vec<String>) -> Self {
        self.date_candidates = Some(candidates);
        self
    }

    /// Remove staging and partial artifacts of aborted files
    pub fn with_discard_partial(mut self, discard: bool) -> Self {
        self.discard_partial_on_abort = discard;
        self
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Candidate keys used to locate the date field of JSON records
    pub fn json_candidates(&self) -> Vec<String> {
        self.candidates_or(DEFAULT_JSON_DATE_CANDIDATES)
    }

    /// Candidate substrings used to locate the date column of CSV headers
    pub fn csv_candidates(&self) -> Vec<String> {
        self.candidates_or(DEFAULT_CSV_DATE_CANDIDATES)
    }

    fn candidates_or(&self, defaults: &[&str]) -> Vec<String> {
        match &self.date_candidates {
            Some(custom) => custom.clone(),
            None => defaults.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::configuration("Output directory cannot be empty"));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(Error::configuration(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            )));
        }

        if let Some(candidates) = &self.date_candidates {
            if candidates.is_empty() {
                return Err(Error::configuration(
                    "Date candidate list cannot be empty",
                ));
            }
        }

        debug!("Partition configuration validated: {:?}", self);
        Ok(())
    }
}

/// Parse a comma-separated candidate list such as `"posted,created"`
///
/// Entries are trimmed and empty entries dropped; order is preserved.
pub fn parse_candidate_list(raw: &str) -> Result<Vec<String>> {
    let candidates: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if candidates.is_empty() {
        return Err(Error::configuration(format!(
            "Date candidate list '{}' contains no names",
            raw
        )));
    }

    Ok(candidates)
}
