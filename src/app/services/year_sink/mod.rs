//! Per-year output sinks
//!
//! A sink owns the single open output resource of one calendar year for one
//! input file. It is created lazily on the first record of its year, appended
//! to for the rest of the stream, and finalized exactly once afterwards.
//!
//! - [`json_sink`] - stages a JSON array fragment, then rewrites it as the
//!   annotated `{jobs, nb_jobs, year}` document
//! - [`csv_sink`] - writes the header eagerly and appends rows directly
//!
//! Dropping a sink without finalizing closes its file handle; whatever was
//! written so far stays on disk unless [`YearSink::discard`] is called.

pub mod csv_sink;
pub mod json_sink;

pub use csv_sink::CsvYearSink;
pub use json_sink::JsonYearSink;

use std::path::{Path, PathBuf};

use crate::Result;
use crate::app::models::SourceFormat;
use crate::constants::{JSON_EXTENSION, STAGING_SUFFIX};

/// Common contract of the JSON and CSV sinks
pub trait YearSink: Sized {
    /// Record type accepted by this sink
    type Record: ?Sized;

    /// Calendar year owned by this sink
    fn year(&self) -> i32;

    /// Records written so far
    fn count(&self) -> usize;

    /// Append one record
    fn write(&mut self, record: &Self::Record) -> Result<()>;

    /// Close the resource and produce the final artifact, returning its path
    fn finalize(self) -> Result<PathBuf>;

    /// Close the resource and remove everything written by this sink
    fn discard(self) -> Result<()>;
}

/// `<output_dir>/<stem>_<year>.<ext>`
pub fn artifact_path(output_dir: &Path, stem: &str, year: i32, format: SourceFormat) -> PathBuf {
    output_dir.join(format!("{}_{}.{}", stem, year, format.extension()))
}

/// `<output_dir>/<stem>_<year>_temp.json`
pub fn staging_path(output_dir: &Path, stem: &str, year: i32) -> PathBuf {
    output_dir.join(format!(
        "{}_{}{}.{}",
        stem, year, STAGING_SUFFIX, JSON_EXTENSION
    ))
}

/// Remove a file, treating "already gone" as success
pub(crate) fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(crate::Error::io(
            format!("Failed to remove {}", path.display()),
            e,
        )),
    }
}
