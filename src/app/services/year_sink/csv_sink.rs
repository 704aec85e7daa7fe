//! CSV year sink
//!
//! CSV needs no envelope, so the artifact is written in place: the header
//! goes out when the sink is created and every row is appended as it
//! arrives. Finalizing only flushes and closes.

use csv::{QuoteStyle, StringRecord, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{YearSink, artifact_path, remove_if_exists};
use crate::app::models::SourceFormat;
use crate::{Error, Result};

/// Sink for one year of one CSV input
#[derive(Debug)]
pub struct CsvYearSink {
    year: i32,
    count: usize,
    path: PathBuf,
    writer: Writer<File>,
}

impl CsvYearSink {
    /// Create the artifact and write the source header
    pub fn create(output_dir: &Path, stem: &str, year: i32, header: &StringRecord) -> Result<Self> {
        let path = artifact_path(output_dir, stem, year, SourceFormat::Csv);

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| {
                Error::csv_parsing(
                    path.display().to_string(),
                    "Failed to create output file",
                    Some(e),
                )
            })?;

        writer.write_record(header).map_err(|e| {
            Error::csv_parsing(path.display().to_string(), "Failed to write header", Some(e))
        })?;

        debug!("Opened CSV output {}", path.display());

        Ok(Self {
            year,
            count: 0,
            path,
            writer,
        })
    }

    /// Path of the artifact being written
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl YearSink for CsvYearSink {
    type Record = StringRecord;

    fn year(&self) -> i32 {
        self.year
    }

    fn count(&self) -> usize {
        self.count
    }

    fn write(&mut self, record: &StringRecord) -> Result<()> {
        self.writer.write_record(record).map_err(|e| {
            Error::csv_parsing(self.path.display().to_string(), "Failed to write row", Some(e))
        })?;
        self.count += 1;
        Ok(())
    }

    fn finalize(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .map_err(|e| Error::io(format!("Failed to flush {}", self.path.display()), e))?;
        Ok(self.path)
    }

    fn discard(self) -> Result<()> {
        let path = self.path.clone();
        drop(self.writer);
        remove_if_exists(&path)
    }
}
