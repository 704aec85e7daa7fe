//! Streaming year partitioner
//!
//! Reads one input file in a single linear pass and fans its records out to
//! one output artifact per inferred calendar year.
//!
//! ## Architecture
//!
//! - [`session`] - per-file state: open year sinks and record counters
//! - [`json_stream`] - element-by-element visitor over the `jobs` array
//!
//! ## Failure policy
//!
//! - no date field/column: the whole file is abandoned
//!   ([`Error::DateFieldNotFound`]), even if earlier JSON records were routed
//! - unparseable date: only that record is skipped
//! - CSV row too short to hold the date column: skipped silently
//! - I/O or structural failure: the file is abandoned, open sinks are closed
//!   without being finalized
//!
//! [`StreamingPartitioner::run_file`] converts every failure into a
//! [`FileReport`] so that a batch can continue with the next file.

pub mod json_stream;
pub mod session;

#[cfg(test)]
pub mod tests;

pub use session::{PartitionSession, SessionOutput};

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::app::models::{FileReport, SourceFormat};
use crate::app::services::date_parser::DateParser;
use crate::app::services::field_locator::{locate_csv_column, locate_json_field};
use crate::app::services::year_sink::{CsvYearSink, JsonYearSink};
use crate::config::PartitionConfig;
use crate::{Error, Result};

/// Partitions single input files by inferred year
#[derive(Debug, Clone)]
pub struct StreamingPartitioner {
    config: PartitionConfig,
    parser: DateParser,
}

impl StreamingPartitioner {
    /// Create a partitioner for the given configuration
    pub fn new(config: PartitionConfig) -> Self {
        Self {
            config,
            parser: DateParser::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Partition one file, never failing: errors become skipped/failed reports
    pub fn run_file(&self, path: &Path) -> FileReport {
        let format = SourceFormat::from_path(path);

        match self.partition_file(path) {
            Ok(report) => report,
            Err(e @ Error::UnsupportedFormat { .. }) => {
                warn!("Unsupported file format: {}", path.display());
                FileReport::skipped(path, format, e.to_string())
            }
            Err(e @ Error::DateFieldNotFound { .. }) => {
                warn!(
                    "Unable to find a date column in {} file {}",
                    format.map(|f| f.to_string()).unwrap_or_default(),
                    path.display()
                );
                FileReport::skipped(path, format, e.to_string())
            }
            Err(e) => {
                warn!("Error while processing {}: {}", path.display(), e);
                FileReport::failed(path, format, e.to_string())
            }
        }
    }

    /// Partition one file, dispatching on its extension
    pub fn partition_file(&self, path: &Path) -> Result<FileReport> {
        match SourceFormat::from_path(path) {
            Some(SourceFormat::Json) => self.partition_json(path),
            Some(SourceFormat::Csv) => self.partition_csv(path),
            None => Err(Error::unsupported_format(
                path.display().to_string(),
                path.extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )),
        }
    }

    /// Partition a `{"jobs": [...]}` document
    pub fn partition_json(&self, path: &Path) -> Result<FileReport> {
        let label = path.display().to_string();
        let stem = self.prepare_output(path)?;
        let candidates = self.config.json_candidates();

        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", label), e))?;

        let mut session = PartitionSession::<JsonYearSink>::new(self.config.output_dir(), stem);

        let streamed = json_stream::for_each_job(BufReader::new(file), &label, |job| {
            session.stats_mut().records_seen += 1;

            let field = locate_json_field(&job, &candidates)
                .ok_or_else(|| Error::date_field_not_found(label.as_str(), &candidates))?;
            session
                .stats_mut()
                .date_field
                .get_or_insert_with(|| field.to_string());

            match self.parser.parse_value(&job[field]) {
                Some(parsed) => session.route(parsed.year, &job, JsonYearSink::create),
                None => {
                    session.stats_mut().unparseable_dates += 1;
                    Ok(())
                }
            }
        });

        match streamed {
            Ok(visited) => {
                debug!("Streamed {} records from {}", visited, label);
                let output = session.finish()?;
                Ok(FileReport::partitioned(
                    path,
                    SourceFormat::Json,
                    output.counts,
                    output.artifacts,
                    output.stats,
                ))
            }
            Err(e) => {
                session.abandon(self.config.discard_partial_on_abort);
                Err(e)
            }
        }
    }

    /// Partition a comma-separated table whose first row is the header
    pub fn partition_csv(&self, path: &Path) -> Result<FileReport> {
        let label = path.display().to_string();
        let stem = self.prepare_output(path)?;
        let candidates = self.config.csv_candidates();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv_parsing(label.as_str(), "Failed to open file", Some(e)))?;
        let mut rows = reader.byte_records();

        let header = match rows.next() {
            Some(row) => StringRecord::from_byte_record_lossy(row.map_err(|e| {
                Error::csv_parsing(label.as_str(), "Failed to read header", Some(e))
            })?),
            None => return Err(Error::missing_header(label)),
        };

        let column = locate_csv_column(&header, &candidates)
            .ok_or_else(|| Error::date_field_not_found(label.as_str(), &candidates))?;
        info!("Using column '{}' for date information", column.name);

        let mut session = PartitionSession::<CsvYearSink>::new(self.config.output_dir(), stem);
        session.stats_mut().date_field = Some(column.name.clone());

        let streamed: Result<()> = rows.try_for_each(|row| {
            let row = StringRecord::from_byte_record_lossy(
                row.map_err(|e| Error::csv_parsing(label.as_str(), "Failed to read row", Some(e)))?,
            );
            session.stats_mut().records_seen += 1;

            let Some(cell) = row.get(column.index) else {
                debug!("Skipping short row {:?}", row.position());
                session.stats_mut().malformed_rows += 1;
                return Ok(());
            };

            match self.parser.parse(cell) {
                Some(parsed) => session.route(parsed.year, &row, |dir, stem, year| {
                    CsvYearSink::create(dir, stem, year, &header)
                }),
                None => {
                    session.stats_mut().unparseable_dates += 1;
                    Ok(())
                }
            }
        });

        match streamed {
            Ok(()) => {
                let output = session.finish()?;
                Ok(FileReport::partitioned(
                    path,
                    SourceFormat::Csv,
                    output.counts,
                    output.artifacts,
                    output.stats,
                ))
            }
            Err(e) => {
                session.abandon(self.config.discard_partial_on_abort);
                Err(e)
            }
        }
    }

    /// Create the output directory and derive the artifact stem
    fn prepare_output(&self, path: &Path) -> Result<String> {
        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(output_dir).map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", output_dir.display()),
                e,
            )
        })?;

        Ok(file_stem(path))
    }
}

/// File name without its final extension (`/in/jobs.2020.json` -> `jobs.2020`)
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string())
}
