//! JSON year sink
//!
//! Records are streamed into a staging file as the body of a JSON array with
//! manual comma bookkeeping, so no year ever holds its records in memory
//! while the input is being read. Finalizing closes the fragment, re-reads
//! it as a document, attaches `nb_jobs` and `year`, writes the pretty-printed
//! artifact and deletes the staging file.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{YearSink, artifact_path, remove_if_exists, staging_path};
use crate::app::models::SourceFormat;
use crate::constants::{JOBS_KEY, JSON_INDENT, NB_JOBS_KEY, YEAR_KEY};
use crate::{Error, Result};

const FRAGMENT_OPEN: &[u8] = b"{\"jobs\": [";
const FRAGMENT_CLOSE: &[u8] = b"]}";

/// Sink for one year of one JSON input
#[derive(Debug)]
pub struct JsonYearSink {
    year: i32,
    count: usize,
    staging_path: PathBuf,
    final_path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonYearSink {
    /// Open the staging file and write the opening of the fragment
    pub fn create(output_dir: &Path, stem: &str, year: i32) -> Result<Self> {
        let staging_path = staging_path(output_dir, stem, year);
        let final_path = artifact_path(output_dir, stem, year, SourceFormat::Json);

        let file = File::create(&staging_path).map_err(|e| {
            Error::io(
                format!("Failed to create staging file {}", staging_path.display()),
                e,
            )
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(FRAGMENT_OPEN)?;

        debug!("Opened JSON staging file {}", staging_path.display());

        Ok(Self {
            year,
            count: 0,
            staging_path,
            final_path,
            writer,
        })
    }

    /// Path of the staging fragment
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// Path the finalized artifact will have
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    fn close_fragment(mut self) -> Result<(PathBuf, PathBuf, usize)> {
        self.writer.write_all(FRAGMENT_CLOSE)?;
        self.writer.flush().map_err(|e| {
            Error::io(
                format!("Failed to flush staging file {}", self.staging_path.display()),
                e,
            )
        })?;
        Ok((self.staging_path, self.final_path, self.count))
    }
}

impl YearSink for JsonYearSink {
    type Record = Map<String, Value>;

    fn year(&self) -> i32 {
        self.year
    }

    fn count(&self) -> usize {
        self.count
    }

    fn write(&mut self, record: &Map<String, Value>) -> Result<()> {
        if self.count > 0 {
            self.writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.writer, record).map_err(|e| {
            Error::json_parsing(
                self.staging_path.display().to_string(),
                "Failed to write record to staging file",
                e,
            )
        })?;
        self.count += 1;
        Ok(())
    }

    fn finalize(self) -> Result<PathBuf> {
        let year = self.year;
        let (staging_path, final_path, written) = self.close_fragment()?;

        let staged = File::open(&staging_path).map_err(|e| {
            Error::io(
                format!("Failed to reopen staging file {}", staging_path.display()),
                e,
            )
        })?;
        let mut document: Map<String, Value> = serde_json::from_reader(BufReader::new(staged))
            .map_err(|e| {
                Error::json_parsing(
                    staging_path.display().to_string(),
                    "Staging file is not a valid JSON document",
                    e,
                )
            })?;

        let nb_jobs = document
            .get(JOBS_KEY)
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        if nb_jobs != written {
            warn!(
                "Staging file {} holds {} records but {} were written",
                staging_path.display(),
                nb_jobs,
                written
            );
        }

        document.insert(NB_JOBS_KEY.to_string(), Value::from(nb_jobs));
        document.insert(YEAR_KEY.to_string(), Value::from(year));

        write_pretty(&final_path, &document)?;
        remove_if_exists(&staging_path)?;

        Ok(final_path)
    }

    fn discard(self) -> Result<()> {
        let staging_path = self.staging_path.clone();
        drop(self.writer);
        remove_if_exists(&staging_path)
    }
}

/// Write a document with four-space indentation
fn write_pretty(path: &Path, document: &Map<String, Value>) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    document.serialize(&mut serializer).map_err(|e| {
        Error::json_parsing(path.display().to_string(), "Failed to write artifact", e)
    })?;

    writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_finalize_writes_annotated_document() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = JsonYearSink::create(temp_dir.path(), "jobs", 2020).unwrap();
        let staging = sink.staging_path().to_path_buf();

        sink.write(&record(json!({"date": "2020-05-01", "id": 1}))).unwrap();
        sink.write(&record(json!({"date": "2020-07-03", "id": 3}))).unwrap();
        assert_eq!(sink.count(), 2);

        let path = sink.finalize().unwrap();
        assert_eq!(path, temp_dir.path().join("jobs_2020.json"));
        assert!(!staging.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        let document: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(document["nb_jobs"], 2);
        assert_eq!(document["year"], 2020);
        assert_eq!(document["jobs"][0]["id"], 1);
        assert_eq!(document["jobs"][1]["id"], 3);

        let keys: Vec<&String> = document.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["jobs", "nb_jobs", "year"]);
        assert!(content.contains("\n    \"jobs\": ["));
    }

    #[test]
    fn test_record_key_order_and_unicode_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = JsonYearSink::create(temp_dir.path(), "offres", 2021).unwrap();

        sink.write(&record(json!({"title": "Développeur", "posted": "2021", "a": 1})))
            .unwrap();
        let path = sink.finalize().unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Développeur"));
        let title = content.find("\"title\"").unwrap();
        let posted = content.find("\"posted\"").unwrap();
        let a = content.find("\"a\"").unwrap();
        assert!(title < posted && posted < a);
    }

    #[test]
    fn test_number_text_is_copied_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = JsonYearSink::create(temp_dir.path(), "jobs", 2020).unwrap();
        let job: Map<String, Value> = serde_json::from_str(
            r#"{"date":"2020-05-01","ref":123456789012345678901234567890,"salary":1.50,"ratio":1e2}"#,
        )
        .unwrap();

        sink.write(&job).unwrap();
        let path = sink.finalize().unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"ref\": 123456789012345678901234567890"));
        assert!(content.contains("\"salary\": 1.50"));
        assert!(content.contains("\"ratio\": 1e2"));
    }

    #[test]
    fn test_discard_removes_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = JsonYearSink::create(temp_dir.path(), "jobs", 2019).unwrap();
        sink.write(&record(json!({"date": "2019"}))).unwrap();
        let staging = sink.staging_path().to_path_buf();
        assert!(staging.exists());

        sink.discard().unwrap();
        assert!(!staging.exists());
        assert!(!temp_dir.path().join("jobs_2019.json").exists());
    }

    #[test]
    fn test_dropped_sink_leaves_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = JsonYearSink::create(temp_dir.path(), "jobs", 2018).unwrap();
        sink.write(&record(json!({"date": "2018"}))).unwrap();
        let staging = sink.staging_path().to_path_buf();

        drop(sink);

        let content = std::fs::read_to_string(&staging).unwrap();
        assert!(content.starts_with("{\"jobs\": ["));
        assert!(!temp_dir.path().join("jobs_2018.json").exists());
    }
}
