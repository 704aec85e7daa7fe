//! Per-file partition session
//!
//! Holds everything that accumulates while one input file streams through:
//! the open sink of every year seen so far and the record counters. A
//! session lives exactly as long as its file; it is either finished (all
//! sinks finalized) or abandoned (all sinks closed as they are).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::Result;
use crate::app::models::{FileStats, YearCounts};
use crate::app::services::year_sink::YearSink;

/// Finalized output of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutput {
    pub counts: YearCounts,
    pub artifacts: Vec<PathBuf>,
    pub stats: FileStats,
}

/// Open sinks and counters for one input file
#[derive(Debug)]
pub struct PartitionSession<S: YearSink> {
    output_dir: PathBuf,
    stem: String,
    sinks: BTreeMap<i32, S>,
    stats: FileStats,
}

impl<S: YearSink> PartitionSession<S> {
    /// Start a session writing `<stem>_<year>` artifacts into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: stem.into(),
            sinks: BTreeMap::new(),
            stats: FileStats::default(),
        }
    }

    /// Mutable record counters
    pub fn stats_mut(&mut self) -> &mut FileStats {
        &mut self.stats
    }

    /// Years with an open sink, ascending
    pub fn open_years(&self) -> Vec<i32> {
        self.sinks.keys().copied().collect()
    }

    /// Write a record to the sink of `year`, opening it with `open` on first use
    pub fn route<F>(&mut self, year: i32, record: &S::Record, open: F) -> Result<()>
    where
        F: FnOnce(&Path, &str, i32) -> Result<S>,
    {
        let sink = match self.sinks.entry(year) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("Opening sink for year {} of {}", year, self.stem);
                entry.insert(open(&self.output_dir, &self.stem, year)?)
            }
        };

        sink.write(record)?;
        self.stats.records_routed += 1;
        Ok(())
    }

    /// Finalize every sink in year order and collect counts and artifact paths
    pub fn finish(self) -> Result<SessionOutput> {
        let mut counts = YearCounts::new();
        let mut artifacts = Vec::with_capacity(self.sinks.len());

        for (year, sink) in self.sinks {
            let count = sink.count();
            let path = sink.finalize()?;
            info!("Saved {} records of {} to {}", count, year, path.display());

            counts.insert(year, count);
            artifacts.push(path);
        }

        Ok(SessionOutput {
            counts,
            artifacts,
            stats: self.stats,
        })
    }

    /// Close every sink without finalizing.
    ///
    /// With `discard` the partial artifacts are also removed; otherwise they
    /// stay on disk (JSON staging fragments, truncated CSV files).
    pub fn abandon(self, discard: bool) {
        if self.sinks.is_empty() {
            return;
        }

        if discard {
            debug!(
                "Discarding {} partial outputs of {}",
                self.sinks.len(),
                self.stem
            );
            for (year, sink) in self.sinks {
                if let Err(e) = sink.discard() {
                    warn!("Failed to discard partial output for {}: {}", year, e);
                }
            }
        } else {
            warn!(
                "Closing {} unfinished outputs of {}; partial files remain in {}",
                self.sinks.len(),
                self.stem,
                self.output_dir.display()
            );
        }
    }
}
