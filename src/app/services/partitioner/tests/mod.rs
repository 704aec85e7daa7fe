//! Test utilities for the streaming partitioner
//!
//! Provides scratch directories with input/output layout and helpers for
//! reading artifacts back.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::PartitionConfig;
use crate::app::services::partitioner::StreamingPartitioner;


/// Scratch workspace with an `in/` and an `out/` directory
pub struct Workspace {
    pub temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("in")).unwrap();
        Self { temp_dir }
    }

    pub fn input(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("in").join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn input_bytes(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join("in").join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.output_dir().join(name)
    }

    pub fn partitioner(&self) -> StreamingPartitioner {
        StreamingPartitioner::new(PartitionConfig::new(self.output_dir()))
    }

    /// Sorted file names present in the output directory
    pub fn output_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.output_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

/// Read a JSON artifact
pub fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Read a CSV artifact as raw rows, header included
pub fn read_csv_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
        .collect()
}
