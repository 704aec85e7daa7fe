//! Year Splitter Library
//!
//! A Rust library for partitioning large job-listing files (a single JSON
//! document or a CSV table) into one output file per calendar year.
//!
//! This library provides tools for:
//! - Inferring a calendar year from inconsistent, locale-mixed date strings
//! - Discovering which field or column carries the date of each record
//! - Streaming records in a single pass with constant memory per input file
//! - Writing one well-formed JSON or CSV artifact per (input file, year) pair
//! - Batch processing of whole directories with per-file error isolation

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_runner;
        pub mod date_parser;
        pub mod field_locator;
        pub mod partitioner;
        pub mod year_sink;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BatchReport, FileOutcome, FileReport, ParsedDate, SourceFormat, YearCounts};
pub use app::services::date_parser::DateParser;
pub use config::PartitionConfig;

/// Result type alias for the year splitter
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for partitioning operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// JSON reading or writing error
    #[error("JSON parsing error in file '{file}': {message}")]
    JsonParsing {
        file: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// No candidate date field or column was found
    #[error("No date field found in file '{file}' (candidates: {candidates})")]
    DateFieldNotFound { file: String, candidates: String },

    /// CSV input without a header row
    #[error("Missing header row in CSV file '{file}'")]
    MissingHeader { file: String },

    /// Outer document shape is not what the partitioner expects
    #[error("Invalid structure in file '{file}': {message}")]
    InvalidStructure { file: String, message: String },

    /// Input file extension is neither JSON nor CSV
    #[error("Unsupported file format '{extension}': {path}")]
    UnsupportedFormat { path: String, extension: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Blocking worker task failed to complete
    #[error("Background task failed: {message}")]
    BackgroundTask { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a JSON parsing error with context
    pub fn json_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a date field not found error
    pub fn date_field_not_found(file: impl Into<String>, candidates: &[String]) -> Self {
        Self::DateFieldNotFound {
            file: file.into(),
            candidates: candidates.join(", "),
        }
    }

    /// Create a missing header error
    pub fn missing_header(file: impl Into<String>) -> Self {
        Self::MissingHeader { file: file.into() }
    }

    /// Create an invalid structure error
    pub fn invalid_structure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            extension: extension.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a background task error
    pub fn background_task(message: impl Into<String>) -> Self {
        Self::BackgroundTask {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonParsing {
            file: "unknown".to_string(),
            message: "JSON parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
