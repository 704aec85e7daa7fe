//! Application constants for the year splitter
//!
//! This module contains all default values, naming conventions and
//! environment variable names used throughout the application.

// =============================================================================
// Date Field Discovery
// =============================================================================

/// Default candidate keys for JSON records, scanned in order
pub const DEFAULT_JSON_DATE_CANDIDATES: &[&str] = &["year", "date", "created", "posted", "publish"];

/// Default candidate substrings for CSV header columns, scanned in order
pub const DEFAULT_CSV_DATE_CANDIDATES: &[&str] = &["date", "created", "posted", "publish"];

// =============================================================================
// Date Parsing
// =============================================================================

/// Lowest year accepted for a bare four-digit year
pub const BARE_YEAR_MIN: i32 = 1900;

/// Highest year accepted for a bare four-digit year
pub const BARE_YEAR_MAX: i32 = 2100;

/// Number of digits in a bare year token
pub const BARE_YEAR_DIGITS: usize = 4;

// =============================================================================
// Input and Output Files
// =============================================================================

/// Extension of JSON inputs and outputs (compared case-insensitively on input)
pub const JSON_EXTENSION: &str = "json";

/// Extension of CSV inputs and outputs (compared case-insensitively on input)
pub const CSV_EXTENSION: &str = "csv";

/// Top-level key holding the record array in JSON inputs and outputs
pub const JOBS_KEY: &str = "jobs";

/// Key holding the record count in JSON outputs
pub const NB_JOBS_KEY: &str = "nb_jobs";

/// Key holding the partition year in JSON outputs
pub const YEAR_KEY: &str = "year";

/// Suffix appended to the stem of JSON staging files
pub const STAGING_SUFFIX: &str = "_temp";

/// Indentation used for pretty-printed JSON outputs
pub const JSON_INDENT: &[u8] = b"    ";

// =============================================================================
// Environment Configuration
// =============================================================================

/// Environment variable holding the input file or directory
pub const ENV_INPUT_PATH: &str = "DIRECTORY_PATH";

/// Environment variable holding the output directory
pub const ENV_OUTPUT_PATH: &str = "SORTED_DIRECTORY_PATH";

/// Environment variable holding a comma-separated candidate list
pub const ENV_DATE_COLUMN_NAME: &str = "DATE_COLUMN_NAME";
