//! Multi-format date parser
//!
//! Converts raw date tokens found in job-listing records into a calendar
//! year. Inputs are frequently inconsistent (ISO timestamps next to
//! `Jan 5, 2004` next to European slashes), so the parser tries an ordered
//! table of [`strategies`] and keeps the first match.
//!
//! Parsing never fails loudly: a token no strategy recognises yields `None`
//! and a warning, so a single bad record cannot abort a batch.
//!
//! ## Usage
//!
//! ```rust
//! use year_splitter::DateParser;
//!
//! let parser = DateParser::new();
//! assert_eq!(parser.parse("Jan 5, 2004").map(|d| d.year), Some(2004));
//! assert_eq!(parser.parse("not-a-date"), None);
//! ```

pub mod strategies;

#[cfg(test)]
pub mod tests;

use chrono::Datelike;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::app::models::ParsedDate;
pub use strategies::{STRATEGIES, Strategy};

/// Ordered-strategy date parser
///
/// Stateless: the same token always yields the same result.
#[derive(Debug, Clone, Copy)]
pub struct DateParser {
    strategies: &'static [Strategy],
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateParser {
    /// Create a parser using the standard strategy order
    pub fn new() -> Self {
        Self {
            strategies: STRATEGIES,
        }
    }

    /// Parse a raw token into a date, warning when nothing matches
    pub fn parse(&self, raw: &str) -> Option<ParsedDate> {
        if raw.is_empty() {
            return None;
        }

        match self.parse_quiet(raw) {
            Some(parsed) => Some(parsed),
            None => {
                warn!("Unable to parse date: {}", raw);
                None
            }
        }
    }

    /// Parse without emitting a diagnostic on failure
    pub fn parse_quiet(&self, raw: &str) -> Option<ParsedDate> {
        let value = raw.trim();

        self.strategies.iter().find_map(|strategy| {
            let date = (strategy.parse)(value)?;
            trace!("Parsed '{}' with strategy {}", value, strategy.kind.name());
            Some(ParsedDate {
                year: date.year(),
                date,
                strategy: strategy.kind,
            })
        })
    }

    /// Parse a JSON value; only strings are considered dates
    pub fn parse_value(&self, value: &Value) -> Option<ParsedDate> {
        match value {
            Value::String(raw) => self.parse(raw),
            other => {
                debug!("Ignoring non-string date value: {}", other);
                None
            }
        }
    }
}

/// Parse a raw date token with the standard strategy order
pub fn parse_date(raw: &str) -> Option<ParsedDate> {
    DateParser::new().parse(raw)
}
