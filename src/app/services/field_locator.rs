//! Date field discovery
//!
//! The date-bearing field of a job listing is not fixed; it is found by
//! scanning an ordered candidate list. JSON records are matched on exact
//! keys, CSV headers on case-insensitive substrings.

use csv::StringRecord;
use serde_json::{Map, Value};

/// Date column located in a CSV header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    pub index: usize,
    pub name: String,
}

/// Find the first candidate present as a key of a JSON record.
///
/// Candidates are scanned in declaration order; the first present key wins
/// regardless of where it appears in the record.
pub fn locate_json_field<'c>(
    record: &Map<String, Value>,
    candidates: &'c [String],
) -> Option<&'c str> {
    candidates
        .iter()
        .find(|candidate| record.contains_key(candidate.as_str()))
        .map(|candidate| candidate.as_str())
}

/// Find the first header column whose lowercase name contains any candidate.
///
/// Columns are scanned left to right, so column order (not candidate order)
/// decides between two matching columns.
pub fn locate_csv_column(header: &StringRecord, candidates: &[String]) -> Option<DateColumn> {
    header.iter().enumerate().find_map(|(index, name)| {
        let lowered = name.to_lowercase();
        candidates
            .iter()
            .any(|candidate| lowered.contains(candidate.as_str()))
            .then(|| DateColumn {
                index,
                name: name.to_string(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_json_candidate_order_wins_over_key_order() {
        let record = record(json!({"posted": "2020-01-01", "date": "2019-01-01"}));
        let list = candidates(&["year", "date", "posted"]);

        assert_eq!(locate_json_field(&record, &list), Some("date"));
    }

    #[test]
    fn test_json_match_is_exact_key() {
        let record = record(json!({"posted_date": "2020-01-01", "Date": "2020"}));
        let list = candidates(&["date", "posted"]);

        assert_eq!(locate_json_field(&record, &list), None);
    }

    #[test]
    fn test_json_null_value_still_matches() {
        let record = record(json!({"id": 1, "created": null}));
        let list = candidates(&["created"]);

        assert_eq!(locate_json_field(&record, &list), Some("created"));
    }

    #[test]
    fn test_csv_substring_case_insensitive() {
        let header = StringRecord::from(vec!["id", "Title", "Posted_Date"]);
        let list = candidates(&["date", "created"]);

        assert_eq!(
            locate_csv_column(&header, &list),
            Some(DateColumn {
                index: 2,
                name: "Posted_Date".to_string()
            })
        );
    }

    #[test]
    fn test_csv_first_matching_column_wins() {
        let header = StringRecord::from(vec!["created_at", "publish_date"]);
        let list = candidates(&["date", "created"]);

        let column = locate_csv_column(&header, &list).unwrap();
        assert_eq!(column.index, 0);
        assert_eq!(column.name, "created_at");
    }

    #[test]
    fn test_csv_no_match() {
        let header = StringRecord::from(vec!["id", "title", "salary"]);
        let list = candidates(&["date", "created", "posted", "publish"]);

        assert_eq!(locate_csv_column(&header, &list), None);
    }
}
