//! Streaming reader for `{"jobs": [...]}` documents
//!
//! The `jobs` array is visited element by element through serde's
//! `DeserializeSeed`, handing each record to a callback as soon as it is
//! parsed. Memory use is bounded by the largest single record, not by the
//! size of the array. Other top-level keys are skipped without being
//! materialised.

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::error::Category;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;

use crate::constants::JOBS_KEY;
use crate::{Error, Result};

/// Call `on_job` for every element of the top-level `jobs` array.
///
/// Returns the number of elements visited. An error returned by `on_job`
/// stops the stream immediately and is returned unchanged. A document without
/// a `jobs` key visits nothing.
pub fn for_each_job<R, F>(reader: R, file: &str, mut on_job: F) -> Result<usize>
where
    R: Read,
    F: FnMut(Map<String, Value>) -> Result<()>,
{
    let mut failure: Option<Error> = None;
    let mut deserializer = serde_json::Deserializer::from_reader(reader);

    let visited = JobsDocument {
        on_job: &mut on_job,
        failure: &mut failure,
    }
    .deserialize(&mut deserializer)
    .and_then(|visited| deserializer.end().map(|_| visited));

    match (visited, failure) {
        (_, Some(error)) => Err(error),
        (Ok(visited), None) => Ok(visited),
        (Err(e), None) => Err(classify(file, e)),
    }
}

/// Type mismatches are structural problems; everything else is a parse error
fn classify(file: &str, error: serde_json::Error) -> Error {
    match error.classify() {
        Category::Data => Error::invalid_structure(file, error.to_string()),
        _ => Error::json_parsing(file, "Failed to stream JSON document", error),
    }
}

/// Seed for the top-level object
struct JobsDocument<'a, F> {
    on_job: &'a mut F,
    failure: &'a mut Option<Error>,
}

impl<'de, F> DeserializeSeed<'de> for JobsDocument<'_, F>
where
    F: FnMut(Map<String, Value>) -> Result<()>,
{
    type Value = usize;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, F> Visitor<'de> for JobsDocument<'_, F>
where
    F: FnMut(Map<String, Value>) -> Result<()>,
{
    type Value = usize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an object with a `{}` array", JOBS_KEY)
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<usize, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut visited = 0;

        while let Some(key) = map.next_key::<String>()? {
            if key == JOBS_KEY {
                visited += map.next_value_seed(JobsArray {
                    on_job: &mut *self.on_job,
                    failure: &mut *self.failure,
                })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(visited)
    }
}

/// Seed for the `jobs` array
struct JobsArray<'a, F> {
    on_job: &'a mut F,
    failure: &'a mut Option<Error>,
}

impl<'de, F> DeserializeSeed<'de> for JobsArray<'_, F>
where
    F: FnMut(Map<String, Value>) -> Result<()>,
{
    type Value = usize;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F> Visitor<'de> for JobsArray<'_, F>
where
    F: FnMut(Map<String, Value>) -> Result<()>,
{
    type Value = usize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a `{}` array of objects", JOBS_KEY)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut visited = 0;

        while let Some(job) = seq.next_element::<Map<String, Value>>()? {
            visited += 1;
            if let Err(error) = (self.on_job)(job) {
                *self.failure = Some(error);
                return Err(de::Error::custom("record handler stopped the stream"));
            }
        }

        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_ids(document: &str) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        for_each_job(document.as_bytes(), "test.json", |job| {
            ids.push(job["id"].as_i64().unwrap_or(-1));
            Ok(())
        })?;
        Ok(ids)
    }

    #[test]
    fn test_visits_jobs_in_order_and_skips_other_keys() {
        let document = r#"{"meta": {"source": "x", "pages": [1, 2]},
                           "jobs": [{"id": 1}, {"id": 2}, {"id": 3}],
                           "total": 3}"#;

        assert_eq!(collect_ids(document).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_jobs_key_visits_nothing() {
        assert_eq!(collect_ids(r#"{"items": [{"id": 1}]}"#).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_empty_jobs_array() {
        assert_eq!(collect_ids(r#"{"jobs": []}"#).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_non_object_top_level_is_invalid_structure() {
        let result = collect_ids(r#"[{"id": 1}]"#);
        assert!(matches!(result, Err(Error::InvalidStructure { .. })));
    }

    #[test]
    fn test_non_array_jobs_is_invalid_structure() {
        let result = collect_ids(r#"{"jobs": {"id": 1}}"#);
        assert!(matches!(result, Err(Error::InvalidStructure { .. })));
    }

    #[test]
    fn test_truncated_document_is_parse_error() {
        let result = collect_ids(r#"{"jobs": [{"id": 1}, {"id": 2"#);
        assert!(matches!(result, Err(Error::JsonParsing { .. })));
    }

    #[test]
    fn test_trailing_garbage_is_parse_error() {
        let result = collect_ids(r#"{"jobs": []} extra"#);
        assert!(matches!(result, Err(Error::JsonParsing { .. })));
    }

    #[test]
    fn test_handler_error_stops_stream() {
        let mut seen = 0;
        let result = for_each_job(
            r#"{"jobs": [{"id": 1}, {"id": 2}, {"id": 3}]}"#.as_bytes(),
            "test.json",
            |_| {
                seen += 1;
                if seen == 2 {
                    Err(Error::date_field_not_found("test.json", &["date".to_string()]))
                } else {
                    Ok(())
                }
            },
        );

        assert_eq!(seen, 2);
        assert!(matches!(result, Err(Error::DateFieldNotFound { .. })));
    }
}
