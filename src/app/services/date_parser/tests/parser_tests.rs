//! Tests for the DateParser facade

use crate::app::models::DateStrategy;
use crate::app::services::date_parser::{DateParser, parse_date};
use chrono::NaiveDate;
use serde_json::json;

#[test]
fn test_us_order_wins_over_european_order() {
    let parsed = parse_date("03/04/2020").unwrap();

    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2020, 3, 4).unwrap());
    assert_eq!(parsed.strategy, DateStrategy::UsSlash);
}

#[test]
fn test_european_order_used_when_us_order_invalid() {
    let parsed = parse_date("25/12/2019").unwrap();

    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2019, 12, 25).unwrap());
    assert_eq!(parsed.strategy, DateStrategy::EuropeanSlash);
}

#[test]
fn test_bare_year_in_range() {
    let parsed = parse_date("2004").unwrap();

    assert_eq!(parsed.year, 2004);
    assert_eq!(parsed.strategy, DateStrategy::BareYear);
}

#[test]
fn test_bare_year_out_of_range_is_not_parseable() {
    assert_eq!(parse_date("1850"), None);
    assert_eq!(parse_date("2200"), None);
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    let parsed = parse_date("  2021-06-02\t").unwrap();

    assert_eq!(parsed.year, 2021);
    assert_eq!(parsed.strategy, DateStrategy::IsoDate);
}

#[test]
fn test_empty_and_blank_inputs() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("   "), None);
}

#[test]
fn test_iso_timestamp_with_zulu_suffix() {
    let parsed = parse_date("2018-11-30T08:00:00Z").unwrap();

    assert_eq!(parsed.year, 2018);
    assert_eq!(parsed.strategy, DateStrategy::Iso8601);
}

#[test]
fn test_each_supported_layout_resolves_year() {
    let cases = [
        ("2020-05-01T10:00:00", 2020),
        ("2020-05-01", 2020),
        ("Jan 5, 2004", 2004),
        ("January 5, 2004", 2004),
        ("Feb 29 2016", 2016),
        ("February 29 2016", 2016),
        ("12/31/1999", 1999),
        ("31/12/1999", 1999),
        ("31-12-1999", 1999),
    ];

    for (raw, year) in cases {
        assert_eq!(
            parse_date(raw).map(|d| d.year),
            Some(year),
            "failed to parse {raw}"
        );
    }
}

#[test]
fn test_malformed_tokens_are_not_parseable() {
    for raw in [
        "not-a-date",
        "2020/05/01",
        "32/13/2020",
        "Febtember 3, 2020",
        "Feb 30, 2020",
        "yesterday",
        "20-05-01T10:00:00",
        "5-06-07T08:09",
        "+12020-05-01T10:00:00",
    ] {
        assert_eq!(parse_date(raw), None, "unexpectedly parsed {raw}");
    }
}

#[test]
fn test_iso_timestamp_with_hour_only() {
    let parsed = parse_date("2020-05-01T10").unwrap();

    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2020, 5, 1).unwrap());
    assert_eq!(parsed.strategy, DateStrategy::Iso8601);
}

#[test]
fn test_parsing_is_idempotent() {
    let parser = DateParser::new();
    let first = parser.parse("07/08/2011");

    for _ in 0..10 {
        assert_eq!(parser.parse("07/08/2011"), first);
    }
}

#[test]
fn test_parse_value_only_accepts_strings() {
    let parser = DateParser::new();

    assert_eq!(parser.parse_value(&json!("2020-05-01")).map(|d| d.year), Some(2020));
    assert_eq!(parser.parse_value(&json!(2020)), None);
    assert_eq!(parser.parse_value(&json!(null)), None);
    assert_eq!(parser.parse_value(&json!({"year": "2020"})), None);
}
