//! Individual date format strategies
//!
//! Every strategy is a pure function from a trimmed date token to a calendar
//! date. A strategy that does not recognise its pattern returns `None` and the
//! parser moves on to the next one. [`STRATEGIES`] fixes the attempt order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::app::models::DateStrategy;
use crate::constants::{BARE_YEAR_DIGITS, BARE_YEAR_MAX, BARE_YEAR_MIN};

/// A named date format strategy
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub kind: DateStrategy,
    pub parse: fn(&str) -> Option<NaiveDate>,
}

/// All strategies in attempt order; the first success wins.
///
/// `MM/DD/YYYY` precedes `DD/MM/YYYY`, so `03/04/2020` is always March 4th.
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        kind: DateStrategy::BareYear,
        parse: parse_bare_year,
    },
    Strategy {
        kind: DateStrategy::Iso8601,
        parse: parse_iso8601,
    },
    Strategy {
        kind: DateStrategy::IsoDate,
        parse: parse_iso_date,
    },
    Strategy {
        kind: DateStrategy::AbbreviatedMonthComma,
        parse: parse_abbreviated_month_comma,
    },
    Strategy {
        kind: DateStrategy::FullMonthComma,
        parse: parse_full_month_comma,
    },
    Strategy {
        kind: DateStrategy::AbbreviatedMonth,
        parse: parse_abbreviated_month,
    },
    Strategy {
        kind: DateStrategy::FullMonth,
        parse: parse_full_month,
    },
    Strategy {
        kind: DateStrategy::UsSlash,
        parse: parse_us_slash,
    },
    Strategy {
        kind: DateStrategy::EuropeanSlash,
        parse: parse_european_slash,
    },
    Strategy {
        kind: DateStrategy::DayMonthYearDash,
        parse: parse_day_month_year_dash,
    },
];

/// Offset-aware ISO layouts, tried after RFC 3339
const ISO_OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// Naive ISO layouts
const ISO_NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Highest hour accepted in an hour-only ISO time
const ISO_MAX_HOUR: u32 = 23;

/// Where the year token sits in a pattern
#[derive(Debug, Clone, Copy)]
enum YearPosition {
    Leading,
    Trailing,
}

/// `2004` -> 2004-01-01, only within the plausible bare-year range
pub fn parse_bare_year(value: &str) -> Option<NaiveDate> {
    if value.len() != BARE_YEAR_DIGITS || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = value.parse().ok()?;
    if !(BARE_YEAR_MIN..=BARE_YEAR_MAX).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// ISO-8601 date/time; a literal `Z` is read as `+00:00`.
///
/// Only attempted when the token contains a `T` and starts with a
/// four-digit year. The calendar date is taken in the token's own offset,
/// never converted to UTC.
pub fn parse_iso8601(value: &str) -> Option<NaiveDate> {
    if !value.contains('T') || !has_four_digit_year(value, YearPosition::Leading) {
        return None;
    }

    let normalized = value.replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.date_naive());
    }

    for format in ISO_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Some(dt.date_naive());
        }
    }

    for format in ISO_NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(dt.date());
        }
    }

    parse_iso_hour_only(&normalized)
}

/// `2020-05-01T10`; chrono cannot build a date-time without minutes
fn parse_iso_hour_only(value: &str) -> Option<NaiveDate> {
    let (date, hour) = value.split_once('T')?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if hour.parse::<u32>().ok()? > ISO_MAX_HOUR {
        return None;
    }

    parse_iso_date(date)
}

/// `2020-05-01`
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%Y-%m-%d", YearPosition::Leading)
}

/// `Jan 5, 2004`
pub fn parse_abbreviated_month_comma(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%b %d, %Y", YearPosition::Trailing)
}

/// `January 5, 2004`
pub fn parse_full_month_comma(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%B %d, %Y", YearPosition::Trailing)
}

/// `Jan 5 2004`
pub fn parse_abbreviated_month(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%b %d %Y", YearPosition::Trailing)
}

/// `January 5 2004`
pub fn parse_full_month(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%B %d %Y", YearPosition::Trailing)
}

/// `01/15/2005`
pub fn parse_us_slash(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%m/%d/%Y", YearPosition::Trailing)
}

/// `15/01/2005`
pub fn parse_european_slash(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%d/%m/%Y", YearPosition::Trailing)
}

/// `15-01-2005`
pub fn parse_day_month_year_dash(value: &str) -> Option<NaiveDate> {
    parse_with_format(value, "%d-%m-%Y", YearPosition::Trailing)
}

/// Parse with a chrono format, requiring a full four-digit year token.
///
/// chrono's `%Y` also accepts shorter years (`1/2/20` would be year 20);
/// those are rejected here.
fn parse_with_format(value: &str, format: &str, position: YearPosition) -> Option<NaiveDate> {
    if !has_four_digit_year(value, position) {
        return None;
    }
    NaiveDate::parse_from_str(value, format).ok()
}

fn has_four_digit_year(value: &str, position: YearPosition) -> bool {
    let digits = |c: char| c.is_ascii_digit();
    let token_len = match position {
        YearPosition::Leading => value.chars().take_while(|&c| digits(c)).count(),
        YearPosition::Trailing => value.chars().rev().take_while(|&c| digits(c)).count(),
    };
    token_len == BARE_YEAR_DIGITS
}
