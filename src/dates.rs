//! Date recognition and parsing.
//!
//! Listing cards print dates as `Feb 4, 2026` (sometimes `February 4, 2026`),
//! while article pages carry ISO or RFC 2822 timestamps in their metadata.
//! Every parser here returns `Option`: an unreadable date is simply absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const MONTH_DAY_YEAR: &str = r"(?P<month>Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+(?P<day>\d{1,2}),\s+(?P<year>\d{4})";

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b{MONTH_DAY_YEAR}\b")).expect("valid date regex"));

static DATE_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{MONTH_DAY_YEAR}$")).expect("valid date regex"));

/// Whether `text` mentions a month-name date anywhere.
pub fn contains_date(text: &str) -> bool {
    DATE_RE.is_match(text)
}

/// Whether `text` is nothing but a month-name date.
pub fn is_date_only(text: &str) -> bool {
    DATE_ONLY_RE.is_match(text.trim())
}

/// First month-name date in `text`, as midnight UTC.
pub fn find_date(text: &str) -> Option<DateTime<Utc>> {
    let caps = DATE_RE.captures(text)?;
    let month = month_number(&caps["month"])?;
    let day = caps["day"].parse::<u32>().ok()?;
    let year = caps["year"].parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Parse a date or timestamp in any of the shapes seen on listing and
/// article pages. Zone-less values are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    find_date(s)
}

fn month_number(token: &str) -> Option<u32> {
    let key = token.get(..3)?.to_ascii_lowercase();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
