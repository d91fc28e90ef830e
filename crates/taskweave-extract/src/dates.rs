//! Fuzzy deadline parsing.
//!
//! Deadlines arrive as free text ("2024-12-22", "12/22/2024", "Dec 22").
//! `parse_fuzzy` scans for the first recognizable date anywhere in the
//! string; unparsable input yields `None`, never an error, because the
//! conflict detector treats such deadlines as absent.

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn iso_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("invalid iso date regex"))
}

fn slash_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("invalid slash date regex"))
}

fn month_name_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s*(\d{4}))?",
        )
        .expect("invalid month name regex")
    })
}

/// Parse the first date found in free text.
///
/// Recognizes ISO (`2024-12-22`), US slash (`12/22/2024`), and month-name
/// (`Dec 22`, `December 22, 2024`) forms. Month-name dates without a year
/// default to the current year.
pub fn parse_fuzzy(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = iso_date().captures(text) {
        let (y, m, d) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(caps) = slash_date().captures(text) {
        let (m, d, y) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(caps) = month_name_date().captures(text) {
        let month = month_number(&caps[1].to_lowercase())?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => Utc::now().year(),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

fn month_number(prefix: &str) -> Option<u32> {
    let month = match prefix {
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
