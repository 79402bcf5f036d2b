// src/services/period.rs
use chrono::{Datelike, NaiveDate};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::models::PeriodTimestamp;

/// Month name followed by a 2- or 4-digit year, e.g. "January 2024", "Jan-24".
static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)[\s\-/.,']*(\d{4}|\d{2})$").expect("month-year pattern is valid")
});

/// Numeric layouts accepted after the month-name forms. Month-only layouts
/// are completed with a day before parsing.
const NUMERIC_LAYOUTS: [(&str, &str, &str); 5] = [
    ("", "", "%Y-%m-%d"),
    ("", "-01", "%Y-%m-%d"),
    ("", "", "%d-%m-%Y"),
    ("", "", "%d/%m/%Y"),
    ("01/", "", "%d/%m/%Y"),
];

/// A period label that matched none of the accepted layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodParseError {
    pub label: String,
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognised period label '{}'", self.label)
    }
}

impl std::error::Error for PeriodParseError {}

/// Parses the sheet's native "Jan 24" layout only.
pub fn parse_period_strict(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("01 {}", label.trim()), "%d %b %y").ok()
}

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Month number for a full name or a prefix of one at least three letters
/// long ("Jan", "Janu", "January"), plus the common "Sept".
fn month_number(word: &str) -> Option<u32> {
    let lower = word.to_ascii_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&lower))
        .map(|idx| idx as u32 + 1)
}

fn parse_month_year(label: &str) -> Option<NaiveDate> {
    let caps = MONTH_YEAR.captures(label)?;
    let month = month_number(&caps[1])?;
    let digits: i32 = caps[2].parse().ok()?;
    // Two-digit years pivot the same way as chrono's %y.
    let year = match caps[2].len() {
        4 => digits,
        _ if digits < 70 => 2000 + digits,
        _ => 1900 + digits,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn parse_numeric(label: &str) -> Option<NaiveDate> {
    NUMERIC_LAYOUTS.iter().find_map(|(prefix, suffix, fmt)| {
        NaiveDate::parse_from_str(&format!("{prefix}{label}{suffix}"), fmt).ok()
    })
}

/// Strict parse first, then the best-effort layouts. The result is always the
/// first day of the month.
pub fn parse_period(label: &str) -> Result<NaiveDate, PeriodParseError> {
    let trimmed = label.trim();
    parse_period_strict(trimmed)
        .or_else(|| parse_month_year(trimmed))
        .or_else(|| parse_numeric(trimmed))
        .and_then(|d| d.with_day(1))
        .ok_or_else(|| PeriodParseError {
            label: label.to_string(),
        })
}

pub fn derive_period_timestamp(label: &str) -> PeriodTimestamp {
    match parse_period(label) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Period timestamp missing: {}", e);
            None
        }
    }
}
