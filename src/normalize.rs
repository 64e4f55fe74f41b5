//! Conversion of raw scraped text into numbers, dates and names.
//!
//! Everything here is total: malformed input degrades to zero, `None` or an
//! empty string instead of failing the page it came from.

use std::str::FromStr;

use ::scraper::{ElementRef, Selector};
use chrono::{Datelike, Month, NaiveDate, NaiveDateTime};
use itertools::Itertools;

use crate::error::Result;
use crate::model::SideStat;

/// The site's "no data" marker inside a stat cell.
const NO_DATA: &str = "/";
const UTC_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Integer stamps above this are treated as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Replace non-breaking space artifacts with plain spaces and trim.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

/// Text content of an element with one text node per line.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().join("\n")
}

/// Normalize a stat cell into a single number.
///
/// Stacked values (one per line) are averaged, `%` signs and `/` placeholders
/// are ignored, and a cell without any parsable number yields `0.0`.
/// Non-finite tokens such as `NaN` or `inf` are dropped like unparsable ones.
pub fn parse_stat(raw: &str) -> f64 {
    let cleaned = clean_text(raw).replace('%', "");
    let values = cleaned
        .split('\n')
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != NO_DATA)
        .filter_map(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect_vec();

    match values.len() {
        0 => 0.0,
        1 => values[0],
        n => values.iter().sum::<f64>() / n as f64,
    }
}

/// Normalize a side-aware stat cell.
///
/// Returns the attack/defense/combined values and whether the cell carried
/// attack/defense granularity at all. Cells without a combined sub-element
/// are read as a whole.
pub fn parse_side_stat(cell: &ElementRef) -> Result<(SideStat, bool)> {
    let attack_selector = Selector::parse("span.mod-t")?;
    let defense_selector = Selector::parse("span.mod-ct")?;
    let both_selector = Selector::parse("span.mod-both")?;

    let side_value = |selector: &Selector| {
        cell.select(selector)
            .next()
            .map(|e| parse_stat(&element_text(&e)))
    };

    let attack = side_value(&attack_selector);
    let defense = side_value(&defense_selector);
    let both = side_value(&both_selector).unwrap_or_else(|| parse_stat(&element_text(cell)));
    let has_sides = attack.is_some() || defense.is_some();

    Ok((
        SideStat {
            attack: attack.unwrap_or_default(),
            defense: defense.unwrap_or_default(),
            both,
        },
        has_sides,
    ))
}

/// Strip whitespace and the trailing `PICK` marker from a map header.
/// "Ascent\n\t\tPICK" → "Ascent"
pub fn normalize_map_name(raw: &str) -> String {
    let compact: String = clean_text(raw)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact
        .strip_suffix("PICK")
        .unwrap_or(&compact)
        .to_string()
}

/// Currency-stripped prize pool. "$1,000,000 USD" → 1000000.0 | "TBD" → None
pub fn parse_prize_pool(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

/// Parse a match timestamp into epoch seconds.
///
/// Accepts the `data-utc-ts` form ("2024-04-13 15:00:00") or a bare integer
/// stamp in seconds or milliseconds.
pub fn parse_epoch(raw: &str) -> Option<String> {
    let raw = clean_text(raw);
    if let Ok(stamp) = raw.parse::<i64>() {
        let seconds = if stamp > MILLIS_THRESHOLD {
            stamp / 1000
        } else {
            stamp
        };
        return Some(seconds.to_string());
    }
    NaiveDateTime::parse_from_str(&raw, UTC_STAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp().to_string())
}

#[derive(Debug, Default, Clone, Copy)]
struct PartialDate {
    month: Option<u32>,
    day: Option<u32>,
    year: Option<i32>,
}

impl PartialDate {
    fn parse(raw: &str) -> Self {
        let mut date = PartialDate::default();
        for token in raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            if let Ok(month) = Month::from_str(token) {
                date.month = Some(month.number_from_month());
            } else if let Ok(n) = token.parse::<u32>() {
                if n > 31 {
                    date.year = i32::try_from(n).ok();
                } else {
                    date.day = Some(n);
                }
            }
        }
        date
    }

    /// Fill missing month and year from the other end of the range.
    fn inherit(self, other: PartialDate) -> Self {
        PartialDate {
            month: self.month.or(other.month),
            day: self.day,
            year: self.year.or(other.year),
        }
    }

    fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }
}

/// Parse a human-readable date range.
///
/// "Feb 16, 2024 - Mar 3, 2024", "Jun 9 - 23, 2024" and "Dec 28 - Jan 5, 2024"
/// are all understood; a side that omits its month or year borrows it from
/// the other side.
pub fn parse_date_range(raw: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let cleaned = clean_text(raw);
    let mut sides = cleaned.split(['-', '–', '—']).map(PartialDate::parse);
    let start = sides.next().unwrap_or_default();
    let end = sides.next().unwrap_or_default();

    let start_date = start.inherit(end).to_date();
    let end_date = end.inherit(start).to_date();

    // A range spanning new year only states the end year.
    let start_date = match (start_date, end_date, start.year) {
        (Some(s), Some(e), None) if s > e => s.with_year(s.year() - 1),
        (s, _, _) => s,
    };

    (start_date, end_date)
}
