//! Normalization of the "Most Recent" column into inactive days.
//!
//! Sources disagree on how they store recency: spreadsheets exported from
//! pandas hold durations (`3 days 04:00:00`), Excel can hold duration-formatted
//! cells, and hand-maintained sheets hold a plain day count. The representation
//! is decided once for the whole batch and a single rule is applied to every
//! row. Negative values are treated as sign slips and corrected by absolute
//! value.

use chrono::Duration;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::LoadError;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A raw recency cell before batch resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Recency {
    /// Elapsed time since the last game
    Elapsed(Duration),
    /// Day count as entered
    Days(f64),
    /// No value
    Blank,
}

/// How a batch stores its recency values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyKind {
    Elapsed,
    Days,
    /// Every cell was blank (or the batch was empty)
    Empty,
}

/// Inactive days for every row of a batch, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBatch {
    pub kind: RecencyKind,
    pub inactive_days: Vec<Option<f64>>,
}

lazy_static! {
    // "3 days 04:00:00", "-1 days +21:00:00", "1 day, 2:03:04.5", "5:00:00", "2 days"
    static ref ELAPSED_TEXT: Regex = Regex::new(
        r"^(?:(-?\d+)\s+days?,?\s*)?(?:([+-])?(\d+):(\d{2}):(\d{2})(?:\.(\d{1,9}))?)?$"
    )
    .unwrap();
    // ISO-8601 durations: "P3D", "PT36H", "-P1DT12H30M", "P1W"
    static ref ELAPSED_ISO: Regex = Regex::new(
        r"^([+-])?P(?:(\d+(?:\.\d+)?)W)?(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$"
    )
    .unwrap();
}

impl Recency {
    /// Parse a text cell. Returns `None` when the text is neither a duration
    /// nor a number.
    pub fn parse_text(text: &str) -> Option<Recency> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(Recency::Blank);
        }
        if let Ok(days) = trimmed.parse::<f64>() {
            return days.is_finite().then_some(Recency::Days(days));
        }
        parse_elapsed_text(trimmed)
            .or_else(|| parse_elapsed_iso(trimmed))
            .map(Recency::Elapsed)
    }

    /// Build from an Excel duration cell, stored as fractional days.
    /// Returns `None` when the value does not fit a duration.
    pub fn from_excel_days(days: f64) -> Option<Recency> {
        let millis = millis_from_f64(days * MILLIS_PER_DAY as f64)?;
        Duration::try_milliseconds(millis).map(Recency::Elapsed)
    }
}

/// Round to whole milliseconds, rejecting values outside the `i64` range.
fn millis_from_f64(millis: f64) -> Option<i64> {
    let rounded = millis.round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64)
        .then_some(rounded as i64)
}

fn parse_elapsed_text(text: &str) -> Option<Duration> {
    let caps = ELAPSED_TEXT.captures(text)?;
    let has_days = caps.get(1).is_some();
    let has_clock = caps.get(3).is_some();
    if !has_days && !has_clock {
        return None;
    }

    let days: i64 = caps.get(1).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let mut clock_millis = 0i64;
    if has_clock {
        let hours: i64 = caps[3].parse().ok()?;
        let minutes: i64 = caps[4].parse().ok()?;
        let seconds: i64 = caps[5].parse().ok()?;
        let fraction_millis = caps.get(6).map_or(0, |m| {
            let digits: String = m.as_str().chars().chain("000".chars()).take(3).collect();
            digits.parse::<i64>().unwrap_or(0)
        });
        clock_millis = hours
            .checked_mul(60)?
            .checked_add(minutes)?
            .checked_mul(60)?
            .checked_add(seconds)?
            .checked_mul(1000)?
            .checked_add(fraction_millis)?;
        if caps.get(2).is_some_and(|m| m.as_str() == "-") {
            clock_millis = clock_millis.checked_neg()?;
        }
    }

    let total = days.checked_mul(MILLIS_PER_DAY)?.checked_add(clock_millis)?;
    Duration::try_milliseconds(total)
}

fn parse_elapsed_iso(text: &str) -> Option<Duration> {
    let caps = ELAPSED_ISO.captures(text)?;
    if (2..=6).all(|i| caps.get(i).is_none()) {
        return None;
    }

    let part = |caps: &Captures, i: usize| -> Option<f64> {
        caps.get(i).map_or(Some(0.0), |m| m.as_str().parse().ok())
    };
    let seconds = part(&caps, 2)? * 7.0 * 86_400.0
        + part(&caps, 3)? * 86_400.0
        + part(&caps, 4)? * 3_600.0
        + part(&caps, 5)? * 60.0
        + part(&caps, 6)?;
    let mut millis = millis_from_f64(seconds * 1000.0)?;
    if caps.get(1).is_some_and(|m| m.as_str() == "-") {
        millis = millis.checked_neg()?;
    }
    Duration::try_milliseconds(millis)
}

/// Whole days in a duration, rounding toward negative infinity so that
/// `-3h` counts as day `-1`.
pub fn whole_days(elapsed: Duration) -> i64 {
    elapsed.num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Resolve a batch of `(row, cell)` pairs into non-negative inactive days.
///
/// `row` is the 1-based data row used in error messages.
pub fn resolve_batch(cells: &[(usize, Recency)]) -> Result<ResolvedBatch, LoadError> {
    let first_elapsed = cells
        .iter()
        .find(|(_, cell)| matches!(cell, Recency::Elapsed(_)))
        .map(|(row, _)| *row);
    let first_days = cells
        .iter()
        .find(|(_, cell)| matches!(cell, Recency::Days(_)))
        .map(|(row, _)| *row);

    let kind = match (first_elapsed, first_days) {
        (Some(duration_row), Some(number_row)) => {
            return Err(LoadError::MixedRecency {
                duration_row,
                number_row,
            });
        }
        (Some(_), None) => RecencyKind::Elapsed,
        (None, Some(_)) => RecencyKind::Days,
        (None, None) => RecencyKind::Empty,
    };

    let inactive_days = cells
        .iter()
        .map(|(row, cell)| {
            let raw = match cell {
                Recency::Elapsed(elapsed) => whole_days(*elapsed) as f64,
                Recency::Days(days) => *days,
                Recency::Blank => return None,
            };
            if raw < 0.0 {
                log::debug!("Row {}: negative recency {} corrected to {}", row, raw, raw.abs());
            }
            Some(raw.abs())
        })
        .collect();

    Ok(ResolvedBatch {
        kind,
        inactive_days,
    })
}
