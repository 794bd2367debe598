//! Date range expansion.
//!
//! Expands a start/end pair into every calendar day between them, inclusive
//! of both ends. Ranges may run backwards; an omitted end means yesterday.

use crate::config::EndDate;
use crate::constants::SLASHED_DATE_FORMAT;
use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use tracing::info;

/// Parse a `yyyy/mm/dd` string as a calendar date
pub fn parse_slashed(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, SLASHED_DATE_FORMAT).map_err(|e| {
        Error::date_range(format!(
            "'{date}' is not a valid date, expected format yyyy/mm/dd: {e}"
        ))
    })
}

/// Render a date as `yyyy/mm/dd`
pub fn slashed(date: NaiveDate) -> String {
    date.format(SLASHED_DATE_FORMAT).to_string()
}

/// Convert a `yyyy/mm/dd` string to `yyyymmdd` by dropping the separators
pub fn compact_from_slashed(slashed_date: &str) -> String {
    slashed_date.chars().filter(char::is_ascii_digit).collect()
}

/// The day before `today`
pub fn yesterday_of(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Expand `[start, end]` into slashed dates, one per day
///
/// The range counts down when `end` precedes `start`. `today` anchors
/// [`EndDate::Yesterday`].
pub fn date_range(start: &str, end: &EndDate, today: NaiveDate) -> Result<Vec<String>> {
    let start = parse_slashed(start)?;
    let end = match end {
        EndDate::Date(date) => parse_slashed(date)?,
        EndDate::Yesterday => yesterday_of(today),
    };

    let ascending = start <= end;
    let mut dates = Vec::new();
    let mut day = start;
    loop {
        dates.push(slashed(day));
        if day == end {
            break;
        }
        let next = if ascending {
            day.checked_add_days(Days::new(1))
        } else {
            day.checked_sub_days(Days::new(1))
        };
        day = next.ok_or_else(|| Error::date_range(format!("date range overflows at {day}")))?;
    }

    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if dates.len() > 1 => info!("date_range: {first} -- {last}"),
        (Some(first), _) => info!("date_range: {first}"),
        _ => {}
    }

    Ok(dates)
}
