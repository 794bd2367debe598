//! Date-substitution templates for file paths.
//!
//! A table's files differ from each other only by the date embedded in
//! their path. A [`DatePathTemplate`] is derived once from one example path
//! and then instantiated for every day of the range.

use crate::constants::{COMPACT_DATE_FORMAT, PATH_DATE_PATTERN};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

static PATH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATH_DATE_PATTERN).expect("valid path date regex"));

/// How a date is written at a template slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSlot {
    /// `yyyymmdd`
    Compact,
    /// `yyyy<first>mm<second>dd`, e.g. `2015/03/12`
    Separated { first: char, second: char },
}

impl DateSlot {
    pub fn render(self, date: NaiveDate) -> String {
        match self {
            DateSlot::Compact => date.format(COMPACT_DATE_FORMAT).to_string(),
            DateSlot::Separated { first, second } => format!(
                "{:04}{first}{:02}{second}{:02}",
                date.year(),
                date.month(),
                date.day()
            ),
        }
    }

    /// Whether this slot is the slashed (separated) form
    pub fn is_slashed(self) -> bool {
        matches!(self, DateSlot::Separated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Date(DateSlot),
}

/// File path skeleton with date slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePathTemplate {
    segments: Vec<Segment>,
}

impl DatePathTemplate {
    /// Derive a template from a concrete path
    ///
    /// Every 8-digit run and every `dddd?dd?dd` run becomes a date slot. A
    /// path without such a run yields a template with no slots, which
    /// resolves to the same path for every date.
    pub fn derive(example_path: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest_start = 0;

        for m in PATH_DATE.find_iter(example_path) {
            if m.start() > rest_start {
                segments.push(Segment::Literal(
                    example_path[rest_start..m.start()].to_string(),
                ));
            }
            segments.push(Segment::Date(slot_for(m.as_str())));
            rest_start = m.end();
        }
        if rest_start < example_path.len() {
            segments.push(Segment::Literal(example_path[rest_start..].to_string()));
        }

        let template = Self { segments };
        if template.date_slots() == 0 {
            warn!("No date found in file pattern '{example_path}': every date resolves to the same file");
        } else {
            debug!("Derived path template {template} from '{example_path}'");
        }
        template
    }

    /// Concrete path for a date
    pub fn instantiate(&self, date: NaiveDate) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Date(slot) => slot.render(date),
            })
            .collect()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn date_slots(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Date(_)))
            .count()
    }
}

impl fmt::Display for DatePathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{text}")?,
                Segment::Date(DateSlot::Compact) => write!(f, "{{yyyymmdd}}")?,
                Segment::Date(DateSlot::Separated { first, second }) => {
                    write!(f, "{{yyyy{first}mm{second}dd}}")?
                }
            }
        }
        Ok(())
    }
}

fn slot_for(run: &str) -> DateSlot {
    let mut chars = run.chars();
    match (chars.nth(4), chars.nth(2)) {
        (Some(first), Some(second)) if run.chars().count() > 8 => {
            DateSlot::Separated { first, second }
        }
        _ => DateSlot::Compact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compact_slot() {
        let template = DatePathTemplate::derive("/d/20150312/f.txt");
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("/d/".to_string()),
                Segment::Date(DateSlot::Compact),
                Segment::Literal("/f.txt".to_string()),
            ]
        );
        assert_eq!(template.instantiate(day(2015, 3, 13)), "/d/20150313/f.txt");
    }

    #[test]
    fn test_slashed_slot() {
        let template = DatePathTemplate::derive("/path/2015/03/12/report.txt.gz");
        assert_eq!(template.date_slots(), 1);
        assert!(matches!(
            template.segments()[1],
            Segment::Date(slot) if slot.is_slashed()
        ));
        assert_eq!(
            template.instantiate(day(2015, 2, 3)),
            "/path/2015/02/03/report.txt.gz"
        );
    }

    #[test]
    fn test_multiple_slots_same_date() {
        let template = DatePathTemplate::derive("/path/2015/03/12/prefix.20150312.txt");
        assert_eq!(template.date_slots(), 2);
        assert_eq!(
            template.instantiate(day(2015, 2, 3)),
            "/path/2015/02/03/prefix.20150203.txt"
        );
    }

    #[test]
    fn test_date_at_path_edges() {
        let template = DatePathTemplate::derive("20150312");
        assert_eq!(template.segments(), &[Segment::Date(DateSlot::Compact)]);
        assert_eq!(template.instantiate(day(2016, 1, 9)), "20160109");
    }

    #[test]
    fn test_round_trip_reproduces_example() {
        let cases = [
            ("/d/20150312/f.txt", day(2015, 3, 12)),
            ("/srv/2015/03/12/tbl.txt", day(2015, 3, 12)),
            ("logs/2015-03-12.stats.gz", day(2015, 3, 12)),
            ("a/2014.12.31/b-20141231.txt", day(2014, 12, 31)),
        ];
        for (example, date) in cases {
            assert_eq!(DatePathTemplate::derive(example).instantiate(date), example);
        }
    }

    #[test]
    fn test_no_date_is_constant_path() {
        let template = DatePathTemplate::derive("/static/table.txt");
        assert_eq!(template.date_slots(), 0);
        assert_eq!(template.instantiate(day(2015, 3, 12)), "/static/table.txt");
        assert_eq!(template.instantiate(day(2016, 1, 1)), "/static/table.txt");
    }

    #[test]
    fn test_digit_runs_that_are_not_dates() {
        // 9 digits have no word boundary after the eighth
        let template = DatePathTemplate::derive("/d/201503120/f.txt");
        assert_eq!(template.date_slots(), 0);
    }

    #[test]
    fn test_non_ascii_letter_before_date() {
        let template = DatePathTemplate::derive("/data/relevé20150312.txt");
        assert_eq!(template.date_slots(), 1);
        assert_eq!(
            template.instantiate(day(2015, 3, 13)),
            "/data/relevé20150313.txt"
        );

        let template = DatePathTemplate::derive("/données/2015/03/12/é.txt");
        assert_eq!(template.to_string(), "/données/{yyyy/mm/dd}/é.txt");
    }

    #[test]
    fn test_display() {
        let template = DatePathTemplate::derive("/x/2015/03/12/y.20150312");
        assert_eq!(template.to_string(), "/x/{yyyy/mm/dd}/y.{yyyymmdd}");
    }
}
