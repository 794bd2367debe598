//! Core table file parser implementation
//!
//! Handles the skip-day check, file reading and the single pass over a
//! file's lines that turns data rows into flattened records.

use tracing::debug;

use super::region::DataRegion;
use super::stats::{ParseOutcome, ParseResult, ParseStats};
use crate::app::adapters::filesystem::FileSource;
use crate::app::models::Record;
use crate::config::TableConfig;
use crate::{Error, Result};

/// Parser for the files of one configured table
#[derive(Debug, Clone, Copy)]
pub struct TableParser<'a> {
    config: &'a TableConfig,
}

impl<'a> TableParser<'a> {
    pub fn new(config: &'a TableConfig) -> Self {
        Self { config }
    }

    /// Parse the file at `path` holding the table for `date` (`yyyymmdd`)
    ///
    /// Days listed in `skip-days` are reported as [`ParseOutcome::SkippedDay`]
    /// without touching the file.
    pub fn parse_file<S>(&self, source: &S, path: &str, date: &str) -> Result<ParseOutcome>
    where
        S: FileSource + ?Sized,
    {
        if self.config.skips_day(date) {
            debug!("Skipping {} for configured skip day {}", path, date);
            return Ok(ParseOutcome::SkippedDay);
        }

        let content = source.read_text(path)?;
        let result = self.parse_content(&content, path, date)?;

        debug!(
            "Parsed {}: {} rows, {} records, {} lines excluded",
            path,
            result.stats.rows_accepted,
            result.records.len(),
            result.stats.lines_excluded
        );

        Ok(ParseOutcome::Parsed(result))
    }

    /// Parse file content already in memory
    ///
    /// `file` only labels errors. Line numbers are 1-based positions in the
    /// content; blank lines count toward them but are otherwise ignored. A
    /// data row whose token count differs from the header's fails the
    /// whole file.
    pub fn parse_content(&self, content: &str, file: &str, date: &str) -> Result<ParseResult> {
        let config = self.config;
        let mut stats = ParseStats::new();
        let mut records = Vec::new();
        let mut headers: Option<Vec<&str>> = None;
        let mut region = DataRegion::new(&config.start, &config.end);
        let mut row = 0usize;

        for (index, raw_line) in content.split('\n').enumerate() {
            let line_number = index + 1;
            stats.total_lines = line_number;

            let line = raw_line.trim();
            if line.is_empty() {
                stats.blank_lines += 1;
                continue;
            }

            if line_number == config.header_line {
                headers = Some(line.split_whitespace().collect());
                stats.header_found = true;
                continue;
            }
            let Some(headers) = headers.as_deref() else {
                continue;
            };

            let in_region = region.advance(line_number, line);
            if !in_region || self.is_skipped(line_number, line) {
                stats.lines_excluded += 1;
                continue;
            }

            let datums: Vec<&str> = line.split_whitespace().collect();
            if datums.len() != headers.len() {
                return Err(Error::row_shape(
                    file,
                    line_number,
                    datums.len(),
                    headers.len(),
                ));
            }

            row += 1;
            let row_label = format!("{row}-{}", datums[0]);
            for (column, (value, header)) in datums.iter().zip(headers).enumerate().skip(1) {
                records.push(Record::new(
                    *value,
                    format!("{column}-{header}"),
                    row_label.as_str(),
                    date,
                ));
            }
        }

        stats.rows_accepted = row;
        Ok(ParseResult { records, stats })
    }

    fn is_skipped(&self, line_number: usize, line: &str) -> bool {
        self.config.skip_lines.contains(&line_number)
            || self
                .config
                .skip_pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(line))
    }
}
