//! Parsing statistics and result structures for table files

use crate::app::models::Record;

/// Records of one file with basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Records in line-then-column order
    pub records: Vec<Record>,

    pub stats: ParseStats,
}

/// Outcome of parsing one dated file
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Parsed(ParseResult),
    /// The file's date is listed in `skip-days`; it was not read
    SkippedDay,
}

impl ParseOutcome {
    /// Records of a parsed file, none for a skipped day
    pub fn into_records(self) -> Vec<Record> {
        match self {
            ParseOutcome::Parsed(result) => result.records,
            ParseOutcome::SkippedDay => Vec::new(),
        }
    }
}

/// Line accounting for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    /// Lines in the file, blank ones included
    pub total_lines: usize,

    pub blank_lines: usize,

    /// Number of data rows turned into records
    pub rows_accepted: usize,

    /// Non-blank lines after the header that were not data rows
    pub lines_excluded: usize,

    /// Whether a header line was found
    pub header_found: bool,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }
}
