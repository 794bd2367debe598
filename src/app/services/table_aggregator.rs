//! Per-table aggregation across the date range.
//!
//! Resolves one file per date from the table's path template, parses the
//! files that exist and concatenates their records in date order. Missing
//! files are expected gaps, not errors; a file that fails to parse aborts
//! the whole table.

use crate::app::adapters::filesystem::FileSource;
use crate::app::models::Table;
use crate::app::services::date_range::{compact_from_slashed, parse_slashed};
use crate::app::services::path_pattern::DatePathTemplate;
use crate::app::services::table_parser::{ParseOutcome, TableParser};
use crate::config::TableConfig;
use crate::Result;
use tracing::{debug, info};

/// File accounting for one table
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AggregateStats {
    pub dates: usize,
    pub files_found: usize,
    pub files_missing: usize,
    pub days_skipped: usize,
    pub rows: usize,
    pub records: usize,
}

/// A table with the accounting of how it was built
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub table: Table,
    pub stats: AggregateStats,
}

/// Builds tables from dated files
#[derive(Debug)]
pub struct TableAggregator<'s, S: FileSource + ?Sized> {
    source: &'s S,
}

impl<'s, S: FileSource + ?Sized> TableAggregator<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self { source }
    }

    /// Build the table for `config` over `dates` (`yyyy/mm/dd`)
    pub fn aggregate(&self, config: &TableConfig, dates: &[String]) -> Result<AggregateResult> {
        let template = DatePathTemplate::derive(&config.file_pattern);
        info!(
            ">> processing: {} (pattern: {})",
            config.table_name, template
        );

        let parser = TableParser::new(config);
        let mut stats = AggregateStats {
            dates: dates.len(),
            ..Default::default()
        };
        let mut data = Vec::new();

        for date in dates {
            let path = template.instantiate(parse_slashed(date)?);
            if !self.source.exists(&path) {
                debug!("No file for {}: {}", date, path);
                stats.files_missing += 1;
                continue;
            }
            stats.files_found += 1;
            debug!("Reading {} for {}", path, date);

            match parser.parse_file(self.source, &path, &compact_from_slashed(date))? {
                ParseOutcome::Parsed(result) => {
                    stats.rows += result.stats.rows_accepted;
                    data.extend(result.records);
                }
                ParseOutcome::SkippedDay => stats.days_skipped += 1,
            }
        }

        stats.records = data.len();
        let table = Table::new(config.table_name.clone(), data);

        info!(
            "Completed {}: {} files ({} missing, {} skipped), {} records",
            table.name, stats.files_found, stats.files_missing, stats.days_skipped, stats.records
        );

        Ok(AggregateResult { table, stats })
    }
}
