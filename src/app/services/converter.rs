//! Conversion entry point.
//!
//! Expands the configured date range once, then builds one [`Table`] per
//! enabled table entry in declaration order. Disabled entries contribute
//! nothing to the output.

use crate::app::adapters::filesystem::{FileSource, LocalFileSystem};
use crate::app::models::Table;
use crate::app::services::date_range::date_range;
use crate::app::services::table_aggregator::{AggregateResult, TableAggregator};
use crate::config::{GlobalConfig, TableConfig};
use crate::Result;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::debug;

/// Convert using the local filesystem and the local clock
pub fn convert(config: &GlobalConfig) -> Result<Vec<Table>> {
    Converter::new(LocalFileSystem).convert(config)
}

/// Validate a parsed configuration document, then [`convert`] it
pub fn convert_value(value: &Value) -> Result<Vec<Table>> {
    convert(&GlobalConfig::from_value(value)?)
}

/// Conversion driver over a file source
#[derive(Debug, Clone)]
pub struct Converter<S: FileSource> {
    source: S,
    today: NaiveDate,
}

impl<S: FileSource> Converter<S> {
    /// Converter anchored at the current local date
    pub fn new(source: S) -> Self {
        Self {
            source,
            today: Local::now().date_naive(),
        }
    }

    /// Anchor "yesterday" at a fixed date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Slashed dates covered by the configuration
    pub fn dates(&self, config: &GlobalConfig) -> Result<Vec<String>> {
        date_range(&config.start_date, &config.end_date, self.today)
    }

    /// Build a single table over already expanded dates
    pub fn convert_table(&self, table: &TableConfig, dates: &[String]) -> Result<AggregateResult> {
        TableAggregator::new(&self.source).aggregate(table, dates)
    }

    /// All enabled tables with their build statistics
    pub fn convert_detailed(&self, config: &GlobalConfig) -> Result<Vec<AggregateResult>> {
        let dates = self.dates(config)?;

        config
            .tables
            .iter()
            .filter(|table| {
                if !table.enabled {
                    debug!("Table {} is disabled", table.table_name);
                }
                table.enabled
            })
            .map(|table| self.convert_table(table, &dates))
            .collect()
    }

    /// All enabled tables in configured order
    pub fn convert(&self, config: &GlobalConfig) -> Result<Vec<Table>> {
        Ok(self
            .convert_detailed(config)?
            .into_iter()
            .map(|result| result.table)
            .collect())
    }
}
