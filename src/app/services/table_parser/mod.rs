//! Table-row parser for whitespace-delimited table files
//!
//! Turns the lines of one file into flattened [`Record`]s, selecting the
//! data lines by the per-table rules of a [`TableConfig`]: header line,
//! line-number or pattern region boundaries, skipped lines and patterns.
//!
//! ## Architecture
//!
//! - [`parser`] - File reading and line-by-line record extraction
//! - [`region`] - Data region tracking across a single pass
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust,no_run
//! use table_flattener::app::adapters::filesystem::LocalFileSystem;
//! use table_flattener::app::services::table_parser::{ParseOutcome, TableParser};
//! use table_flattener::config::TableConfig;
//!
//! # fn example(config: &TableConfig) -> table_flattener::Result<()> {
//! let parser = TableParser::new(config);
//! if let ParseOutcome::Parsed(result) =
//!     parser.parse_file(&LocalFileSystem, "/d/20150312/f.txt", "20150312")?
//! {
//!     println!("{} records from {} rows", result.records.len(), result.stats.rows_accepted);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Record`]: crate::app::models::Record
//! [`TableConfig`]: crate::config::TableConfig

pub mod parser;
pub mod region;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::TableParser;
pub use region::DataRegion;
pub use stats::{ParseOutcome, ParseResult, ParseStats};
