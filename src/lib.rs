//! Table Flattener Library
//!
//! A Rust library for converting sequences of dated, whitespace-delimited
//! text tables into a normalized multi-dimensional record set, driven by a
//! declarative JSON configuration instead of per-format code.
//!
//! This library provides tools for:
//! - Expanding a start/end date pair into an ordered day sequence
//! - Deriving reusable date-substitution templates from one example path
//! - Parsing table files with configurable line/pattern data regions
//! - Aggregating per-table records and per-dimension metadata
//! - Transparent gzip decompression and tolerant handling of missing files

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod converter;
        pub mod date_range;
        pub mod path_pattern;
        pub mod table_aggregator;
        pub mod table_parser;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Dimension, Record, Table};
pub use app::services::converter::{Converter, convert, convert_value};
pub use config::{GlobalConfig, TableConfig};

/// Result type alias for table flattening operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for table flattening operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration key, date string, line or pattern value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A data line's token count does not match the header's
    #[error(
        "Row shape error in file '{file}': row #{line} contains {found} items, but there are {expected} headers"
    )]
    RowShape {
        file: String,
        line: usize,
        found: usize,
        expected: usize,
    },

    /// A date range endpoint is not a calendar date
    #[error("Date range error: {message}")]
    DateRange { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid JSON
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a row shape error
    pub fn row_shape(file: impl Into<String>, line: usize, found: usize, expected: usize) -> Self {
        Self::RowShape {
            file: file.into(),
            line,
            found,
            expected,
        }
    }

    /// Create a date range error
    pub fn date_range(message: impl Into<String>) -> Self {
        Self::DateRange {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON parsing failed".to_string(),
            source: error,
        }
    }
}
