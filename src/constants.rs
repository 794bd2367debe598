//! Application constants for the table flattener
//!
//! Default values, configuration keys and file conventions used throughout
//! the library and the CLI.

// =============================================================================
// Configuration Keys
// =============================================================================

/// Top-level configuration keys
pub mod keys {
    pub const START_DATE: &str = "start-date";
    pub const END_DATE: &str = "end-date";
    pub const TABLES: &str = "tables";

    pub const TABLE_NAME: &str = "table-name";
    pub const FILE_PATTERN: &str = "file-pattern";
    pub const ENABLED: &str = "enabled";
    pub const HEADER_LINE: &str = "header-line";
    pub const START_LINE: &str = "start-line";
    pub const END_LINE: &str = "end-line";
    pub const START_PATTERN: &str = "start-pattern";
    pub const END_PATTERN: &str = "end-pattern";
    pub const SKIP_PATTERN: &str = "skip-pattern";
    pub const SKIP_LINES: &str = "skip-lines";
    pub const SKIP_DAYS: &str = "skip-days";
}

// =============================================================================
// Parsing Defaults
// =============================================================================

/// Default 1-based line number of the header line
pub const DEFAULT_HEADER_LINE: usize = 1;

/// Default 1-based line number where the data region starts
pub const DEFAULT_START_LINE: usize = 2;

/// Separator for `skip-lines` and `skip-days` lists
pub const LIST_SEPARATOR: char = ',';

/// Token meaning "the day before today" for `end-date`
pub const YESTERDAY_TOKEN: &str = "yesterday";

// =============================================================================
// Date Formats
// =============================================================================

/// Slashed date format (`yyyy/mm/dd`), the canonical form of the date range
pub const SLASHED_DATE_FORMAT: &str = "%Y/%m/%d";

/// Compact date format (`yyyymmdd`), used in records and `skip-days`
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Accepted shape of a configured compact date
pub const COMPACT_DATE_SHAPE: &str = r"^20[0-9]{6}$";

/// Accepted shape of a configured slashed date
pub const SLASHED_DATE_SHAPE: &str = r"^20[0-9]{2}/[0-9]{2}/[0-9]{2}$";

/// Date-shaped runs recognized inside example file paths
///
/// Word boundaries are ASCII-only, so a non-ASCII letter next to the date
/// still counts as a boundary.
pub const PATH_DATE_PATTERN: &str = r"(?-u:\b)[0-9]{8}(?-u:\b)|(?-u:\b)[0-9]{4}.[0-9]{2}.[0-9]{2}(?-u:\b)";

// =============================================================================
// Files
// =============================================================================

/// File suffix that triggers gzip decompression
pub const GZIP_SUFFIX: &str = ".gz";

/// Configuration file name looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application directory name under the user config directory
pub const APP_DIR_NAME: &str = "table-flattener";

/// Tracing target used for the default log filter
pub const LOG_TARGET: &str = "table_flattener";
