//! Configuration structures and validation.
//!
//! Turns an already parsed JSON configuration document into immutable,
//! validated [`GlobalConfig`] and [`TableConfig`] values. Every lookup of a
//! table option happens here once, so the parsing stages receive plain
//! typed values instead of consulting the raw document.

use crate::constants::{
    COMPACT_DATE_SHAPE, DEFAULT_HEADER_LINE, DEFAULT_START_LINE, LIST_SEPARATOR,
    SLASHED_DATE_SHAPE, YESTERDAY_TOKEN, keys,
};
use crate::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static COMPACT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMPACT_DATE_SHAPE).expect("valid compact date regex"));
static SLASHED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLASHED_DATE_SHAPE).expect("valid slashed date regex"));

/// End of the configured date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndDate {
    /// Explicit end date in `yyyy/mm/dd` form
    Date(String),
    /// The day before the current local date
    Yesterday,
}

/// Validated top-level configuration
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    /// Start of the date range in `yyyy/mm/dd` form
    pub start_date: String,
    pub end_date: EndDate,
    /// Table entries in declaration order, disabled ones included
    pub tables: Vec<TableConfig>,
}

/// One edge of a file's data region
///
/// A line number and a pattern are alternatives: when a pattern is
/// configured for an edge, its line number is never consulted.
#[derive(Debug, Clone)]
pub enum Boundary {
    /// Crossed on the line with this 1-based number
    Line(usize),
    /// Crossed on every line matching the expression
    Pattern(Regex),
    /// Never crossed
    Never,
}

impl Boundary {
    /// Whether the (trimmed) line at `line_number` crosses this boundary
    pub fn is_crossed_by(&self, line_number: usize, line: &str) -> bool {
        match self {
            Boundary::Line(n) => *n == line_number,
            Boundary::Pattern(regex) => regex.is_match(line),
            Boundary::Never => false,
        }
    }
}

/// Validated configuration of a single table
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub table_name: String,
    /// Example file path with an embedded date
    pub file_pattern: String,
    pub enabled: bool,
    /// 1-based header line; 0 means no line is ever the header
    pub header_line: usize,
    pub start: Boundary,
    pub end: Boundary,
    pub skip_pattern: Option<Regex>,
    pub skip_lines: HashSet<usize>,
    /// Compact (`yyyymmdd`) dates whose files are ignored
    pub skip_days: HashSet<String>,
}

impl GlobalConfig {
    /// Validate a parsed configuration document
    ///
    /// `start-date` and `tables` are required. Every table entry must carry
    /// `table-name` and `file-pattern` and be otherwise well formed, whether
    /// or not it is enabled.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::configuration(format!("configuration is not an object: {value}")))?;

        let start_date = slashed_date(required(object, keys::START_DATE)?, keys::START_DATE)?;

        let end_date = match object.get(keys::END_DATE) {
            None | Some(Value::Null) => EndDate::Yesterday,
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case(YESTERDAY_TOKEN) => {
                EndDate::Yesterday
            }
            Some(other) => EndDate::Date(slashed_date(other, keys::END_DATE)?),
        };

        let entries: Vec<&Value> = match required(object, keys::TABLES)? {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            other => {
                return Err(Error::configuration(format!(
                    "'{}' must be an array or an object of table entries: {other}",
                    keys::TABLES
                )));
            }
        };

        let tables = entries
            .into_iter()
            .map(TableConfig::from_value)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Validated configuration: start={}, end={:?}, {} tables",
            start_date,
            end_date,
            tables.len()
        );

        Ok(Self {
            start_date,
            end_date,
            tables,
        })
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::json("configuration is not valid JSON", e))?;
        Self::from_value(&value)
    }

    /// Tables marked as enabled, in declaration order
    pub fn enabled_tables(&self) -> impl Iterator<Item = &TableConfig> {
        self.tables.iter().filter(|table| table.enabled)
    }
}

impl TableConfig {
    /// Validate a single table entry
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::configuration(format!("table entry is not an object: {value}")))?;

        let table_name = string_value(object, keys::TABLE_NAME)?;
        let file_pattern = string_value(object, keys::FILE_PATTERN)?;
        let enabled = matches!(object.get(keys::ENABLED), Some(Value::Bool(true)));

        let header_line = line_number(object, keys::HEADER_LINE, DEFAULT_HEADER_LINE)?;

        let start = match pattern(object, keys::START_PATTERN)? {
            Some(regex) => Boundary::Pattern(regex),
            None => line_boundary(
                optional_int(object, keys::START_LINE)?.unwrap_or(DEFAULT_START_LINE as i64),
            ),
        };
        let end = match pattern(object, keys::END_PATTERN)? {
            Some(regex) => Boundary::Pattern(regex),
            None => match optional_int(object, keys::END_LINE)? {
                Some(n) => line_boundary(n),
                None => Boundary::Never,
            },
        };

        let skip_pattern = pattern(object, keys::SKIP_PATTERN)?;

        let skip_lines = list(object, keys::SKIP_LINES)?
            .into_iter()
            .map(|item| {
                item.parse::<usize>().map_err(|_| {
                    Error::configuration(format!(
                        "not a proper line number '{item}' in '{}': {}",
                        keys::SKIP_LINES,
                        Value::Object(object.clone())
                    ))
                })
            })
            .collect::<Result<HashSet<_>>>()?;

        let skip_days = list(object, keys::SKIP_DAYS)?.into_iter().collect();

        Ok(Self {
            table_name,
            file_pattern,
            enabled,
            header_line,
            start,
            end,
            skip_pattern,
            skip_lines,
            skip_days,
        })
    }

    /// Whether files of the given compact date are to be ignored
    pub fn skips_day(&self, compact_date: &str) -> bool {
        self.skip_days.contains(compact_date)
    }
}

fn required<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    object.get(key).ok_or_else(|| {
        Error::configuration(format!(
            "required config '{key}' not specified: {}",
            Value::Object(object.clone())
        ))
    })
}

fn string_value(object: &Map<String, Value>, key: &str) -> Result<String> {
    match required(object, key)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(Error::configuration(format!(
            "'{key}' must be a string, got {other}"
        ))),
    }
}

fn slashed_date(value: &Value, key: &str) -> Result<String> {
    let raw = value.as_str().ok_or_else(|| {
        Error::configuration(format!("'{key}' must be a date string, got {value}"))
    })?;
    normalize_date(raw, key)
}

/// Normalize a date given as `yyyymmdd` or `yyyy/mm/dd` to `yyyy/mm/dd`
///
/// Only the shape is checked here; `key` names the setting in errors.
pub fn normalize_date(raw: &str, key: &str) -> Result<String> {
    let raw = raw.trim();
    let slashed = if COMPACT_DATE.is_match(raw) {
        format!("{}/{}/{}", &raw[..4], &raw[4..6], &raw[6..])
    } else {
        raw.to_string()
    };

    if !SLASHED_DATE.is_match(&slashed) {
        return Err(Error::configuration(format!(
            "not a properly formatted date specified in '{key}': '{raw}'"
        )));
    }
    Ok(slashed)
}

fn optional_int(object: &Map<String, Value>, key: &str) -> Result<Option<i64>> {
    let parsed = match object.get(key) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    parsed.map(Some).ok_or_else(|| {
        Error::configuration(format!(
            "not a proper int in '{key}': {}",
            Value::Object(object.clone())
        ))
    })
}

/// Non-positive line numbers never match a line
fn line_number(object: &Map<String, Value>, key: &str, default: usize) -> Result<usize> {
    Ok(optional_int(object, key)?
        .map(|n| usize::try_from(n).unwrap_or(0))
        .unwrap_or(default))
}

fn line_boundary(n: i64) -> Boundary {
    match usize::try_from(n) {
        Ok(n) if n > 0 => Boundary::Line(n),
        _ => Boundary::Never,
    }
}

fn non_empty_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    let Some(value) = object.get(key) else {
        return Ok(None);
    };
    let s = value.as_str().ok_or_else(|| {
        Error::configuration(format!(
            "not a proper string pattern in '{key}': {}",
            Value::Object(object.clone())
        ))
    })?;
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::configuration(format!(
            "empty string pattern in '{key}': {}",
            Value::Object(object.clone())
        )));
    }
    Ok(Some(s.to_string()))
}

fn pattern(object: &Map<String, Value>, key: &str) -> Result<Option<Regex>> {
    non_empty_string(object, key)?
        .map(|s| {
            Regex::new(&s).map_err(|e| {
                Error::configuration(format!("invalid regular expression in '{key}': {e}"))
            })
        })
        .transpose()
}

fn list(object: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    Ok(non_empty_string(object, key)?
        .map(|s| {
            s.split(LIST_SEPARATOR)
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default())
}
