//! Core data structures for flattened tables.
//!
//! A [`Record`] is one table cell flattened into a value plus three
//! descriptive axes. A [`Table`] is the ordered record set of one configured
//! table together with the distinct values seen along each axis.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// The four semantic axes of a flattened record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// The raw cell value, never treated as a categorical axis
    Value,
    /// `"<columnIndex>-<headerName>"`
    Column,
    /// `"<rowNumber>-<firstColumnValue>"`
    Row,
    /// Compact file date, `yyyymmdd`
    Date,
}

impl Dimension {
    /// Descriptive dimensions that carry metadata
    pub const DESCRIPTIVE: [Dimension; 3] = [Dimension::Column, Dimension::Row, Dimension::Date];

    /// Positional index of this dimension within a record
    pub fn index(self) -> usize {
        match self {
            Dimension::Value => 0,
            Dimension::Column => 1,
            Dimension::Row => 2,
            Dimension::Date => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// One flattened table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub value: String,
    pub column: String,
    pub row: String,
    pub date: String,
}

impl Record {
    pub fn new(
        value: impl Into<String>,
        column: impl Into<String>,
        row: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            column: column.into(),
            row: row.into(),
            date: date.into(),
        }
    }

    /// Field of this record along a dimension
    pub fn get(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Value => &self.value,
            Dimension::Column => &self.column,
            Dimension::Row => &self.row,
            Dimension::Date => &self.date,
        }
    }
}

/// Serialized as a 4-element array `[value, column, row, date]`
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.value, &self.column, &self.row, &self.date).serialize(serializer)
    }
}

/// Distinct values per descriptive dimension, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionMeta {
    values: BTreeMap<Dimension, Vec<String>>,
}

impl DimensionMeta {
    /// Scan records once, collecting distinct descriptive values
    pub fn from_records(records: &[Record]) -> Self {
        let mut values: BTreeMap<Dimension, Vec<String>> = BTreeMap::new();
        let mut seen: BTreeMap<Dimension, HashSet<&str>> = BTreeMap::new();

        for record in records {
            for dimension in Dimension::DESCRIPTIVE {
                let field = record.get(dimension);
                if seen.entry(dimension).or_default().insert(field) {
                    values.entry(dimension).or_default().push(field.to_string());
                }
            }
        }

        Self { values }
    }

    /// Distinct values of a dimension; empty for [`Dimension::Value`]
    pub fn get(&self, dimension: Dimension) -> &[String] {
        self.values
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serialized as an object keyed by dimension index: `{"1": [..], ..}`
impl Serialize for DimensionMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (dimension, values) in &self.values {
            map.serialize_entry(&dimension.to_string(), values)?;
        }
        map.end()
    }
}

/// A flattened table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub data: Vec<Record>,
    pub meta: DimensionMeta,
}

impl Table {
    /// Build a table, deriving its metadata from the records
    pub fn new(name: impl Into<String>, data: Vec<Record>) -> Self {
        let meta = DimensionMeta::from_records(&data);
        Self {
            name: name.into(),
            data,
            meta,
        }
    }
}
