//! Test utilities for table parser testing
//!
//! Shared configuration builders and sample table contents used across the
//! parser test modules.

use serde_json::{Value, json};

use crate::app::models::Record;
use crate::config::TableConfig;


/// Build a table configuration from a base entry plus extra keys
pub fn table_config(extra: Value) -> TableConfig {
    let mut entry = json!({
        "table-name": "T",
        "file-pattern": "/d/20150312/f.txt",
        "enabled": true
    });
    if let (Some(target), Value::Object(source)) = (entry.as_object_mut(), extra) {
        target.extend(source);
    }
    TableConfig::from_value(&entry).unwrap()
}

/// Three-column table with two data rows
pub fn simple_table() -> &'static str {
    "A B C\n1 2 3\n4 5 6\n"
}

/// Report with a preamble, a header, a titled block and a footer
///
/// ```text
///  1  Daily report
///  2  Name  Open  Close
///  3  -----
///  4  BEGIN
///  5  alpha 10 11
///  6  # comment
///  7  beta  20 21
///  8
///  9  gamma 30 31
/// 10  END
/// 11  total 60 63
/// ```
pub fn report_table() -> &'static str {
    "Daily report\n\
     Name  Open  Close\n\
     -----\n\
     BEGIN\n\
     alpha 10 11\n\
     # comment\n\
     beta  20 21\n\
     \n\
     gamma 30 31\n\
     END\n\
     total 60 63"
}

/// Values of records in order
pub fn values(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.value.as_str()).collect()
}

/// Row labels of records, deduplicated in order
pub fn row_labels(records: &[Record]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for record in records {
        if labels.last() != Some(&record.row.as_str()) {
            labels.push(record.row.as_str());
        }
    }
    labels
}
