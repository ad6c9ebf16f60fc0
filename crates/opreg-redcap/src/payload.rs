//! Raw export payloads.
//!
//! The registry answers a flat JSON export with an array of objects whose
//! values are all strings. Values of other JSON types are coerced to strings
//! here so that downstream code only ever sees text.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde_json::Value;

use crate::error::{FetchError, Result};

/// One exported record: field name to raw string value.
pub type RawRecord = BTreeMap<String, String>;

/// The records returned by one export call, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPayload {
    records: Vec<RawRecord>,
}

impl RecordPayload {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON export body (or a saved export file).
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_json_value(value)
    }

    /// Convert a decoded JSON export into records.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            // An error object ({"error": "..."}) arrives with status 200 on some servers.
            return Err(FetchError::Decode(describe_non_array(&value)));
        };
        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let Value::Object(fields) = item else {
                return Err(FetchError::Decode(format!(
                    "record {idx} is not a JSON object"
                )));
            };
            let record = fields
                .into_iter()
                .map(|(name, value)| (name, coerce_to_string(value)))
                .collect();
            records.push(record);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names across all records, sorted.
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|record| record.keys().map(String::as_str))
            .collect()
    }

    /// Build a string-typed data frame, one column per field.
    ///
    /// Missing and empty cells become nulls. Returns `None` for an empty
    /// payload so callers must handle the "no data" case explicitly.
    pub fn to_frame(&self) -> Result<Option<DataFrame>> {
        if self.records.is_empty() {
            return Ok(None);
        }
        let columns: Vec<Column> = self
            .column_names()
            .into_iter()
            .map(|name| {
                let values: Vec<Option<String>> = self
                    .records
                    .iter()
                    .map(|record| {
                        record
                            .get(name)
                            .map(|value| value.trim())
                            .filter(|value| !value.is_empty())
                            .map(str::to_string)
                    })
                    .collect();
                Series::new(name.into(), values).into_column()
            })
            .collect();
        Ok(Some(DataFrame::new(columns)?))
    }
}

fn coerce_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => if b { "1" } else { "0" }.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn describe_non_array(value: &Value) -> String {
    match value.get("error").and_then(Value::as_str) {
        Some(message) => format!("registry error: {message}"),
        None => "expected a JSON array of records".to_string(),
    }
}
