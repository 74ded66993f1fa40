//! Reading of JSON-lines files into row-sets.

use super::EtlError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// The records of one source file, as rows of named columns.
///
/// Columns are the union of the keys of every row, in first-seen order. A row that
/// does not carry a column simply has no value for it.
#[derive(Debug, Default, Clone)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl RowSet {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        RowSet { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds a row-set from JSON objects. Values that are not objects are ignored.
    #[cfg(test)]
    pub(crate) fn from_values(values: Vec<Value>) -> Self {
        RowSet::from_rows(
            values
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Deserializes row `index` into a typed record.
    pub fn record<T: DeserializeOwned>(&self, index: usize) -> Option<serde_json::Result<T>> {
        self.rows
            .get(index)
            .map(|row| serde_json::from_value(Value::Object(row.clone())))
    }
}

/// Parses `path` as one JSON object per line. Blank lines are ignored.
///
/// Any other line that is not a JSON object makes the whole file fail.
pub fn read_json_lines(path: &Path) -> Result<RowSet, EtlError> {
    let io_error = |source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_error)?);

    let mut rows = Vec::new();
    for (line_index, line) in reader.lines().enumerate() {
        let parse_error = |message: String| EtlError::Parse {
            path: path.to_path_buf(),
            line: line_index + 1,
            message,
        };
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(parse_error(e.to_string()))
            }
            Err(e) => return Err(io_error(e)),
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(Value::Object(row)) => rows.push(row),
            Ok(other) => {
                return Err(parse_error(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
            Err(e) => return Err(parse_error(e.to_string())),
        }
    }
    Ok(RowSet::from_rows(rows))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
