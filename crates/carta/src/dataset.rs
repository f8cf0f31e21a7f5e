// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{DataError, DataResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// A single cell. Upstream ingestion applies row-level dynamic typing, so
/// numeric-looking strings arrive here already as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell: numbers pass through, strings are parsed,
    /// anything else is not a number. Mirrors what a `parseFloat`-style
    /// aggregation accepts.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Category-label rendering of the cell. Integral numbers print without
    /// a trailing `.0` so bucket keys look the way they did in the source.
    pub fn to_label(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    /// Natural ascending order for category values: numbers compare
    /// numerically and sort before everything else, remaining values compare
    /// by their label text.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self.to_f64(), other.to_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_label().cmp(&other.to_label()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_label())
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub type Row = IndexMap<String, Value>;

/// An in-memory tabular dataset: ordered rows of column-name to value
/// mappings. The header set is derived from the first row and assumed stable
/// across all rows; cells absent from a row read as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn from_records(rows: Vec<Row>) -> DataResult<Self> {
        let first = rows.first().ok_or(DataError::EmptyDataset)?;
        let headers = first.keys().cloned().collect();
        Ok(Self { headers, rows })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> DataResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row = Row::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                let cell = record.get(i).unwrap_or("");
                row.insert(header.clone(), dynamic_type(cell));
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        Ok(Self { headers, rows })
    }

    /// Accepts the upstream parser's native form: a JSON array of row
    /// objects, one mapping per row.
    pub fn from_json_records(json: &str) -> DataResult<Self> {
        let rows: Vec<Row> = serde_json::from_str(json)?;
        Self::from_records(rows)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_csv_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn cell<'a>(&'a self, row: &'a Row, column: &str) -> &'a Value {
        row.get(column).unwrap_or(&Value::Null)
    }

    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&Value::Null))
    }
}

/// Row-level dynamic typing for CSV cells: empty cells become null, numeric
/// text becomes a number, boolean literals become booleans, everything else
/// stays text.
fn dynamic_type(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<f64>() {
        return Value::Number(n);
    }
    match cell {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Text(cell.to_string()),
    }
}
