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

use crate::dataset::{Dataset, Value};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Accepted date/datetime layouts, tried in order. Classification is
/// locale-independent: a value is temporal only if one of these layouts
/// parses it.
pub const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y%m%d",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    Categorical,
}

/// Classifies one column from its non-null values. All-or-nothing: a single
/// value outside the candidate type demotes the whole column. A column with
/// no usable values is categorical by convention.
pub fn classify(dataset: &Dataset, column: &str) -> ColumnType {
    let values: Vec<&Value> = dataset
        .column_values(column)
        .filter(|v| !v.is_null())
        .collect();
    if values.is_empty() {
        return ColumnType::Categorical;
    }
    if values.iter().all(|v| matches!(v, Value::Number(_))) {
        return ColumnType::Numeric;
    }
    if values.iter().all(|v| is_date(v)) {
        return ColumnType::Date;
    }
    ColumnType::Categorical
}

/// Classifies every header once, in header order. Computed per dataset load
/// and held read-only for the rest of the session.
pub fn classify_all(dataset: &Dataset) -> IndexMap<String, ColumnType> {
    dataset
        .headers()
        .iter()
        .map(|header| (header.clone(), classify(dataset, header)))
        .collect()
}

fn is_date(value: &Value) -> bool {
    let Value::Text(text) = value else {
        return false;
    };
    let text = text.trim();
    DATE_FORMATS.iter().any(|format| {
        NaiveDateTime::parse_from_str(text, format).is_ok()
            || NaiveDate::parse_from_str(text, format).is_ok()
    })
}
