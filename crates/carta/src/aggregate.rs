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
use crate::error::{DataError, DataResult};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    #[default]
    Sum,
    #[serde(rename = "avg")]
    Average,
    Count,
    None,
}

impl AggregationMethod {
    pub fn key(&self) -> &'static str {
        match self {
            AggregationMethod::Sum => "sum",
            AggregationMethod::Average => "avg",
            AggregationMethod::Count => "count",
            AggregationMethod::None => "none",
        }
    }

    pub fn from_key(key: &str) -> Option<AggregationMethod> {
        match key {
            "sum" => Some(AggregationMethod::Sum),
            "avg" => Some(AggregationMethod::Average),
            "count" => Some(AggregationMethod::Count),
            "none" => Some(AggregationMethod::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Aggregation output: bucket labels plus one or more value sequences
/// aligned to them. `skipped_rows` counts rows dropped for a non-numeric
/// value cell; the caller surfaces that once as an advisory warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub labels: Vec<String>,
    pub series: Vec<SeriesData>,
    pub skipped_rows: usize,
}

#[derive(Default)]
struct Bucket {
    total: f64,
    valid: usize,
}

/// Reduces rows into one series of per-category scalars.
///
/// `None` passes every row through unaggregated, in row order, with
/// non-numeric value cells preserved as null points. The other methods
/// bucket rows by the category cell (null categories are skipped) in
/// first-seen order; `Sum`/`Average` drop rows whose value cell does not
/// parse as a number and report them via `skipped_rows`, `Count` counts
/// rows regardless of the value cell. An average bucket left with no valid
/// rows yields 0.
pub fn aggregate(
    dataset: &Dataset,
    x: &str,
    y: &str,
    method: AggregationMethod,
) -> DataResult<AggregatedSeries> {
    require_columns(dataset, &[x, y])?;

    if method == AggregationMethod::None {
        let labels = dataset
            .column_values(x)
            .map(Value::to_label)
            .collect::<Vec<_>>();
        let values = dataset.column_values(y).map(Value::to_f64).collect();
        return Ok(AggregatedSeries {
            labels,
            series: vec![SeriesData {
                name: y.to_string(),
                values,
            }],
            skipped_rows: 0,
        });
    }

    let mut buckets: IndexMap<String, Bucket> = IndexMap::new();
    let mut skipped_rows = 0usize;
    for row in dataset.rows() {
        let category = dataset.cell(row, x);
        if category.is_null() {
            continue;
        }
        let contribution = if method == AggregationMethod::Count {
            1.0
        } else {
            match dataset.cell(row, y).to_f64() {
                Some(v) => v,
                None => {
                    skipped_rows += 1;
                    continue;
                }
            }
        };
        let bucket = buckets.entry(category.to_label()).or_default();
        bucket.total += contribution;
        bucket.valid += 1;
    }

    let mut labels = Vec::with_capacity(buckets.len());
    let mut values = Vec::with_capacity(buckets.len());
    for (label, bucket) in buckets {
        let value = match method {
            AggregationMethod::Average => {
                if bucket.valid > 0 {
                    bucket.total / bucket.valid as f64
                } else {
                    0.0
                }
            }
            _ => bucket.total,
        };
        labels.push(label);
        values.push(Some(value));
    }
    Ok(AggregatedSeries {
        labels,
        series: vec![SeriesData {
            name: y.to_string(),
            values,
        }],
        skipped_rows,
    })
}

/// Reduces rows into one summed series per distinct group value. Labels are
/// the distinct category values in ascending natural order, groups likewise;
/// a (group, category) pair with no rows contributes 0. Rows with a null
/// category, a null group, or a non-numeric value cell are skipped silently.
pub fn aggregate_grouped(
    dataset: &Dataset,
    x: &str,
    y: &str,
    group_by: &str,
) -> DataResult<AggregatedSeries> {
    require_columns(dataset, &[x, y, group_by])?;

    let mut sums: HashMap<(String, String), f64> = HashMap::new();
    let mut categories: Vec<Value> = Vec::new();
    let mut groups: Vec<Value> = Vec::new();
    let mut seen_categories: HashSet<String> = HashSet::new();
    let mut seen_groups: HashSet<String> = HashSet::new();

    for row in dataset.rows() {
        let category = dataset.cell(row, x);
        let group = dataset.cell(row, group_by);
        if category.is_null() || group.is_null() {
            continue;
        }
        let Some(value) = dataset.cell(row, y).to_f64() else {
            continue;
        };
        let category_label = category.to_label();
        let group_label = group.to_label();
        if seen_categories.insert(category_label.clone()) {
            categories.push(category.clone());
        }
        if seen_groups.insert(group_label.clone()) {
            groups.push(group.clone());
        }
        *sums.entry((group_label, category_label)).or_insert(0.0) += value;
    }

    let labels: Vec<String> = categories
        .into_iter()
        .sorted_by(|a, b| a.natural_cmp(b))
        .map(|v| v.to_label())
        .collect();
    let series = groups
        .into_iter()
        .sorted_by(|a, b| a.natural_cmp(b))
        .map(|group| {
            let group_label = group.to_label();
            let values = labels
                .iter()
                .map(|label| {
                    Some(
                        sums.get(&(group_label.clone(), label.clone()))
                            .copied()
                            .unwrap_or(0.0),
                    )
                })
                .collect();
            SeriesData {
                name: group_label,
                values,
            }
        })
        .collect();

    Ok(AggregatedSeries {
        labels,
        series,
        skipped_rows: 0,
    })
}

fn require_columns(dataset: &Dataset, columns: &[&str]) -> DataResult<()> {
    for column in columns {
        if !dataset.has_column(column) {
            return Err(DataError::ColumnNotFound {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;

    fn rows(entries: &[(&str, Value)]) -> Dataset {
        let rows: Vec<Row> = entries
            .iter()
            .map(|(cat, val)| {
                let mut row = Row::new();
                row.insert("cat".to_string(), Value::Text(cat.to_string()));
                row.insert("val".to_string(), val.clone());
                row
            })
            .collect();
        Dataset::from_records(rows).unwrap()
    }

    fn sample() -> Dataset {
        rows(&[
            ("A", Value::Number(1.0)),
            ("A", Value::Number(3.0)),
            ("B", Value::Number(2.0)),
        ])
    }

    fn scalar_values(result: &AggregatedSeries) -> Vec<f64> {
        result.series[0]
            .values
            .iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn sum_buckets_in_first_seen_order() {
        let result = aggregate(&sample(), "cat", "val", AggregationMethod::Sum).unwrap();
        assert_eq!(result.labels, ["A", "B"]);
        assert_eq!(scalar_values(&result), [4.0, 2.0]);
        assert_eq!(result.skipped_rows, 0);
    }

    #[test]
    fn average_divides_by_valid_rows() {
        let result = aggregate(&sample(), "cat", "val", AggregationMethod::Average).unwrap();
        assert_eq!(scalar_values(&result), [2.0, 2.0]);
    }

    #[test]
    fn count_ignores_the_value_cell() {
        let result = aggregate(&sample(), "cat", "val", AggregationMethod::Count).unwrap();
        assert_eq!(scalar_values(&result), [2.0, 1.0]);
    }

    #[test]
    fn non_numeric_rows_are_skipped_and_counted() {
        let dataset = rows(&[
            ("A", Value::Text("x".into())),
            ("A", Value::Number(5.0)),
        ]);
        let result = aggregate(&dataset, "cat", "val", AggregationMethod::Sum).unwrap();
        assert_eq!(result.labels, ["A"]);
        assert_eq!(scalar_values(&result), [5.0]);
        assert_eq!(result.skipped_rows, 1);
    }

    #[test]
    fn pass_through_keeps_row_order_and_duplicates() {
        let dataset = rows(&[
            ("A", Value::Number(1.0)),
            ("A", Value::Text("oops".into())),
            ("B", Value::Number(2.0)),
        ]);
        let result = aggregate(&dataset, "cat", "val", AggregationMethod::None).unwrap();
        assert_eq!(result.labels, ["A", "A", "B"]);
        assert_eq!(
            result.series[0].values,
            vec![Some(1.0), None, Some(2.0)]
        );
        assert_eq!(result.skipped_rows, 0);
    }

    #[test]
    fn null_categories_are_skipped() {
        let mut null_row = Row::new();
        null_row.insert("cat".to_string(), Value::Null);
        null_row.insert("val".to_string(), Value::Number(9.0));
        let mut ok_row = Row::new();
        ok_row.insert("cat".to_string(), Value::Text("A".into()));
        ok_row.insert("val".to_string(), Value::Number(1.0));
        let dataset = Dataset::from_records(vec![null_row, ok_row]).unwrap();
        let result = aggregate(&dataset, "cat", "val", AggregationMethod::Sum).unwrap();
        assert_eq!(result.labels, ["A"]);
        assert_eq!(scalar_values(&result), [1.0]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = aggregate(&sample(), "cat", "nope", AggregationMethod::Sum).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound { .. }));
    }

    fn grouped_dataset() -> Dataset {
        let entries = [
            ("Q2", "west", 4.0),
            ("Q1", "east", 1.0),
            ("Q1", "west", 2.0),
            ("Q2", "east", 3.0),
            ("Q1", "east", 10.0),
        ];
        let rows: Vec<Row> = entries
            .iter()
            .map(|(cat, group, val)| {
                let mut row = Row::new();
                row.insert("cat".to_string(), Value::Text(cat.to_string()));
                row.insert("grp".to_string(), Value::Text(group.to_string()));
                row.insert("val".to_string(), Value::Number(*val));
                row
            })
            .collect();
        Dataset::from_records(rows).unwrap()
    }

    #[test]
    fn grouped_sums_align_to_sorted_labels() {
        let result = aggregate_grouped(&grouped_dataset(), "cat", "val", "grp").unwrap();
        assert_eq!(result.labels, ["Q1", "Q2"]);
        assert_eq!(result.series.len(), 2);
        assert_eq!(result.series[0].name, "east");
        assert_eq!(result.series[0].values, vec![Some(11.0), Some(3.0)]);
        assert_eq!(result.series[1].name, "west");
        assert_eq!(result.series[1].values, vec![Some(2.0), Some(4.0)]);
    }

    #[test]
    fn grouped_fills_missing_combinations_with_zero() {
        let entries = [("Q1", "east", 1.0), ("Q2", "west", 5.0)];
        let rows: Vec<Row> = entries
            .iter()
            .map(|(cat, group, val)| {
                let mut row = Row::new();
                row.insert("cat".to_string(), Value::Text(cat.to_string()));
                row.insert("grp".to_string(), Value::Text(group.to_string()));
                row.insert("val".to_string(), Value::Number(*val));
                row
            })
            .collect();
        let dataset = Dataset::from_records(rows).unwrap();
        let result = aggregate_grouped(&dataset, "cat", "val", "grp").unwrap();
        assert_eq!(result.labels, ["Q1", "Q2"]);
        assert_eq!(result.series[0].values, vec![Some(1.0), Some(0.0)]);
        assert_eq!(result.series[1].values, vec![Some(0.0), Some(5.0)]);
    }

    #[test]
    fn numeric_categories_sort_numerically() {
        let entries = [(10.0, "g", 1.0), (2.0, "g", 1.0)];
        let rows: Vec<Row> = entries
            .iter()
            .map(|(cat, group, val)| {
                let mut row = Row::new();
                row.insert("cat".to_string(), Value::Number(*cat));
                row.insert("grp".to_string(), Value::Text(group.to_string()));
                row.insert("val".to_string(), Value::Number(*val));
                row
            })
            .collect();
        let dataset = Dataset::from_records(rows).unwrap();
        let result = aggregate_grouped(&dataset, "cat", "val", "grp").unwrap();
        assert_eq!(result.labels, ["2", "10"]);
    }
}
