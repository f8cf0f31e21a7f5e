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

use crate::assemble::{
    ChartData, DataLabelMode, Fill, LabelAlign, LabelAnchor, Orientation, Series, SeriesKind,
    SeriesStyle, SeriesValues, Stacking, ValueDisplay, ValueScale,
};
use crate::catalog::ChartKind;
use crate::dataset::{Dataset, Value};
use crate::palette;
use crate::palette::Palette;
use std::cmp::Ordering;

/// Applies the chart-kind specific reshape to an assembled base chart. Each
/// variant composes the shared steps explicitly; none delegates to another
/// variant at runtime. Structural preconditions that do not hold (tornado
/// with a single series, sorting a multi-series result) leave the chart
/// untouched rather than failing.
pub fn apply(chart: &mut ChartData, dataset: &Dataset, x: &str, y: &str) {
    match chart.kind {
        ChartKind::Bar | ChartKind::GroupedBar => {}
        ChartKind::HorizontalBar | ChartKind::HorizontalGroupedBar => flip_horizontal(chart),
        ChartKind::StackedBar => mark_stacked(chart),
        ChartKind::HorizontalStackedBar => {
            flip_horizontal(chart);
            mark_stacked(chart);
        }
        ChartKind::PercentageStackedBar => {
            mark_stacked(chart);
            normalize_percent(chart);
        }
        ChartKind::HorizontalPercentageStackedBar => {
            flip_horizontal(chart);
            mark_stacked(chart);
            normalize_percent(chart);
        }
        ChartKind::BarWithLine => append_mean_line(chart, y),
        ChartKind::SortedBarAsc => sort_by_value(chart, true),
        ChartKind::SortedBarDesc => sort_by_value(chart, false),
        ChartKind::BarWithNegative => {
            if let Some(primary) = chart.series.first_mut() {
                primary.style.data_labels = DataLabelMode::BySign;
            }
        }
        ChartKind::FloatingBar => decode_ranges(chart, dataset, x, y),
        ChartKind::RoundedBar => {
            for series in &mut chart.series {
                series.style.border_radius = 5;
            }
        }
        ChartKind::CustomColorBar => {
            if let Some(primary) = chart.series.first_mut() {
                primary.style.fill = Fill::Palette(Palette::Vibrant.owned_colors());
            }
        }
        ChartKind::DashedBorderBar => {
            if let Some(primary) = chart.series.first_mut() {
                primary.style.border_dash = vec![5, 5];
                primary.style.border_width = 2;
            }
        }
        ChartKind::LogarithmicBar => chart.value_scale = ValueScale::Logarithmic,
        ChartKind::Tornado => diverge_tornado(chart),
        ChartKind::Waterfall => cumulative_to_deltas(chart, x),
    }
}

fn flip_horizontal(chart: &mut ChartData) {
    chart.orientation = Orientation::Horizontal;
    for series in &mut chart.series {
        series.style.data_labels = DataLabelMode::Fixed {
            anchor: LabelAnchor::End,
            align: LabelAlign::Right,
        };
    }
}

fn mark_stacked(chart: &mut ChartData) {
    chart.stacking = Stacking::Stacked;
    for series in &mut chart.series {
        series.style.data_labels = DataLabelMode::Fixed {
            anchor: LabelAnchor::Center,
            align: LabelAlign::Center,
        };
    }
}

/// Rescales each label's values so the series sum to 100 there. A label
/// where every series is zero stays all-zero instead of dividing by zero.
fn normalize_percent(chart: &mut ChartData) {
    chart.stacking = Stacking::PercentStacked;
    let label_count = chart.labels.len();
    for index in 0..label_count {
        let total: f64 = chart
            .series
            .iter()
            .filter_map(|s| s.scalars().and_then(|v| v.get(index).copied().flatten()))
            .sum();
        for series in &mut chart.series {
            if let Some(values) = series.scalars_mut() {
                if let Some(slot) = values.get_mut(index) {
                    let value = slot.unwrap_or(0.0);
                    *slot = Some(if total != 0.0 {
                        value / total * 100.0
                    } else {
                        0.0
                    });
                }
            }
        }
    }
}

fn sort_by_value(chart: &mut ChartData, ascending: bool) {
    if chart.series.len() != 1 {
        return;
    }
    let Some(values) = chart.series[0].scalars() else {
        return;
    };
    let mut zipped: Vec<(String, Option<f64>)> = chart
        .labels
        .iter()
        .cloned()
        .zip(values.iter().copied())
        .collect();
    zipped.sort_by(|a, b| {
        let ordering = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    chart.labels = zipped.iter().map(|(label, _)| label.clone()).collect();
    if let Some(values) = chart.series[0].scalars_mut() {
        *values = zipped.into_iter().map(|(_, value)| value).collect();
    }
}

/// Appends a flat overlay line at the arithmetic mean of the primary
/// series, one point per label.
fn append_mean_line(chart: &mut ChartData, y: &str) {
    let Some(primary) = chart.series.first().and_then(Series::scalars) else {
        return;
    };
    let valid: Vec<f64> = primary.iter().copied().flatten().collect();
    let mean = if valid.is_empty() {
        0.0
    } else {
        valid.iter().sum::<f64>() / valid.len() as f64
    };
    let style = SeriesStyle {
        fill: Fill::Solid(palette::LINE_OVERLAY.to_string()),
        border: Fill::Solid(palette::LINE_OVERLAY.to_string()),
        border_width: 1,
        border_dash: Vec::new(),
        border_radius: 0,
        data_labels: DataLabelMode::Hidden,
    };
    chart.series.push(Series {
        name: format!("Average {y}"),
        kind: SeriesKind::Line,
        values: SeriesValues::Scalars(vec![Some(mean); chart.labels.len()]),
        style,
    });
}

/// Reinterprets the raw value column as `"low-high"` range strings, one per
/// row. A null or otherwise malformed cell decodes to the zero-width `0-0`
/// range; cells splitting into more than two parts are discarded and the
/// label list is truncated to the surviving pair count.
fn decode_ranges(chart: &mut ChartData, dataset: &Dataset, x: &str, y: &str) {
    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(dataset.row_count());
    for row in dataset.rows() {
        let cell = dataset.cell(row, y);
        let text = if cell.is_null() {
            "0-0".to_string()
        } else {
            cell.to_label()
        };
        let parts: Vec<&str> = text.split('-').collect();
        match parts.len() {
            1 => pairs.push((0.0, 0.0)),
            2 => pairs.push((
                parts[0].trim().parse().unwrap_or(0.0),
                parts[1].trim().parse().unwrap_or(0.0),
            )),
            _ => {}
        }
    }
    chart.labels = dataset
        .column_values(x)
        .map(Value::to_label)
        .take(pairs.len())
        .collect();
    if let Some(primary) = chart.series.first_mut() {
        primary.values = SeriesValues::Ranges(pairs);
        primary.style.data_labels = DataLabelMode::Fixed {
            anchor: LabelAnchor::Center,
            align: LabelAlign::Center,
        };
    }
}

/// Negates the first series so it diverges from the center axis, renders
/// horizontally stacked, and switches labels to magnitude display. Needs at
/// least two series; with fewer the aggregated result passes through
/// unchanged.
fn diverge_tornado(chart: &mut ChartData) {
    if chart.series.len() < 2 {
        return;
    }
    chart.orientation = Orientation::Horizontal;
    chart.stacking = Stacking::Stacked;
    chart.value_display = ValueDisplay::Magnitude;
    if let Some(values) = chart.series[0].scalars_mut() {
        for value in values.iter_mut() {
            *value = value.map(|v| -v);
        }
    }
    for series in &mut chart.series {
        series.style.data_labels = DataLabelMode::BySeriesSide;
    }
}

/// Converts a cumulative primary series into per-step deltas: the first
/// point is kept, each later point becomes current minus previous. Bars are
/// colored by delta sign and the title switches to the change-over form.
fn cumulative_to_deltas(chart: &mut ChartData, x: &str) {
    let Some(primary) = chart.series.first_mut() else {
        return;
    };
    let Some(values) = primary.scalars_mut() else {
        return;
    };
    let mut deltas: Vec<Option<f64>> = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;
    for value in values.iter() {
        let current = value.unwrap_or(0.0);
        match previous {
            None => deltas.push(Some(current)),
            Some(prev) => deltas.push(Some(current - prev)),
        }
        previous = Some(current);
    }
    let colors = deltas
        .iter()
        .map(|delta| {
            if delta.unwrap_or(0.0) >= 0.0 {
                palette::WATERFALL_GAIN.to_string()
            } else {
                palette::WATERFALL_LOSS.to_string()
            }
        })
        .collect();
    *values = deltas;
    primary.style.fill = Fill::PerPoint(colors);
    chart.title = format!("Waterfall Chart (Change over {x})");
}
