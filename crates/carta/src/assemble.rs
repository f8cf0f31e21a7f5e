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

use crate::aggregate::AggregatedSeries;
use crate::catalog::ChartKind;
use crate::error::DataWarning;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stacking {
    None,
    Stacked,
    PercentStacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueScale {
    Linear,
    Logarithmic,
}

/// How the renderer should print values in labels and tooltips. `Magnitude`
/// strips the sign, which restores readable figures on a tornado's negated
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueDisplay {
    Plain,
    Magnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAnchor {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataLabelMode {
    Hidden,
    Fixed {
        anchor: LabelAnchor,
        align: LabelAlign,
    },
    /// Placement depends on the point's sign: non-negative above, negative
    /// below.
    BySign,
    /// Tornado placement: the first series labels on the left of the axis,
    /// later series on the right.
    BySeriesSide,
}

impl Default for DataLabelMode {
    fn default() -> Self {
        DataLabelMode::Fixed {
            anchor: LabelAnchor::End,
            align: LabelAlign::Top,
        }
    }
}

/// Bar fill assignment. A single-series bar chart receives a whole palette
/// (one color per bar, cycled); grouped charts receive one solid color per
/// series; waterfall assigns a color per point by delta sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fill {
    Solid(String),
    Palette(Vec<String>),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub fill: Fill,
    pub border: Fill,
    pub border_width: u32,
    pub border_dash: Vec<u32>,
    pub border_radius: u32,
    pub data_labels: DataLabelMode,
}

impl SeriesStyle {
    fn with_fill(fill: Fill) -> Self {
        Self {
            border: fill.clone(),
            fill,
            border_width: 1,
            border_dash: Vec::new(),
            border_radius: 0,
            data_labels: DataLabelMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValues {
    Scalars(Vec<Option<f64>>),
    Ranges(Vec<(f64, f64)>),
}

impl SeriesValues {
    pub fn len(&self) -> usize {
        match self {
            SeriesValues::Scalars(v) => v.len(),
            SeriesValues::Ranges(v) => v.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub values: SeriesValues,
    pub style: SeriesStyle,
}

impl Series {
    pub fn scalars(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            SeriesValues::Scalars(v) => Some(v),
            SeriesValues::Ranges(_) => None,
        }
    }
    pub fn scalars_mut(&mut self) -> Option<&mut Vec<Option<f64>>> {
        match &mut self.values {
            SeriesValues::Scalars(v) => Some(v),
            SeriesValues::Ranges(_) => None,
        }
    }
}

/// The fully resolved, renderer-agnostic chart description. Every series
/// holds exactly one value (or value pair) per label. Produced fresh on
/// every card resolve and never mutated afterwards by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub orientation: Orientation,
    pub stacking: Stacking,
    pub value_scale: ValueScale,
    pub value_display: ValueDisplay,
    pub warnings: Vec<DataWarning>,
}

/// Combines aggregated series with presentation defaults: the base shape
/// every variant starts from before its reshape rule runs.
pub fn base_chart(
    kind: ChartKind,
    x: &str,
    y: &str,
    aggregated: AggregatedSeries,
    warnings: Vec<DataWarning>,
) -> ChartData {
    let palette = Palette::Default;
    let single = aggregated.series.len() == 1;
    let series = aggregated
        .series
        .into_iter()
        .enumerate()
        .map(|(i, data)| {
            let fill = if single {
                Fill::Palette(palette.owned_colors())
            } else {
                Fill::Solid(palette.color(i).to_string())
            };
            Series {
                name: data.name,
                kind: SeriesKind::Bar,
                values: SeriesValues::Scalars(data.values),
                style: SeriesStyle::with_fill(fill),
            }
        })
        .collect();
    ChartData {
        kind,
        title: format!("{}: {} by {}", kind.display_name(), y, x),
        labels: aggregated.labels,
        series,
        orientation: Orientation::Vertical,
        stacking: Stacking::None,
        value_scale: ValueScale::Linear,
        value_display: ValueDisplay::Plain,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SeriesData;

    fn aggregated(series: Vec<SeriesData>) -> AggregatedSeries {
        AggregatedSeries {
            labels: vec!["A".into(), "B".into()],
            series,
            skipped_rows: 0,
        }
    }

    #[test]
    fn single_series_gets_the_whole_palette() {
        let chart = base_chart(
            ChartKind::Bar,
            "region",
            "sales",
            aggregated(vec![SeriesData {
                name: "sales".into(),
                values: vec![Some(1.0), Some(2.0)],
            }]),
            Vec::new(),
        );
        assert_eq!(chart.title, "Vertical Bar: sales by region");
        assert!(matches!(chart.series[0].style.fill, Fill::Palette(_)));
        assert_eq!(chart.series[0].values.len(), chart.labels.len());
    }

    #[test]
    fn grouped_series_get_cyclic_solid_colors() {
        let series = (0..8)
            .map(|i| SeriesData {
                name: format!("g{i}"),
                values: vec![Some(1.0), Some(2.0)],
            })
            .collect();
        let chart = base_chart(ChartKind::GroupedBar, "x", "y", aggregated(series), Vec::new());
        let Fill::Solid(first) = &chart.series[0].style.fill else {
            panic!("expected solid fill");
        };
        let Fill::Solid(eighth) = &chart.series[7].style.fill else {
            panic!("expected solid fill");
        };
        assert_eq!(first, eighth);
    }

    #[test]
    fn base_chart_starts_unstacked_and_vertical() {
        let chart = base_chart(
            ChartKind::StackedBar,
            "x",
            "y",
            aggregated(vec![SeriesData {
                name: "y".into(),
                values: vec![Some(1.0), Some(2.0)],
            }]),
            Vec::new(),
        );
        assert_eq!(chart.orientation, Orientation::Vertical);
        assert_eq!(chart.stacking, Stacking::None);
        assert_eq!(chart.value_scale, ValueScale::Linear);
    }
}
