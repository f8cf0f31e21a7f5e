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

use serde::{Deserialize, Serialize};

/// Closed catalogue of the supported bar-chart variants. Each variant keys
/// one reshape rule in [`crate::reshape`]; the wire key and display name are
/// part of the renderer contract and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    GroupedBar,
    HorizontalGroupedBar,
    StackedBar,
    HorizontalStackedBar,
    PercentageStackedBar,
    HorizontalPercentageStackedBar,
    BarWithLine,
    SortedBarAsc,
    SortedBarDesc,
    BarWithNegative,
    FloatingBar,
    RoundedBar,
    CustomColorBar,
    DashedBorderBar,
    LogarithmicBar,
    Tornado,
    Waterfall,
}

impl ChartKind {
    pub const ALL: [ChartKind; 19] = [
        ChartKind::Bar,
        ChartKind::HorizontalBar,
        ChartKind::GroupedBar,
        ChartKind::HorizontalGroupedBar,
        ChartKind::StackedBar,
        ChartKind::HorizontalStackedBar,
        ChartKind::PercentageStackedBar,
        ChartKind::HorizontalPercentageStackedBar,
        ChartKind::BarWithLine,
        ChartKind::SortedBarAsc,
        ChartKind::SortedBarDesc,
        ChartKind::BarWithNegative,
        ChartKind::FloatingBar,
        ChartKind::RoundedBar,
        ChartKind::CustomColorBar,
        ChartKind::DashedBorderBar,
        ChartKind::LogarithmicBar,
        ChartKind::Tornado,
        ChartKind::Waterfall,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::HorizontalBar => "horizontalBar",
            ChartKind::GroupedBar => "groupedBar",
            ChartKind::HorizontalGroupedBar => "horizontalGroupedBar",
            ChartKind::StackedBar => "stackedBar",
            ChartKind::HorizontalStackedBar => "horizontalStackedBar",
            ChartKind::PercentageStackedBar => "percentageStackedBar",
            ChartKind::HorizontalPercentageStackedBar => "horizontalPercentageStackedBar",
            ChartKind::BarWithLine => "barWithLine",
            ChartKind::SortedBarAsc => "sortedBarAsc",
            ChartKind::SortedBarDesc => "sortedBarDesc",
            ChartKind::BarWithNegative => "barWithNegative",
            ChartKind::FloatingBar => "floatingBar",
            ChartKind::RoundedBar => "roundedBar",
            ChartKind::CustomColorBar => "customColorBar",
            ChartKind::DashedBorderBar => "dashedBorderBar",
            ChartKind::LogarithmicBar => "logarithmicBar",
            ChartKind::Tornado => "tornado",
            ChartKind::Waterfall => "waterfall",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Vertical Bar",
            ChartKind::HorizontalBar => "Horizontal Bar",
            ChartKind::GroupedBar => "Grouped Vertical Bar",
            ChartKind::HorizontalGroupedBar => "Grouped Horizontal Bar",
            ChartKind::StackedBar => "Stacked Vertical Bar",
            ChartKind::HorizontalStackedBar => "Stacked Horizontal Bar",
            ChartKind::PercentageStackedBar => "100% Stacked Vertical Bar",
            ChartKind::HorizontalPercentageStackedBar => "100% Stacked Horizontal Bar",
            ChartKind::BarWithLine => "Bar with Line (Mixed)",
            ChartKind::SortedBarAsc => "Sorted Bar (Ascending)",
            ChartKind::SortedBarDesc => "Sorted Bar (Descending)",
            ChartKind::BarWithNegative => "Bar with Negative Values",
            ChartKind::FloatingBar => "Floating Bar (Range)",
            ChartKind::RoundedBar => "Rounded Bar Chart",
            ChartKind::CustomColorBar => "Bar with Custom Colors",
            ChartKind::DashedBorderBar => "Bar with Dashed Border",
            ChartKind::LogarithmicBar => "Logarithmic Y-Axis Bar",
            ChartKind::Tornado => "Tornado Chart",
            ChartKind::Waterfall => "Waterfall Chart",
        }
    }

    /// Variants that aggregate into one series per distinct group value and
    /// therefore require a group-by column role.
    pub fn needs_group_by(&self) -> bool {
        matches!(
            self,
            ChartKind::GroupedBar
                | ChartKind::HorizontalGroupedBar
                | ChartKind::StackedBar
                | ChartKind::HorizontalStackedBar
                | ChartKind::PercentageStackedBar
                | ChartKind::HorizontalPercentageStackedBar
                | ChartKind::Tornado
        )
    }

    pub fn from_key(key: &str) -> Option<ChartKind> {
        ChartKind::ALL.iter().copied().find(|kind| kind.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_nineteen_stable_keys() {
        assert_eq!(ChartKind::ALL.len(), 19);
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ChartKind::from_key("pie"), None);
    }

    #[test]
    fn display_names_match_menu_labels() {
        assert_eq!(ChartKind::Bar.display_name(), "Vertical Bar");
        assert_eq!(
            ChartKind::HorizontalPercentageStackedBar.display_name(),
            "100% Stacked Horizontal Bar"
        );
        assert_eq!(ChartKind::BarWithLine.display_name(), "Bar with Line (Mixed)");
        assert_eq!(ChartKind::Waterfall.display_name(), "Waterfall Chart");
    }

    #[test]
    fn grouped_variants_require_group_by() {
        let grouped: Vec<_> = ChartKind::ALL
            .iter()
            .filter(|k| k.needs_group_by())
            .collect();
        assert_eq!(grouped.len(), 7);
        assert!(ChartKind::Tornado.needs_group_by());
        assert!(!ChartKind::Waterfall.needs_group_by());
        assert!(!ChartKind::SortedBarAsc.needs_group_by());
    }

    #[test]
    fn keys_round_trip_through_serde() {
        let json = serde_json::to_string(&ChartKind::SortedBarAsc).unwrap();
        assert_eq!(json, "\"sortedBarAsc\"");
        let kind: ChartKind = serde_json::from_str("\"horizontalGroupedBar\"").unwrap();
        assert_eq!(kind, ChartKind::HorizontalGroupedBar);
    }
}
