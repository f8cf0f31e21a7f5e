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

pub const DEFAULT: [&str; 7] = [
    "#3b82f6", "#10b981", "#ef4444", "#f97316", "#8b5cf6", "#ec4899", "#6b7280",
];
pub const VIBRANT: [&str; 10] = [
    "#ef4444", "#f97316", "#eab308", "#84cc16", "#22c55e", "#14b8a6", "#06b6d4", "#3b82f6",
    "#8b5cf6", "#d946ef",
];
pub const LINE_OVERLAY: &str = "#ff6384";
pub const WATERFALL_GAIN: &str = "rgba(75, 192, 192, 0.8)";
pub const WATERFALL_LOSS: &str = "rgba(255, 99, 132, 0.8)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Default,
    Vibrant,
}

impl Palette {
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Palette::Default => &DEFAULT,
            Palette::Vibrant => &VIBRANT,
        }
    }
    pub fn color(&self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
    pub fn owned_colors(&self) -> Vec<String> {
        self.colors().iter().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_assignment_wraps_around() {
        assert_eq!(Palette::Default.color(0), "#3b82f6");
        assert_eq!(Palette::Default.color(7), "#3b82f6");
        assert_eq!(Palette::Default.color(8), "#10b981");
        assert_eq!(Palette::Vibrant.color(10), "#ef4444");
    }
}
