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

use anyhow::{bail, Context, Result};
use carta::{CardSpec, ChartKind, ChartSession, Dataset};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(csv_path) = args.next() else {
        bail!("usage: carta-chart-demo <data.csv> [chart-kind-key ...]");
    };
    let requested: Vec<ChartKind> = args
        .map(|key| {
            ChartKind::from_key(&key)
                .with_context(|| format!("unknown chart kind '{key}'"))
        })
        .collect::<Result<_>>()?;
    let kinds = if requested.is_empty() {
        vec![
            ChartKind::Bar,
            ChartKind::StackedBar,
            ChartKind::SortedBarDesc,
            ChartKind::Waterfall,
        ]
    } else {
        requested
    };

    let dataset = Dataset::from_csv_path(&csv_path)
        .with_context(|| format!("failed to load '{csv_path}'"))?;
    let session = ChartSession::load(dataset);

    info!(rows = session.dataset().row_count(), "dataset loaded");
    for (column, column_type) in session.column_types() {
        info!(%column, column_type = ?column_type, "classified");
    }

    for kind in kinds {
        let mut card = session.new_card(kind);
        if kind.needs_group_by() {
            card.roles.group_by = pick_group_column(&session, &card);
        }
        match session.resolve(&card) {
            Ok(chart) => {
                for warning in &chart.warnings {
                    info!(%warning, "advisory");
                }
                println!("{}", serde_json::to_string_pretty(&chart)?);
            }
            Err(err) => info!(kind = kind.key(), %err, "no chart produced"),
        }
    }
    Ok(())
}

/// Second categorical column, so grouped variants have something to split
/// series on when the category axis already uses the first one.
fn pick_group_column(session: &ChartSession, card: &CardSpec) -> Option<String> {
    session
        .column_types()
        .iter()
        .filter(|(_, t)| matches!(t, carta::ColumnType::Categorical | carta::ColumnType::Date))
        .map(|(name, _)| name.clone())
        .find(|name| Some(name) != card.roles.x.as_ref())
}
