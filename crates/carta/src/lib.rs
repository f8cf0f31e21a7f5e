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

pub mod aggregate;
pub mod assemble;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod palette;
pub mod reshape;

pub use aggregate::{AggregatedSeries, AggregationMethod, SeriesData};
pub use assemble::{
    ChartData, DataLabelMode, Fill, Orientation, Series, SeriesKind, SeriesValues, Stacking,
    ValueDisplay, ValueScale,
};
pub use catalog::ChartKind;
pub use dataset::{Dataset, Row, Value};
pub use error::{ChartDataError, ChartError, DataError, DataWarning, Result};
pub use inference::{classify, classify_all, ColumnType};
pub use palette::Palette;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which columns serve which chart role. `None` models the untouched
/// placeholder selection; resolving with a required role unset yields
/// no chart rather than a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub x: Option<String>,
    pub y: Option<String>,
    pub group_by: Option<String>,
    pub aggregation: AggregationMethod,
}

/// One chart card's full configuration. Each card owns its roles and the
/// chart data resolved from them; cards never share mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSpec {
    pub id: CardId,
    pub kind: ChartKind,
    pub roles: ColumnRoles,
}

impl CardSpec {
    pub fn new(kind: ChartKind, roles: ColumnRoles) -> Self {
        Self {
            id: CardId::new(),
            kind,
            roles,
        }
    }
}

/// Session state for one loaded dataset: the rows plus the per-column type
/// classification, both computed once at load time and read-only afterwards.
/// Every chart card resolves against this shared state independently.
pub struct ChartSession {
    dataset: Arc<Dataset>,
    column_types: IndexMap<String, ColumnType>,
}

impl ChartSession {
    pub fn load(dataset: Dataset) -> Self {
        let column_types = inference::classify_all(&dataset);
        Self {
            dataset: Arc::new(dataset),
            column_types,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn column_types(&self) -> &IndexMap<String, ColumnType> {
        &self.column_types
    }

    /// Sensible starting roles for a fresh card: the first categorical or
    /// date column on the category axis, the first numeric column on the
    /// value axis.
    pub fn default_roles(&self) -> ColumnRoles {
        let x = self
            .column_types
            .iter()
            .find(|(_, t)| matches!(t, ColumnType::Categorical | ColumnType::Date))
            .map(|(name, _)| name.clone());
        let y = self
            .column_types
            .iter()
            .find(|(_, t)| matches!(t, ColumnType::Numeric))
            .map(|(name, _)| name.clone());
        ColumnRoles {
            x,
            y,
            group_by: None,
            aggregation: AggregationMethod::Sum,
        }
    }

    pub fn new_card(&self, kind: ChartKind) -> CardSpec {
        CardSpec::new(kind, self.default_roles())
    }

    /// Runs the full pipeline for one card: role validation, aggregation,
    /// the variant's reshape, and assembly into a chart-ready dataset.
    /// Pure with respect to session state; calling it twice with the same
    /// card yields the same chart.
    pub fn resolve(&self, card: &CardSpec) -> Result<ChartData> {
        let roles = &card.roles;
        let x = roles
            .x
            .as_deref()
            .ok_or(ChartError::IncompleteSelection { role: "category" })?;
        let y = roles
            .y
            .as_deref()
            .ok_or(ChartError::IncompleteSelection { role: "value" })?;
        let group_by = if card.kind.needs_group_by() {
            Some(
                roles
                    .group_by
                    .as_deref()
                    .ok_or(ChartError::IncompleteSelection { role: "group-by" })?,
            )
        } else {
            None
        };

        let aggregated = match group_by {
            Some(group) => aggregate::aggregate_grouped(&self.dataset, x, y, group)?,
            None => aggregate::aggregate(&self.dataset, x, y, roles.aggregation)?,
        };

        let mut warnings = Vec::new();
        if aggregated.skipped_rows > 0 {
            let warning = DataWarning::NonNumericValues {
                column: y.to_string(),
                rows: aggregated.skipped_rows,
            };
            warn!(card = %card.id, "{warning}");
            warnings.push(warning);
        }

        let mut chart = assemble::base_chart(card.kind, x, y, aggregated, warnings);
        reshape::apply(&mut chart, &self.dataset, x, y);
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ChartSession {
        let csv = "region,product,sales,when\n\
                   North,widget,10,2024-01-01\n\
                   South,widget,20,2024-02-01\n\
                   North,gadget,5,2024-03-01\n";
        ChartSession::load(Dataset::from_csv_reader(csv.as_bytes()).unwrap())
    }

    #[test]
    fn default_roles_pick_first_categorical_and_numeric() {
        let session = session();
        let roles = session.default_roles();
        assert_eq!(roles.x.as_deref(), Some("region"));
        assert_eq!(roles.y.as_deref(), Some("sales"));
        assert_eq!(roles.aggregation, AggregationMethod::Sum);
    }

    #[test]
    fn resolve_declines_without_required_roles() {
        let session = session();
        let card = CardSpec::new(ChartKind::Bar, ColumnRoles::default());
        let err = session.resolve(&card).unwrap_err();
        assert!(matches!(
            err,
            ChartDataError::Chart(ChartError::IncompleteSelection { role: "category" })
        ));

        let mut roles = session.default_roles();
        roles.group_by = None;
        let card = CardSpec::new(ChartKind::StackedBar, roles);
        let err = session.resolve(&card).unwrap_err();
        assert!(matches!(
            err,
            ChartDataError::Chart(ChartError::IncompleteSelection { role: "group-by" })
        ));
    }

    #[test]
    fn resolve_is_pure_over_session_state() {
        let session = session();
        let card = CardSpec::new(ChartKind::Bar, session.default_roles());
        let first = session.resolve(&card).unwrap();
        let second = session.resolve(&card).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_column_is_reported() {
        let session = session();
        let roles = ColumnRoles {
            x: Some("region".into()),
            y: Some("missing".into()),
            group_by: None,
            aggregation: AggregationMethod::Sum,
        };
        let card = CardSpec::new(ChartKind::Bar, roles);
        let err = session.resolve(&card).unwrap_err();
        assert!(matches!(
            err,
            ChartDataError::Data(DataError::ColumnNotFound { .. })
        ));
    }
}
