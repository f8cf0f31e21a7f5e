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
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartDataError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Chart resolution error: {0}")]
    Chart(#[from] ChartError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Empty dataset: no rows found in the source")]
    EmptyDataset,
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },
    #[error("CSV parse error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[error("JSON parse error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Incomplete selection: no column assigned to the {role} role")]
    IncompleteSelection { role: &'static str },
}

/// Advisory, non-fatal data-quality notice. Carried alongside a resolved
/// chart rather than replacing it; a resolve emits each warning at most once.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataWarning {
    #[error("Column '{column}' contains non-numeric data; {rows} row(s) were skipped during aggregation")]
    NonNumericValues { column: String, rows: usize },
}

pub type Result<T> = std::result::Result<T, ChartDataError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
