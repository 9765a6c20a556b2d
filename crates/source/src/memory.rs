//! In-memory workbook source, loadable from a JSON fixture.

use crate::SheetSource;
use async_trait::async_trait;
use epicurves_core::{DashError, DashResult, RawGrid, WorksheetHandle};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One worksheet of a fixture workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureWorksheet {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Fixture file layout: `{"worksheets": [{"name": ..., "values": [[...]]}]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub worksheets: Vec<FixtureWorksheet>,
}

/// A workbook held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    workbook: Workbook,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worksheet; its position is its index.
    #[must_use]
    pub fn with_worksheet<S: Into<String>>(mut self, name: &str, values: Vec<Vec<S>>) -> Self {
        let values = values
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.workbook.worksheets.push(FixtureWorksheet {
            name: name.to_string(),
            values,
        });
        self
    }

    pub fn from_json_str(json: &str) -> DashResult<Self> {
        let workbook: Workbook = serde_json::from_str(json)?;
        Ok(Self { workbook })
    }

    pub fn from_path(path: impl AsRef<Path>) -> DashResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}

#[async_trait]
impl SheetSource for MemorySource {
    async fn list_worksheets(&self) -> DashResult<Vec<WorksheetHandle>> {
        Ok(self
            .workbook
            .worksheets
            .iter()
            .enumerate()
            .map(|(index, ws)| WorksheetHandle::new(ws.name.clone(), index))
            .collect())
    }

    async fn fetch_grid(&self, worksheet: &WorksheetHandle) -> DashResult<RawGrid> {
        let found = self
            .workbook
            .worksheets
            .iter()
            .find(|ws| ws.name == worksheet.name)
            .ok_or_else(|| DashError::not_found(&worksheet.name))?;

        Ok(RawGrid::from_values(found.values.clone())?)
    }
}
