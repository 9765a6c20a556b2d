//! Layout of chart panels in a fixed two-column grid.

use crate::chart::{ChartSpec, YAxis};
use epicurves_core::{CategoryGroups, TypedTable};
use serde::Serialize;
use std::fmt;

/// Panels per grid row.
pub const GRID_COLUMNS: usize = 2;

/// What a panel shows.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    Chart { spec: ChartSpec },
    /// The table had nothing numeric to plot.
    Empty,
    /// The worksheet could not be fetched or shaped.
    Unavailable { reason: String },
}

/// One cell of the grid.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPanel {
    pub title: String,
    pub row: usize,
    pub column: usize,
    pub content: PanelContent,
}

impl ChartPanel {
    #[must_use]
    pub fn chart(&self) -> Option<&ChartSpec> {
        match &self.content {
            PanelContent::Chart { spec } => Some(spec),
            _ => None,
        }
    }
}

/// Chart panels filled row by row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartGrid {
    panels: Vec<ChartPanel>,
}

impl ChartGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out one panel per worksheet, in order.
    ///
    /// Positive isolate worksheets are charted as patient counts, the rest as
    /// percentage scores. A worksheet that failed to load keeps its slot as an
    /// unavailable panel; the remaining panels still render.
    #[must_use]
    pub fn render<E: fmt::Display>(
        tables: impl IntoIterator<Item = (String, Result<TypedTable, E>)>,
        groups: &CategoryGroups,
    ) -> Self {
        let mut grid = Self::new();
        for (name, table) in tables {
            match table {
                Ok(table) => {
                    let y_axis = YAxis::for_worksheet(&name, groups);
                    grid.push_table(name, &table, y_axis);
                }
                Err(reason) => grid.push_unavailable(name, reason.to_string()),
            }
        }
        grid
    }

    /// Place a chart of `table` in the next cell, or an empty panel if it has
    /// no numeric series.
    pub fn push_table(&mut self, title: impl Into<String>, table: &TypedTable, y_axis: YAxis) {
        let title = title.into();
        let content = match ChartSpec::from_table(title.clone(), table, y_axis) {
            Some(spec) => PanelContent::Chart { spec },
            None => PanelContent::Empty,
        };
        self.push(title, content);
    }

    /// Place a panel explaining why a worksheet could not be charted.
    pub fn push_unavailable(&mut self, title: impl Into<String>, reason: impl Into<String>) {
        self.push(
            title.into(),
            PanelContent::Unavailable {
                reason: reason.into(),
            },
        );
    }

    fn push(&mut self, title: String, content: PanelContent) {
        let index = self.panels.len();
        self.panels.push(ChartPanel {
            title,
            row: index / GRID_COLUMNS,
            column: index % GRID_COLUMNS,
            content,
        });
    }

    #[must_use]
    pub fn panels(&self) -> &[ChartPanel] {
        &self.panels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.panels.len().div_ceil(GRID_COLUMNS)
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        GRID_COLUMNS
    }

    /// Number of panels holding a chart.
    #[must_use]
    pub fn chart_count(&self) -> usize {
        self.panels.iter().filter(|p| p.chart().is_some()).count()
    }
}
