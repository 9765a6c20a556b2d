//! # epicurves-dashboard
//!
//! The dashboard as an explicit event handler.
//!
//! Each call to [`Dashboard::handle`] takes the current selection state and
//! recomputes the whole page from scratch: list worksheets, partition them,
//! fetch and type every table needed, and lay out the charts. Nothing is
//! cached between calls.

use epicurves_core::{
    CategoryGroups, DashError, DashResult, Selection, TypedTable, WorksheetHandle,
    TOTALS_WORKSHEET,
};
use epicurves_source::SheetSource;
use epicurves_viz::{
    ChartGrid, DashboardPage, GraphSection, Sidebar, SummarySection, SummaryTable, MIN_SELECTED,
};
use std::sync::Arc;

/// Renders dashboard pages from a sheet source.
#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn SheetSource>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self { source }
    }

    /// Worksheet names grouped for the sidebar.
    pub async fn categories(&self) -> DashResult<CategoryGroups> {
        let worksheets = self.source.list_worksheets().await?;
        Ok(partition(&worksheets))
    }

    /// Fetch and type a single worksheet by name.
    pub async fn table(&self, name: &str) -> DashResult<TypedTable> {
        let worksheets = self.source.list_worksheets().await?;
        let worksheet = worksheets
            .iter()
            .find(|ws| ws.name == name)
            .ok_or_else(|| DashError::not_found(name))?;
        self.fetch_table(worksheet).await
    }

    /// Render the page for `selection`.
    ///
    /// # Errors
    ///
    /// Failing to list worksheets, or rejected credentials, abort the whole
    /// render. Any other failure fetching one worksheet only costs its own
    /// panel or the summary.
    pub async fn handle(&self, selection: &Selection) -> DashResult<DashboardPage> {
        let worksheets = self.source.list_worksheets().await?;
        let groups = partition(&worksheets);

        let summary = self.summary(&worksheets).await?;

        let selected = groups.resolve_selections(&selection.names(), &worksheets);
        tracing::info!("rendering dashboard for {} selected worksheets", selected.len());

        let graphs = if selected.len() < MIN_SELECTED {
            GraphSection::prompt()
        } else {
            GraphSection::grid(self.chart_grid(&selected, &groups).await?)
        };

        let sidebar = Sidebar {
            groups,
            selection: selection.clone(),
        };
        Ok(DashboardPage::new(sidebar, summary, graphs))
    }

    async fn fetch_table(&self, worksheet: &WorksheetHandle) -> DashResult<TypedTable> {
        let grid = self.source.fetch_grid(worksheet).await?;
        Ok(TypedTable::build(&grid))
    }

    async fn summary(&self, worksheets: &[WorksheetHandle]) -> DashResult<SummarySection> {
        let Some(totals) = worksheets.iter().find(|ws| ws.name == TOTALS_WORKSHEET) else {
            tracing::warn!("no '{TOTALS_WORKSHEET}' worksheet in the spreadsheet");
            return Ok(SummarySection::Unavailable {
                message: format!("No '{TOTALS_WORKSHEET}' worksheet found."),
            });
        };

        match self.fetch_table(totals).await {
            Ok(table) => Ok(SummarySection::Table {
                table: SummaryTable::render(&table),
            }),
            Err(e) if !e.is_fatal() => {
                tracing::warn!("summary unavailable: {e}");
                Ok(SummarySection::Unavailable {
                    message: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn chart_grid(
        &self,
        selected: &[WorksheetHandle],
        groups: &CategoryGroups,
    ) -> DashResult<ChartGrid> {
        let mut tables = Vec::with_capacity(selected.len());

        for worksheet in selected {
            let table = match self.fetch_table(worksheet).await {
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("skipping panel for '{}': {e}", worksheet.name);
                    Err(e)
                }
                ok => ok,
            };
            tables.push((worksheet.name.clone(), table));
        }

        Ok(ChartGrid::render(tables, groups))
    }
}

fn partition(worksheets: &[WorksheetHandle]) -> CategoryGroups {
    let names: Vec<String> = worksheets.iter().map(|ws| ws.name.clone()).collect();
    CategoryGroups::partition(&names)
}
