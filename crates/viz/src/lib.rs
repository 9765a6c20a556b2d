//! # epicurves-viz
//!
//! Rendering for the epicurves dashboard.
//!
//! Everything here is a plain, serializable render tree:
//! - [`SummaryTable`] for the Totals worksheet
//! - [`ChartSpec`] bar charts laid out in a [`ChartGrid`]
//! - [`DashboardPage`] tying them together with the sidebar
//!
//! Render trees serialize to JSON for API clients and render to HTML with
//! Chart.js for browsers.

mod chart;
mod grid;
mod page;
mod summary;

pub use chart::{bar_annotation, ChartData, ChartOptions, ChartSpec, Dataset, YAxis};
pub use grid::{ChartGrid, ChartPanel, PanelContent, GRID_COLUMNS};
pub use page::{
    DashboardPage, GraphSection, Sidebar, SummarySection, BROWSER_TITLE, MIN_SELECTED, PAGE_TITLE,
    SELECTION_PROMPT,
};
pub use summary::{column_color, SummaryCell, SummaryTable};

/// Escape HTML special characters to prevent XSS.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
