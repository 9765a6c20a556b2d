//! The dashboard page: the render tree produced for one selection state.

use crate::chart::{CHART_JS_URL, CHART_SCRIPT};
use crate::escape_html;
use crate::grid::{ChartGrid, PanelContent};
use crate::summary::SummaryTable;
use epicurves_core::{Category, CategoryGroups, DashResult, Selection};
use serde::Serialize;
use std::fmt::Write;

/// Main page heading.
pub const PAGE_TITLE: &str = "MAP-AMR, Prospective Surveillance";
/// Browser tab title.
pub const BROWSER_TITLE: &str = "MAP-AMR Kenya prospective surveillance";
/// Charts are only laid out once at least this many worksheets are picked.
pub const MIN_SELECTED: usize = 2;
/// Shown instead of the chart grid when too few worksheets are picked.
pub const SELECTION_PROMPT: &str =
    "Use the side panel on the left. Please select at least two graphs to display side by side.";

const PAGE_STYLE: &str = r"
body { font-family: sans-serif; margin: 0; display: flex; }
aside { width: 280px; padding: 1rem; background: #f0f2f6; min-height: 100vh; }
aside select { width: 100%; }
main { flex: 1; padding: 1rem 2rem; }
table.summary { border-collapse: collapse; width: 800px; max-width: 100%; }
table.summary th, table.summary td { border: 1px solid #ddd; padding: 4px 8px; }
.grid { display: grid; gap: 2rem 1.5rem; }
.panel { min-height: 200px; }
.panel.empty, .panel.unavailable { color: #666; border: 1px dashed #ccc; padding: 1rem; }
";

/// Sidebar multi-selects, one per category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sidebar {
    pub groups: CategoryGroups,
    pub selection: Selection,
}

/// The Totals section.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummarySection {
    Table { table: SummaryTable },
    Unavailable { message: String },
}

/// The graphs section.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphSection {
    Prompt {
        heading: String,
        message: String,
    },
    Grid {
        heading: String,
        caption: String,
        grid: ChartGrid,
    },
}

impl GraphSection {
    /// Ask for more selections.
    #[must_use]
    pub fn prompt() -> Self {
        Self::Prompt {
            heading: "Graph Display".to_string(),
            message: SELECTION_PROMPT.to_string(),
        }
    }

    #[must_use]
    pub fn grid(grid: ChartGrid) -> Self {
        Self::Grid {
            heading: "Selected graphs".to_string(),
            caption: "Displaying selected graphs side by side:".to_string(),
            grid,
        }
    }
}

/// Everything the dashboard shows for one selection state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub title: String,
    pub sidebar: Sidebar,
    pub summary: SummarySection,
    pub graphs: GraphSection,
}

impl DashboardPage {
    #[must_use]
    pub fn new(sidebar: Sidebar, summary: SummarySection, graphs: GraphSection) -> Self {
        Self {
            title: PAGE_TITLE.to_string(),
            sidebar,
            summary,
            graphs,
        }
    }

    /// The chart grid, when one is shown.
    #[must_use]
    pub fn grid(&self) -> Option<&ChartGrid> {
        match &self.graphs {
            GraphSection::Grid { grid, .. } => Some(grid),
            GraphSection::Prompt { .. } => None,
        }
    }

    pub fn to_json(&self) -> DashResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Render a self-contained HTML page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{}</title>
    <script src="{CHART_JS_URL}"></script>
    <style>{PAGE_STYLE}</style>
</head>
<body>
"#,
            escape_html(BROWSER_TITLE)
        );

        html.push_str(&self.sidebar_html());
        html.push_str("<main>\n");
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&self.title));
        html.push_str(&self.summary_html());
        html.push_str(&self.graphs_html());
        html.push_str("</main>\n</body>\n</html>");
        html
    }

    fn sidebar_html(&self) -> String {
        let mut html = String::from("<aside>\n<form method=\"get\" action=\"/\">\n");
        for category in Category::ALL {
            let names = self.sidebar.groups.group(category);
            let _ = writeln!(
                html,
                r#"<h3>{}</h3>
<select multiple name="{}" size="{}">"#,
                escape_html(category.heading()),
                category.key(),
                names.len().max(1)
            );
            for name in names {
                let selected = if self.sidebar.selection.is_selected(category, name) {
                    " selected"
                } else {
                    ""
                };
                let name = escape_html(name);
                let _ = writeln!(
                    html,
                    r#"<option value="{name}"{selected}>{name}</option>"#
                );
            }
            html.push_str("</select>\n");
        }
        html.push_str("<p><button type=\"submit\">Show graphs</button></p>\n</form>\n</aside>\n");
        html
    }

    fn summary_html(&self) -> String {
        let body = match &self.summary {
            SummarySection::Table { table } => table.to_html(),
            SummarySection::Unavailable { message } => {
                format!("<p class=\"notice\">{}</p>", escape_html(message))
            }
        };
        format!("<section>\n<h2>Summary</h2>\n<p>Total Patients Screened:</p>\n{body}\n</section>\n")
    }

    fn graphs_html(&self) -> String {
        let (heading, caption, grid) = match &self.graphs {
            GraphSection::Prompt { heading, message } => {
                return format!(
                    "<section>\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
                    escape_html(heading),
                    escape_html(message)
                );
            }
            GraphSection::Grid {
                heading,
                caption,
                grid,
            } => (heading, caption, grid),
        };

        let mut html = String::new();
        let _ = write!(
            html,
            "<section>\n<h2>{}</h2>\n<p>{}</p>\n<div class=\"grid\" style=\"grid-template-columns: repeat({}, 1fr)\">\n",
            escape_html(heading),
            escape_html(caption),
            grid.columns()
        );

        let mut charts = Vec::new();
        for (index, panel) in grid.panels().iter().enumerate() {
            let placement = format!(
                "grid-row: {}; grid-column: {}",
                panel.row + 1,
                panel.column + 1
            );
            let title = escape_html(&panel.title);
            match &panel.content {
                PanelContent::Chart { spec } => {
                    let id = format!("chart-{index}");
                    let _ = writeln!(
                        html,
                        r#"<div class="panel" style="{placement}"><canvas id="{id}"></canvas></div>"#
                    );
                    charts.push((id, spec));
                }
                PanelContent::Empty => {
                    let _ = writeln!(
                        html,
                        r#"<div class="panel empty" style="{placement}"><h3>{title}</h3><p>No numeric data to chart.</p></div>"#
                    );
                }
                PanelContent::Unavailable { reason } => {
                    let _ = writeln!(
                        html,
                        r#"<div class="panel unavailable" style="{placement}"><h3>{title}</h3><p>{}</p></div>"#,
                        escape_html(reason)
                    );
                }
            }
        }
        html.push_str("</div>\n");

        let specs = serde_json::to_string(&charts)
            .unwrap_or_default()
            .replace("</", "<\\/"); // Prevent script tag breakout
        let _ = write!(
            html,
            "<script>{CHART_SCRIPT}\n{specs}.forEach(([id, spec]) => renderBarChart(document.getElementById(id), spec));\n</script>\n</section>\n"
        );
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::YAxis;
    use epicurves_core::{RawGrid, TypedTable};

    fn sidebar() -> Sidebar {
        let names: Vec<String> = ["A", "B", "C", "D"].iter().map(ToString::to_string).collect();
        let mut selection = Selection::default();
        selection.add(Category::Positives, "B");
        Sidebar {
            groups: CategoryGroups::partition(&names),
            selection,
        }
    }

    fn cases() -> TypedTable {
        let values = vec![
            vec!["Week".to_string(), "Cases".to_string()],
            vec!["W1".to_string(), "3".to_string()],
        ];
        TypedTable::build(&RawGrid::from_values(values).unwrap())
    }

    #[test]
    fn test_prompt_page() {
        let page = DashboardPage::new(
            sidebar(),
            SummarySection::Unavailable {
                message: "No Totals worksheet".into(),
            },
            GraphSection::prompt(),
        );

        assert!(page.grid().is_none());
        let html = page.to_html();
        assert!(html.contains("Please select at least two graphs"));
        assert!(html.contains("<h1>MAP-AMR, Prospective Surveillance</h1>"));
        assert!(html.contains("No Totals worksheet"));
        assert!(html.contains(r#"<option value="B" selected>B</option>"#));
        assert!(html.contains(r#"<option value="A">A</option>"#));
        assert!(!html.contains("renderBarChart(document"));
    }

    #[test]
    fn test_grid_page() {
        let mut grid = ChartGrid::new();
        grid.push_table("A", &cases(), YAxis::PatientCount);
        grid.push_table("D", &TypedTable::default(), YAxis::PercentageScore);
        grid.push_unavailable("E", "Worksheet not found: E");

        let page = DashboardPage::new(
            sidebar(),
            SummarySection::Table {
                table: SummaryTable::default(),
            },
            GraphSection::grid(grid),
        );

        let html = page.to_html();
        assert!(html.contains("Selected graphs"));
        assert!(html.contains(r#"<canvas id="chart-0">"#));
        assert!(!html.contains(r#"<canvas id="chart-1">"#));
        assert!(html.contains("No numeric data to chart."));
        assert!(html.contains("Worksheet not found: E"));
        assert!(html.contains("grid-row: 2; grid-column: 1"));
        assert!(html.contains(r#"[["chart-0","#));
    }

    #[test]
    fn test_page_json() {
        let page = DashboardPage::new(
            sidebar(),
            SummarySection::Unavailable {
                message: "x".into(),
            },
            GraphSection::prompt(),
        );

        let json: serde_json::Value = serde_json::from_str(&page.to_json().unwrap()).unwrap();
        assert_eq!(json["graphs"]["kind"], "prompt");
        assert_eq!(json["summary"]["kind"], "unavailable");
        assert_eq!(json["sidebar"]["groups"]["positives"][1], "B");
    }
}
