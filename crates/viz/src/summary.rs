//! The Totals summary table.

use crate::escape_html;
use epicurves_core::TypedTable;
use serde::Serialize;

/// Background colour for a summary column, by column name.
#[must_use]
pub fn column_color(name: &str) -> Option<&'static str> {
    match name {
        "Date" => Some("lightblue"),
        "KNH" => Some("lightgreen"),
        "YNH" => Some("lightpink"),
        "NSIRH" => Some("lightyellow"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'static str>,
}

/// A styled rendering of the Totals worksheet.
///
/// Styling is presentation only; cell text is the table's own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub headers: Vec<SummaryCell>,
    pub rows: Vec<Vec<SummaryCell>>,
}

impl SummaryTable {
    #[must_use]
    pub fn render(table: &TypedTable) -> Self {
        let colors: Vec<Option<&'static str>> = table
            .columns()
            .iter()
            .map(|c| column_color(&c.name))
            .collect();

        let headers = table
            .columns()
            .iter()
            .zip(&colors)
            .map(|(c, color)| SummaryCell {
                text: c.name.clone(),
                background: *color,
            })
            .collect();

        let rows = (0..table.row_count())
            .map(|row| {
                table
                    .columns()
                    .iter()
                    .zip(&colors)
                    .map(|(c, color)| SummaryCell {
                        text: c.display(row).to_string(),
                        background: *color,
                    })
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// HTML `<table>` fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        fn cell(tag: &str, cell: &SummaryCell) -> String {
            let style = cell
                .background
                .map(|color| format!(r#" style="background-color: {color}""#))
                .unwrap_or_default();
            format!("<{tag}{style}>{}</{tag}>", escape_html(&cell.text))
        }

        let mut html = String::from("<table class=\"summary\">\n<thead><tr>");
        for header in &self.headers {
            html.push_str(&cell("th", header));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for value in row {
                html.push_str(&cell("td", value));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }
}
