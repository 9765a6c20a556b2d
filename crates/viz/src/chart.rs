//! Bar chart specifications rendered with Chart.js.

use crate::escape_html;
use epicurves_core::{CategoryGroups, DashResult, TypedTable};
use serde::Serialize;

/// Series colours, cycled in column order.
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Chart.js URL loaded by rendered pages.
pub(crate) const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Draws bar charts from serialized [`ChartSpec`]s.
///
/// The `barLabels` plugin writes each dataset's `annotations` above its bars;
/// the tooltip shows the unrounded value on hover.
pub(crate) const CHART_SCRIPT: &str = r"
const barLabels = {
    id: 'barLabels',
    afterDatasetsDraw(chart) {
        const ctx = chart.ctx;
        ctx.save();
        ctx.textAlign = 'center';
        ctx.textBaseline = 'bottom';
        ctx.fillStyle = '#333';
        chart.data.datasets.forEach((dataset, i) => {
            const meta = chart.getDatasetMeta(i);
            if (meta.hidden) return;
            meta.data.forEach((bar, j) => {
                const text = dataset.annotations[j];
                if (text !== null && text !== undefined) {
                    ctx.fillText(text, bar.x, bar.y - 3);
                }
            });
        });
        ctx.restore();
    }
};

function renderBarChart(canvas, spec) {
    const axisTitle = (text) => ({ display: !!text, text: text || '' });
    return new Chart(canvas.getContext('2d'), {
        type: 'bar',
        data: {
            labels: spec.data.labels,
            datasets: spec.data.datasets.map((ds) => ({
                label: ds.label,
                data: ds.data,
                annotations: ds.annotations,
                backgroundColor: ds.background_color
            }))
        },
        options: {
            responsive: true,
            interaction: { mode: 'nearest', intersect: true },
            plugins: {
                title: { display: true, text: spec.title },
                legend: { display: spec.options.show_legend },
                tooltip: {
                    enabled: spec.options.hover_values,
                    callbacks: { label: (item) => item.dataset.label + ': ' + item.raw }
                }
            },
            scales: {
                x: { title: axisTitle(spec.options.x_axis_label) },
                y: { beginAtZero: true, title: axisTitle(spec.options.y_axis_label) }
            }
        },
        plugins: [barLabels]
    });
}
";

/// What the y-axis of a chart measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    PatientCount,
    PercentageScore,
}

impl YAxis {
    /// Positive isolate worksheets count patients; audits are scored.
    #[must_use]
    pub fn for_worksheet(name: &str, groups: &CategoryGroups) -> Self {
        if groups.counts_patients(name) {
            Self::PatientCount
        } else {
            Self::PercentageScore
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PatientCount => "Number of patients",
            Self::PercentageScore => "Percentage score",
        }
    }
}

/// Label drawn above a bar: the value rounded to a whole number, or nothing
/// for a zero bar.
#[must_use]
pub fn bar_annotation(value: f64) -> Option<String> {
    if value == 0.0 {
        None
    } else {
        Some(format!("{value:.0}"))
    }
}

/// Chart specification for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Chart data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One bar series.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    /// Per-bar label, parallel to `data`.
    pub annotations: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Dataset {
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        let annotations = data.iter().copied().map(bar_annotation).collect();
        Self {
            label: label.into(),
            data,
            annotations,
            background_color: None,
        }
    }
}

/// Chart rendering options.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
    pub show_legend: bool,
    /// Reveal the exact value under the pointer.
    pub hover_values: bool,
}

impl ChartSpec {
    /// Create an empty bar chart.
    #[must_use]
    pub fn bar(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            data: ChartData::default(),
            options: ChartOptions {
                show_legend: true,
                hover_values: true,
                ..ChartOptions::default()
            },
        }
    }

    /// Grouped bar chart of a table.
    ///
    /// The first column supplies the categories and every other numeric
    /// column becomes a series. Returns `None` when there is nothing to plot.
    #[must_use]
    pub fn from_table(title: impl Into<String>, table: &TypedTable, y_axis: YAxis) -> Option<Self> {
        if table.is_empty() {
            return None;
        }
        let category = table.category_column()?;

        let datasets: Vec<Dataset> = table
            .columns()
            .iter()
            .skip(1)
            .filter_map(|column| Some((column.name.as_str(), column.as_numbers()?)))
            .zip(PALETTE.iter().cycle())
            .map(|((name, values), color)| Dataset {
                background_color: Some((*color).to_string()),
                ..Dataset::new(name, values.to_vec())
            })
            .collect();

        if datasets.is_empty() {
            return None;
        }

        let mut chart = Self::bar(title);
        chart.data = ChartData {
            labels: (0..table.row_count())
                .map(|row| category.display(row).to_string())
                .collect(),
            datasets,
        };
        chart.options.x_axis_label = Some(category.name.clone());
        chart.options.y_axis_label = Some(y_axis.label().to_string());
        Some(chart)
    }

    /// Convert to JSON string for frontend rendering.
    pub fn to_json(&self) -> DashResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Generate a standalone HTML page with embedded Chart.js.
    #[must_use]
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let json = serde_json::to_string(&self)
            .unwrap_or_default()
            .replace("</", "<\\/"); // Prevent script tag breakout

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <script src="{CHART_JS_URL}"></script>
</head>
<body>
    <canvas id="chart"></canvas>
    <script>{CHART_SCRIPT}
        renderBarChart(document.getElementById('chart'), {json});
    </script>
</body>
</html>"#
        )
    }
}
