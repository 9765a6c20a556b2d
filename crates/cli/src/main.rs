//! # epicurves-cli
//!
//! Command-line interface for the epicurves dashboard.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use epicurves_core::{Category, ColumnKind, ColumnValues, Secrets, Selection, TypedTable};
use epicurves_dashboard::Dashboard;
use epicurves_source::{
    GoogleSheetsSource, MemorySource, SessionContext, SheetSource, DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// epicurves - surveillance epicurves from a shared spreadsheet
#[derive(Parser)]
#[command(name = "epicurves")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Secrets document naming the spreadsheet and credential
    #[arg(long, env = "EPICURVES_SECRETS", value_name = "FILE", global = true)]
    secrets: Option<PathBuf>,

    /// Read a JSON fixture workbook instead of the remote spreadsheet
    #[arg(long, value_name = "FILE", global = true, conflicts_with = "secrets")]
    fixture: Option<PathBuf>,

    /// HTTP timeout for spreadsheet requests, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List worksheets grouped by category
    Worksheets,

    /// Print one worksheet as a typed table
    Table {
        /// Worksheet name
        name: String,

        /// Output format
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: TableFormat,
    },

    /// Render the dashboard for a selection
    Render {
        /// Positive isolate worksheets to chart
        #[arg(long, value_name = "NAME")]
        positives: Vec<String>,

        /// Environmental audit worksheets to chart
        #[arg(long, value_name = "NAME")]
        environmental: Vec<String>,

        /// Hand hygiene audit worksheets to chart
        #[arg(long, value_name = "NAME")]
        hand_hygiene: Vec<String>,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long = "format", default_value = "html")]
        format: PageFormat,
    },
}

/// Output format for `table`.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum TableFormat {
    /// Column kinds and rows (default)
    #[default]
    Table,
    /// CSV output
    Csv,
    /// JSON column descriptors
    Json,
}

/// Output format for `render`.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum PageFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// JSON render tree
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let dashboard = Dashboard::new(build_source(&cli)?);

    match cli.command {
        Command::Worksheets => {
            let groups = dashboard.categories().await?;
            for category in Category::ALL {
                println!("{}", category.heading().cyan().bold());
                for name in groups.group(category) {
                    println!("  {name}");
                }
            }
        }
        Command::Table { name, format } => {
            let table = dashboard
                .table(&name)
                .await
                .with_context(|| format!("Failed to load worksheet '{name}'"))?;
            match format {
                TableFormat::Table => print!("{}", format_table(&table)),
                TableFormat::Csv => table.write_csv(std::io::stdout().lock())?,
                TableFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&table_to_json(&table))?);
                }
            }
        }
        Command::Render {
            positives,
            environmental,
            hand_hygiene,
            output,
            format,
        } => {
            let selection = Selection {
                positives,
                environmental,
                hand_hygiene,
            };
            let page = dashboard.handle(&selection).await?;
            let rendered = match format {
                PageFormat::Html => page.to_html(),
                PageFormat::Json => page.to_json()?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("{} {}", "Wrote".green().bold(), path.display());
                }
                None => println!("{rendered}"),
            }
        }
    }

    Ok(())
}

fn build_source(cli: &Cli) -> Result<Arc<dyn SheetSource>> {
    if let Some(path) = &cli.fixture {
        tracing::info!("reading fixture workbook {}", path.display());
        let source = MemorySource::from_path(path)
            .with_context(|| format!("Failed to load fixture: {}", path.display()))?;
        return Ok(Arc::new(source));
    }

    let path = cli
        .secrets
        .as_ref()
        .context("Either --secrets (or EPICURVES_SECRETS) or --fixture is required")?;
    let secrets = Secrets::from_path(path)
        .with_context(|| format!("Failed to read secrets: {}", path.display()))?;
    let session = SessionContext::with_timeout(&secrets, cli.timeout)
        .context("Failed to set up spreadsheet session")?;
    tracing::info!("using spreadsheet {}", session.spreadsheet_id());

    Ok(Arc::new(GoogleSheetsSource::new(session)))
}

fn kind_name(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Numeric => "numeric",
        ColumnKind::Text => "text",
    }
}

/// Plain-text rendering: a header of `name (kind)` cells, then the rows.
fn format_table(table: &TypedTable) -> String {
    if table.is_empty() {
        return "(empty table)\n".to_string();
    }

    let header = table
        .columns()
        .iter()
        .map(|c| format!("{} ({})", c.name, kind_name(c.kind())))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut out = format!("{}\n", header.bold());
    for row in 0..table.row_count() {
        let cells: Vec<&str> = table.columns().iter().map(|c| c.display(row)).collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out
}

/// Column descriptors: `{name, kind, values}` with numbers kept numeric.
fn table_to_json(table: &TypedTable) -> serde_json::Value {
    let columns = table
        .columns()
        .iter()
        .map(|c| {
            let values = match &c.values {
                ColumnValues::Numeric { values, .. } => serde_json::json!(values),
                ColumnValues::Text(values) => serde_json::json!(values),
            };
            serde_json::json!({
                "name": c.name,
                "kind": kind_name(c.kind()),
                "values": values,
            })
        })
        .collect();
    serde_json::Value::Array(columns)
}
