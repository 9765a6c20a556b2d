//! # epicurves-server
//!
//! Web server for the epicurves dashboard.
//!
//! Every request is one full, independent render: the handler reads the
//! selection from the request, asks the [`Dashboard`] for a fresh page and
//! returns it as HTML or JSON.

use anyhow::{Context, Result};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use epicurves_core::{Category, CategoryGroups, DashError, Secrets, Selection};
use epicurves_dashboard::Dashboard;
use epicurves_source::{
    GoogleSheetsSource, MemorySource, SessionContext, SheetSource, DEFAULT_TIMEOUT_SECS,
};
use epicurves_viz::{DashboardPage, BROWSER_TITLE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// epicurves-server - surveillance dashboard over a shared spreadsheet
#[derive(Parser)]
#[command(name = "epicurves-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Secrets document naming the spreadsheet and credential
    #[arg(long, env = "EPICURVES_SECRETS", value_name = "FILE")]
    secrets: Option<PathBuf>,

    /// Serve a JSON fixture workbook instead of the remote spreadsheet
    #[arg(long, value_name = "FILE", conflicts_with = "secrets")]
    fixture: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "EPICURVES_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// HTTP timeout for spreadsheet requests, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Error body returned by the JSON endpoints.
#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A dashboard failure mapped onto an HTTP response.
struct ApiError(DashError);

fn status_for(error: &DashError) -> StatusCode {
    if error.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<DashError> for ApiError {
    fn from(error: DashError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self.0);
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Read the sidebar selection from repeated query keys, e.g.
/// `?positives=A&environmental=D`. Unknown keys are ignored.
fn selection_from_query(query: Option<&str>) -> Selection {
    let mut selection = Selection::default();
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if let Some(category) = Category::from_key(&key) {
            selection.add(category, value);
        }
    }
    selection
}

fn error_page(error: &DashError) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{BROWSER_TITLE}</title></head>\n\
         <body>\n<h1>Something went wrong</h1>\n<p>The dashboard could not be loaded{}. Please try again later.</p>\n</body>\n</html>",
        if error.is_upstream() {
            " because the spreadsheet service is unavailable"
        } else {
            ""
        }
    )
}

/// HTML dashboard for the selection in the query string.
async fn index(State(dashboard): State<Dashboard>, RawQuery(query): RawQuery) -> Response {
    let selection = selection_from_query(query.as_deref());
    match dashboard.handle(&selection).await {
        Ok(page) => Html(page.to_html()).into_response(),
        Err(e) => {
            tracing::error!("dashboard render failed: {e}");
            (status_for(&e), Html(error_page(&e))).into_response()
        }
    }
}

/// Worksheet names grouped by category.
async fn worksheets(State(dashboard): State<Dashboard>) -> Result<Json<CategoryGroups>, ApiError> {
    Ok(Json(dashboard.categories().await?))
}

/// Render tree for a JSON selection.
async fn render(
    State(dashboard): State<Dashboard>,
    Json(selection): Json<Selection>,
) -> Result<Json<DashboardPage>, ApiError> {
    Ok(Json(dashboard.handle(&selection).await?))
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(dashboard: Dashboard) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/worksheets", get(worksheets))
        .route("/api/dashboard", post(render))
        .with_state(dashboard)
}

fn build_source(args: &Args) -> Result<Arc<dyn SheetSource>> {
    if let Some(path) = &args.fixture {
        let source = MemorySource::from_path(path)
            .with_context(|| format!("Failed to load fixture: {}", path.display()))?;
        return Ok(Arc::new(source));
    }

    let path = args
        .secrets
        .as_ref()
        .context("Either --secrets (or EPICURVES_SECRETS) or --fixture is required")?;
    let secrets = Secrets::from_path(path)
        .with_context(|| format!("Failed to read secrets: {}", path.display()))?;
    let session = SessionContext::with_timeout(&secrets, args.timeout)
        .context("Failed to set up spreadsheet session")?;

    tracing::info!("serving spreadsheet {}", session.spreadsheet_id());
    Ok(Arc::new(GoogleSheetsSource::new(session)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dashboard = Dashboard::new(build_source(&args)?);
    let app = create_router(dashboard).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!("epicurves-server listening on {}", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
