//! End-to-end dashboard rendering over in-memory workbooks.

use async_trait::async_trait;
use epicurves_core::{
    Category, Credential, DashError, DashResult, RawGrid, Secrets, Selection, WorksheetHandle,
};
use epicurves_dashboard::Dashboard;
use epicurves_source::{GoogleSheetsSource, MemorySource, SessionContext, SheetSource};
use epicurves_viz::{GraphSection, PanelContent, SummarySection};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAMES: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "Totals"];

fn workbook() -> MemorySource {
    let mut source = MemorySource::new();
    for name in NAMES {
        source = match name {
            "Totals" => source.with_worksheet(
                name,
                vec![
                    vec!["Date", "KNH", "YNH", "NSIRH"],
                    vec!["2023-07-01", "140", "92", "37"],
                ],
            ),
            "E" => source.with_worksheet(
                name,
                vec![vec!["Ward", "Auditor"], vec!["3B", "JK"]],
            ),
            _ => source.with_worksheet(
                name,
                vec![
                    vec!["Week", "KNH", "YNH"],
                    vec!["W1", "4", "0"],
                    vec!["W2", "6.4", "2"],
                ],
            ),
        };
    }
    source
}

fn dashboard(source: impl SheetSource + 'static) -> Dashboard {
    Dashboard::new(Arc::new(source))
}

fn select(picks: &[(Category, &str)]) -> Selection {
    let mut selection = Selection::default();
    for (category, name) in picks {
        selection.add(*category, *name);
    }
    selection
}

/// Lists one worksheet more than it can serve.
struct VanishingSource {
    inner: MemorySource,
    vanished: &'static str,
}

#[async_trait]
impl SheetSource for VanishingSource {
    async fn list_worksheets(&self) -> DashResult<Vec<WorksheetHandle>> {
        let mut worksheets = self.inner.list_worksheets().await?;
        let index = worksheets.len();
        worksheets.insert(3, WorksheetHandle::new(self.vanished, index));
        Ok(worksheets)
    }

    async fn fetch_grid(&self, worksheet: &WorksheetHandle) -> DashResult<RawGrid> {
        self.inner.fetch_grid(worksheet).await
    }
}

/// Serves every worksheet but one, which fails with `error`.
struct FlakySource {
    inner: MemorySource,
    failing: &'static str,
    error: fn() -> DashError,
}

#[async_trait]
impl SheetSource for FlakySource {
    async fn list_worksheets(&self) -> DashResult<Vec<WorksheetHandle>> {
        self.inner.list_worksheets().await
    }

    async fn fetch_grid(&self, worksheet: &WorksheetHandle) -> DashResult<RawGrid> {
        if worksheet.name == self.failing {
            return Err((self.error)());
        }
        self.inner.fetch_grid(worksheet).await
    }
}

/// Fails every call as if the service were down.
struct OfflineSource;

#[async_trait]
impl SheetSource for OfflineSource {
    async fn list_worksheets(&self) -> DashResult<Vec<WorksheetHandle>> {
        Err(DashError::Connectivity("connection refused".into()))
    }

    async fn fetch_grid(&self, _worksheet: &WorksheetHandle) -> DashResult<RawGrid> {
        Err(DashError::Connectivity("connection refused".into()))
    }
}

#[tokio::test]
async fn test_categories_partition() {
    let groups = dashboard(workbook()).categories().await.unwrap();

    assert_eq!(groups.positives, ["A", "B", "C"]);
    assert_eq!(groups.environmental, ["D", "E", "F", "G", "H"]);
    assert_eq!(groups.hand_hygiene, ["I"]);
}

#[tokio::test]
async fn test_two_selections_render_one_row() {
    let page = dashboard(workbook())
        .handle(&select(&[
            (Category::Environmental, "D"),
            (Category::Positives, "A"),
        ]))
        .await
        .unwrap();

    let grid = page.grid().expect("chart grid");
    assert_eq!(grid.len(), 2);
    assert_eq!(grid.rows(), 1);
    assert_eq!(grid.columns(), 2);
    assert_eq!(grid.chart_count(), 2);

    let first = &grid.panels()[0];
    assert_eq!(first.title, "A");
    assert_eq!(
        first.chart().unwrap().options.y_axis_label.as_deref(),
        Some("Number of patients")
    );
    let second = &grid.panels()[1];
    assert_eq!((second.row, second.column), (0, 1));
    assert_eq!(
        second.chart().unwrap().options.y_axis_label.as_deref(),
        Some("Percentage score")
    );
}

#[tokio::test]
async fn test_single_selection_prompts() {
    let page = dashboard(workbook())
        .handle(&select(&[(Category::Positives, "B")]))
        .await
        .unwrap();

    assert!(page.grid().is_none());
    match &page.graphs {
        GraphSection::Prompt { message, .. } => {
            assert!(message.contains("select at least two"));
        }
        GraphSection::Grid { .. } => panic!("Expected prompt"),
    }
}

#[tokio::test]
async fn test_unknown_names_do_not_count() {
    let page = dashboard(workbook())
        .handle(&select(&[
            (Category::Positives, "A"),
            (Category::HandHygiene, "Totals"),
            (Category::HandHygiene, "Nope"),
        ]))
        .await
        .unwrap();

    assert!(page.grid().is_none());
}

#[tokio::test]
async fn test_annotations_on_rendered_bars() {
    let page = dashboard(workbook())
        .handle(&select(&[(Category::Positives, "A"), (Category::Positives, "B")]))
        .await
        .unwrap();

    let chart = page.grid().unwrap().panels()[0].chart().unwrap().clone();
    let ynh = &chart.data.datasets[1];
    assert_eq!(ynh.annotations, vec![None, Some("2".to_string())]);
    let knh = &chart.data.datasets[0];
    assert_eq!(knh.annotations, vec![Some("4".to_string()), Some("6".to_string())]);
}

#[tokio::test]
async fn test_text_only_worksheet_gets_empty_panel() {
    let page = dashboard(workbook())
        .handle(&select(&[
            (Category::Environmental, "E"),
            (Category::Environmental, "F"),
            (Category::HandHygiene, "I"),
        ]))
        .await
        .unwrap();

    let grid = page.grid().unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid.rows(), 2);
    assert!(matches!(grid.panels()[0].content, PanelContent::Empty));
    assert_eq!(grid.chart_count(), 2);
}

#[tokio::test]
async fn test_summary_from_totals() {
    let page = dashboard(workbook())
        .handle(&Selection::default())
        .await
        .unwrap();

    match &page.summary {
        SummarySection::Table { table } => {
            assert_eq!(table.headers[0].text, "Date");
            assert_eq!(table.rows[0][1].text, "140");
            assert_eq!(table.rows[0][1].background, Some("lightgreen"));
        }
        SummarySection::Unavailable { message } => panic!("Unexpected notice: {message}"),
    }
}

#[tokio::test]
async fn test_missing_totals_is_a_notice() {
    let source = MemorySource::new()
        .with_worksheet("A", vec![vec!["Week", "KNH"], vec!["W1", "1"]])
        .with_worksheet("B", vec![vec!["Week", "KNH"], vec!["W1", "2"]]);

    let page = dashboard(source)
        .handle(&select(&[(Category::Positives, "A"), (Category::Positives, "B")]))
        .await
        .unwrap();

    assert!(matches!(page.summary, SummarySection::Unavailable { .. }));
    assert_eq!(page.grid().unwrap().chart_count(), 2);
}

#[tokio::test]
async fn test_vanished_worksheet_skips_only_its_panel() {
    let source = VanishingSource {
        inner: workbook(),
        vanished: "Ghost",
    };

    // Ghost is listed at position 3, so it lands among the environmental audits.
    let page = dashboard(source)
        .handle(&select(&[
            (Category::Positives, "A"),
            (Category::Environmental, "Ghost"),
            (Category::Environmental, "D"),
        ]))
        .await
        .unwrap();

    let grid = page.grid().unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid.chart_count(), 2);
    assert!(matches!(
        &grid.panels()[1].content,
        PanelContent::Unavailable { reason } if reason.contains("Ghost")
    ));
}

#[tokio::test]
async fn test_connectivity_failure_is_fatal() {
    let result = dashboard(OfflineSource).handle(&Selection::default()).await;
    assert!(matches!(result, Err(DashError::Connectivity(_))));
}

#[tokio::test]
async fn test_table_lookup() {
    let dash = dashboard(workbook());

    let table = dash.table("Totals").await.unwrap();
    assert_eq!(table.col_count(), 4);

    let missing = dash.table("Nope").await;
    assert!(matches!(missing, Err(DashError::NotFound { .. })));
}

#[tokio::test]
async fn test_failed_fetch_skips_only_its_panel() {
    let source = FlakySource {
        inner: workbook(),
        failing: "D",
        error: || DashError::Connectivity("HTTP 503 - Service Unavailable".into()),
    };

    let page = dashboard(source)
        .handle(&select(&[
            (Category::Positives, "A"),
            (Category::Environmental, "D"),
            (Category::Positives, "B"),
        ]))
        .await
        .unwrap();

    assert!(matches!(page.summary, SummarySection::Table { .. }));
    let grid = page.grid().unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid.chart_count(), 2);
    assert!(matches!(
        &grid.panels()[2].content,
        PanelContent::Unavailable { reason } if reason.contains("503")
    ));
}

#[tokio::test]
async fn test_failed_totals_fetch_is_a_notice() {
    let source = FlakySource {
        inner: workbook(),
        failing: "Totals",
        error: || DashError::Connectivity("operation timed out".into()),
    };

    let page = dashboard(source)
        .handle(&select(&[(Category::Positives, "A"), (Category::Positives, "B")]))
        .await
        .unwrap();

    assert!(matches!(
        &page.summary,
        SummarySection::Unavailable { message } if message.contains("timed out")
    ));
    assert_eq!(page.grid().unwrap().chart_count(), 2);
}

#[tokio::test]
async fn test_rejected_credentials_on_fetch_are_fatal() {
    let source = FlakySource {
        inner: workbook(),
        failing: "D",
        error: || DashError::Unauthorized("HTTP 401 - Unauthorized".into()),
    };

    let result = dashboard(source)
        .handle(&select(&[(Category::Positives, "A"), (Category::Environmental, "D")]))
        .await;

    assert!(matches!(result, Err(DashError::Unauthorized(_))));
}

#[tokio::test]
async fn test_google_source_with_one_unavailable_worksheet() {
    const SPREADSHEET: &str = "/v4/spreadsheets/sheet123";
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SPREADSHEET))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheets": [
                {"properties": {"sheetId": 1, "title": "A", "index": 0}},
                {"properties": {"sheetId": 2, "title": "B", "index": 1}},
                {"properties": {"sheetId": 3, "title": "C", "index": 2}},
                {"properties": {"sheetId": 4, "title": "D", "index": 3}},
                {"properties": {"sheetId": 5, "title": "Totals", "index": 4}}
            ]
        })))
        .mount(&server)
        .await;

    for name in ["A", "B"] {
        Mock::given(method("GET"))
            .and(path(format!("{SPREADSHEET}/values/'{name}'")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [["Week", "KNH"], ["W1", "3"], ["W2", "05"]]
            })))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("{SPREADSHEET}/values/'Totals'")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "values": [["Date", "KNH"], ["2023-07-01", "0140"]]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{SPREADSHEET}/values/'D'")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let secrets = Secrets {
        private_gsheets_url: "https://docs.google.com/spreadsheets/d/sheet123/edit".into(),
        credential: Credential::ApiKey("k".into()),
        api_base: Some(server.uri()),
    };
    let source = GoogleSheetsSource::new(SessionContext::with_timeout(&secrets, 5).unwrap());

    let page = dashboard(source)
        .handle(&select(&[
            (Category::Environmental, "D"),
            (Category::Positives, "A"),
            (Category::Positives, "B"),
        ]))
        .await
        .unwrap();

    match &page.summary {
        SummarySection::Table { table } => assert_eq!(table.rows[0][1].text, "0140"),
        SummarySection::Unavailable { message } => panic!("Unexpected notice: {message}"),
    }

    let grid = page.grid().unwrap();
    let titles: Vec<&str> = grid.panels().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "D"]);
    assert_eq!(grid.chart_count(), 2);
    assert!(matches!(
        &grid.panels()[2].content,
        PanelContent::Unavailable { reason } if reason.contains("503")
    ));
}
