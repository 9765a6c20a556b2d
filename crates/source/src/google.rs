//! Google Sheets v4 REST source.

use crate::context::SessionContext;
use crate::SheetSource;
use async_trait::async_trait;
use epicurves_core::{DashError, DashResult, RawGrid, WorksheetHandle};
use reqwest::{Response, StatusCode};
use serde::Deserialize;

const SHEET_FIELDS: &str = "sheets.properties(sheetId,title,index)";

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Reads worksheets from a Google spreadsheet.
#[derive(Debug, Clone)]
pub struct GoogleSheetsSource {
    session: SessionContext,
}

impl GoogleSheetsSource {
    #[must_use]
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }
}

/// A1 range covering a whole worksheet.
fn whole_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn connectivity(e: reqwest::Error) -> DashError {
    DashError::Connectivity(e.to_string())
}

fn status_error(status: StatusCode) -> DashError {
    let message = format!(
        "HTTP {} - {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DashError::Unauthorized(message),
        _ => DashError::Connectivity(message),
    }
}

/// Fail on any non-success status; used where nothing can be missing but the
/// whole spreadsheet.
fn require_success(response: Response) -> DashResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(status_error(response.status()))
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    async fn list_worksheets(&self) -> DashResult<Vec<WorksheetHandle>> {
        let url = self.session.spreadsheet_url(&[])?;
        tracing::debug!("listing worksheets of {}", self.session.spreadsheet_id());

        let response = self
            .session
            .get(url)
            .query(&[("fields", SHEET_FIELDS)])
            .send()
            .await
            .map_err(connectivity)?;

        let metadata: SpreadsheetMetadata = require_success(response)?
            .json()
            .await
            .map_err(|e| DashError::Connectivity(format!("Failed to parse JSON: {e}")))?;

        let mut worksheets: Vec<WorksheetHandle> = metadata
            .sheets
            .into_iter()
            .map(|entry| WorksheetHandle::new(entry.properties.title, entry.properties.index))
            .collect();
        worksheets.sort_by_key(|ws| ws.index);

        Ok(worksheets)
    }

    async fn fetch_grid(&self, worksheet: &WorksheetHandle) -> DashResult<RawGrid> {
        let range = whole_sheet_range(&worksheet.name);
        let url = self.session.spreadsheet_url(&["values", range.as_str()])?;
        tracing::debug!("fetching worksheet '{}'", worksheet.name);

        let response = self
            .session
            .get(url)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await
            .map_err(connectivity)?;

        // An unknown sheet title is reported as an unparsable range.
        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                return Err(DashError::not_found(&worksheet.name));
            }
            status if !status.is_success() => return Err(status_error(status)),
            _ => {}
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| DashError::Connectivity(format!("Failed to parse JSON: {e}")))?;

        Ok(RawGrid::from_values(body.values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_sheet_range_quotes() {
        assert_eq!(whole_sheet_range("KNH"), "'KNH'");
        assert_eq!(whole_sheet_range("Nurse's audit"), "'Nurse''s audit'");
    }

    #[test]
    fn test_status_error_kinds() {
        let err = status_error(StatusCode::FORBIDDEN);
        assert!(matches!(err, DashError::Unauthorized(ref m) if m == "HTTP 403 - Forbidden"));
        let err = status_error(StatusCode::TOO_MANY_REQUESTS);
        assert!(matches!(err, DashError::Connectivity(ref m) if m == "HTTP 429 - Too Many Requests"));
    }

    #[test]
    fn test_metadata_parses() {
        let json = r#"{"sheets": [
            {"properties": {"sheetId": 7, "title": "B", "index": 1}},
            {"properties": {"sheetId": 0, "title": "A"}}
        ]}"#;
        let metadata: SpreadsheetMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.sheets.len(), 2);
        assert_eq!(metadata.sheets[1].properties.index, 0);
    }

    #[test]
    fn test_value_range_without_values() {
        let body: ValueRange =
            serde_json::from_str(r#"{"range": "'Empty'!A1:Z1000", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(body.values.is_empty());
    }
}
