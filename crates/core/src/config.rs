//! Startup configuration read from the secrets document.

use crate::error::{DashError, DashResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Google Sheets REST endpoint used when the secrets do not override it.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// How requests to the spreadsheet service are authorised.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    /// Sent as the `key` query parameter.
    ApiKey(String),
    /// Sent as a bearer token.
    AccessToken(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}

/// The secrets document: target spreadsheet plus credential.
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    pub private_gsheets_url: String,
    pub credential: Credential,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Secrets {
    /// Read and parse a secrets file.
    pub fn from_path(path: impl AsRef<Path>) -> DashResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Parse a secrets document and check that its URL names a spreadsheet.
    pub fn from_json_str(json: &str) -> DashResult<Self> {
        let secrets: Self = serde_json::from_str(json)?;
        secrets.spreadsheet_id()?;
        Ok(secrets)
    }

    pub fn spreadsheet_id(&self) -> DashResult<String> {
        spreadsheet_id_from_url(&self.private_gsheets_url)
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }
}

fn spreadsheet_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9\-_]+)").expect("valid regex"))
}

/// Extract the spreadsheet id from a sharing URL.
pub fn spreadsheet_id_from_url(url: &str) -> DashResult<String> {
    spreadsheet_url_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DashError::Config(format!("not a spreadsheet URL: {url}")))
}
