//! Per-session connection state.

use epicurves_core::{Credential, DashError, DashResult, Secrets};
use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and credential for one dashboard session.
///
/// Built once from the secrets document and handed to every source that
/// talks to the spreadsheet service.
#[derive(Debug, Clone)]
pub struct SessionContext {
    client: Client,
    credential: Credential,
    spreadsheet_id: String,
    api_base: Url,
}

impl SessionContext {
    /// Build a session with the default timeout.
    pub fn new(secrets: &Secrets) -> DashResult<Self> {
        Self::with_timeout(secrets, DEFAULT_TIMEOUT_SECS)
    }

    /// Build a session whose requests time out after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns `DashError::Config` if the secrets do not name a spreadsheet or
    /// the API base is not a URL, and `DashError::Connectivity` if the HTTP
    /// client cannot be built.
    pub fn with_timeout(secrets: &Secrets, timeout_secs: u64) -> DashResult<Self> {
        let spreadsheet_id = secrets.spreadsheet_id()?;
        let api_base = Url::parse(secrets.api_base())
            .map_err(|e| DashError::Config(format!("invalid api_base: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| DashError::Connectivity(e.to_string()))?;

        Ok(Self {
            client,
            credential: secrets.credential.clone(),
            spreadsheet_id,
            api_base,
        })
    }

    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// URL of a spreadsheet resource, `segments` appended after the id.
    pub fn spreadsheet_url(&self, segments: &[&str]) -> DashResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| DashError::Config(format!("cannot use {} as a base", self.api_base)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Start an authorised GET request.
    pub fn get(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.credential {
            Credential::ApiKey(key) => request.query(&[("key", key.as_str())]),
            Credential::AccessToken(token) => request.bearer_auth(token),
        }
    }
}
