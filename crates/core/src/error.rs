//! Error types for epicurves.

use epicurves_sheet::SheetError;
use thiserror::Error;

/// Result type for epicurves operations.
pub type DashResult<T> = Result<T, DashError>;

/// Errors that can occur while building a dashboard.
#[derive(Debug, Error)]
pub enum DashError {
    /// The spreadsheet service is unreachable or failed the request.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// The spreadsheet service rejected the credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A worksheet disappeared between listing and fetching.
    #[error("Worksheet not found: {worksheet}")]
    NotFound { worksheet: String },

    /// Worksheet contents could not be shaped into a grid.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashError {
    /// Create a not-found error for a worksheet.
    pub fn not_found(worksheet: impl Into<String>) -> Self {
        Self::NotFound {
            worksheet: worksheet.into(),
        }
    }

    /// Whether a failed worksheet fetch ends the whole render rather than
    /// one panel.
    ///
    /// Only failures that no other worksheet could escape count: rejected
    /// credentials and broken configuration. A failure to list worksheets is
    /// always fatal, whatever its kind.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Config(_))
    }

    /// Whether the spreadsheet service itself is the cause.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Unauthorized(_))
    }
}
