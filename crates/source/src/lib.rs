//! # epicurves-source
//!
//! Where worksheet contents come from.
//!
//! [`GoogleSheetsSource`] reads a live spreadsheet through the Sheets v4 REST
//! API using a [`SessionContext`]; [`MemorySource`] serves a fixture workbook
//! for offline use and tests. Both return plain string grids; all typing
//! happens downstream.

mod context;
mod google;
mod memory;

use async_trait::async_trait;
use epicurves_core::{DashResult, RawGrid, WorksheetHandle};

pub use context::{SessionContext, DEFAULT_TIMEOUT_SECS};
pub use google::GoogleSheetsSource;
pub use memory::{FixtureWorksheet, MemorySource, Workbook};

/// A remote tabular data provider.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Every worksheet, in workbook order.
    ///
    /// Fails with `DashError::Unauthorized` if the service rejects the
    /// credentials and `DashError::Connectivity` on any other failure.
    async fn list_worksheets(&self) -> DashResult<Vec<WorksheetHandle>>;

    /// Full contents of one worksheet, first row as header.
    ///
    /// Fails with `DashError::NotFound` if the worksheet no longer exists,
    /// otherwise as [`SheetSource::list_worksheets`] does.
    async fn fetch_grid(&self, worksheet: &WorksheetHandle) -> DashResult<RawGrid>;
}
