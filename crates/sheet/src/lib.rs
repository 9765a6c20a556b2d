//! Worksheet shaping for epicurves
//!
//! Turns the string grids fetched from a spreadsheet into typed tables and
//! routes worksheet names into the dashboard's categories.
//!
//! # Examples
//!
//! ## Typing a worksheet
//!
//! ```
//! use epicurves_sheet::{ColumnKind, RawGrid, TypedTable};
//!
//! let grid = RawGrid::from_values(vec![
//!     vec!["Week".to_string(), "KNH".to_string()],
//!     vec!["W1".to_string(), "4".to_string()],
//!     vec!["W2".to_string(), "7".to_string()],
//! ])
//! .unwrap();
//!
//! let table = TypedTable::build(&grid);
//! assert_eq!(table.columns()[0].kind(), ColumnKind::Text);
//! assert_eq!(table.columns()[1].kind(), ColumnKind::Numeric);
//! ```
//!
//! ## Partitioning worksheet names
//!
//! ```
//! use epicurves_sheet::CategoryGroups;
//!
//! let names: Vec<String> = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "Totals"]
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//!
//! let groups = CategoryGroups::partition(&names);
//! assert_eq!(groups.positives, ["A", "B", "C"]);
//! assert_eq!(groups.hand_hygiene, ["I"]);
//! ```

mod category;
mod error;
mod grid;
mod table;

/// Re-export category routing types.
pub use category::{
    Category, CategoryGroups, Selection, ENVIRONMENTAL_COUNT, POSITIVES_COUNT, TOTALS_WORKSHEET,
};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export grid types.
pub use grid::{RawGrid, WorksheetHandle};
/// Re-export typed table types.
pub use table::{infer_column, parse_number, Column, ColumnKind, ColumnValues, TypedTable};
