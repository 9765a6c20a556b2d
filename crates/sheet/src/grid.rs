//! Raw worksheet contents as delivered by a sheet source.

use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};

/// Identifies one remote worksheet by name and position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorksheetHandle {
    pub name: String,
    pub index: usize,
}

impl WorksheetHandle {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Unprocessed rectangular text content of a worksheet.
///
/// Every row has exactly as many cells as the header. Header names may repeat;
/// lookups by name resolve to the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGrid {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    /// Create a grid, rejecting rows whose length differs from the header.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != header.len())
        {
            return Err(SheetError::RaggedRow {
                row,
                expected: header.len(),
                actual: cells.len(),
            });
        }

        Ok(Self { header, rows })
    }

    /// Build a grid from a full value dump whose first row is the header.
    ///
    /// Spreadsheet services drop trailing empty cells, so every row (header
    /// included) is right-padded with empty strings to the widest row first.
    /// An empty dump yields an empty grid.
    pub fn from_values(values: Vec<Vec<String>>) -> Result<Self> {
        let width = values.iter().map(Vec::len).max().unwrap_or(0);
        let mut padded = values.into_iter().map(|mut row| {
            row.resize(width, String::new());
            row
        });

        let Some(header) = padded.next() else {
            return Ok(Self::default());
        };

        Self::new(header, padded.collect())
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.header.len()
    }

    /// Index of the first column with the given header name.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }
}
