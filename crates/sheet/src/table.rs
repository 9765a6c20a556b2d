//! Typed tables built from raw worksheet grids.
//!
//! Column typing is all-or-nothing: a column is numeric only when every one of
//! its cells parses as a finite number. A single non-numeric cell leaves the
//! whole column as text. Either way every cell keeps its original string
//! form, so display never rewrites what the worksheet says.

use crate::error::Result;
use crate::grid::RawGrid;
use std::io::Write;

/// Inferred kind of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Outcome of typing one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Parsed numbers alongside the cell text they came from.
    Numeric { values: Vec<f64>, raw: Vec<String> },
    Text(Vec<String>),
}

impl ColumnValues {
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric { .. } => ColumnKind::Numeric,
            Self::Text(_) => ColumnKind::Text,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric { values, .. } => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    /// Numeric values, if this column is numeric.
    #[must_use]
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match &self.values {
            ColumnValues::Numeric { values, .. } => Some(values),
            ColumnValues::Text(_) => None,
        }
    }

    /// Cell text at `row`, exactly as fetched.
    #[must_use]
    pub fn display(&self, row: usize) -> &str {
        match &self.values {
            ColumnValues::Numeric { raw, .. } => &raw[row],
            ColumnValues::Text(values) => &values[row],
        }
    }
}

/// Parse a cell as a plain decimal or integer number.
///
/// Surrounding whitespace is ignored. Blank cells, `NaN` and infinities do not
/// count as numbers.
#[must_use]
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Type one column from its cells.
pub fn infer_column<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnValues {
    let raw: Vec<String> = cells.map(ToString::to_string).collect();
    let numbers: Option<Vec<f64>> = raw.iter().map(String::as_str).map(parse_number).collect();
    match numbers {
        Some(values) => ColumnValues::Numeric { values, raw },
        None => ColumnValues::Text(raw),
    }
}

/// A raw grid with per-column type inference applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedTable {
    columns: Vec<Column>,
}

impl TypedTable {
    /// Type every column of `grid`, preserving header order.
    ///
    /// A grid with a header but no rows keeps its column names; such columns
    /// hold no values and type as numeric.
    #[must_use]
    pub fn build(grid: &RawGrid) -> Self {
        let columns = grid
            .header()
            .iter()
            .enumerate()
            .map(|(index, name)| Column {
                name: name.clone(),
                values: infer_column(grid.column(index)),
            })
            .collect();

        Self { columns }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// True when the table has no columns or no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// First column, used as the category axis when charting.
    #[must_use]
    pub fn category_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
    }

    /// First column with the given name.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Text form of the table, as a grid again.
    #[must_use]
    pub fn to_raw_grid(&self) -> RawGrid {
        let header = self.columns.iter().map(|c| c.name.clone()).collect();
        let rows = (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.display(row).to_string())
                    .collect()
            })
            .collect();

        // Columns all have row_count() cells, so the grid is rectangular.
        RawGrid::new(header, rows).unwrap_or_default()
    }

    /// Write the table as CSV, header first.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in 0..self.row_count() {
            csv_writer.write_record(self.columns.iter().map(|c| c.display(row)))?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
