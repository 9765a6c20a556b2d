use thiserror::Error;

/// Errors that can occur while shaping worksheet contents
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Ragged grid: row {row} has {actual} cells but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
