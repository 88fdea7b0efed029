use thiserror::Error;

/// Problems recognised while turning a file into a [`DataFrame`](crate::data::model::DataFrame).
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Reasons a chart cannot be built from the current selection.
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("No {0} column selected")]
    MissingSelection(&'static str),
}
