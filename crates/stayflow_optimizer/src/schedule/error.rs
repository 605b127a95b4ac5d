use std::path::PathBuf;

use thiserror::Error;

use crate::schedule::value::ValueType;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Failed to open schedule file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read schedule")]
    Csv(#[from] csv::Error),
    #[error("Duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("Missing required column `{0}`")]
    MissingColumn(String),
    #[error("Column `{column}` has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Column `{column}` mixes {first} and {second} values")]
    MixedColumnTypes {
        column: String,
        first: ValueType,
        second: ValueType,
    },
    #[error("Column `{column}` must be of type {expected}, found {found}")]
    ColumnType {
        column: String,
        expected: ValueType,
        found: ValueType,
    },
    #[error("Column `{column}` is empty at row {row}")]
    NullCell { column: String, row: usize },
    #[error("Invalid direction `{value}` at row {row}, expected `in` or `out`")]
    InvalidDirection { value: String, row: usize },
}
