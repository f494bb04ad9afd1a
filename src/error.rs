use arrow::{datatypes::DataType, error::ArrowError};
use sieve_predicate::{ColumnError, EvalError};
use thiserror::Error;

/// Errors raised while building or filtering a [`crate::Table`].
#[derive(Debug, Error)]
pub enum TableError {
    /// Two columns share a name.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    /// A column's row count differs from the first column's.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        /// Column name.
        column: String,
        /// Row count of the first column.
        expected: usize,
        /// Row count found.
        actual: usize,
    },
    /// A record batch does not match the table schema.
    #[error("record batch field '{field}' has type {actual:?}, expected {expected:?}")]
    SchemaMismatch {
        /// Field name in the table schema.
        field: String,
        /// Type in the table schema.
        expected: DataType,
        /// Type found in the batch.
        actual: DataType,
    },
    /// A record batch carries a different number of columns than the schema.
    #[error("record batch has {actual} columns, schema has {expected}")]
    ColumnCount {
        /// Fields in the table schema.
        expected: usize,
        /// Columns found in the batch.
        actual: usize,
    },
    /// The filter mask does not cover every row.
    #[error("mask has {actual} entries, table has {expected} rows")]
    MaskLength {
        /// Table row count.
        expected: usize,
        /// Mask length.
        actual: usize,
    },
    /// Chunked column construction failed.
    #[error(transparent)]
    Column(#[from] ColumnError),
    /// Arrow kernel failure.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

/// Errors raised by [`crate::Slicer`].
#[derive(Debug, Error)]
pub enum SlicerError {
    /// The name does not resolve to a column.
    #[error("no such column: {0}")]
    NoSuchColumn(String),
    /// The root mask does not have one entry per table row.
    #[error("condition produced {actual} mask entries for a table of {expected} rows")]
    MaskLength {
        /// Table row count.
        expected: usize,
        /// Mask length.
        actual: usize,
    },
    /// Condition evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// Table filtering failed.
    #[error(transparent)]
    Table(#[from] TableError),
}
