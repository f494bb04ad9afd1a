use arrow::{datatypes::DataType, error::ArrowError};
use thiserror::Error;

/// Errors raised while assembling a [`super::ChunkedColumn`].
#[derive(Debug, Error, PartialEq)]
pub enum ColumnError {
    /// A chunk does not carry the column's declared type.
    #[error("chunk {chunk} of column '{column}' has type {actual:?}, expected {expected:?}")]
    ChunkType {
        /// Column name.
        column: String,
        /// Position of the offending chunk.
        chunk: usize,
        /// Declared column type.
        expected: DataType,
        /// Type found on the chunk.
        actual: DataType,
    },
}

/// Errors raised while evaluating a [`super::Condition`] into a mask.
#[derive(Debug, Error)]
pub enum EvalError {
    /// No cast from the column type to boolean exists.
    #[error("type cast error: column '{column}' of type {data_type:?} cannot be cast to Boolean")]
    UnsupportedCast {
        /// Column name.
        column: String,
        /// Column type.
        data_type: DataType,
    },
    /// A value inside the column failed the boolean cast.
    #[error("type cast error: column '{column}' of type {data_type:?}: {source}")]
    Cast {
        /// Column name.
        column: String,
        /// Column type.
        data_type: DataType,
        /// Underlying Arrow failure.
        #[source]
        source: ArrowError,
    },
    /// The comparison literal cannot be represented in the column's comparison type.
    #[error("literal {literal} cannot be compared with column '{column}' as {data_type:?}: {source}")]
    LiteralCast {
        /// Column name.
        column: String,
        /// Literal rendered for display.
        literal: String,
        /// Type the literal was coerced to.
        data_type: DataType,
        /// Underlying Arrow failure.
        #[source]
        source: ArrowError,
    },
    /// Row predicates cannot read values of this column type.
    #[error("column '{column}' of type {data_type:?} cannot be read by a row predicate")]
    UnsupportedType {
        /// Column name.
        column: String,
        /// Column type.
        data_type: DataType,
    },
    /// The two operands of a combinator produced masks of different lengths.
    #[error("{op} operands have different lengths: left {left}, right {right}")]
    LengthMismatch {
        /// Combinator name.
        op: &'static str,
        /// Rows in the left mask.
        left: usize,
        /// Rows in the right mask.
        right: usize,
    },
    /// Any other Arrow kernel failure.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}
