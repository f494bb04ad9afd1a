#![deny(missing_docs)]
//! Row selection over chunked, in-memory Arrow tables.
//!
//! A [`Table`] holds named [`ChunkedColumn`]s of equal length. Its [`Slicer`]
//! hands out column builders whose comparisons, user predicates and boolean
//! combinators form a [`Condition`]. Evaluating a condition yields one flat
//! [`arrow::array::BooleanArray`] mask that can be used to filter the table.

mod error;
mod observability;
mod option;
mod slicer;
mod table;

pub use sieve_predicate::{
    ChunkedColumn, ColumnCondition, ColumnError, ColumnRef, ComparisonOp, Condition, EvalError,
    EvalOptions, RowPredicate, ScalarValue, ScalarValueRef,
};

pub use crate::{
    error::{SlicerError, TableError},
    option::SlicerOption,
    slicer::Slicer,
    table::Table,
};
