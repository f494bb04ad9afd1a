#![deny(missing_docs)]
//! Sieve predicate crate.
//!
//! Conditions are bound to live chunked Arrow columns and evaluate into a
//! single flat [`arrow::array::BooleanArray`] mask. Evaluation follows Arrow
//! semantics for casting and comparison; combinators propagate NULL from
//! either side instead of applying Kleene logic.

mod core;

pub use core::{
    ChunkedColumn, ColumnCondition, ColumnError, ColumnRef, ComparisonOp, Condition, EvalError,
    EvalOptions, RowPredicate, ScalarValue, ScalarValueRef,
};
