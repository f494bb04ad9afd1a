//! Chunk-level kernels shared by condition evaluation.
//!
//! Every helper walks a column's chunks in order, builds one mask per chunk
//! and concatenates them, so the chunk layout never leaks into the result.

use std::{cmp::Ordering, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray, Datum, Scalar},
    buffer::{BooleanBuffer, NullBuffer},
    compute::kernels::{
        boolean,
        cast::{can_cast_types, cast_with_options},
        cmp,
        concat::concat,
    },
    datatypes::DataType,
    error::ArrowError,
};

use super::{
    options::strict_cast, value::supports_data_type, ChunkedColumn, ComparisonOp, EvalError,
    EvalOptions, RowPredicate, ScalarValue, ScalarValueRef,
};

/// Boolean operator applied by combinators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LogicalOp {
    And,
    Or,
    Xor,
}

impl LogicalOp {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Xor => "XOR",
        }
    }
}

/// Mask holding the column's boolean interpretation, complemented when `invert` is set.
pub(crate) fn column_mask(
    column: &ChunkedColumn,
    invert: bool,
    options: &EvalOptions,
) -> Result<BooleanArray, EvalError> {
    let mut masks = Vec::with_capacity(column.num_chunks());
    for chunk in column.chunks() {
        let mask = chunk_as_boolean(column, chunk, options)?;
        masks.push(if invert { boolean::not(&mask)? } else { mask });
    }
    concat_masks(masks)
}

fn chunk_as_boolean(
    column: &ChunkedColumn,
    chunk: &ArrayRef,
    options: &EvalOptions,
) -> Result<BooleanArray, EvalError> {
    let data_type = chunk.data_type();
    if data_type == &DataType::Boolean {
        return Ok(chunk.as_boolean().clone());
    }
    if !can_cast_types(data_type, &DataType::Boolean) {
        return Err(EvalError::UnsupportedCast {
            column: column.name().to_owned(),
            data_type: data_type.clone(),
        });
    }
    let cast = cast_with_options(chunk.as_ref(), &DataType::Boolean, &options.boolean_cast())
        .map_err(|source| EvalError::Cast {
            column: column.name().to_owned(),
            data_type: data_type.clone(),
            source,
        })?;
    Ok(cast.as_boolean().clone())
}

/// Mask for `literal <op'> column[i]`, where `op'` is `op` with its sides swapped.
///
/// The literal is the left operand of the Arrow kernel. A NULL literal turns
/// `Equal`/`NotEqual` into null checks and every ordering into an all-NULL mask.
pub(crate) fn compare_mask(
    column: &ChunkedColumn,
    op: ComparisonOp,
    literal: &ScalarValue,
) -> Result<BooleanArray, EvalError> {
    let mut masks = Vec::with_capacity(column.num_chunks());
    if literal.is_null() || column.data_type() == &DataType::Null {
        for chunk in column.chunks() {
            let mask = match op {
                ComparisonOp::Equal if literal.is_null() => boolean::is_null(chunk.as_ref())?,
                ComparisonOp::NotEqual if literal.is_null() => {
                    boolean::is_not_null(chunk.as_ref())?
                }
                _ => BooleanArray::new_null(chunk.len()),
            };
            masks.push(mask);
        }
        return concat_masks(masks);
    }

    let (op, literal) = match integer_bound(column.data_type(), op, literal) {
        Bound::Kernel(op, literal) => (op, literal),
        Bound::Constant(value) => {
            for chunk in column.chunks() {
                masks.push(constant_mask(chunk.as_ref(), value));
            }
            return concat_masks(masks);
        }
    };
    let target = comparison_type(column.data_type(), &literal.data_type());
    let scalar = literal_scalar(column, &literal, &target)?;
    for chunk in column.chunks() {
        let promoted = if chunk.data_type() == &target {
            Arc::clone(chunk)
        } else {
            cast_with_options(chunk.as_ref(), &target, &strict_cast())?
        };
        masks.push(compare(op.flipped(), &scalar, &promoted)?);
    }
    concat_masks(masks)
}

/// Comparison an integer column runs in place of one against a float literal.
#[derive(Debug, PartialEq)]
enum Bound {
    Kernel(ComparisonOp, ScalarValue),
    /// Every non-NULL row gets this value.
    Constant(bool),
}

/// Rewrites `column <op> float` over integers into an exact integer comparison.
///
/// Literals beyond every integer become infinities, which `Float64` orders exactly.
fn integer_bound(column: &DataType, op: ComparisonOp, literal: &ScalarValue) -> Bound {
    let ScalarValue::Float64(value) = *literal else {
        return Bound::Kernel(op, literal.clone());
    };
    if !column.is_integer() || !value.is_finite() {
        return Bound::Kernel(op, literal.clone());
    }
    let floor = value.floor();
    // i64::MIN and u64::MAX + 1 are exact powers of two
    if floor < i64::MIN as f64 {
        return Bound::Kernel(op, ScalarValue::Float64(f64::NEG_INFINITY));
    }
    if floor >= u64::MAX as f64 {
        return Bound::Kernel(op, ScalarValue::Float64(f64::INFINITY));
    }
    let integer = if floor < i64::MAX as f64 {
        ScalarValue::Int64(floor as i64)
    } else {
        ScalarValue::UInt64(floor as u64)
    };
    if floor == value {
        return Bound::Kernel(op, integer);
    }
    match op {
        ComparisonOp::Equal => Bound::Constant(false),
        ComparisonOp::NotEqual => Bound::Constant(true),
        ComparisonOp::LessThan | ComparisonOp::LessThanOrEqual => {
            Bound::Kernel(ComparisonOp::LessThanOrEqual, integer)
        }
        ComparisonOp::GreaterThan | ComparisonOp::GreaterThanOrEqual => {
            Bound::Kernel(ComparisonOp::GreaterThan, integer)
        }
    }
}

fn constant_mask(chunk: &dyn Array, value: bool) -> BooleanArray {
    let values = if value {
        BooleanBuffer::new_set(chunk.len())
    } else {
        BooleanBuffer::new_unset(chunk.len())
    };
    BooleanArray::new(values, chunk.logical_nulls())
}

/// Type both sides of a comparison are brought to before the kernel runs.
fn comparison_type(column: &DataType, literal: &DataType) -> DataType {
    if column == literal {
        return column.clone();
    }
    let decimal = |data_type: &DataType| {
        matches!(data_type, DataType::Decimal128(_, _) | DataType::Decimal256(_, _))
    };
    if decimal(column) && literal.is_floating() {
        return DataType::Float64;
    }
    let numeric = |data_type: &DataType| data_type.is_integer() || data_type.is_floating();
    if !(numeric(column) && numeric(literal)) {
        return column.clone();
    }
    if column.is_floating() || literal.is_floating() {
        return DataType::Float64;
    }
    match (column.is_signed_integer(), literal.is_signed_integer()) {
        (true, true) => DataType::Int64,
        (false, false) => DataType::UInt64,
        // wide enough for both i64::MIN and u64::MAX
        _ => DataType::Decimal128(20, 0),
    }
}

/// One-row literal array of type `target`.
///
/// Numeric literals must survive the cast unchanged: a cast that rounds or
/// truncates fails with [`EvalError::LiteralCast`].
fn literal_scalar(
    column: &ChunkedColumn,
    literal: &ScalarValue,
    target: &DataType,
) -> Result<Scalar<ArrayRef>, EvalError> {
    let array = literal.to_array();
    if array.data_type() == target {
        return Ok(Scalar::new(array));
    }
    let literal_cast = |source| EvalError::LiteralCast {
        column: column.name().to_owned(),
        literal: literal.to_string(),
        data_type: target.clone(),
        source,
    };
    let cast = cast_with_options(array.as_ref(), target, &strict_cast()).map_err(literal_cast)?;
    if literal.data_type().is_numeric() {
        let back = cast_with_options(cast.as_ref(), array.data_type(), &strict_cast())
            .map_err(literal_cast)?;
        let exact = ScalarValueRef::try_from_array(back.as_ref(), 0)
            .and_then(|value| value.compare(literal.as_ref()))
            == Some(Ordering::Equal);
        if !exact {
            return Err(literal_cast(ArrowError::CastError(format!(
                "{literal} is not exactly representable as {target:?}"
            ))));
        }
    }
    Ok(Scalar::new(cast))
}

fn compare(
    op: ComparisonOp,
    lhs: &dyn Datum,
    rhs: &dyn Datum,
) -> Result<BooleanArray, ArrowError> {
    match op {
        ComparisonOp::Equal => cmp::eq(lhs, rhs),
        ComparisonOp::NotEqual => cmp::neq(lhs, rhs),
        ComparisonOp::LessThan => cmp::lt(lhs, rhs),
        ComparisonOp::LessThanOrEqual => cmp::lt_eq(lhs, rhs),
        ComparisonOp::GreaterThan => cmp::gt(lhs, rhs),
        ComparisonOp::GreaterThanOrEqual => cmp::gt_eq(lhs, rhs),
    }
}

/// Mask holding `predicate(value)` for every row, complemented when `invert` is set.
pub(crate) fn predicate_mask(
    column: &ChunkedColumn,
    predicate: &RowPredicate,
    invert: bool,
) -> Result<BooleanArray, EvalError> {
    let unsupported = || EvalError::UnsupportedType {
        column: column.name().to_owned(),
        data_type: column.data_type().clone(),
    };
    if !supports_data_type(column.data_type()) {
        return Err(unsupported());
    }

    let mut verdicts = Vec::with_capacity(column.len());
    for chunk in column.chunks() {
        for index in 0..chunk.len() {
            let value =
                ScalarValueRef::try_from_array(chunk.as_ref(), index).ok_or_else(unsupported)?;
            let verdict = predicate.call(value);
            verdicts.push(if invert { verdict.map(|v| !v) } else { verdict });
        }
    }
    Ok(BooleanArray::from(verdicts))
}

/// Row-wise combination where a NULL on either side always yields NULL.
pub(crate) fn combine(
    op: LogicalOp,
    left: &BooleanArray,
    right: &BooleanArray,
) -> Result<BooleanArray, EvalError> {
    if left.len() != right.len() {
        return Err(EvalError::LengthMismatch {
            op: op.as_str(),
            left: left.len(),
            right: right.len(),
        });
    }
    let mask = match op {
        LogicalOp::And => boolean::and(left, right)?,
        LogicalOp::Or => boolean::or(left, right)?,
        LogicalOp::Xor => BooleanArray::new(
            left.values() ^ right.values(),
            NullBuffer::union(left.nulls(), right.nulls()),
        ),
    };
    Ok(mask)
}

fn concat_masks(mut masks: Vec<BooleanArray>) -> Result<BooleanArray, EvalError> {
    if masks.len() <= 1 {
        return Ok(masks
            .pop()
            .unwrap_or_else(|| BooleanArray::from(Vec::<bool>::new())));
    }
    let arrays: Vec<&dyn Array> = masks.iter().map(|mask| mask as &dyn Array).collect();
    Ok(concat(&arrays)?.as_boolean().clone())
}
