#![deny(missing_docs)]
//! Condition algebra bound to chunked columns.

mod builder;
mod column;
mod error;
mod eval;
mod options;
mod value;

use std::{fmt, sync::Arc};

use arrow::array::BooleanArray;
pub use builder::ColumnCondition;
pub use column::{ChunkedColumn, ColumnRef};
pub use error::{ColumnError, EvalError};
use eval::LogicalOp;
pub use options::EvalOptions;
pub use value::{ScalarValue, ScalarValueRef};

/// Comparison operator used by comparison conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`=`).
    Equal,
    /// Not equals (`!=`).
    NotEqual,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl ComparisonOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Returns the operator that swaps the left/right side of the comparison.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            ComparisonOp::Equal => ComparisonOp::Equal,
            ComparisonOp::NotEqual => ComparisonOp::NotEqual,
            ComparisonOp::LessThan => ComparisonOp::GreaterThan,
            ComparisonOp::LessThanOrEqual => ComparisonOp::GreaterThanOrEqual,
            ComparisonOp::GreaterThan => ComparisonOp::LessThan,
            ComparisonOp::GreaterThanOrEqual => ComparisonOp::LessThanOrEqual,
        }
    }

    /// Returns the logical negation of this operator.
    #[must_use]
    pub fn negated(self) -> Self {
        match self {
            ComparisonOp::Equal => ComparisonOp::NotEqual,
            ComparisonOp::NotEqual => ComparisonOp::Equal,
            ComparisonOp::LessThan => ComparisonOp::GreaterThanOrEqual,
            ComparisonOp::LessThanOrEqual => ComparisonOp::GreaterThan,
            ComparisonOp::GreaterThan => ComparisonOp::LessThanOrEqual,
            ComparisonOp::GreaterThanOrEqual => ComparisonOp::LessThan,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type RowFn = dyn Fn(ScalarValueRef<'_>) -> Option<bool> + Send + Sync;

/// User closure deciding a row from its value; `None` yields a NULL mask entry.
///
/// Clones share the closure, and equality is closure identity.
#[derive(Clone)]
pub struct RowPredicate(Arc<RowFn>);

impl RowPredicate {
    /// Wraps a closure. NULL rows are passed as [`ScalarValueRef::Null`].
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(ScalarValueRef<'_>) -> Option<bool> + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Applies the closure to one row value.
    pub fn call(&self, value: ScalarValueRef<'_>) -> Option<bool> {
        (self.0)(value)
    }
}

impl PartialEq for RowPredicate {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowPredicate(..)")
    }
}

/// Boolean condition over one or more columns; leaf and branch variants coexist.
///
/// Conditions are immutable and hold no results: every call to
/// [`Condition::evaluate`] re-reads the bound columns.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// The column's own values read as booleans; non-boolean chunks are cast.
    Column(ColumnRef),
    /// Complement of [`Condition::Column`]; NULL stays NULL.
    NotColumn(ColumnRef),
    /// Comparison between the column and a literal.
    Compare {
        /// Column under test.
        column: ColumnRef,
        /// Operator, read as `column <op> value`.
        op: ComparisonOp,
        /// Literal operand; `Null` turns `=`/`!=` into null checks.
        value: ScalarValue,
    },
    /// Rows where the predicate returns true.
    Select {
        /// Column whose values feed the predicate.
        column: ColumnRef,
        /// Row closure.
        predicate: RowPredicate,
    },
    /// Complement of [`Condition::Select`] sharing the same predicate.
    Reject {
        /// Column whose values feed the predicate.
        column: ColumnRef,
        /// Row closure.
        predicate: RowPredicate,
    },
    /// Conjunction of two conditions.
    And {
        /// Left operand.
        left: Box<Condition>,
        /// Right operand.
        right: Box<Condition>,
    },
    /// Disjunction of two conditions.
    Or {
        /// Left operand.
        left: Box<Condition>,
        /// Right operand.
        right: Box<Condition>,
    },
    /// Exclusive disjunction of two conditions.
    Xor {
        /// Left operand.
        left: Box<Condition>,
        /// Right operand.
        right: Box<Condition>,
    },
}

impl Condition {
    /// Evaluates the condition with default [`EvalOptions`].
    ///
    /// # Errors
    ///
    /// See [`Condition::evaluate_with`].
    pub fn evaluate(&self) -> Result<BooleanArray, EvalError> {
        self.evaluate_with(&EvalOptions::default())
    }

    /// Evaluates the condition into one mask entry per row of the bound column.
    ///
    /// # Errors
    ///
    /// Fails when a chunk cannot be cast to boolean, a literal cannot be
    /// coerced to the column type, a row predicate meets an unreadable column
    /// type, or combinator operands differ in length.
    pub fn evaluate_with(&self, options: &EvalOptions) -> Result<BooleanArray, EvalError> {
        match self {
            Condition::Column(column) => eval::column_mask(column, false, options),
            Condition::NotColumn(column) => eval::column_mask(column, true, options),
            Condition::Compare { column, op, value } => eval::compare_mask(column, *op, value),
            Condition::Select { column, predicate } => {
                eval::predicate_mask(column, predicate, false)
            }
            Condition::Reject { column, predicate } => {
                eval::predicate_mask(column, predicate, true)
            }
            Condition::And { left, right } => Self::combine(LogicalOp::And, left, right, options),
            Condition::Or { left, right } => Self::combine(LogicalOp::Or, left, right, options),
            Condition::Xor { left, right } => Self::combine(LogicalOp::Xor, left, right, options),
        }
    }

    fn combine(
        op: LogicalOp,
        left: &Condition,
        right: &Condition,
        options: &EvalOptions,
    ) -> Result<BooleanArray, EvalError> {
        let left = left.evaluate_with(options)?;
        let right = right.evaluate_with(options)?;
        eval::combine(op, &left, &right)
    }

    /// Returns the dual leaf, or `None` for combinators, which have no dual.
    #[must_use]
    pub fn negate(&self) -> Option<Condition> {
        let negated = match self {
            Condition::Column(column) => Condition::NotColumn(column.clone()),
            Condition::NotColumn(column) => Condition::Column(column.clone()),
            Condition::Compare { column, op, value } => Condition::Compare {
                column: column.clone(),
                op: op.negated(),
                value: value.clone(),
            },
            Condition::Select { column, predicate } => Condition::Reject {
                column: column.clone(),
                predicate: predicate.clone(),
            },
            Condition::Reject { column, predicate } => Condition::Select {
                column: column.clone(),
                predicate: predicate.clone(),
            },
            Condition::And { .. } | Condition::Or { .. } | Condition::Xor { .. } => return None,
        };
        Some(negated)
    }

    /// Returns true when the condition has no sub-conditions.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.column().is_some()
    }

    /// Column bound to a leaf condition.
    #[must_use]
    pub fn column(&self) -> Option<&ColumnRef> {
        match self {
            Condition::Column(column)
            | Condition::NotColumn(column)
            | Condition::Compare { column, .. }
            | Condition::Select { column, .. }
            | Condition::Reject { column, .. } => Some(column),
            Condition::And { .. } | Condition::Or { .. } | Condition::Xor { .. } => None,
        }
    }

    /// Builds `self AND other`.
    #[must_use]
    pub fn and<C>(self, other: C) -> Condition
    where
        C: Into<Condition>,
    {
        Condition::And {
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    /// Builds `self OR other`.
    #[must_use]
    pub fn or<C>(self, other: C) -> Condition
    where
        C: Into<Condition>,
    {
        Condition::Or {
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    /// Builds `self XOR other`.
    #[must_use]
    pub fn xor<C>(self, other: C) -> Condition
    where
        C: Into<Condition>,
    {
        Condition::Xor {
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Column(column) => f.write_str(column.name()),
            Condition::NotColumn(column) => write!(f, "NOT {}", column.name()),
            Condition::Compare {
                column,
                op: ComparisonOp::Equal,
                value: ScalarValue::Null,
            } => write!(f, "{} IS NULL", column.name()),
            Condition::Compare {
                column,
                op: ComparisonOp::NotEqual,
                value: ScalarValue::Null,
            } => write!(f, "{} IS NOT NULL", column.name()),
            Condition::Compare { column, op, value } => {
                write!(f, "{} {op} {value}", column.name())
            }
            Condition::Select { column, .. } => write!(f, "select({})", column.name()),
            Condition::Reject { column, .. } => write!(f, "reject({})", column.name()),
            Condition::And { left, right } => write!(f, "({left} AND {right})"),
            Condition::Or { left, right } => write!(f, "({left} OR {right})"),
            Condition::Xor { left, right } => write!(f, "({left} XOR {right})"),
        }
    }
}

impl<C> std::ops::BitAnd<C> for Condition
where
    C: Into<Condition>,
{
    type Output = Condition;

    fn bitand(self, rhs: C) -> Self::Output {
        self.and(rhs)
    }
}

impl<C> std::ops::BitOr<C> for Condition
where
    C: Into<Condition>,
{
    type Output = Condition;

    fn bitor(self, rhs: C) -> Self::Output {
        self.or(rhs)
    }
}

impl<C> std::ops::BitXor<C> for Condition
where
    C: Into<Condition>,
{
    type Output = Condition;

    fn bitxor(self, rhs: C) -> Self::Output {
        self.xor(rhs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{
            ArrayRef, BinaryArray, BooleanArray, Date32Array, Decimal128Array, DictionaryArray,
            Int64Array, IntervalYearMonthArray, StringArray, TimestampSecondArray,
        },
        datatypes::{DataType, Int32Type},
    };

    use super::{
        ChunkedColumn, ColumnCondition, ColumnRef, ComparisonOp, Condition, EvalError,
        EvalOptions, ScalarValue, ScalarValueRef,
    };

    fn int_column(name: &str, chunks: &[&[Option<i64>]]) -> ColumnRef {
        let chunks: Vec<ArrayRef> = chunks
            .iter()
            .map(|chunk| Arc::new(Int64Array::from(chunk.to_vec())) as ArrayRef)
            .collect();
        ColumnRef::new(ChunkedColumn::try_new(name, DataType::Int64, chunks).expect("column"))
    }

    fn bool_column(name: &str, chunks: &[&[Option<bool>]]) -> ColumnRef {
        let chunks: Vec<ArrayRef> = chunks
            .iter()
            .map(|chunk| Arc::new(BooleanArray::from(chunk.to_vec())) as ArrayRef)
            .collect();
        ColumnRef::new(ChunkedColumn::try_new(name, DataType::Boolean, chunks).expect("column"))
    }

    fn mask(values: &[Option<bool>]) -> BooleanArray {
        BooleanArray::from(values.to_vec())
    }

    fn age() -> ColumnCondition {
        ColumnCondition::new(int_column("age", &[&[Some(10), None, Some(30)]]))
    }

    #[test]
    fn comparison_ops_flip_negate_and_render() {
        let ops = [
            (ComparisonOp::Equal, "=", ComparisonOp::Equal),
            (ComparisonOp::NotEqual, "!=", ComparisonOp::NotEqual),
            (ComparisonOp::LessThan, "<", ComparisonOp::GreaterThan),
            (ComparisonOp::LessThanOrEqual, "<=", ComparisonOp::GreaterThanOrEqual),
            (ComparisonOp::GreaterThan, ">", ComparisonOp::LessThan),
            (ComparisonOp::GreaterThanOrEqual, ">=", ComparisonOp::LessThanOrEqual),
        ];
        for (op, text, flipped) in ops {
            assert_eq!(op.as_str(), text);
            assert_eq!(op.to_string(), text);
            assert_eq!(op.flipped(), flipped);
            assert_eq!(op.flipped().flipped(), op);
            assert_ne!(op.negated(), op);
            assert_eq!(op.negated().negated(), op);
        }
        assert_eq!(
            ComparisonOp::LessThan.negated(),
            ComparisonOp::GreaterThanOrEqual
        );
        assert_eq!(
            ComparisonOp::GreaterThan.negated(),
            ComparisonOp::LessThanOrEqual
        );
    }

    #[test]
    fn age_scenario() {
        let age = age();
        let eq = age.equals(10i64);
        let ge = age.greater_than_or_equal(20i64);
        assert_eq!(
            eq.evaluate().expect("eq"),
            mask(&[Some(true), None, Some(false)])
        );
        assert_eq!(
            ge.evaluate().expect("ge"),
            mask(&[Some(false), None, Some(true)])
        );
        assert_eq!(
            (eq & ge).evaluate().expect("and"),
            mask(&[Some(false), None, Some(false)])
        );
    }

    #[test]
    fn orderings_use_literal_as_left_operand() {
        let age = age();
        assert_eq!(
            age.less_than(20i64).evaluate().expect("lt"),
            mask(&[Some(true), None, Some(false)])
        );
        assert_eq!(
            age.less_than_or_equal(10i64).evaluate().expect("le"),
            mask(&[Some(true), None, Some(false)])
        );
        assert_eq!(
            age.greater_than(10i64).evaluate().expect("gt"),
            mask(&[Some(false), None, Some(true)])
        );
        assert_eq!(
            age.not_equals(30i64).evaluate().expect("ne"),
            mask(&[Some(true), None, Some(false)])
        );
    }

    #[test]
    fn null_literal_is_a_null_check() {
        let age = age();
        assert_eq!(
            age.equals(ScalarValue::Null).evaluate().expect("is null"),
            mask(&[Some(false), Some(true), Some(false)])
        );
        assert_eq!(
            age.not_equals(ScalarValue::Null)
                .evaluate()
                .expect("is not null"),
            mask(&[Some(true), Some(false), Some(true)])
        );
        assert_eq!(
            age.less_than(ScalarValue::Null).evaluate().expect("lt null"),
            mask(&[None, None, None])
        );
        assert_eq!(age.is_null(), age.equals(ScalarValue::Null));
    }

    #[test]
    fn mixed_width_literals_compare_numerically() {
        let column = ColumnCondition::new(int_column("v", &[&[Some(1), Some(2), Some(-3)]]));
        assert_eq!(
            column.greater_than(1.5f64).evaluate().expect("float literal"),
            mask(&[Some(false), Some(true), Some(false)])
        );
        assert_eq!(
            column.less_than(u64::MAX).evaluate().expect("unsigned literal"),
            mask(&[Some(true), Some(true), Some(true)])
        );
    }

    #[test]
    fn literal_that_cannot_be_coerced_fails() {
        let err = age().equals("ten").evaluate().unwrap_err();
        assert!(matches!(err, EvalError::LiteralCast { ref column, .. } if column == "age"));
    }

    #[test]
    fn column_condition_reads_and_casts_booleans() {
        let flags = ColumnCondition::new(bool_column(
            "flag",
            &[&[Some(true), None], &[Some(false)]],
        ));
        assert_eq!(
            flags.evaluate().expect("flags"),
            mask(&[Some(true), None, Some(false)])
        );
        assert_eq!(
            flags.negate().evaluate().expect("not flags"),
            mask(&[Some(false), None, Some(true)])
        );

        let ints = ColumnCondition::new(int_column("n", &[&[Some(0), Some(7)], &[None]]));
        assert_eq!(
            ints.evaluate().expect("cast ints"),
            mask(&[Some(false), Some(true), None])
        );
    }

    #[test]
    fn column_condition_surfaces_cast_errors() {
        let blobs = ColumnRef::new(ChunkedColumn::from_array(
            "blob",
            Arc::new(BinaryArray::from_vec(vec![b"x".as_slice()])),
        ));
        let err = Condition::Column(blobs).evaluate().unwrap_err();
        assert!(matches!(err, EvalError::UnsupportedCast { .. }));

        let words = ColumnRef::new(ChunkedColumn::from_array(
            "word",
            Arc::new(StringArray::from(vec!["yes", "maybe"])),
        ));
        let strict = Condition::Column(words.clone()).evaluate().unwrap_err();
        assert!(matches!(strict, EvalError::Cast { .. }));
        let lenient = Condition::Column(words)
            .evaluate_with(&EvalOptions::default().safe_casts(true))
            .expect("safe cast");
        assert_eq!(lenient, mask(&[Some(true), None]));
    }

    #[test]
    fn select_and_reject_are_complementary() {
        let age = age();
        let select = age.select(|v| v.as_i64().map(|v| v > 15));
        let reject = select.negate().expect("select has a dual");
        assert!(matches!(reject, Condition::Reject { .. }));
        assert_eq!(
            select.evaluate().expect("select"),
            mask(&[Some(false), None, Some(true)])
        );
        assert_eq!(
            reject.evaluate().expect("reject"),
            mask(&[Some(true), None, Some(false)])
        );
    }

    #[test]
    fn select_reads_temporal_decimal_and_dictionary_columns() {
        let days = ColumnCondition::new(ChunkedColumn::from_array(
            "d",
            Arc::new(Date32Array::from(vec![Some(10), None, Some(20)])),
        ));
        let recent = |v: ScalarValueRef<'_>| match v {
            ScalarValueRef::Date32(day) => Some(day > 15),
            _ => None,
        };
        assert_eq!(
            days.select(recent).evaluate().expect("date select"),
            mask(&[Some(false), None, Some(true)])
        );
        assert_eq!(
            days.reject(recent).evaluate().expect("date reject"),
            mask(&[Some(true), None, Some(false)])
        );

        let stamps = ColumnCondition::new(ChunkedColumn::from_array(
            "t",
            Arc::new(TimestampSecondArray::from(vec![5, 50])),
        ));
        assert_eq!(
            stamps
                .select(|v| match v {
                    ScalarValueRef::Timestamp { value, .. } => Some(value < 10),
                    _ => None,
                })
                .evaluate()
                .expect("timestamp select"),
            mask(&[Some(true), Some(false)])
        );

        let prices = Decimal128Array::from(vec![Some(199), Some(250)])
            .with_precision_and_scale(5, 2)
            .expect("decimal type");
        let prices = ColumnCondition::new(ChunkedColumn::from_array("p", Arc::new(prices)));
        assert_eq!(
            prices
                .select(|v| v.as_f64().map(|price| price < 2.0))
                .evaluate()
                .expect("decimal select"),
            mask(&[Some(true), Some(false)])
        );

        let tags: DictionaryArray<Int32Type> =
            vec![Some("a"), None, Some("b"), Some("a")].into_iter().collect();
        let tags = ColumnCondition::new(ChunkedColumn::from_array("tag", Arc::new(tags)));
        assert_eq!(
            tags.select(|v| v.as_str().map(|tag| tag == "a"))
                .evaluate()
                .expect("dictionary select"),
            mask(&[Some(true), None, Some(false), Some(true)])
        );
        assert_eq!(
            tags.equals("a").evaluate().expect("dictionary equals"),
            mask(&[Some(true), None, Some(false), Some(true)])
        );
    }

    #[test]
    fn select_on_unreadable_type_fails() {
        let months = ColumnCondition::new(ChunkedColumn::from_array(
            "m",
            Arc::new(IntervalYearMonthArray::from(vec![1])),
        ));
        let err = months.select(|_| Some(true)).evaluate().unwrap_err();
        assert!(matches!(err, EvalError::UnsupportedType { ref column, .. } if column == "m"));
    }

    #[test]
    fn select_sees_null_rows() {
        let nulls_kept = age().select(|v| Some(v.is_null()));
        assert_eq!(
            nulls_kept.evaluate().expect("select"),
            mask(&[Some(false), Some(true), Some(false)])
        );
    }

    #[test]
    fn negate_twice_restores_every_leaf() {
        let age = age();
        let leaves = [
            Condition::from(age.clone()),
            age.negate(),
            age.equals(10i64),
            age.not_equals(10i64),
            age.less_than(10i64),
            age.less_than_or_equal(10i64),
            age.greater_than(10i64),
            age.greater_than_or_equal(10i64),
            age.is_null(),
            age.select(|v| v.as_i64().map(|v| v % 2 == 0)),
            age.reject(|v| v.as_i64().map(|v| v % 2 == 0)),
        ];
        for leaf in leaves {
            let dual = leaf.negate().expect("leaf has a dual");
            assert_ne!(dual, leaf, "{leaf} must not be its own dual");
            assert_eq!(dual.negate().expect("dual has a dual"), leaf);
        }
    }

    #[test]
    fn combinators_have_no_dual() {
        let age = age();
        assert!(age.equals(1i64).and(age.equals(2i64)).negate().is_none());
        assert!(age.equals(1i64).or(age.equals(2i64)).negate().is_none());
        assert!(age.equals(1i64).xor(age.equals(2i64)).negate().is_none());
    }

    #[test]
    fn combinators_propagate_null_from_either_side() {
        let left = bool_column(
            "l",
            &[&[Some(true), Some(true), Some(false), None, Some(false), None]],
        );
        let right = bool_column(
            "r",
            &[&[Some(true), None, None, Some(true), Some(false), None]],
        );
        let (l, r) = (Condition::Column(left), Condition::Column(right));
        assert_eq!(
            (l.clone() & r.clone()).evaluate().expect("and"),
            mask(&[Some(true), None, None, None, Some(false), None])
        );
        assert_eq!(
            (l.clone() | r.clone()).evaluate().expect("or"),
            mask(&[Some(true), None, None, None, Some(false), None])
        );
        assert_eq!(
            (l ^ r).evaluate().expect("xor"),
            mask(&[Some(false), None, None, None, Some(false), None])
        );
    }

    #[test]
    fn combinator_length_mismatch_is_an_error() {
        let short = ColumnCondition::new(int_column("s", &[&[Some(1)]]));
        let err = age().equals(1i64).or(short.equals(1i64)).evaluate().unwrap_err();
        assert!(matches!(
            err,
            EvalError::LengthMismatch {
                op: "OR",
                left: 3,
                right: 1
            }
        ));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let condition = age().greater_than(5i64) ^ age().is_null();
        let first = condition.evaluate().expect("first");
        let second = condition.evaluate().expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn display_renders_expression_tree() {
        let age = age();
        let condition = age.is_null() | (age.greater_than(3i64) & age.negate());
        assert_eq!(condition.to_string(), "(age IS NULL OR (age > 3 AND NOT age))");
        assert_eq!(age.select(|_| None).to_string(), "select(age)");
    }

    #[test]
    fn leaves_expose_their_column() {
        let age = age();
        let leaf = age.equals(1i64);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.column(), Some(age.column()));
        assert!(!(leaf.clone() & leaf).is_leaf());
    }
}
