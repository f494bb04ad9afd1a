//! Fluent construction of conditions from a column-bound leaf.

use arrow::array::BooleanArray;

use super::{
    ColumnRef, ComparisonOp, Condition, EvalError, EvalOptions, RowPredicate, ScalarValue,
    ScalarValueRef,
};

/// Leaf condition bound to one column, and the starting point for building trees.
///
/// On its own it evaluates to the column's boolean interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnCondition {
    column: ColumnRef,
}

impl ColumnCondition {
    /// Binds a condition to `column`.
    #[must_use]
    pub fn new<C>(column: C) -> Self
    where
        C: Into<ColumnRef>,
    {
        Self {
            column: column.into(),
        }
    }

    /// The bound column.
    #[must_use]
    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    /// Builds a comparison condition.
    #[must_use]
    pub fn compare<V>(&self, op: ComparisonOp, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        Condition::Compare {
            column: self.column.clone(),
            op,
            value: value.into(),
        }
    }

    /// Builds an equality condition; a NULL literal tests for NULL rows.
    #[must_use]
    pub fn equals<V>(&self, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        self.compare(ComparisonOp::Equal, value)
    }

    /// Builds an inequality condition; a NULL literal tests for non-NULL rows.
    #[must_use]
    pub fn not_equals<V>(&self, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        self.compare(ComparisonOp::NotEqual, value)
    }

    /// Builds a `<` condition.
    #[must_use]
    pub fn less_than<V>(&self, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        self.compare(ComparisonOp::LessThan, value)
    }

    /// Builds a `<=` condition.
    #[must_use]
    pub fn less_than_or_equal<V>(&self, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        self.compare(ComparisonOp::LessThanOrEqual, value)
    }

    /// Builds a `>` condition.
    #[must_use]
    pub fn greater_than<V>(&self, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        self.compare(ComparisonOp::GreaterThan, value)
    }

    /// Builds a `>=` condition.
    #[must_use]
    pub fn greater_than_or_equal<V>(&self, value: V) -> Condition
    where
        V: Into<ScalarValue>,
    {
        self.compare(ComparisonOp::GreaterThanOrEqual, value)
    }

    /// Rows whose value is NULL.
    #[must_use]
    pub fn is_null(&self) -> Condition {
        self.equals(ScalarValue::Null)
    }

    /// Rows whose value is not NULL.
    #[must_use]
    pub fn is_not_null(&self) -> Condition {
        self.not_equals(ScalarValue::Null)
    }

    /// Rows for which `predicate` returns true.
    #[must_use]
    pub fn select<F>(&self, predicate: F) -> Condition
    where
        F: Fn(ScalarValueRef<'_>) -> Option<bool> + Send + Sync + 'static,
    {
        Condition::Select {
            column: self.column.clone(),
            predicate: RowPredicate::new(predicate),
        }
    }

    /// Rows for which `predicate` returns false.
    #[must_use]
    pub fn reject<F>(&self, predicate: F) -> Condition
    where
        F: Fn(ScalarValueRef<'_>) -> Option<bool> + Send + Sync + 'static,
    {
        Condition::Reject {
            column: self.column.clone(),
            predicate: RowPredicate::new(predicate),
        }
    }

    /// The complement of this leaf.
    #[must_use]
    pub fn negate(&self) -> Condition {
        Condition::NotColumn(self.column.clone())
    }

    /// Builds `self AND other`.
    #[must_use]
    pub fn and<C>(self, other: C) -> Condition
    where
        C: Into<Condition>,
    {
        Condition::from(self).and(other)
    }

    /// Builds `self OR other`.
    #[must_use]
    pub fn or<C>(self, other: C) -> Condition
    where
        C: Into<Condition>,
    {
        Condition::from(self).or(other)
    }

    /// Builds `self XOR other`.
    #[must_use]
    pub fn xor<C>(self, other: C) -> Condition
    where
        C: Into<Condition>,
    {
        Condition::from(self).xor(other)
    }

    /// Evaluates the column's boolean interpretation with default options.
    ///
    /// # Errors
    ///
    /// Fails when a chunk cannot be cast to boolean.
    pub fn evaluate(&self) -> Result<BooleanArray, EvalError> {
        self.evaluate_with(&EvalOptions::default())
    }

    /// Evaluates the column's boolean interpretation.
    ///
    /// # Errors
    ///
    /// Fails when a chunk cannot be cast to boolean.
    pub fn evaluate_with(&self, options: &EvalOptions) -> Result<BooleanArray, EvalError> {
        Condition::Column(self.column.clone()).evaluate_with(options)
    }
}

impl From<ColumnCondition> for Condition {
    fn from(value: ColumnCondition) -> Self {
        Condition::Column(value.column)
    }
}

impl<C> std::ops::BitAnd<C> for ColumnCondition
where
    C: Into<Condition>,
{
    type Output = Condition;

    fn bitand(self, rhs: C) -> Self::Output {
        self.and(rhs)
    }
}

impl<C> std::ops::BitOr<C> for ColumnCondition
where
    C: Into<Condition>,
{
    type Output = Condition;

    fn bitor(self, rhs: C) -> Self::Output {
        self.or(rhs)
    }
}

impl<C> std::ops::BitXor<C> for ColumnCondition
where
    C: Into<Condition>,
{
    type Output = Condition;

    fn bitxor(self, rhs: C) -> Self::Output {
        self.xor(rhs)
    }
}
