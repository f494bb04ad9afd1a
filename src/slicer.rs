use arrow::array::{Array, BooleanArray};
use sieve_predicate::{ColumnCondition, Condition};

use crate::{
    observability::{log_debug, log_warn},
    SlicerError, SlicerOption, Table,
};

/// Resolves column names against a [`Table`] and applies conditions to it.
#[derive(Clone, Copy, Debug)]
pub struct Slicer<'t> {
    table: &'t Table,
    option: SlicerOption,
}

impl<'t> Slicer<'t> {
    /// Slicer over `table` with default options.
    pub fn new(table: &'t Table) -> Self {
        Self {
            table,
            option: SlicerOption::default(),
        }
    }

    /// Replaces the options used by [`Slicer::evaluate`] and [`Slicer::filter`].
    pub fn with_option(self, option: SlicerOption) -> Self {
        Self { option, ..self }
    }

    /// Options in effect.
    pub fn option(&self) -> &SlicerOption {
        &self.option
    }

    /// Table the slicer reads from.
    pub fn table(&self) -> &'t Table {
        self.table
    }

    /// Condition builder for `name`, or `None` when the table has no such column.
    pub fn resolve(&self, name: &str) -> Option<ColumnCondition> {
        match self.table.column(name) {
            Some(column) => Some(ColumnCondition::new(column.clone())),
            None => {
                log_debug!(
                    component = "slicer",
                    event = "column_unresolved",
                    column = name,
                );
                None
            }
        }
    }

    /// Condition builder for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SlicerError::NoSuchColumn`] when the name does not resolve.
    pub fn column(&self, name: &str) -> Result<ColumnCondition, SlicerError> {
        self.resolve(name)
            .ok_or_else(|| SlicerError::NoSuchColumn(name.to_owned()))
    }

    /// Names that [`Slicer::resolve`] accepts.
    pub fn column_names(&self) -> impl Iterator<Item = &'t str> + 't {
        self.table.column_names()
    }

    /// Evaluates `condition` into a mask with one entry per table row.
    ///
    /// # Errors
    ///
    /// Propagates evaluation failures, and fails when the condition was built
    /// over columns of another length.
    pub fn evaluate(&self, condition: &Condition) -> Result<BooleanArray, SlicerError> {
        let mask = match condition.evaluate_with(self.option.eval_options()) {
            Ok(mask) => mask,
            Err(err) => {
                log_warn!(
                    component = "slicer",
                    event = "condition_evaluation_failed",
                    condition = %condition,
                    error = %err,
                );
                return Err(err.into());
            }
        };
        if mask.len() != self.table.num_rows() {
            return Err(SlicerError::MaskLength {
                expected: self.table.num_rows(),
                actual: mask.len(),
            });
        }
        log_debug!(
            component = "slicer",
            event = "condition_evaluated",
            condition = %condition,
            rows = mask.len(),
            true_count = mask.true_count(),
            null_count = mask.null_count(),
        );
        Ok(mask)
    }

    /// Table holding the rows where `condition` is true.
    ///
    /// Rows where it is NULL are dropped unless
    /// [`SlicerOption::keep_null_rows`] is set.
    ///
    /// # Errors
    ///
    /// Same as [`Slicer::evaluate`].
    pub fn filter(&self, condition: &Condition) -> Result<Table, SlicerError> {
        let mask = self.evaluate(condition)?;
        let mask = if self.option.keeps_null_rows() {
            keep_nulls(&mask)
        } else {
            mask
        };
        let table = self.table.filter(&mask)?;
        log_debug!(
            component = "slicer",
            event = "rows_filtered",
            condition = %condition,
            rows_in = self.table.num_rows(),
            rows_out = table.num_rows(),
        );
        Ok(table)
    }
}

/// Mask where every NULL entry becomes true.
fn keep_nulls(mask: &BooleanArray) -> BooleanArray {
    match mask.nulls() {
        Some(nulls) => BooleanArray::new(mask.values() | &!nulls.inner(), None),
        None => mask.clone(),
    }
}
