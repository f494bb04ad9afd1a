use sieve_predicate::EvalOptions;

/// Options applied by a [`crate::Slicer`] when evaluating and filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlicerOption {
    pub(crate) eval: EvalOptions,
    pub(crate) keep_null_rows: bool,
}

impl SlicerOption {
    /// Evaluation options forwarded to every condition.
    pub fn eval(self, eval: EvalOptions) -> Self {
        SlicerOption { eval, ..self }
    }

    /// Keep rows whose mask entry is NULL when filtering. Dropped by default.
    pub fn keep_null_rows(self, keep_null_rows: bool) -> Self {
        SlicerOption {
            keep_null_rows,
            ..self
        }
    }

    /// Evaluation options in effect.
    pub fn eval_options(&self) -> &EvalOptions {
        &self.eval
    }

    /// Whether NULL mask entries keep their rows.
    pub fn keeps_null_rows(&self) -> bool {
        self.keep_null_rows
    }
}
