use arrow::compute::kernels::cast::CastOptions;

/// Knobs applied while evaluating a condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalOptions {
    pub(crate) safe_casts: bool,
}

impl EvalOptions {
    /// When `true`, values that fail the cast to boolean become NULL instead of
    /// aborting evaluation.
    #[must_use]
    pub fn safe_casts(self, safe_casts: bool) -> Self {
        EvalOptions { safe_casts }
    }

    /// Whether unconvertible values are mapped to NULL.
    #[must_use]
    pub fn is_safe_casts(&self) -> bool {
        self.safe_casts
    }

    pub(crate) fn boolean_cast(&self) -> CastOptions<'static> {
        CastOptions {
            safe: self.safe_casts,
            ..Default::default()
        }
    }
}

/// Literal coercion never silently drops values.
pub(crate) fn strict_cast() -> CastOptions<'static> {
    CastOptions {
        safe: false,
        ..Default::default()
    }
}
