//! Structured log events emitted by the slicer.
//!
//! Every event goes to the `sieve` target at debug or warn level and names
//! itself with an `event` field. A subscriber filter of `sieve=debug` shows
//! how each condition was resolved and evaluated. Installing a subscriber is
//! left to the embedding program.

/// Target shared by every event in this crate.
pub(crate) const SIEVE_TARGET: &str = "sieve";

/// Debug event, e.g. `log_debug!(component = "slicer", event = "rows_filtered", rows_out = 3)`.
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::SIEVE_TARGET, $($field)*)
    };
}

/// Warn event for evaluation failures.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::SIEVE_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_warn;
