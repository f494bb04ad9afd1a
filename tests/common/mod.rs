//! Common test utilities for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Int64Array};
use sieve::{ChunkedColumn, Table};

/// Splits `array` into chunks at sorted `cuts`; repeated cuts yield empty chunks.
pub fn split_at(array: &ArrayRef, cuts: &[usize]) -> Vec<ArrayRef> {
    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts.iter().copied().chain(std::iter::once(array.len())) {
        chunks.push(array.slice(start, cut - start));
        start = cut;
    }
    chunks
}

/// Up to four random chunk boundaries inside `0..=len`.
pub fn random_cuts(rng: &mut fastrand::Rng, len: usize) -> Vec<usize> {
    let count = rng.usize(0..=4);
    let mut cuts: Vec<usize> = (0..count).map(|_| rng.usize(0..=len)).collect();
    cuts.sort_unstable();
    cuts
}

/// Column holding `array` split at `cuts`.
pub fn chunked(name: &str, array: ArrayRef, cuts: &[usize]) -> ChunkedColumn {
    let data_type = array.data_type().clone();
    ChunkedColumn::try_new(name, data_type, split_at(&array, cuts))
        .expect("chunks share the array type")
}

/// Table with the `age` column `[10, null, 30]`.
pub fn ages() -> Table {
    Table::try_new(vec![ChunkedColumn::from_array(
        "age",
        Arc::new(Int64Array::from(vec![Some(10), None, Some(30)])),
    )])
    .expect("age table")
}

/// Nullable int64 values with roughly one NULL in five.
pub fn random_ints(rng: &mut fastrand::Rng, len: usize) -> ArrayRef {
    let values: Vec<Option<i64>> = (0..len)
        .map(|_| (rng.u8(0..5) != 0).then(|| rng.i64(-50..50)))
        .collect();
    Arc::new(Int64Array::from(values))
}

/// Nullable booleans with roughly one NULL in four.
pub fn random_bools(rng: &mut fastrand::Rng, len: usize) -> ArrayRef {
    let values: Vec<Option<bool>> = (0..len)
        .map(|_| (rng.u8(0..4) != 0).then(|| rng.bool()))
        .collect();
    Arc::new(BooleanArray::from(values))
}
