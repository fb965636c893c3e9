//! Sequential reference reducer
//!
//! The correctness oracle for the parallel kernel. Uses the same `i64`
//! accumulator width and the same row-then-total order of summation as the
//! parallel path, so exact integer equality is a meaningful check.

use crate::matrix::Matrix;

/// Per-row sums `sum_r = Σ_j A[r,j] * B[j]^3`, computed sequentially
///
/// Plain nested loops, for correctness rather than performance.
/// Deterministic: identical inputs always yield identical output.
#[must_use]
pub fn row_sums(matrix: &Matrix, weights: &[u8]) -> Vec<i64> {
    let n = matrix.n();
    let a = matrix.as_slice();
    let mut sums = vec![0i64; n];
    for (row, sum) in sums.iter_mut().enumerate() {
        let base = row * n;
        let mut acc: i64 = 0;
        for col in 0..n {
            let weight = i64::from(weights[col]);
            acc += i64::from(a[base + col]) * weight * weight * weight;
        }
        *sum = acc;
    }
    sums
}

/// Scalar total: the sum over all row sums
///
/// Row-then-total order, matching the host-side reduction over the
/// kernel's output buffer.
#[must_use]
pub fn total(matrix: &Matrix, weights: &[u8]) -> i64 {
    row_sums(matrix, weights).iter().sum()
}
