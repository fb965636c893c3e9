//! Parallel row-reduction kernel
//!
//! Populates one row sum per matrix row using a fixed grid of logical
//! workers. Work is distributed by the grid-stride rule: worker `w` of `W`
//! owns every row `r` with `r % W == w`, so the partition covers every row
//! exactly once for any row count, including counts not divisible by `W`.
//!
//! Workers only read the shared inputs and each writes a disjoint set of
//! output slots, so the kernel needs no locks, atomics, or inter-worker
//! communication. The launch is synchronous from the caller's view: it
//! returns only after the device barrier, at which point every slot of the
//! output buffer is populated.

use crate::buffer::{DisjointWriter, UnifiedBuffer};
use crate::device::Device;
use crate::error::{Result, SumarError};
use crate::grid::{rows_for_worker, LaunchConfig};
use crate::matrix::Matrix;

/// Compute all row sums `sum_r = Σ_j A[r,j] * B[j]^3` on the device
///
/// Each worker recomputes `B[j]^3` inline; there is no precomputed cube
/// cache. Accumulation is `i64` throughout, wide enough for the exercised
/// sizes (`N * 1 * 2^3` per row); overflow beyond that is an accepted
/// limitation, not detected.
///
/// The final reduction of the row sums into a scalar stays host-side; this
/// kernel's only side effect is writing `row_sums`.
///
/// # Errors
///
/// - `InvalidShape` if `weights` or `row_sums` length differs from the
///   matrix dimension.
/// - `LaunchFailure` if the grid is invalid for the device or a worker
///   faults during execution. A failed launch writes no guaranteed output.
pub fn reduce_rows(
    device: &Device,
    matrix: &Matrix,
    weights: &UnifiedBuffer<u8>,
    row_sums: &mut UnifiedBuffer<i64>,
    config: &LaunchConfig,
) -> Result<()> {
    let n = matrix.n();
    if weights.len() != n {
        return Err(SumarError::InvalidShape {
            reason: format!("weights length {} != matrix dimension {n}", weights.len()),
        });
    }
    if row_sums.len() != n {
        return Err(SumarError::InvalidShape {
            reason: format!(
                "row-sum buffer length {} != matrix dimension {n}",
                row_sums.len()
            ),
        });
    }

    let a = matrix.as_slice();
    let b: &[u8] = weights;
    let workers = config.total_workers();
    let out = DisjointWriter::new(&mut row_sums[..]);

    device.launch(config, |worker| {
        for row in rows_for_worker(worker, workers, n) {
            let base = row * n;
            let mut acc: i64 = 0;
            for col in 0..n {
                let weight = i64::from(b[col]);
                acc += i64::from(a[base + col]) * weight * weight * weight;
            }
            // Safety: the grid-stride partition gives row exactly one
            // writer (row % workers == worker).
            unsafe { out.write(row, acc) };
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::random_weights;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_device() -> Device {
        Device::with_threads(4).unwrap()
    }

    fn reduce(
        device: &Device,
        matrix: &Matrix,
        weights: &UnifiedBuffer<u8>,
        config: &LaunchConfig,
    ) -> Vec<i64> {
        let mut row_sums = device
            .alloc_unified::<i64>("row_sums", matrix.n())
            .unwrap();
        reduce_rows(device, matrix, weights, &mut row_sums, config).unwrap();
        row_sums.to_vec()
    }

    #[test]
    fn test_reduce_rows_small_known_answer() {
        let device = test_device();
        // A = [[1,0],[1,1]], B = [2,1]: row sums are 8 and 8+1=9.
        let matrix = Matrix::from_entries(&device, 2, &[1, 0, 1, 1]).unwrap();
        let mut weights = device.alloc_unified::<u8>("weights", 2).unwrap();
        weights.copy_from_slice(&[2, 1]);

        let sums = reduce(&device, &matrix, &weights, &LaunchConfig::new(1, 2));
        assert_eq!(sums, vec![8, 9]);
    }

    #[test]
    fn test_reduce_rows_more_workers_than_rows() {
        let device = test_device();
        let matrix = Matrix::from_entries(&device, 2, &[1, 1, 0, 1]).unwrap();
        let mut weights = device.alloc_unified::<u8>("weights", 2).unwrap();
        weights.copy_from_slice(&[1, 2]);

        // 64 workers for 2 rows: excess workers see an empty stride range.
        let sums = reduce(&device, &matrix, &weights, &LaunchConfig::new(2, 32));
        assert_eq!(sums, vec![9, 8]);
    }

    #[test]
    fn test_reduce_rows_matches_reference_on_random_input() {
        let device = test_device();
        let mut rng = StdRng::seed_from_u64(99);
        let matrix = Matrix::random(&device, 33, &mut rng).unwrap();
        let weights = random_weights(&device, 33, &mut rng).unwrap();

        let sums = reduce(&device, &matrix, &weights, &LaunchConfig::new(2, 3));
        let expected = crate::reference::row_sums(&matrix, &weights);
        assert_eq!(sums, expected);
    }

    #[test]
    fn test_reduce_rows_rejects_weight_length_mismatch() {
        let device = test_device();
        let matrix = Matrix::from_entries(&device, 2, &[1, 0, 0, 1]).unwrap();
        let weights = device.alloc_unified::<u8>("weights", 3).unwrap();
        let mut row_sums = device.alloc_unified::<i64>("row_sums", 2).unwrap();

        let result = reduce_rows(
            &device,
            &matrix,
            &weights,
            &mut row_sums,
            &LaunchConfig::default(),
        );
        assert!(matches!(result, Err(SumarError::InvalidShape { .. })));
    }

    #[test]
    fn test_reduce_rows_rejects_output_length_mismatch() {
        let device = test_device();
        let matrix = Matrix::from_entries(&device, 2, &[1, 0, 0, 1]).unwrap();
        let weights = device.alloc_unified::<u8>("weights", 2).unwrap();
        let mut row_sums = device.alloc_unified::<i64>("row_sums", 3).unwrap();

        let result = reduce_rows(
            &device,
            &matrix,
            &weights,
            &mut row_sums,
            &LaunchConfig::default(),
        );
        assert!(matches!(result, Err(SumarError::InvalidShape { .. })));
    }

    #[test]
    fn test_reduce_rows_rejects_invalid_grid() {
        let device = test_device();
        let matrix = Matrix::from_entries(&device, 2, &[1, 0, 0, 1]).unwrap();
        let weights = device.alloc_unified::<u8>("weights", 2).unwrap();
        let mut row_sums = device.alloc_unified::<i64>("row_sums", 2).unwrap();

        let result = reduce_rows(
            &device,
            &matrix,
            &weights,
            &mut row_sums,
            &LaunchConfig::new(0, 0),
        );
        assert!(matches!(result, Err(SumarError::LaunchFailure { .. })));
    }

    #[test]
    fn test_reduce_rows_every_slot_written() {
        let device = test_device();
        // All-ones matrix and weights: every row sum is exactly n.
        let n = 37;
        let entries = vec![1u8; n * n];
        let matrix = Matrix::from_entries(&device, n, &entries).unwrap();
        let mut weights = device.alloc_unified::<u8>("weights", n).unwrap();
        weights.iter_mut().for_each(|w| *w = 1);

        let sums = reduce(&device, &matrix, &weights, &LaunchConfig::new(3, 4));
        assert!(sums.iter().all(|&s| s == n as i64));
    }
}
