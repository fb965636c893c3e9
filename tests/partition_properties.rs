//! Property-based tests for the grid-stride work partition
//!
//! The partition must be exact for every (rows, workers) pair: each row in
//! [0, rows) is assigned to exactly one worker (coverage) and never to two
//! (disjointness).

use proptest::prelude::*;
use sumar::grid::{rows_for_worker, worker_of, LaunchConfig};

/// Count how many workers claim each row; exact partition means every
/// count is exactly one.
fn assignment_counts(rows: usize, workers: usize) -> Vec<usize> {
    let mut counts = vec![0usize; rows];
    for worker in 0..workers {
        for row in rows_for_worker(worker, workers, rows) {
            counts[row] += 1;
        }
    }
    counts
}

#[test]
fn test_coverage_and_disjointness_100_rows_7_workers() {
    let counts = assignment_counts(100, 7);
    assert!(counts.iter().all(|&c| c == 1));
}

#[test]
fn test_coverage_and_disjointness_production_grid() {
    // The default launch grid against the default problem size.
    let workers = LaunchConfig::default().total_workers();
    assert_eq!(workers, 7680);
    let counts = assignment_counts(16384, workers);
    assert!(counts.iter().all(|&c| c == 1));
}

#[test]
fn test_single_row_single_worker() {
    let counts = assignment_counts(1, 1);
    assert_eq!(counts, vec![1]);
}

#[test]
fn test_workers_equal_rows_no_striding() {
    // Each worker handles exactly one row.
    let (rows, workers) = (64, 64);
    for worker in 0..workers {
        let assigned: Vec<usize> = rows_for_worker(worker, workers, rows).collect();
        assert_eq!(assigned, vec![worker]);
    }
}

#[test]
fn test_more_workers_than_rows() {
    let counts = assignment_counts(3, 8);
    assert!(counts.iter().all(|&c| c == 1));
    // Workers past the last row get nothing.
    for worker in 3..8 {
        assert_eq!(rows_for_worker(worker, 8, 3).count(), 0);
    }
}

#[test]
fn test_worker_of_matches_enumeration() {
    let (rows, workers) = (50, 6);
    for worker in 0..workers {
        for row in rows_for_worker(worker, workers, rows) {
            assert_eq!(worker_of(row, workers), worker);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_partition_is_exact(rows in 1usize..600, workers in 1usize..120) {
        let counts = assignment_counts(rows, workers);
        prop_assert!(counts.iter().all(|&c| c == 1));
    }

    #[test]
    fn prop_worker_of_is_inverse_of_enumeration(
        rows in 1usize..400,
        workers in 1usize..80,
    ) {
        for worker in 0..workers {
            for row in rows_for_worker(worker, workers, rows) {
                prop_assert!(row < rows);
                prop_assert_eq!(worker_of(row, workers), worker);
            }
        }
    }

    #[test]
    fn prop_assignment_sizes_balance(rows in 1usize..500, workers in 1usize..60) {
        // Stride assignment sizes differ by at most one row.
        let sizes: Vec<usize> = (0..workers)
            .map(|w| rows_for_worker(w, workers, rows).count())
            .collect();
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        prop_assert!(max - min <= 1);
        prop_assert_eq!(sizes.iter().sum::<usize>(), rows);
    }

    #[test]
    fn prop_rows_are_strictly_increasing(
        worker in 0usize..40,
        workers in 1usize..40,
        rows in 1usize..300,
    ) {
        prop_assume!(worker < workers);
        let assigned: Vec<usize> = rows_for_worker(worker, workers, rows).collect();
        for pair in assigned.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], workers);
        }
    }
}
