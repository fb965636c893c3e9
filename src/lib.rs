//! # Sumar
//!
//! Verified parallel row reduction with a sequential reference oracle.
//!
//! Sumar (Spanish: "to add up") computes, for a boolean matrix A (N×N) and
//! a small-integer weight vector B (N), the per-row weighted sums
//! `sum_r = Σ_j A[r,j] * B[j]^3`, reduces them to a single scalar total two
//! ways (a single-threaded reference path and a grid-stride parallel path
//! on a simulated accelerator) and verifies exact integer equality while
//! timing each phase.
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------+
//! |   harness (orchestrator)  |  <- allocate, generate, time, verify
//! +---------------------------+
//! |   kernel (grid-stride)    |  <- one row sum per slot, disjoint writes
//! +---------------------------+
//! |   device (worker pool)    |  <- launch + synchronization barrier
//! +---------------------------+
//! ```
//!
//! ## Example
//!
//! ```
//! use sumar::device::Device;
//! use sumar::grid::LaunchConfig;
//! use sumar::harness::{run, RunConfig};
//!
//! let device = Device::with_threads(2).unwrap();
//! let config = RunConfig::new(64).with_launch(LaunchConfig::new(4, 8));
//! let report = run(&device, &config).unwrap();
//! assert!(report.verdict.passed());
//! ```
//!
//! ## Work distribution
//!
//! The worker grid is fixed independently of the problem size. Worker `w`
//! of `W` owns every row `r` with `r % W == w` (the grid-stride rule), so
//! the row partition is exact (full coverage, no double writes) for any
//! N, which is what lets the output buffer go lockless.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)] // u128 -> u64 for elapsed micros
#![allow(clippy::cast_precision_loss)] // u64 micros -> f64 ms is exact in range
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)] // mutex poisoning only

pub mod buffer;
pub mod device;
pub mod error;
pub mod grid;
pub mod harness;
pub mod kernel;
pub mod matrix;
pub mod reference;
pub mod timing;
pub mod verify;

// Re-exports for convenience
pub use device::Device;
pub use error::{Result, SumarError};
pub use grid::LaunchConfig;
pub use matrix::Matrix;
pub use verify::Verdict;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
        assert!(VERSION.contains('.'));
    }
}
