//! Host orchestrator for the reference-vs-parallel comparison
//!
//! Thin pipeline over the core: allocate unified buffers, generate inputs,
//! time the sequential reference, prefetch toward the device, launch the
//! kernel and block at its barrier, reduce the row sums host-side, and
//! report timings plus the verdict. Buffers live until the comparison is
//! done and are released exactly once.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::device::Device;
use crate::error::Result;
use crate::grid::LaunchConfig;
use crate::kernel;
use crate::matrix::{random_weights, Matrix};
use crate::reference;
use crate::timing::PhaseTimer;
use crate::verify::Verdict;

/// Configuration for one comparison run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Matrix dimension N
    pub n: usize,
    /// Worker grid for the parallel phase
    pub launch: LaunchConfig,
    /// Seed for input generation
    pub seed: u64,
}

impl RunConfig {
    /// Create a run configuration with the default grid and seed 0
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            n,
            launch: LaunchConfig::default(),
            seed: 0,
        }
    }

    /// Set the worker grid
    #[must_use]
    pub fn with_launch(mut self, launch: LaunchConfig) -> Self {
        self.launch = launch;
        self
    }

    /// Set the generation seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Report from one comparison run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Matrix dimension N
    pub n: usize,
    /// Total logical workers in the parallel phase
    pub workers: usize,
    /// Input generation time in milliseconds
    pub init_ms: f64,
    /// Sequential reference time in milliseconds
    pub reference_ms: f64,
    /// Parallel phase time (launch through barrier) in milliseconds
    pub parallel_ms: f64,
    /// Comparison outcome with both scalar totals
    pub verdict: Verdict,
}

/// Run the full comparison: generate, reduce both ways, verify, time
///
/// The parallel phase is timed from launch to the synchronization barrier;
/// the host-side summation over the row-sum buffer happens after the timed
/// region, and only after the barrier has returned.
///
/// # Errors
///
/// Returns the underlying error on allocation or launch failure. A verdict
/// mismatch is NOT an error; it is reported in the returned `RunReport`.
pub fn run(device: &Device, config: &RunConfig) -> Result<RunReport> {
    let timer = PhaseTimer::new();
    let mut rng = StdRng::seed_from_u64(config.seed);

    timer.start_phase("init");
    let matrix = Matrix::random(device, config.n, &mut rng)?;
    let weights = random_weights(device, config.n, &mut rng)?;
    timer.end_phase("init");

    timer.start_phase("reference");
    let reference_total = reference::total(&matrix, &weights);
    timer.end_phase("reference");

    let mut row_sums = device.alloc_unified::<i64>("row_sums", config.n)?;

    matrix.prefetch(device);
    weights.prefetch(device);
    row_sums.prefetch(device);

    timer.start_phase("parallel");
    kernel::reduce_rows(device, &matrix, &weights, &mut row_sums, &config.launch)?;
    timer.end_phase("parallel");

    // Final reduction stays host-side, after the barrier.
    let parallel_total: i64 = row_sums.iter().sum();

    Ok(RunReport {
        n: config.n,
        workers: config.launch.total_workers(),
        init_ms: timer.elapsed_ms("init").unwrap_or(0.0),
        reference_ms: timer.elapsed_ms("reference").unwrap_or(0.0),
        parallel_ms: timer.elapsed_ms("parallel").unwrap_or(0.0),
        verdict: Verdict::new(reference_total, parallel_total),
    })
}
