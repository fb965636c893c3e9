//! Launch geometry and grid-stride work partition
//!
//! The partition is pure index arithmetic: worker `w` of a pool of `W`
//! owns every row `r` with `r % W == w`. No scheduling queue is needed
//! because the arithmetic alone guarantees exact, collision-free coverage
//! for any row count, including counts not divisible by the pool size.

use crate::device::DeviceProps;
use crate::error::{Result, SumarError};

/// Default worker-group count
pub const DEFAULT_GROUPS: u32 = 240;

/// Default workers per group
pub const DEFAULT_GROUP_SIZE: u32 = 32;

/// Launch configuration: a grid of worker groups
///
/// Fixes the total logical worker count `W = groups * group_size`
/// independently of the problem size.
///
/// # Examples
///
/// ```
/// use sumar::grid::LaunchConfig;
///
/// let config = LaunchConfig::new(240, 32);
/// assert_eq!(config.total_workers(), 7680);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Number of worker groups in the grid
    pub groups: u32,
    /// Number of workers per group
    pub group_size: u32,
}

impl LaunchConfig {
    /// Create a launch configuration
    #[must_use]
    pub fn new(groups: u32, group_size: u32) -> Self {
        Self { groups, group_size }
    }

    /// Total logical worker count in the grid
    #[must_use]
    pub fn total_workers(&self) -> usize {
        self.groups as usize * self.group_size as usize
    }

    /// Validate the grid against device limits
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailure` if either dimension is zero or exceeds the
    /// device maximum.
    pub fn validate(&self, props: &DeviceProps) -> Result<()> {
        if self.groups == 0 || self.group_size == 0 {
            return Err(SumarError::LaunchFailure {
                reason: format!(
                    "grid dimensions must be non-zero (groups={}, group_size={})",
                    self.groups, self.group_size
                ),
            });
        }
        if self.groups > props.max_worker_groups {
            return Err(SumarError::LaunchFailure {
                reason: format!(
                    "groups {} exceeds device maximum {}",
                    self.groups, props.max_worker_groups
                ),
            });
        }
        if self.group_size > props.max_group_size {
            return Err(SumarError::LaunchFailure {
                reason: format!(
                    "group size {} exceeds device maximum {}",
                    self.group_size, props.max_group_size
                ),
            });
        }
        Ok(())
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GROUPS, DEFAULT_GROUP_SIZE)
    }
}

/// Worker responsible for a given row
///
/// `workers` must be non-zero.
#[must_use]
pub fn worker_of(row: usize, workers: usize) -> usize {
    row % workers
}

/// Rows assigned to one worker: the grid-stride enumeration
///
/// Worker `worker` starts at its own index and strides forward by the pool
/// size until exceeding `rows - 1`. Exact inverse of [`worker_of`]: across
/// all workers every row in `[0, rows)` appears exactly once.
///
/// `workers` must be non-zero.
pub fn rows_for_worker(
    worker: usize,
    workers: usize,
    rows: usize,
) -> impl Iterator<Item = usize> {
    (worker..rows).step_by(workers)
}
