//! Simulated accelerator device
//!
//! The accelerator is an in-process device backed by a dedicated thread
//! pool. It is an explicitly passed execution context, never ambient global
//! state, so the core stays testable without hardware.
//!
//! A launch runs one invocation of the worker body for every logical worker
//! in the grid and returns only after the whole batch has drained: the
//! return from [`Device::launch`] is the synchronization barrier. No write
//! made by a worker is read by the host before that point.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use sysinfo::System;

use crate::buffer::UnifiedBuffer;
use crate::error::{Result, SumarError};
use crate::grid::LaunchConfig;
use crate::timing::{MemoryReport, MemoryTracker};

/// Largest grid dimension the simulated device accepts
pub const MAX_WORKER_GROUPS: u32 = 65_535;

/// Largest group size the simulated device accepts
pub const MAX_GROUP_SIZE: u32 = 1_024;

/// Device capabilities
#[derive(Debug, Clone)]
pub struct DeviceProps {
    /// Device name (host CPU brand for the simulated device)
    pub name: String,
    /// Maximum worker groups per launch
    pub max_worker_groups: u32,
    /// Maximum workers per group
    pub max_group_size: u32,
    /// Host threads backing the worker pool
    pub host_threads: usize,
    /// Unified memory reachable from host and device, in bytes
    pub total_memory_bytes: u64,
}

impl DeviceProps {
    /// Probe the host for device capabilities
    #[must_use]
    pub fn probe() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        let name = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "unknown host".to_string());

        Self {
            name,
            max_worker_groups: MAX_WORKER_GROUPS,
            max_group_size: MAX_GROUP_SIZE,
            host_threads: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            total_memory_bytes: sys.total_memory(),
        }
    }

    /// Fixed capabilities for a simulated device with `host_threads` threads
    ///
    /// Skips host probing; used by tests and by [`Device::with_threads`].
    #[must_use]
    pub fn simulated(host_threads: usize) -> Self {
        Self {
            name: "simulated device".to_string(),
            max_worker_groups: MAX_WORKER_GROUPS,
            max_group_size: MAX_GROUP_SIZE,
            host_threads,
            total_memory_bytes: 0,
        }
    }
}

impl fmt::Display for DeviceProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Device: {}", self.name)?;
        writeln!(f, "  max worker groups:  {}", self.max_worker_groups)?;
        writeln!(f, "  max group size:     {}", self.max_group_size)?;
        writeln!(f, "  host threads:       {}", self.host_threads)?;
        write!(
            f,
            "  unified memory:     {} MiB",
            self.total_memory_bytes / (1024 * 1024)
        )
    }
}

/// Execution context for the simulated accelerator
///
/// Owns the worker pool and the unified-memory accounting. Passed explicitly
/// to every operation that allocates or launches.
pub struct Device {
    props: DeviceProps,
    pool: rayon::ThreadPool,
    tracker: Arc<MemoryTracker>,
}

impl Device {
    /// Probe the host and build the worker pool
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the worker pool cannot be constructed.
    pub fn probe() -> Result<Self> {
        Self::build(DeviceProps::probe())
    }

    /// Build a device over a fixed number of host threads
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the worker pool cannot be constructed.
    pub fn with_threads(host_threads: usize) -> Result<Self> {
        Self::build(DeviceProps::simulated(host_threads))
    }

    fn build(props: DeviceProps) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(props.host_threads)
            .build()
            .map_err(|e| SumarError::DeviceError {
                reason: format!("failed to build worker pool: {e}"),
            })?;

        Ok(Self {
            props,
            pool,
            tracker: Arc::new(MemoryTracker::new()),
        })
    }

    /// Device capabilities
    #[must_use]
    pub fn props(&self) -> &DeviceProps {
        &self.props
    }

    /// Allocate a unified buffer reachable from host and device
    ///
    /// One allocation per buffer; there are no separate host/device copies
    /// and no copy-in/copy-out step.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the allocation cannot be satisfied.
    pub fn alloc_unified<T: Clone + Default>(
        &self,
        name: &str,
        len: usize,
    ) -> Result<UnifiedBuffer<T>> {
        UnifiedBuffer::allocate(Arc::clone(&self.tracker), name, len)
    }

    /// Launch a grid of logical workers and block until the batch drains
    ///
    /// Runs `worker(id)` once for every global worker index in
    /// `[0, config.total_workers())`. Workers may execute in any
    /// interleaving; the only ordering guarantee is that every worker has
    /// completed when this returns. The batch runs to completion or fails
    /// as a whole; there is no partial-result path.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailure` if the grid is invalid for this device or if
    /// any worker faults during execution.
    pub fn launch<F>(&self, config: &LaunchConfig, worker: F) -> Result<()>
    where
        F: Fn(usize) + Send + Sync,
    {
        config.validate(&self.props)?;
        let workers = config.total_workers();

        catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                (0..workers).into_par_iter().for_each(&worker);
            });
        }))
        .map_err(|_| SumarError::LaunchFailure {
            reason: "worker fault during execution".to_string(),
        })
    }

    /// Unified-memory accounting report
    #[must_use]
    pub fn memory_report(&self) -> MemoryReport {
        self.tracker.report()
    }

    /// Shared handle to the memory tracker
    pub(crate) fn tracker(&self) -> &Arc<MemoryTracker> {
        &self.tracker
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("props", &self.props)
            .field("pool_threads", &self.pool.current_num_threads())
            .finish()
    }
}
