//! Timing and memory instrumentation
//!
//! - `PhaseTimer` - wall-clock breakdown of the run phases (init, reference,
//!   parallel)
//! - `MemoryTracker`, `MemoryReport` - unified-buffer accounting

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Phase timer for wall-clock latency breakdown
///
/// Phases are named, started and ended explicitly, and read back as a
/// breakdown in microseconds. Re-starting a phase discards its previous
/// measurement.
pub struct PhaseTimer {
    phases: Mutex<HashMap<String, (Option<Instant>, u64)>>,
}

impl PhaseTimer {
    /// Create new phase timer
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: Mutex::new(HashMap::new()),
        }
    }

    /// Start timing a phase
    pub fn start_phase(&self, name: &str) {
        let mut phases = self.phases.lock().expect("mutex poisoned");
        phases.insert(name.to_string(), (Some(Instant::now()), 0));
    }

    /// End timing a phase
    ///
    /// Ending a phase that was never started is a no-op.
    pub fn end_phase(&self, name: &str) {
        let mut phases = self.phases.lock().expect("mutex poisoned");
        if let Some((Some(start_time), _)) = phases.get(name) {
            let elapsed = start_time.elapsed().as_micros() as u64;
            phases.insert(name.to_string(), (None, elapsed));
        }
    }

    /// Get timing breakdown in microseconds
    #[must_use]
    pub fn breakdown(&self) -> HashMap<String, u64> {
        let phases = self.phases.lock().expect("mutex poisoned");
        phases.iter().map(|(k, (_, v))| (k.clone(), *v)).collect()
    }

    /// Elapsed time of a completed phase in milliseconds
    ///
    /// Returns `None` if the phase was never started or has not ended.
    #[must_use]
    pub fn elapsed_ms(&self, name: &str) -> Option<f64> {
        let phases = self.phases.lock().expect("mutex poisoned");
        match phases.get(name) {
            Some((None, micros)) => Some(*micros as f64 / 1000.0),
            _ => None,
        }
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Memory report for unified-buffer accounting
#[derive(Debug, Clone)]
pub struct MemoryReport {
    /// Peak memory usage in bytes
    pub peak_bytes: u64,
    /// Current memory usage in bytes
    pub current_bytes: u64,
    /// Total allocation count
    pub allocation_count: u64,
    /// Total prefetch hints issued
    pub prefetch_count: u64,
}

/// Memory tracker for unified buffers
///
/// Lock-free counters; shared between the device and every buffer it
/// allocates.
pub struct MemoryTracker {
    current: AtomicU64,
    peak: AtomicU64,
    allocation_count: AtomicU64,
    prefetch_count: AtomicU64,
}

impl MemoryTracker {
    /// Create new memory tracker
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: AtomicU64::new(0),
            peak: AtomicU64::new(0),
            allocation_count: AtomicU64::new(0),
            prefetch_count: AtomicU64::new(0),
        }
    }

    /// Record memory allocation
    pub fn record_allocation(&self, _name: &str, bytes: u64) {
        let new_current = self.current.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.allocation_count.fetch_add(1, Ordering::SeqCst);

        let mut peak = self.peak.load(Ordering::SeqCst);
        while new_current > peak {
            match self.peak.compare_exchange_weak(
                peak,
                new_current,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current_peak) => peak = current_peak,
            }
        }
    }

    /// Record memory deallocation
    pub fn record_deallocation(&self, _name: &str, bytes: u64) {
        self.current.fetch_sub(bytes, Ordering::SeqCst);
    }

    /// Record a prefetch hint toward the device
    pub fn record_prefetch(&self, _name: &str, _bytes: u64) {
        self.prefetch_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Get memory report
    #[must_use]
    pub fn report(&self) -> MemoryReport {
        MemoryReport {
            peak_bytes: self.peak.load(Ordering::SeqCst),
            current_bytes: self.current.load(Ordering::SeqCst),
            allocation_count: self.allocation_count.load(Ordering::SeqCst),
            prefetch_count: self.prefetch_count.load(Ordering::SeqCst),
        }
    }
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}
