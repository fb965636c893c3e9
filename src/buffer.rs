//! Unified memory buffers
//!
//! A [`UnifiedBuffer`] is a single allocation addressable by both the host
//! and the simulated device; there is no copy-in/copy-out step. Buffers are
//! allocated through [`crate::device::Device::alloc_unified`], accounted in
//! the device's memory tracker, and released exactly once on drop. The
//! borrow checker guarantees no buffer is freed while a launch still
//! references it.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::device::Device;
use crate::error::{Result, SumarError};
use crate::timing::MemoryTracker;

/// Single allocation visible to host and device
///
/// Dereferences to `[T]` for host-side access; workers read it through
/// shared borrows during a launch.
pub struct UnifiedBuffer<T> {
    data: Vec<T>,
    name: String,
    tracker: Arc<MemoryTracker>,
}

impl<T: Clone + Default> UnifiedBuffer<T> {
    /// Allocate a zero-initialized buffer of `len` elements
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the allocation cannot be satisfied.
    /// There is no fallback allocator.
    pub(crate) fn allocate(
        tracker: Arc<MemoryTracker>,
        name: &str,
        len: usize,
    ) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| SumarError::AllocationFailure {
                reason: format!("buffer '{name}' ({len} elements): {e}"),
            })?;
        data.resize(len, T::default());

        let buffer = Self {
            data,
            name: name.to_string(),
            tracker,
        };
        buffer
            .tracker
            .record_allocation(&buffer.name, buffer.len_bytes());
        Ok(buffer)
    }
}

impl<T> UnifiedBuffer<T> {
    /// Buffer size in bytes
    #[must_use]
    pub fn len_bytes(&self) -> u64 {
        (self.data.len() * std::mem::size_of::<T>()) as u64
    }

    /// Advise migration of this buffer toward the device
    ///
    /// Issued before a launch to avoid demand paging on the kernel's first
    /// touch. A performance hint only; correctness never depends on it.
    pub fn prefetch(&self, device: &Device) {
        device.tracker().record_prefetch(&self.name, self.len_bytes());
    }
}

impl<T> Deref for UnifiedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for UnifiedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Drop for UnifiedBuffer<T> {
    fn drop(&mut self) {
        self.tracker
            .record_deallocation(&self.name, self.len_bytes());
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UnifiedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedBuffer")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Lock-free view over an output buffer with disjoint per-worker slots
///
/// Concurrent workers write through a shared reference without atomics or
/// locks. Sound only under the disjoint-write invariant: no two workers
/// ever write the same slot. The grid-stride partition
/// (`row % workers == worker`) guarantees exactly one writer per row.
pub struct DisjointWriter<'a, T> {
    slots: &'a [UnsafeCell<T>],
}

// One writer per slot and no reader until the launch barrier, so shared
// access across worker threads cannot race.
unsafe impl<T: Send> Sync for DisjointWriter<'_, T> {}

impl<'a, T> DisjointWriter<'a, T> {
    /// Wrap an exclusively borrowed slice for disjoint concurrent writes
    #[must_use]
    pub fn new(slice: &'a mut [T]) -> Self {
        // `UnsafeCell<T>` has the same layout as `T`, and the unique borrow
        // guarantees no other view of the slice exists for 'a.
        let slots =
            unsafe { &*(std::ptr::from_mut::<[T]>(slice) as *const [UnsafeCell<T>]) };
        Self { slots }
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the view is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write `value` into `index`
    ///
    /// # Safety
    ///
    /// For the lifetime of this view, `index` must be written by at most one
    /// worker. Callers uphold this via the grid-stride partition: worker `w`
    /// writes only rows with `row % workers == w`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub unsafe fn write(&self, index: usize, value: T) {
        *self.slots[index].get() = value;
    }
}
