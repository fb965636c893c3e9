//! Matrix and weight-vector data model, with seeded input generation
//!
//! The matrix is an N×N grid of `u8` in row-major order over a unified
//! buffer; weight entries are `u8`. Value ranges are documented contracts,
//! not validated: generation keeps matrix entries in {0, 1} and weights in
//! {0, 1, 2}, and the reduction assumes (but never checks) those domains.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;

use crate::buffer::UnifiedBuffer;
use crate::device::Device;
use crate::error::{Result, SumarError};

/// N×N row-major matrix over a unified buffer
///
/// Read-only for all workers during the parallel phase.
#[derive(Debug)]
pub struct Matrix {
    buf: UnifiedBuffer<u8>,
    n: usize,
}

impl Matrix {
    /// Wrap a unified buffer as an `n`×`n` matrix
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `n` is zero or the buffer length is not
    /// `n * n`.
    pub fn new(buf: UnifiedBuffer<u8>, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SumarError::InvalidShape {
                reason: "matrix dimension cannot be zero".to_string(),
            });
        }
        if buf.len() != n * n {
            return Err(SumarError::InvalidShape {
                reason: format!("buffer length {} != {n}x{n}", buf.len()),
            });
        }
        Ok(Self { buf, n })
    }

    /// Build an `n`×`n` matrix from explicit row-major entries
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` on dimension mismatch, `AllocationFailure` if
    /// the unified buffer cannot be allocated.
    pub fn from_entries(device: &Device, n: usize, entries: &[u8]) -> Result<Self> {
        if entries.len() != n * n {
            return Err(SumarError::InvalidShape {
                reason: format!("entry count {} != {n}x{n}", entries.len()),
            });
        }
        let mut buf = device.alloc_unified::<u8>("matrix", n * n)?;
        buf.copy_from_slice(entries);
        Self::new(buf, n)
    }

    /// Generate a random `n`×`n` matrix with entries in {0, 1}
    ///
    /// Deterministic for a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `n` is zero, `AllocationFailure` if the
    /// unified buffer cannot be allocated.
    pub fn random(device: &Device, n: usize, rng: &mut StdRng) -> Result<Self> {
        if n == 0 {
            return Err(SumarError::InvalidShape {
                reason: "matrix dimension cannot be zero".to_string(),
            });
        }
        let mut buf = device.alloc_unified::<u8>("matrix", n * n)?;
        for entry in buf.iter_mut() {
            *entry = rng.gen_range(0..2);
        }
        Self::new(buf, n)
    }

    /// Matrix dimension
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Row-major entries
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Entry at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.n && col < self.n, "index out of bounds");
        self.buf[row * self.n + col]
    }

    /// Advise migration of the backing buffer toward the device
    pub fn prefetch(&self, device: &Device) {
        self.buf.prefetch(device);
    }
}

/// Generate a length-`n` weight vector with entries in {0, 1, 2}
///
/// Deterministic for a fixed seed.
///
/// # Errors
///
/// Returns `AllocationFailure` if the unified buffer cannot be allocated.
pub fn random_weights(
    device: &Device,
    n: usize,
    rng: &mut StdRng,
) -> Result<UnifiedBuffer<u8>> {
    let mut buf = device.alloc_unified::<u8>("weights", n)?;
    for entry in buf.iter_mut() {
        *entry = rng.gen_range(0..3);
    }
    Ok(buf)
}

/// Render the matrix into a text sink, one row per line
///
/// # Errors
///
/// Returns `fmt::Error` if the sink fails.
pub fn dump_matrix(matrix: &Matrix, out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "Matrix:")?;
    for row in 0..matrix.n() {
        for col in 0..matrix.n() {
            write!(out, "{} ", matrix.at(row, col))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render a weight vector into a text sink
///
/// # Errors
///
/// Returns `fmt::Error` if the sink fails.
pub fn dump_weights(weights: &[u8], out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "Vector:")?;
    for value in weights {
        write!(out, "{value} ")?;
    }
    writeln!(out)
}
