//! Result comparison and verdict reporting
//!
//! A mismatch between the reference and parallel scalars is a reported
//! correctness failure, not a crash: both values are always carried so the
//! report never silently picks one result.

use std::fmt;

use serde::Serialize;

/// Outcome of comparing the reference and parallel scalar totals
///
/// The pass criterion is exact integer equality, never "close enough".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Scalar total from the sequential reference path
    pub reference: i64,
    /// Scalar total from the parallel path
    pub parallel: i64,
}

impl Verdict {
    /// Create a verdict from both scalar totals
    #[must_use]
    pub fn new(reference: i64, parallel: i64) -> Self {
        Self {
            reference,
            parallel,
        }
    }

    /// Whether the two totals agree exactly
    #[must_use]
    pub fn passed(&self) -> bool {
        self.reference == self.parallel
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "OK" } else { "ERROR" };
        write!(
            f,
            "{status}\nreference: {} <-> parallel: {}",
            self.reference, self.parallel
        )
    }
}
