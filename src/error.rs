//! Error types for sumar
//!
//! All accelerator-side failures propagate synchronously to the call site
//! that issues the launch; there is no asynchronous error channel and no
//! partial-result recovery.

use thiserror::Error;

/// Error type for sumar operations
#[derive(Debug, Error)]
pub enum SumarError {
    /// Invalid shape for an operation
    #[error("Invalid shape: {reason}")]
    InvalidShape {
        /// Description of the shape violation
        reason: String,
    },

    /// Unified-buffer allocation failed (host or device memory exhausted)
    ///
    /// Fatal to the run: there is no fallback allocator and no graceful
    /// degradation path.
    #[error("Allocation failure: {reason}")]
    AllocationFailure {
        /// Description of the allocation failure
        reason: String,
    },

    /// Kernel launch or execution failed
    ///
    /// Covers invalid launch configurations and worker faults during
    /// execution. A launch either fully completes or fails as a whole;
    /// it is never retried.
    #[error("Launch failure: {reason}")]
    LaunchFailure {
        /// Description of the launch failure
        reason: String,
    },

    /// Device probe or worker-pool construction failed
    #[error("Device error: {reason}")]
    DeviceError {
        /// Description of the device failure
        reason: String,
    },
}

/// Result type alias for sumar operations
pub type Result<T> = std::result::Result<T, SumarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_shape_display() {
        let err = SumarError::InvalidShape {
            reason: "weights length 3 != matrix size 4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid shape: weights length 3 != matrix size 4"
        );
    }

    #[test]
    fn test_allocation_failure_display() {
        let err = SumarError::AllocationFailure {
            reason: "out of memory".to_string(),
        };
        assert!(err.to_string().starts_with("Allocation failure"));
    }

    #[test]
    fn test_launch_failure_display() {
        let err = SumarError::LaunchFailure {
            reason: "group size 0".to_string(),
        };
        assert!(err.to_string().contains("group size 0"));
    }

    #[test]
    fn test_device_error_display() {
        let err = SumarError::DeviceError {
            reason: "pool build failed".to_string(),
        };
        assert!(err.to_string().starts_with("Device error"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SumarError>();
    }
}
