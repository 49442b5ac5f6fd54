//! Error types for compute backend operations.

use thiserror::Error;

/// Status reported by a failed backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceStatus {
    /// The device cannot satisfy an allocation request.
    #[error("out of device memory: requested {requested} bytes, {available} bytes available")]
    OutOfMemory {
        /// Bytes requested.
        requested: usize,
        /// Bytes still free on the device.
        available: usize,
    },

    /// Source and destination of a copy differ in length.
    #[error("size mismatch: destination holds {dst_len} elements, source holds {src_len}")]
    SizeMismatch {
        /// Destination element count.
        dst_len: usize,
        /// Source element count.
        src_len: usize,
    },

    /// A kernel launch was rejected by the device.
    #[error("invalid launch: {0}")]
    InvalidLaunch(String),

    /// A release referred to an allocation the device does not know.
    #[error("unknown allocation id {0}")]
    UnknownAllocation(u64),

    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

/// Failure of a named backend operation.
///
/// # Examples
/// ```
/// use pricer_pricing::device::{DeviceError, DeviceStatus};
///
/// let err = DeviceError::new("copy_to_host", DeviceStatus::SizeMismatch { dst_len: 4, src_len: 8 });
/// assert!(err.to_string().contains("copy_to_host"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("device operation '{operation}' failed: {status}")]
pub struct DeviceError {
    /// Name of the failed operation (e.g. `allocate`, `copy_to_host`, `launch`).
    pub operation: &'static str,
    /// Status returned by the backend.
    pub status: DeviceStatus,
}

impl DeviceError {
    /// Creates a new device error.
    #[inline]
    pub fn new(operation: &'static str, status: DeviceStatus) -> Self {
        Self { operation, status }
    }

    /// Returns `true` if the failure is an exhausted-memory condition.
    #[inline]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self.status, DeviceStatus::OutOfMemory { .. })
    }
}
