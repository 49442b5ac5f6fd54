//! Error types for the Monte Carlo engine.
//!
//! [`ConfigError`] covers invalid simulation settings caught at build time;
//! [`PricingError`] covers everything that can abort a pricing run.

use pricer_core::types::{Precision, SpecError};
use thiserror::Error;

use crate::device::{DeviceError, DeviceStatus};

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Path count must be at least one.
    #[error("Invalid path count {0}: at least one path is required")]
    InvalidPathCount(usize),

    /// Group size must be a non-zero power of two.
    #[error("Invalid group size {0}: must be a non-zero power of two")]
    InvalidGroupSize(usize),

    /// An explicit group count must be non-zero.
    #[error("Invalid group count {0}: must be at least one")]
    InvalidGroupCount(usize),
}

/// Failure of a pricing run.
///
/// Every variant is fatal for the run. Device buffers acquired before the
/// failure are released before the error reaches the caller.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PricingError {
    /// The device could not provide the memory the run needs.
    #[error("Insufficient device resources: {0}")]
    Resource(DeviceError),

    /// A backend operation failed.
    #[error("Device operation '{operation}' failed: {status}")]
    Device {
        /// Name of the failed operation.
        operation: &'static str,
        /// Status reported by the backend.
        status: DeviceStatus,
    },

    /// The device cannot run kernels at the requested precision.
    #[error("Device does not support {0} precision")]
    UnsupportedPrecision(Precision),

    /// A kernel cannot run with the selected launch shape.
    #[error("Kernel '{kernel}' cannot be configured: {reason}")]
    Configuration {
        /// Kernel name.
        kernel: &'static str,
        /// Which limit was violated.
        reason: String,
    },

    /// The option contract failed validation.
    #[error("Invalid option contract: {0}")]
    InvalidSpec(#[from] SpecError),

    /// The simulation configuration failed validation.
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<DeviceError> for PricingError {
    fn from(err: DeviceError) -> Self {
        if err.is_out_of_memory() {
            PricingError::Resource(err)
        } else {
            PricingError::Device {
                operation: err.operation,
                status: err.status,
            }
        }
    }
}
