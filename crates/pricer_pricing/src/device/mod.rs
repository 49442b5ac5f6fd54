//! Compute device abstraction.
//!
//! The pricing engine never talks to hardware directly. It drives a
//! [`ComputeBackend`] through a fixed protocol: query the device, allocate
//! global buffers, copy parameters, launch kernels over a grid of groups and
//! copy partial results back. [`CpuBackend`] implements the protocol on a
//! rayon thread pool.

mod backend;
mod cpu;
mod error;
mod memory;

pub use backend::{
    Allocation, ComputeBackend, DeviceInfo, GroupContext, KernelKind, KernelLimits, LaunchShape,
};
pub use cpu::{CpuBackend, CpuBackendBuilder};
pub use error::{DeviceError, DeviceStatus};
pub use memory::DeviceBuffer;
pub(crate) use memory::DisjointWriter;
