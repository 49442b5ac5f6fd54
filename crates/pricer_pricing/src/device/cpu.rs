//! Multi-core host implementation of [`ComputeBackend`].
//!
//! Each group is one rayon task. Lanes of a group run sequentially inside
//! the task, which gives kernel bodies an implicit barrier between the
//! phases they write over the group's lane slice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use pricer_core::types::Precision;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;

use super::{
    Allocation, ComputeBackend, DeviceError, DeviceInfo, DeviceStatus, GroupContext, KernelKind,
    KernelLimits, LaunchShape,
};

const DEFAULT_MAX_GROUP_SIZE: usize = 1024;
const DEFAULT_MAX_GROUP_COUNT: usize = 65_535;
const DEFAULT_LOCAL_MEMORY_BYTES: usize = 48 * 1024;
const DEFAULT_GLOBAL_MEMORY_BYTES: usize = 4 << 30;

/// Bookkeeping of live allocations.
#[derive(Default)]
struct AllocationTable {
    live: HashMap<u64, usize>,
    bytes: usize,
}

/// Compute device backed by a dedicated rayon thread pool.
///
/// # Examples
/// ```
/// use pricer_pricing::device::{ComputeBackend, CpuBackend};
///
/// let backend = CpuBackend::builder().compute_units(2).build().unwrap();
/// let info = backend.device_info().unwrap();
/// assert_eq!(info.compute_units, 2);
/// assert!(info.supports_double);
/// ```
pub struct CpuBackend {
    info: DeviceInfo,
    kernel_overrides: HashMap<KernelKind, KernelLimits>,
    pool: ThreadPool,
    table: Mutex<AllocationTable>,
    next_id: AtomicU64,
}

impl CpuBackend {
    /// Creates a backend using every available core and default limits.
    pub fn new() -> Result<Self, DeviceError> {
        Self::builder().build()
    }

    /// Returns a builder for customising device limits.
    pub fn builder() -> CpuBackendBuilder {
        CpuBackendBuilder::default()
    }

    /// Number of allocations not yet released.
    pub fn live_allocations(&self) -> usize {
        self.table.lock().map(|t| t.live.len()).unwrap_or(0)
    }

    /// Bytes currently allocated.
    pub fn allocated_bytes(&self) -> usize {
        self.table.lock().map(|t| t.bytes).unwrap_or(0)
    }

    fn limits_for(&self, kernel: KernelKind) -> KernelLimits {
        self.kernel_overrides
            .get(&kernel)
            .copied()
            .unwrap_or(KernelLimits {
                max_group_size: self.info.max_group_size,
                local_memory_bytes: self.info.local_memory_bytes,
            })
    }

    fn lock_table(
        &self,
        operation: &'static str,
    ) -> Result<std::sync::MutexGuard<'_, AllocationTable>, DeviceError> {
        self.table.lock().map_err(|_| {
            DeviceError::new(
                operation,
                DeviceStatus::Backend("allocation table poisoned".to_string()),
            )
        })
    }

    fn copy<T: Copy>(operation: &'static str, dst: &mut [T], src: &[T]) -> Result<(), DeviceError> {
        if dst.len() != src.len() {
            return Err(DeviceError::new(
                operation,
                DeviceStatus::SizeMismatch {
                    dst_len: dst.len(),
                    src_len: src.len(),
                },
            ));
        }
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> Result<DeviceInfo, DeviceError> {
        Ok(self.info.clone())
    }

    fn supports_precision(&self, precision: Precision) -> Result<bool, DeviceError> {
        Ok(match precision {
            Precision::Single => true,
            Precision::Double => self.info.supports_double,
        })
    }

    fn kernel_limits(&self, kernel: KernelKind) -> Result<KernelLimits, DeviceError> {
        Ok(self.limits_for(kernel))
    }

    fn allocate(&self, label: &'static str, bytes: usize) -> Result<Allocation, DeviceError> {
        let mut table = self.lock_table("allocate")?;
        let available = self.info.global_memory_bytes.saturating_sub(table.bytes);
        if bytes > available {
            return Err(DeviceError::new(
                "allocate",
                DeviceStatus::OutOfMemory {
                    requested: bytes,
                    available,
                },
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        table.live.insert(id, bytes);
        table.bytes += bytes;
        Ok(Allocation::new(id, label, bytes))
    }

    fn release(&self, allocation: &Allocation) -> Result<(), DeviceError> {
        let mut table = self.lock_table("release")?;
        let bytes = table.live.remove(&allocation.id()).ok_or_else(|| {
            DeviceError::new("release", DeviceStatus::UnknownAllocation(allocation.id()))
        })?;
        table.bytes -= bytes;
        Ok(())
    }

    fn copy_to_device<T: Copy>(&self, dst: &mut [T], src: &[T]) -> Result<(), DeviceError> {
        Self::copy("copy_to_device", dst, src)
    }

    fn copy_to_host<T: Copy>(&self, dst: &mut [T], src: &[T]) -> Result<(), DeviceError> {
        Self::copy("copy_to_host", dst, src)
    }

    fn launch<L, R, F>(
        &self,
        kernel: KernelKind,
        shape: &LaunchShape,
        lanes: &mut [L],
        body: F,
    ) -> Result<Vec<R>, DeviceError>
    where
        L: Send,
        R: Send,
        F: Fn(&GroupContext, &mut [L]) -> R + Sync + Send,
    {
        let limits = self.limits_for(kernel);
        let reject = |reason: String| {
            DeviceError::new(
                "launch",
                DeviceStatus::InvalidLaunch(format!("{}: {}", kernel.name(), reason)),
            )
        };

        if shape.group_size() == 0 || shape.group_count() == 0 {
            return Err(reject("empty launch grid".to_string()));
        }
        if shape.group_size() > limits.max_group_size {
            return Err(reject(format!(
                "group size {} exceeds kernel limit {}",
                shape.group_size(),
                limits.max_group_size
            )));
        }
        if shape.group_count() > self.info.max_group_count {
            return Err(reject(format!(
                "group count {} exceeds device limit {}",
                shape.group_count(),
                self.info.max_group_count
            )));
        }
        if lanes.len() != shape.lane_count() {
            return Err(DeviceError::new(
                "launch",
                DeviceStatus::SizeMismatch {
                    dst_len: shape.lane_count(),
                    src_len: lanes.len(),
                },
            ));
        }

        debug!(
            kernel = kernel.name(),
            group_size = shape.group_size(),
            group_count = shape.group_count(),
            "Launching kernel"
        );

        let shape = *shape;
        let results: Vec<R> = self.pool.install(|| {
            lanes
                .par_chunks_mut(shape.group_size())
                .enumerate()
                .map(|(group_id, group_lanes)| body(&GroupContext::new(group_id, shape), group_lanes))
                .collect()
        });
        Ok(results)
    }
}

/// Builder for [`CpuBackend`].
#[derive(Clone, Debug)]
pub struct CpuBackendBuilder {
    compute_units: Option<usize>,
    max_group_size: usize,
    max_group_count: usize,
    local_memory_bytes: usize,
    global_memory_bytes: usize,
    supports_double: bool,
    kernel_overrides: HashMap<KernelKind, KernelLimits>,
}

impl Default for CpuBackendBuilder {
    fn default() -> Self {
        Self {
            compute_units: None,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            max_group_count: DEFAULT_MAX_GROUP_COUNT,
            local_memory_bytes: DEFAULT_LOCAL_MEMORY_BYTES,
            global_memory_bytes: DEFAULT_GLOBAL_MEMORY_BYTES,
            supports_double: true,
            kernel_overrides: HashMap::new(),
        }
    }
}

impl CpuBackendBuilder {
    /// Worker threads (defaults to the number of logical cores).
    pub fn compute_units(mut self, units: usize) -> Self {
        self.compute_units = Some(units);
        self
    }

    /// Largest group size accepted by any kernel.
    pub fn max_group_size(mut self, size: usize) -> Self {
        self.max_group_size = size;
        self
    }

    /// Largest number of groups per launch.
    pub fn max_group_count(mut self, count: usize) -> Self {
        self.max_group_count = count;
        self
    }

    /// Local memory per group, in bytes.
    pub fn local_memory_bytes(mut self, bytes: usize) -> Self {
        self.local_memory_bytes = bytes;
        self
    }

    /// Global memory capacity, in bytes.
    pub fn global_memory_bytes(mut self, bytes: usize) -> Self {
        self.global_memory_bytes = bytes;
        self
    }

    /// Whether double-precision kernels are accepted.
    pub fn supports_double(mut self, supported: bool) -> Self {
        self.supports_double = supported;
        self
    }

    /// Overrides the limits reported for one kernel.
    pub fn kernel_limits(mut self, kernel: KernelKind, limits: KernelLimits) -> Self {
        self.kernel_overrides.insert(kernel, limits);
        self
    }

    /// Builds the backend and its thread pool.
    ///
    /// # Errors
    ///
    /// Fails if zero compute units were requested or the pool cannot start.
    pub fn build(self) -> Result<CpuBackend, DeviceError> {
        let compute_units = self.compute_units.unwrap_or_else(num_cpus::get);
        if compute_units == 0 {
            return Err(DeviceError::new(
                "create_device",
                DeviceStatus::Backend("at least one compute unit is required".to_string()),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(compute_units)
            .thread_name(|i| format!("cpu-device-{i}"))
            .build()
            .map_err(|e| DeviceError::new("create_device", DeviceStatus::Backend(e.to_string())))?;

        let info = DeviceInfo {
            name: format!("Host CPU ({compute_units} cores)"),
            compute_units,
            max_group_size: self.max_group_size,
            max_group_count: self.max_group_count,
            local_memory_bytes: self.local_memory_bytes,
            global_memory_bytes: self.global_memory_bytes,
            supports_double: self.supports_double,
        };

        Ok(CpuBackend {
            info,
            kernel_overrides: self.kernel_overrides,
            pool,
            table: Mutex::new(AllocationTable::default()),
            next_id: AtomicU64::new(1),
        })
    }
}
