//! The compute backend capability the pricing engine depends on.
//!
//! A backend exposes a single compute device as a grid of groups of lanes.
//! Lanes of one group cooperate through a per-group slice of lane state;
//! groups never observe each other.

use std::iter::StepBy;
use std::ops::Range;

use pricer_core::types::Precision;

use super::DeviceError;

/// Static description of a compute device.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceInfo {
    /// Human-readable device name.
    pub name: String,
    /// Number of physical execution units (multiprocessors / cores).
    pub compute_units: usize,
    /// Largest group size any kernel may be launched with.
    pub max_group_size: usize,
    /// Largest number of groups in one launch.
    pub max_group_count: usize,
    /// Local (shared) memory available to one group, in bytes.
    pub local_memory_bytes: usize,
    /// Global memory available for allocations, in bytes.
    pub global_memory_bytes: usize,
    /// Whether double-precision kernels are supported.
    pub supports_double: bool,
}

/// Compute passes issued by the pricing engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// Seeds one random stream per lane.
    InitStreams,
    /// Simulates the normalised price paths.
    GeneratePaths,
    /// Plain vanilla valuation.
    PlainVanilla,
    /// Arithmetic Asian valuation.
    Asian,
    /// Floating lookback valuation.
    Lookback,
    /// Knock-out / knock-in valuation.
    Barrier,
}

impl KernelKind {
    /// All kernels in launch order.
    pub const ALL: [KernelKind; 6] = [
        KernelKind::InitStreams,
        KernelKind::GeneratePaths,
        KernelKind::PlainVanilla,
        KernelKind::Asian,
        KernelKind::Lookback,
        KernelKind::Barrier,
    ];

    /// Kernel name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            KernelKind::InitStreams => "init_streams",
            KernelKind::GeneratePaths => "generate_paths",
            KernelKind::PlainVanilla => "price_plain_vanilla",
            KernelKind::Asian => "price_asian",
            KernelKind::Lookback => "price_lookback",
            KernelKind::Barrier => "price_barrier",
        }
    }

    /// Scalars of local memory each lane needs for the group reduction.
    pub fn local_scalars_per_lane(&self) -> usize {
        match self {
            KernelKind::InitStreams | KernelKind::GeneratePaths => 0,
            KernelKind::PlainVanilla | KernelKind::Asian | KernelKind::Lookback => 1,
            KernelKind::Barrier => 2,
        }
    }

    /// Local memory one group of `group_size` lanes needs at `precision`.
    pub fn local_memory_bytes(&self, group_size: usize, precision: Precision) -> usize {
        group_size * self.local_scalars_per_lane() * precision.scalar_bytes()
    }
}

/// Per-kernel resource limits reported by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelLimits {
    /// Largest group size this kernel can be launched with.
    pub max_group_size: usize,
    /// Local memory available to one group of this kernel, in bytes.
    pub local_memory_bytes: usize,
}

/// Grid dimensions of a launch: `group_count` groups of `group_size` lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchShape {
    group_size: usize,
    group_count: usize,
}

impl LaunchShape {
    /// Creates a launch shape.
    #[inline]
    pub fn new(group_size: usize, group_count: usize) -> Self {
        Self {
            group_size,
            group_count,
        }
    }

    /// Lanes per group.
    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Total lanes launched, which is also the grid-stride.
    #[inline]
    pub fn lane_count(&self) -> usize {
        self.group_size * self.group_count
    }
}

/// Identity of the group a kernel body is executing for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupContext {
    group_id: usize,
    shape: LaunchShape,
}

impl GroupContext {
    /// Creates the context of group `group_id` within `shape`.
    #[inline]
    pub fn new(group_id: usize, shape: LaunchShape) -> Self {
        Self { group_id, shape }
    }

    /// Index of this group in the grid.
    #[inline]
    pub fn group_id(&self) -> usize {
        self.group_id
    }

    /// Lanes in this group.
    #[inline]
    pub fn group_size(&self) -> usize {
        self.shape.group_size()
    }

    /// Global index of local lane `lane`.
    #[inline]
    pub fn global_lane(&self, lane: usize) -> usize {
        self.group_id * self.shape.group_size() + lane
    }

    /// Distance between consecutive work items of one lane.
    #[inline]
    pub fn stride(&self) -> usize {
        self.shape.lane_count()
    }

    /// Work items of local lane `lane` under a grid-stride loop over `0..n_items`.
    #[inline]
    pub fn grid_stride(&self, lane: usize, n_items: usize) -> StepBy<Range<usize>> {
        (self.global_lane(lane)..n_items).step_by(self.stride())
    }
}

/// Handle to a region of device global memory.
#[derive(Debug, PartialEq, Eq)]
pub struct Allocation {
    id: u64,
    label: &'static str,
    bytes: usize,
}

impl Allocation {
    /// Creates an allocation handle. Only backends should call this.
    #[inline]
    pub fn new(id: u64, label: &'static str, bytes: usize) -> Self {
        Self { id, label, bytes }
    }

    /// Backend-assigned identifier.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Buffer label used in logs.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Size in bytes.
    #[inline]
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

/// Capability the pricing engine needs from its execution environment.
///
/// Implementations must make `launch` run `body` exactly once per group,
/// hand each group the disjoint chunk `lanes[g * group_size..(g + 1) * group_size]`,
/// and return the per-group results in group order. A launch returns only
/// after every group completed, so consecutive launches are ordered.
pub trait ComputeBackend: Send + Sync {
    /// Queries the static properties of the device.
    fn device_info(&self) -> Result<DeviceInfo, DeviceError>;

    /// Queries whether kernels can run at `precision`.
    fn supports_precision(&self, precision: Precision) -> Result<bool, DeviceError>;

    /// Queries the resource limits of one kernel.
    fn kernel_limits(&self, kernel: KernelKind) -> Result<KernelLimits, DeviceError>;

    /// Reserves `bytes` of global memory.
    fn allocate(&self, label: &'static str, bytes: usize) -> Result<Allocation, DeviceError>;

    /// Returns an allocation to the device.
    fn release(&self, allocation: &Allocation) -> Result<(), DeviceError>;

    /// Copies host data into device memory.
    fn copy_to_device<T: Copy>(&self, dst: &mut [T], src: &[T]) -> Result<(), DeviceError>;

    /// Copies device memory back to the host.
    fn copy_to_host<T: Copy>(&self, dst: &mut [T], src: &[T]) -> Result<(), DeviceError>;

    /// Runs `body` once per group of `shape` and blocks until all groups finish.
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
        F: Fn(&GroupContext, &mut [L]) -> R + Sync + Send;
}
