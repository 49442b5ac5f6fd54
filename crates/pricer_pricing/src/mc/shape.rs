//! Launch-shape selection and per-kernel limit checks.

use pricer_core::types::Precision;
use tracing::warn;

use super::{PricingError, SimulationConfig};
use crate::device::{ComputeBackend, DeviceInfo, KernelKind, LaunchShape};

/// Groups per compute unit above which the heuristic stops adding groups.
pub const GROUPS_PER_COMPUTE_UNIT: usize = 20;

/// Selects the launch shape of a run.
///
/// The group size comes from the configuration. Unless the configuration
/// fixes the group count, it starts at `ceil(num_paths / group_size)` and is
/// halved while it exceeds [`GROUPS_PER_COMPUTE_UNIT`] groups per compute
/// unit, then clamped to the device's maximum group count.
///
/// # Errors
///
/// Returns [`PricingError::Configuration`] if an explicit group count does
/// not fit the device.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::device::DeviceInfo;
/// use pricer_pricing::mc::{select_launch_shape, SimulationConfig};
///
/// let device = DeviceInfo {
///     name: "test".into(),
///     compute_units: 4,
///     max_group_size: 1024,
///     max_group_count: 65_535,
///     local_memory_bytes: 48 * 1024,
///     global_memory_bytes: 1 << 30,
///     supports_double: true,
/// };
/// let config = SimulationConfig::builder().num_paths(100_000).build().unwrap();
///
/// // 391 groups halve to 48, below 20 x 4 compute units.
/// let shape = select_launch_shape(&config, &device).unwrap();
/// assert_eq!(shape.group_size(), 256);
/// assert_eq!(shape.group_count(), 48);
/// ```
pub fn select_launch_shape(
    config: &SimulationConfig,
    device: &DeviceInfo,
) -> Result<LaunchShape, PricingError> {
    let group_size = config.group_size();

    if let Some(group_count) = config.group_count() {
        if group_count > device.max_group_count {
            return Err(PricingError::Configuration {
                kernel: "launch_shape",
                reason: format!(
                    "requested group count {group_count} exceeds the device maximum of {}",
                    device.max_group_count
                ),
            });
        }
        return Ok(LaunchShape::new(group_size, group_count));
    }

    let target = GROUPS_PER_COMPUTE_UNIT * device.compute_units.max(1);
    let mut group_count = config.num_paths().div_ceil(group_size);
    while group_count > target && group_count > 1 {
        group_count /= 2;
    }
    let group_count = group_count.max(1);

    if group_count > device.max_group_count {
        warn!(
            group_count,
            max_group_count = device.max_group_count,
            "Clamping group count to device maximum"
        );
        return Ok(LaunchShape::new(group_size, device.max_group_count.max(1)));
    }

    Ok(LaunchShape::new(group_size, group_count))
}

/// Checks that every kernel of a run can be launched with `shape` at `precision`.
///
/// # Errors
///
/// Returns [`PricingError::Configuration`] naming the first kernel whose
/// group size or local-memory requirement exceeds its reported limit.
pub fn verify_kernel_limits<B: ComputeBackend>(
    backend: &B,
    shape: &LaunchShape,
    precision: Precision,
) -> Result<(), PricingError> {
    for kernel in KernelKind::ALL {
        let limits = backend.kernel_limits(kernel)?;

        if shape.group_size() > limits.max_group_size {
            return Err(PricingError::Configuration {
                kernel: kernel.name(),
                reason: format!(
                    "group size {} exceeds the kernel maximum of {}",
                    shape.group_size(),
                    limits.max_group_size
                ),
            });
        }

        let local_bytes = kernel.local_memory_bytes(shape.group_size(), precision);
        if local_bytes > limits.local_memory_bytes {
            return Err(PricingError::Configuration {
                kernel: kernel.name(),
                reason: format!(
                    "needs {local_bytes} bytes of local memory, {} available",
                    limits.local_memory_bytes
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{CpuBackend, KernelLimits};

    fn device(compute_units: usize, max_group_count: usize) -> DeviceInfo {
        DeviceInfo {
            name: "test".into(),
            compute_units,
            max_group_size: 1024,
            max_group_count,
            local_memory_bytes: 48 * 1024,
            global_memory_bytes: 1 << 30,
            supports_double: true,
        }
    }

    fn config(num_paths: usize, group_size: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .num_paths(num_paths)
            .group_size(group_size)
            .build()
            .unwrap()
    }

    #[test]
    fn test_small_run_uses_ceil_division() {
        let shape = select_launch_shape(&config(1000, 256), &device(8, 65_535)).unwrap();
        assert_eq!(shape.group_count(), 4);
    }

    #[test]
    fn test_single_path_gets_one_group() {
        let shape = select_launch_shape(&config(1, 256), &device(8, 65_535)).unwrap();
        assert_eq!(shape.group_count(), 1);
        assert_eq!(shape.lane_count(), 256);
    }

    #[test]
    fn test_halving_stops_at_target() {
        // ceil(1e6 / 128) = 7813 -> 3906 -> ... -> 30, first value <= 20 * 2.
        let shape = select_launch_shape(&config(1_000_000, 128), &device(2, 65_535)).unwrap();
        assert_eq!(shape.group_count(), 30);
    }

    #[test]
    fn test_clamped_to_device_maximum() {
        let shape = select_launch_shape(&config(1_000_000, 1), &device(10_000, 100)).unwrap();
        assert_eq!(shape.group_count(), 100);
    }

    #[test]
    fn test_explicit_group_count() {
        let cfg = SimulationConfig::builder()
            .num_paths(1000)
            .group_count(7)
            .build()
            .unwrap();
        let shape = select_launch_shape(&cfg, &device(1, 65_535)).unwrap();
        assert_eq!(shape.group_count(), 7);

        let err = select_launch_shape(&cfg, &device(1, 4)).unwrap_err();
        assert!(matches!(err, PricingError::Configuration { .. }));
    }

    #[test]
    fn test_kernel_limits_name_failing_kernel() {
        let backend = CpuBackend::builder()
            .compute_units(1)
            .kernel_limits(
                KernelKind::Barrier,
                KernelLimits {
                    max_group_size: 1024,
                    local_memory_bytes: 2048,
                },
            )
            .build()
            .unwrap();

        // 256 lanes x 2 scalars x 8 bytes = 4096 bytes for the barrier pass.
        let shape = LaunchShape::new(256, 1);
        match verify_kernel_limits(&backend, &shape, Precision::Double) {
            Err(PricingError::Configuration { kernel, .. }) => assert_eq!(kernel, "price_barrier"),
            other => panic!("unexpected result: {other:?}"),
        }

        // Single precision halves the requirement.
        assert!(verify_kernel_limits(&backend, &shape, Precision::Single).is_ok());
    }
}
