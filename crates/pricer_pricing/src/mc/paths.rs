//! Path simulation under the log-normal diffusion model.
//!
//! Each path starts from a normalised price of 1 and is advanced by
//!
//! ```text
//! s(t+1) = s(t) · exp((r − σ²/2)·dt + σ·√dt · z)
//! ```
//!
//! with `z` drawn from the simulating lane's stream. The spot price is
//! applied at valuation time.
//!
//! # Memory Layout
//!
//! The path matrix is column-major by time step: the value of path `i`
//! after step `t` lives at `t * num_paths + i`.

use pricer_core::types::OptionSpec;

use crate::device::{ComputeBackend, DeviceBuffer, DeviceError, DisjointWriter, KernelKind, LaunchShape};
use crate::real::Real;
use crate::rng::StreamPool;

/// Contract parameters in device precision.
///
/// Uploaded once per run into a one-element buffer that every kernel reads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceOptionParams<T> {
    /// Spot price.
    pub spot: T,
    /// Strike price.
    pub strike: T,
    /// Continuously compounded risk-free rate.
    pub rate: T,
    /// Volatility.
    pub volatility: T,
    /// Tenor in years.
    pub tenor: T,
    /// Simulation time step in years.
    pub time_step: T,
    /// Up barrier; `+∞` never breaches.
    pub barrier: T,
    /// `+1` for a call, `−1` for a put.
    pub sign: T,
    /// Number of simulated steps.
    pub num_timesteps: usize,
}

impl<T: Real> DeviceOptionParams<T> {
    /// Converts a validated contract into device precision.
    pub fn from_spec(spec: &OptionSpec) -> Self {
        Self {
            spot: T::from_host(spec.spot()),
            strike: T::from_host(spec.strike()),
            rate: T::from_host(spec.risk_free_rate()),
            volatility: T::from_host(spec.volatility()),
            tenor: T::from_host(spec.tenor()),
            time_step: T::from_host(spec.time_step()),
            barrier: T::from_host(spec.barrier()),
            sign: T::from_host(spec.option_type().sign()),
            num_timesteps: spec.num_timesteps(),
        }
    }

    /// Per-step log drift `(r − σ²/2)·dt`.
    #[inline]
    pub fn drift(&self) -> T {
        let half = T::from_host(0.5);
        (self.rate - half * self.volatility * self.volatility) * self.time_step
    }

    /// Per-step diffusion scale `σ·√dt`.
    #[inline]
    pub fn diffusion(&self) -> T {
        self.volatility * self.time_step.sqrt()
    }

    /// Discount factor `exp(−r·tenor)`.
    #[inline]
    pub fn discount(&self) -> T {
        (-self.rate * self.tenor).exp()
    }
}

/// Host copy of a simulated path matrix.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionSpec;
/// use pricer_pricing::device::CpuBackend;
/// use pricer_pricing::mc::SimulationConfig;
/// use pricer_pricing::PricingEngine;
///
/// let spec = OptionSpec::builder()
///     .spot(40.0)
///     .strike(35.0)
///     .risk_free_rate(0.03)
///     .volatility(0.2)
///     .tenor(1.0 / 3.0)
///     .time_step(1.0 / 261.0)
///     .build()
///     .unwrap();
/// let config = SimulationConfig::builder().num_paths(100).group_size(32).build().unwrap();
///
/// let engine = PricingEngine::new(CpuBackend::new().unwrap());
/// let paths = engine.simulate_paths::<f64>(&spec, &config).unwrap();
/// assert_eq!(paths.num_paths(), 100);
/// assert_eq!(paths.num_timesteps(), 87);
/// assert!(paths.path(0).all(|s| s > 0.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix<T> {
    data: Vec<T>,
    num_paths: usize,
    num_timesteps: usize,
}

impl<T: Copy> PathMatrix<T> {
    pub(crate) fn from_column_major(data: Vec<T>, num_paths: usize, num_timesteps: usize) -> Self {
        debug_assert_eq!(data.len(), num_paths * num_timesteps);
        Self {
            data,
            num_paths,
            num_timesteps,
        }
    }

    /// Number of paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Number of time steps per path.
    #[inline]
    pub fn num_timesteps(&self) -> usize {
        self.num_timesteps
    }

    /// Normalised price of `path` after `step`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, path: usize, step: usize) -> T {
        assert!(path < self.num_paths && step < self.num_timesteps);
        self.data[step * self.num_paths + path]
    }

    /// Normalised prices of one path in time order.
    pub fn path(&self, path: usize) -> impl Iterator<Item = T> + '_ {
        self.data
            .iter()
            .skip(path)
            .step_by(self.num_paths)
            .copied()
            .take(self.num_timesteps)
    }

    /// Raw column-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// Runs the [`KernelKind::GeneratePaths`] pass.
///
/// Path `i` is simulated by the lane whose global index is `i mod lane_count`,
/// drawing its normals from that lane's stream.
pub(crate) fn generate_paths<T: Real, B: ComputeBackend>(
    backend: &B,
    shape: &LaunchShape,
    streams: &mut StreamPool<'_, B>,
    params: &DeviceOptionParams<T>,
    num_paths: usize,
    matrix: &mut DeviceBuffer<'_, T, B>,
) -> Result<(), DeviceError> {
    let num_timesteps = params.num_timesteps;
    let drift = params.drift();
    let diffusion = params.diffusion();
    let writer = DisjointWriter::new(matrix.device_slice_mut());

    backend.launch(
        KernelKind::GeneratePaths,
        shape,
        streams.lanes_mut(),
        |ctx, lanes| {
            for (lane, stream) in lanes.iter_mut().enumerate() {
                for path in ctx.grid_stride(lane, num_paths) {
                    let mut s = T::one();
                    for step in 0..num_timesteps {
                        let z: T = stream.next_normal();
                        s = s * (drift + diffusion * z).exp();
                        // Safety: the grid-stride loop gives each path index to exactly one lane.
                        unsafe { writer.write(step * num_paths + path, s) };
                    }
                }
            }
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::OptionType;

    fn spec() -> OptionSpec {
        OptionSpec::builder()
            .spot(40.0)
            .strike(35.0)
            .risk_free_rate(0.03)
            .volatility(0.2)
            .tenor(1.0 / 3.0)
            .time_step(1.0 / 261.0)
            .barrier(45.0)
            .option_type(OptionType::Put)
            .build()
            .unwrap()
    }

    #[test]
    fn test_params_from_spec() {
        let params = DeviceOptionParams::<f64>::from_spec(&spec());
        assert_eq!(params.num_timesteps, 87);
        assert_eq!(params.sign, -1.0);
        assert_relative_eq!(params.drift(), (0.03 - 0.02) / 261.0, epsilon = 1e-15);
        assert_relative_eq!(params.diffusion(), 0.2 / 261.0_f64.sqrt(), epsilon = 1e-15);
        assert_relative_eq!(params.discount(), (-0.01_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_single_precision_params() {
        let params = DeviceOptionParams::<f32>::from_spec(&spec());
        assert_eq!(params.spot, 40.0_f32);
        assert_relative_eq!(params.discount(), (-0.01_f32).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_path_matrix_indexing() {
        // 2 paths x 3 steps, column-major by step.
        let matrix = PathMatrix::from_column_major(vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0], 2, 3);
        assert_eq!(matrix.get(0, 2), 3.0);
        assert_eq!(matrix.get(1, 0), 10.0);
        assert_eq!(matrix.path(1).collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);
        assert_eq!(matrix.path(0).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }
}
