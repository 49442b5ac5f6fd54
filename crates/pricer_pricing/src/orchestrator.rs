//! Host-side orchestration of a pricing run.
//!
//! [`PricingEngine::price`] validates the inputs, checks the device,
//! sizes the launch, allocates every device buffer, then issues the
//! stream initialisation, path generation and valuation passes in order.
//! Each buffer is a [`DeviceBuffer`] guard, so all device memory is
//! released when the run returns, successfully or not.

use std::time::Instant;

use pricer_core::types::{OptionResult, OptionSpec, Precision};
use tracing::{debug, info};

use crate::device::{ComputeBackend, DeviceBuffer, DeviceInfo, LaunchShape};
use crate::mc::{
    generate_paths, select_launch_shape, verify_kernel_limits, DeviceOptionParams, PathMatrix,
    PricingError, SimulationConfig,
};
use crate::path_dependent::{finish_value, run_valuation_pass, ValuationPass};
use crate::real::Real;
use crate::rng::StreamPool;

/// Monte Carlo pricing engine driving one compute backend.
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
///     .barrier(45.0)
///     .build()
///     .unwrap();
/// let config = SimulationConfig::builder().num_paths(4_096).seed(1234).build().unwrap();
///
/// let engine = PricingEngine::new(CpuBackend::new().unwrap());
/// let result = engine.price(&spec, &config).unwrap();
///
/// assert!(result.plain_vanilla() > 0.0);
/// assert!((result.knockout_plus_knockin() - result.plain_vanilla()).abs() < 1e-9);
/// ```
pub struct PricingEngine<B: ComputeBackend> {
    backend: B,
}

impl<B: ComputeBackend> PricingEngine<B> {
    /// Creates an engine on `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Backend the engine runs on.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Static description of the device.
    pub fn device_info(&self) -> Result<DeviceInfo, PricingError> {
        Ok(self.backend.device_info()?)
    }

    /// Prices every payoff of `spec` in one parallel run.
    ///
    /// The returned result holds the five valuations, the launch shape and
    /// the elapsed time; the reference value is left for
    /// [`ReferencePricer`](crate::ReferencePricer) to fill.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidSpec`] / [`PricingError::InvalidConfig`] for invalid inputs
    /// - [`PricingError::UnsupportedPrecision`] if the device cannot run the configured precision
    /// - [`PricingError::Configuration`] if a kernel cannot run with the selected shape
    /// - [`PricingError::Resource`] if device memory is exhausted
    /// - [`PricingError::Device`] for any other backend failure
    pub fn price(
        &self,
        spec: &OptionSpec,
        config: &SimulationConfig,
    ) -> Result<OptionResult, PricingError> {
        spec.validate()?;
        config.validate()?;

        match config.precision() {
            Precision::Single => self.price_with::<f32>(spec, config),
            Precision::Double => self.price_with::<f64>(spec, config),
        }
    }

    /// Runs stream initialisation and path generation only and copies the
    /// path matrix back to the host.
    ///
    /// The configured precision is ignored; the matrix is simulated at `T`.
    pub fn simulate_paths<T: Real>(
        &self,
        spec: &OptionSpec,
        config: &SimulationConfig,
    ) -> Result<PathMatrix<T>, PricingError> {
        spec.validate()?;
        config.validate()?;

        let shape = self.prepare(T::PRECISION, config)?;
        let num_paths = config.num_paths();
        let num_timesteps = spec.num_timesteps();
        let params = DeviceOptionParams::<T>::from_spec(spec);

        let mut paths = DeviceBuffer::<T, B>::allocate(
            &self.backend,
            "path_matrix",
            num_paths.saturating_mul(num_timesteps),
        )?;
        let mut streams = StreamPool::init(&self.backend, &shape, config.seed())?;
        generate_paths(&self.backend, &shape, &mut streams, &params, num_paths, &mut paths)?;

        Ok(PathMatrix::from_column_major(
            paths.download()?,
            num_paths,
            num_timesteps,
        ))
    }

    fn prepare(
        &self,
        precision: Precision,
        config: &SimulationConfig,
    ) -> Result<LaunchShape, PricingError> {
        let device = self.backend.device_info()?;
        if !self.backend.supports_precision(precision)? {
            return Err(PricingError::UnsupportedPrecision(precision));
        }

        let shape = select_launch_shape(config, &device)?;
        verify_kernel_limits(&self.backend, &shape, precision)?;
        Ok(shape)
    }

    fn price_with<T: Real>(
        &self,
        spec: &OptionSpec,
        config: &SimulationConfig,
    ) -> Result<OptionResult, PricingError> {
        let start = Instant::now();
        let shape = self.prepare(T::PRECISION, config)?;
        let num_paths = config.num_paths();
        let num_timesteps = spec.num_timesteps();

        info!(
            num_paths,
            num_timesteps,
            precision = %T::PRECISION,
            group_size = shape.group_size(),
            group_count = shape.group_count(),
            "Starting parallel pricing run"
        );

        let mut params = DeviceBuffer::<DeviceOptionParams<T>, B>::allocate(&self.backend, "option_params", 1)?;
        let mut paths = DeviceBuffer::<T, B>::allocate(
            &self.backend,
            "path_matrix",
            num_paths.saturating_mul(num_timesteps),
        )?;
        let mut partials = Vec::with_capacity(ValuationPass::ALL.len());
        for pass in ValuationPass::ALL {
            let buffer = DeviceBuffer::<T, B>::allocate(
                &self.backend,
                pass.buffer_label(),
                pass.partials_per_group() * shape.group_count(),
            )?;
            partials.push((pass, buffer));
        }

        params.upload(&[DeviceOptionParams::from_spec(spec)])?;
        let device_params = params.device_slice()[0];

        let mut streams = StreamPool::init(&self.backend, &shape, config.seed())?;

        let pass_start = Instant::now();
        generate_paths(
            &self.backend,
            &shape,
            &mut streams,
            &device_params,
            num_paths,
            &mut paths,
        )?;
        debug!(
            elapsed_us = pass_start.elapsed().as_micros() as u64,
            "Generated path matrix"
        );

        let mut result = OptionResult::new(num_paths, num_timesteps, T::PRECISION);
        let discount = device_params.discount();
        let group_count = shape.group_count();

        for (pass, buffer) in partials.iter_mut() {
            let pass_start = Instant::now();
            run_valuation_pass(
                &self.backend,
                &shape,
                *pass,
                &device_params,
                &paths,
                num_paths,
                buffer,
            )?;

            let host = buffer.download()?;
            for (component, kind) in pass.payoffs().iter().enumerate() {
                let slice = &host[component * group_count..(component + 1) * group_count];
                result.record(*kind, finish_value(slice, num_paths, discount));
            }
            debug!(
                kernel = pass.kernel().name(),
                elapsed_us = pass_start.elapsed().as_micros() as u64,
                "Valuation pass finished"
            );
        }

        result.set_launch_shape(shape.group_size(), shape.group_count());
        result.set_elapsed_parallel(start.elapsed());

        info!(
            plain_vanilla = result.plain_vanilla(),
            asian = result.asian(),
            elapsed_ms = result.elapsed_parallel().as_millis() as u64,
            "Parallel pricing run finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{CpuBackend, KernelKind, KernelLimits};
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
            .option_type(OptionType::Call)
            .build()
            .unwrap()
    }

    fn config(num_paths: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .num_paths(num_paths)
            .group_size(64)
            .seed(1234)
            .build()
            .unwrap()
    }

    #[test]
    fn test_price_records_every_valuation() {
        let engine = PricingEngine::new(CpuBackend::builder().compute_units(2).build().unwrap());
        let result = engine.price(&spec(), &config(2_000)).unwrap();

        assert!(result.plain_vanilla() > 0.0);
        assert!(result.asian() > 0.0);
        assert!(result.lookback() > 0.0);
        assert!(result.knockout() > 0.0);
        assert!(result.knockin() > 0.0);
        assert_eq!(result.plain_vanilla_reference(), 0.0);
        assert_eq!(result.group_size(), 64);
        assert_eq!(result.num_timesteps(), 87);
        assert_eq!(engine.backend().live_allocations(), 0);
    }

    #[test]
    fn test_unsupported_precision() {
        let backend = CpuBackend::builder()
            .compute_units(1)
            .supports_double(false)
            .build()
            .unwrap();
        let engine = PricingEngine::new(backend);

        let err = engine.price(&spec(), &config(100)).unwrap_err();
        assert_eq!(err, PricingError::UnsupportedPrecision(Precision::Double));

        let single = config(100).with_precision(Precision::Single);
        assert!(engine.price(&spec(), &single).is_ok());
    }

    #[test]
    fn test_configuration_error_names_kernel() {
        let backend = CpuBackend::builder()
            .compute_units(1)
            .kernel_limits(
                KernelKind::Asian,
                KernelLimits {
                    max_group_size: 32,
                    local_memory_bytes: 48 * 1024,
                },
            )
            .build()
            .unwrap();
        let engine = PricingEngine::new(backend);

        match engine.price(&spec(), &config(100)) {
            Err(PricingError::Configuration { kernel, .. }) => assert_eq!(kernel, "price_asian"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(engine.backend().live_allocations(), 0);
    }

    #[test]
    fn test_out_of_memory_releases_everything() {
        let backend = CpuBackend::builder()
            .compute_units(1)
            .global_memory_bytes(64 * 1024)
            .build()
            .unwrap();
        let engine = PricingEngine::new(backend);

        let err = engine.price(&spec(), &config(10_000)).unwrap_err();
        assert!(matches!(err, PricingError::Resource(_)));
        assert_eq!(engine.backend().live_allocations(), 0);
        assert_eq!(engine.backend().allocated_bytes(), 0);
    }

    #[test]
    fn test_simulate_paths_shape() {
        let engine = PricingEngine::new(CpuBackend::builder().compute_units(2).build().unwrap());
        let paths = engine.simulate_paths::<f32>(&spec(), &config(300)).unwrap();

        assert_eq!(paths.num_paths(), 300);
        assert_eq!(paths.num_timesteps(), 87);
        assert_eq!(paths.as_slice().len(), 300 * 87);
        assert!(paths.as_slice().iter().all(|&s| s > 0.0 && s.is_finite()));
    }
}
