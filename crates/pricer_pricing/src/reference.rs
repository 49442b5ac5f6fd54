//! Single-threaded reference pricer.
//!
//! Prices the plain vanilla payoff with an independent Box–Muller generator
//! in double precision. It cross-checks the parallel engine and provides
//! the serial timing baseline.

use std::time::{Duration, Instant};

use pricer_core::types::{OptionResult, OptionSpec};
use tracing::{debug, info};

use crate::path_dependent::intrinsic;
use crate::rng::BoxMuller;

/// Default seed of the reference generator.
pub const DEFAULT_REFERENCE_SEED: u64 = 0x5eed_cafe;

/// Serial Monte Carlo pricer for the plain vanilla payoff.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionSpec;
/// use pricer_pricing::ReferencePricer;
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
///
/// let mut pricer = ReferencePricer::new(42);
/// let value = pricer.price_serial(&spec, 2_000);
/// assert!(value > 4.0 && value < 7.0);
/// ```
#[derive(Clone, Debug)]
pub struct ReferencePricer {
    normals: BoxMuller,
}

impl ReferencePricer {
    /// Creates a pricer whose generator is seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            normals: BoxMuller::from_seed(seed),
        }
    }

    /// Prices the plain vanilla payoff of `spec` over `num_paths` paths.
    ///
    /// Returns `0` when `num_paths` is zero.
    pub fn price_serial(&mut self, spec: &OptionSpec, num_paths: usize) -> f64 {
        if num_paths == 0 {
            return 0.0;
        }

        let dt = spec.time_step();
        let vol = spec.volatility();
        let drift = (spec.risk_free_rate() - 0.5 * vol * vol) * dt;
        let diffusion = vol * dt.sqrt();
        let num_timesteps = spec.num_timesteps();
        let sign = spec.option_type().sign();

        let mut total = 0.0;
        for _ in 0..num_paths {
            let mut s = 1.0;
            for _ in 0..num_timesteps {
                s *= (drift + diffusion * self.normals.next_normal()).exp();
            }
            total += intrinsic(spec.spot() * s, spec.strike(), sign);
        }

        total / num_paths as f64 * spec.discount_factor()
    }

    /// Prices `spec` and reports the elapsed wall-clock time.
    pub fn price_timed(&mut self, spec: &OptionSpec, num_paths: usize) -> (f64, Duration) {
        let start = Instant::now();
        let value = self.price_serial(spec, num_paths);
        let elapsed = start.elapsed();
        debug!(num_paths, elapsed_ms = elapsed.as_millis() as u64, "Reference pricing finished");
        (value, elapsed)
    }

    /// Prices `spec` with the result's path count and records the value and time in `result`.
    pub fn price_into(&mut self, spec: &OptionSpec, result: &mut OptionResult) {
        info!(num_paths = result.num_paths(), "Running serial reference pricer");
        let (value, elapsed) = self.price_timed(spec, result.num_paths());
        result.record_reference(value, elapsed);
    }
}

impl Default for ReferencePricer {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_SEED)
    }
}
