//! Simulation configuration.

use pricer_core::types::Precision;

use super::error::ConfigError;

/// Default number of lanes per group.
pub const DEFAULT_GROUP_SIZE: usize = 256;

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying how a run is executed.
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::Precision;
/// use pricer_pricing::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .num_paths(100_000)
///     .seed(1234)
///     .precision(Precision::Single)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.num_paths(), 100_000);
/// assert_eq!(config.group_size(), 256);
/// assert_eq!(config.group_count(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    num_paths: usize,
    group_size: usize,
    group_count: Option<usize>,
    seed: u64,
    precision: Precision,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of simulated paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Lanes per group.
    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Explicit group count, if the heuristic is overridden.
    #[inline]
    pub fn group_count(&self) -> Option<usize> {
        self.group_count
    }

    /// Seed of the lane streams.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Scalar precision of every device pass.
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `num_paths` is 0
    /// - `group_size` is not a non-zero power of two
    /// - an explicit `group_count` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_paths == 0 {
            return Err(ConfigError::InvalidPathCount(self.num_paths));
        }
        if !self.group_size.is_power_of_two() {
            return Err(ConfigError::InvalidGroupSize(self.group_size));
        }
        if let Some(0) = self.group_count {
            return Err(ConfigError::InvalidGroupCount(0));
        }
        Ok(())
    }

    /// Returns a copy running at `precision`.
    pub fn with_precision(&self, precision: Precision) -> Self {
        Self {
            precision,
            ..self.clone()
        }
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    num_paths: Option<usize>,
    group_size: usize,
    group_count: Option<usize>,
    seed: u64,
    precision: Precision,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            num_paths: None,
            group_size: DEFAULT_GROUP_SIZE,
            group_count: None,
            seed: 0,
            precision: Precision::default(),
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the number of simulated paths.
    ///
    /// # Arguments
    ///
    /// * `num_paths` - Number of paths, at least 1
    #[inline]
    pub fn num_paths(mut self, num_paths: usize) -> Self {
        self.num_paths = Some(num_paths);
        self
    }

    /// Sets the number of lanes per group (power of two, default 256).
    #[inline]
    pub fn group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    /// Overrides the group-count heuristic.
    #[inline]
    pub fn group_count(mut self, group_count: usize) -> Self {
        self.group_count = Some(group_count);
        self
    }

    /// Sets the lane stream seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the scalar precision.
    #[inline]
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the path count is missing or any setting is invalid.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let config = SimulationConfig {
            num_paths: self.num_paths.ok_or(ConfigError::InvalidPathCount(0))?,
            group_size: self.group_size,
            group_count: self.group_count,
            seed: self.seed,
            precision: self.precision,
        };
        config.validate()?;
        Ok(config)
    }
}
