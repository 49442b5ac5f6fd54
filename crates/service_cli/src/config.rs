//! CLI settings
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `MCPRICER_`-prefixed environment variables using `__` between nested keys
//! (e.g. `MCPRICER_SIMULATION__NUM_PATHS=50000`). Command-line flags are
//! applied last by the commands themselves.

use config::{Config, Environment, File, FileFormat, Source};
use pricer_core::types::{Expectation, OptionSpec, OptionType, PayoffKind, Precision};
use pricer_pricing::device::CpuBackend;
use pricer_pricing::mc::{SimulationConfig, DEFAULT_GROUP_SIZE};
use pricer_pricing::reference::DEFAULT_REFERENCE_SEED;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Prefix of settings environment variables.
pub const ENV_PREFIX: &str = "MCPRICER";

/// Contract parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSettings {
    pub spot: f64,
    pub strike: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
    pub tenor: f64,
    pub time_step: f64,
    /// Up-and-out / up-and-in level; `inf` disables the barrier.
    pub barrier: f64,
    pub option_type: OptionType,
}

impl Default for OptionSettings {
    fn default() -> Self {
        Self {
            spot: 40.0,
            strike: 35.0,
            risk_free_rate: 0.03,
            volatility: 0.2,
            tenor: 1.0 / 3.0,
            time_step: 1.0 / 261.0,
            barrier: 45.0,
            option_type: OptionType::Call,
        }
    }
}

impl OptionSettings {
    /// Builds and validates the contract.
    pub fn to_spec(&self) -> Result<OptionSpec> {
        let spec = OptionSpec::builder()
            .spot(self.spot)
            .strike(self.strike)
            .risk_free_rate(self.risk_free_rate)
            .volatility(self.volatility)
            .tenor(self.tenor)
            .time_step(self.time_step)
            .barrier(self.barrier)
            .option_type(self.option_type)
            .build()?;
        Ok(spec)
    }
}

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub num_paths: usize,
    pub group_size: usize,
    /// Explicit group count; chosen from the device when absent.
    pub group_count: Option<usize>,
    pub seed: u64,
    pub precision: Precision,
    /// Seed of the serial reference generator.
    pub reference_seed: u64,
    /// Worker threads of the CPU backend; all logical cores when absent.
    pub compute_units: Option<usize>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            num_paths: 100_000,
            group_size: DEFAULT_GROUP_SIZE,
            group_count: None,
            seed: 1234,
            precision: Precision::Double,
            reference_seed: DEFAULT_REFERENCE_SEED,
            compute_units: None,
        }
    }
}

impl SimulationSettings {
    /// Builds the engine configuration for one run at `precision`.
    pub fn to_config(&self, precision: Precision) -> Result<SimulationConfig> {
        let mut builder = SimulationConfig::builder()
            .num_paths(self.num_paths)
            .group_size(self.group_size)
            .seed(self.seed)
            .precision(precision);
        if let Some(group_count) = self.group_count {
            builder = builder.group_count(group_count);
        }
        Ok(builder.build()?)
    }

    /// Creates the compute backend.
    pub fn backend(&self) -> Result<CpuBackend> {
        let mut builder = CpuBackend::builder();
        if let Some(units) = self.compute_units {
            builder = builder.compute_units(units);
        }
        Ok(builder.build().map_err(pricer_pricing::PricingError::from)?)
    }
}

/// Golden value the Asian valuation is checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenSettings {
    pub enabled: bool,
    pub asian: f64,
    pub tolerance: f64,
}

impl Default for GoldenSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            asian: 5.162534,
            tolerance: 0.1,
        }
    }
}

impl GoldenSettings {
    /// Expectation to attach to each result, if the check is enabled.
    pub fn expectation(&self) -> Option<Expectation> {
        self.enabled.then_some(Expectation {
            kind: PayoffKind::Asian,
            value: self.asian,
            tolerance: self.tolerance,
        })
    }
}

/// Complete `mcpricer` settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricerSettings {
    pub option: OptionSettings,
    pub simulation: SimulationSettings,
    pub golden: GoldenSettings,
}

impl PricerSettings {
    /// Loads settings from `path` (if it exists) and the environment.
    pub fn load(path: &str) -> Result<Self> {
        Self::from_source(File::new(path, FileFormat::Toml).required(false))
    }

    fn from_source<S>(file: S) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn from_toml(text: &str) -> PricerSettings {
        PricerSettings::from_source(File::from_str(text, FileFormat::Toml)).unwrap()
    }

    #[test]
    fn test_defaults_reproduce_reference_contract() {
        let settings = PricerSettings::default();
        let spec = settings.option.to_spec().unwrap();

        assert_eq!(spec.num_timesteps(), 87);
        assert_eq!(spec.barrier(), 45.0);
        assert_eq!(settings.simulation.num_paths, 100_000);
        assert_eq!(settings.simulation.seed, 1234);
        assert_eq!(settings.simulation.precision, Precision::Double);

        let expectation = settings.golden.expectation().unwrap();
        assert_eq!(expectation.kind, PayoffKind::Asian);
        assert_relative_eq!(expectation.value, 5.162534);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let settings = PricerSettings::load("/nonexistent/mcpricer-settings").unwrap();
        assert_eq!(settings.option, OptionSettings::default());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let settings = from_toml(
            r#"
            [option]
            strike = 40.0
            barrier = inf
            option_type = "put"

            [simulation]
            num_paths = 5000
            precision = "single"

            [golden]
            enabled = false
            "#,
        );

        assert_eq!(settings.option.strike, 40.0);
        assert_eq!(settings.option.spot, 40.0);
        assert!(settings.option.to_spec().unwrap().barrier().is_infinite());
        assert_eq!(settings.option.option_type, OptionType::Put);
        assert_eq!(settings.simulation.num_paths, 5000);
        assert_eq!(settings.simulation.group_size, DEFAULT_GROUP_SIZE);
        assert_eq!(settings.simulation.precision, Precision::Single);
        assert!(settings.golden.expectation().is_none());
    }

    #[test]
    fn test_simulation_config_carries_overrides() {
        let simulation = SimulationSettings {
            group_count: Some(8),
            ..SimulationSettings::default()
        };
        let config = simulation.to_config(Precision::Single).unwrap();

        assert_eq!(config.group_count(), Some(8));
        assert_eq!(config.precision(), Precision::Single);
        assert_eq!(config.seed(), 1234);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let option = OptionSettings {
            volatility: -0.1,
            ..OptionSettings::default()
        };
        assert!(option.to_spec().is_err());

        let simulation = SimulationSettings {
            group_size: 100,
            ..SimulationSettings::default()
        };
        assert!(simulation.to_config(Precision::Double).is_err());
    }
}
