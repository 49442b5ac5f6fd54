//! Price command implementation
//!
//! Prices the configured contract on the parallel engine, cross-checks the
//! plain vanilla value with the serial reference pricer and reports the
//! golden-value comparison.

use pricer_core::types::{OptionResult, Precision};
use pricer_pricing::{PricingEngine, ReferencePricer};
use tracing::{info, warn};

use crate::config::PricerSettings;
use crate::report::{render_prices, OutputFormat, PriceReport};
use crate::{CliError, Result};

/// Which precisions one invocation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecisionSelection {
    One(Precision),
    Both,
}

impl PrecisionSelection {
    /// Precisions in run order.
    pub fn precisions(&self) -> Vec<Precision> {
        match self {
            PrecisionSelection::One(precision) => vec![*precision],
            PrecisionSelection::Both => vec![Precision::Single, Precision::Double],
        }
    }
}

impl std::str::FromStr for PrecisionSelection {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("both") {
            return Ok(PrecisionSelection::Both);
        }
        s.parse::<Precision>()
            .map(PrecisionSelection::One)
            .map_err(|_| {
                CliError::InvalidArgument(format!(
                    "Unknown precision: {}. Supported: single, double, both",
                    s
                ))
            })
    }
}

/// Command-line overrides applied on top of the loaded settings.
#[derive(Clone, Debug, Default)]
pub struct PriceOverrides {
    pub num_paths: Option<usize>,
    pub seed: Option<u64>,
    pub group_size: Option<usize>,
    pub precision: Option<String>,
}

impl PriceOverrides {
    fn apply(&self, settings: &mut PricerSettings) -> Result<PrecisionSelection> {
        let simulation = &mut settings.simulation;
        if let Some(num_paths) = self.num_paths {
            simulation.num_paths = num_paths;
        }
        if let Some(seed) = self.seed {
            simulation.seed = seed;
        }
        if let Some(group_size) = self.group_size {
            simulation.group_size = group_size;
        }
        match &self.precision {
            Some(precision) => precision.parse(),
            None => Ok(PrecisionSelection::One(simulation.precision)),
        }
    }
}

/// Run the price command
pub fn run(mut settings: PricerSettings, overrides: &PriceOverrides, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let selection = overrides.apply(&mut settings)?;
    let spec = settings.option.to_spec()?;

    info!("Starting pricing...");
    info!("  Paths: {}", settings.simulation.num_paths);
    info!("  Seed: {}", settings.simulation.seed);
    info!("  Precision: {:?}", selection);

    let engine = PricingEngine::new(settings.simulation.backend()?);
    let mut results = Vec::new();
    for precision in selection.precisions() {
        let config = settings.simulation.to_config(precision)?;
        let mut result = engine.price(&spec, &config)?;
        if let Some(expectation) = settings.golden.expectation() {
            result = result.with_expectation(expectation);
        }
        ReferencePricer::new(settings.simulation.reference_seed).price_into(&spec, &mut result);
        results.push(result);
    }

    let reports: Vec<_> = results.iter().map(|r| PriceReport::new(&spec, r)).collect();
    print!("{}", render_prices(&reports, format)?);

    for result in &results {
        check_golden(result)?;
    }

    info!("Pricing complete");
    Ok(())
}

fn check_golden(result: &OptionResult) -> Result<()> {
    let Some(expectation) = result.expectation() else {
        return Ok(());
    };
    if result.within_tolerance() == Some(false) {
        let actual = result.value(expectation.kind);
        warn!(
            kind = %expectation.kind,
            actual,
            expected = expectation.value,
            "Golden check failed"
        );
        return Err(CliError::GoldenMismatch {
            kind: expectation.kind,
            precision: result.precision().to_string(),
            actual,
            expected: expectation.value,
            tolerance: expectation.tolerance,
        });
    }
    Ok(())
}
