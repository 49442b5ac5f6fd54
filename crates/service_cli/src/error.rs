//! CLI error types

use pricer_core::types::{PayoffKind, SpecError};
use pricer_pricing::mc::ConfigError;
use pricer_pricing::PricingError;
use thiserror::Error;

/// Errors surfaced by `mcpricer` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings file or environment could not be loaded.
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Contract parameters were rejected.
    #[error("Invalid option contract: {0}")]
    Spec(#[from] SpecError),

    /// Simulation parameters were rejected.
    #[error("Invalid simulation settings: {0}")]
    Simulation(#[from] ConfigError),

    /// The pricing run failed.
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),

    /// Command-line argument outside its accepted values.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A valuation missed its golden value.
    #[error("Golden check failed for {kind} ({precision}): {actual:.6} differs from {expected:.6} by more than {tolerance}")]
    GoldenMismatch {
        /// Checked valuation.
        kind: PayoffKind,
        /// Precision of the failing run.
        precision: String,
        /// Value produced by the run.
        actual: f64,
        /// Golden value.
        expected: f64,
        /// Accepted absolute deviation.
        tolerance: f64,
    },

    /// JSON rendering failed.
    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
