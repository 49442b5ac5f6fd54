//! Error types for contract validation.

use thiserror::Error;

/// Errors raised while building an [`OptionSpec`](super::OptionSpec).
///
/// # Examples
/// ```
/// use pricer_core::types::SpecError;
///
/// let err = SpecError::MissingParameter("spot");
/// assert_eq!(format!("{}", err), "Missing parameter 'spot'");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// A required parameter was never set on the builder.
    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),

    /// A parameter holds a value outside its valid domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },

    /// The tenor is shorter than one time step, leaving nothing to simulate.
    #[error("Tenor {tenor} is shorter than the time step {time_step}: no time steps to simulate")]
    NoTimesteps {
        /// Contract tenor in years.
        tenor: f64,
        /// Simulation time step in years.
        time_step: f64,
    },
}
