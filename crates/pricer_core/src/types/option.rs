//! Option contract description.
//!
//! [`OptionSpec`] is the immutable input to every pricing run. The number of
//! simulated time steps is derived from `tenor / time_step` and never stored.

use std::fmt;

use super::SpecError;

/// Call or put direction of the contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Pays `max(0, S - K)`.
    #[default]
    Call,
    /// Pays `max(0, K - S)`.
    Put,
}

impl OptionType {
    /// Sign applied to `S - K` in the intrinsic value: `+1` for calls, `-1` for puts.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.pad("Call"),
            OptionType::Put => f.pad("Put"),
        }
    }
}

/// Immutable description of a path-dependent option contract.
///
/// Use [`OptionSpec::builder`] to construct validated instances.
///
/// # Invariants
///
/// - `spot > 0`, `tenor > 0`, `time_step > 0`, `volatility >= 0`
/// - `num_timesteps() >= 1`
/// - every field is finite except `barrier`, which may be `+inf`
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{OptionSpec, OptionType};
///
/// let spec = OptionSpec::builder()
///     .spot(100.0)
///     .strike(100.0)
///     .risk_free_rate(0.05)
///     .volatility(0.2)
///     .tenor(1.0)
///     .time_step(1.0 / 252.0)
///     .option_type(OptionType::Put)
///     .build()
///     .expect("valid contract");
///
/// assert_eq!(spec.num_timesteps(), 252);
/// assert!(spec.barrier().is_infinite());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptionSpec {
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    volatility: f64,
    tenor: f64,
    time_step: f64,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_barrier"))]
    barrier: f64,
    option_type: OptionType,
}

/// Writes an unreachable barrier as the string `"inf"`, which JSON cannot hold as a number.
#[cfg(feature = "serde")]
fn serialize_barrier<S: serde::Serializer>(barrier: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if barrier.is_infinite() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_f64(*barrier)
    }
}

impl OptionSpec {
    /// Creates a new contract builder.
    #[inline]
    pub fn builder() -> OptionSpecBuilder {
        OptionSpecBuilder::default()
    }

    /// Returns the spot price of the underlying.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the annualised, continuously compounded risk-free rate.
    #[inline]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Returns the annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the time to expiry in years.
    #[inline]
    pub fn tenor(&self) -> f64 {
        self.tenor
    }

    /// Returns the simulation time step in years.
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Returns the up-and-out / up-and-in barrier level.
    #[inline]
    pub fn barrier(&self) -> f64 {
        self.barrier
    }

    /// Returns the call/put direction.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Number of simulated time steps, `floor(tenor / time_step)`.
    #[inline]
    pub fn num_timesteps(&self) -> usize {
        (self.tenor / self.time_step).floor() as usize
    }

    /// Risk-neutral discount factor `exp(-r * tenor)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.tenor).exp()
    }

    /// Validates the contract invariants.
    ///
    /// # Errors
    ///
    /// Returns `SpecError` if any field lies outside its valid domain or the
    /// tenor is shorter than one time step.
    pub fn validate(&self) -> Result<(), SpecError> {
        require_finite("spot", self.spot)?;
        require_finite("strike", self.strike)?;
        require_finite("risk_free_rate", self.risk_free_rate)?;
        require_finite("volatility", self.volatility)?;
        require_finite("tenor", self.tenor)?;
        require_finite("time_step", self.time_step)?;

        if self.spot <= 0.0 {
            return Err(invalid("spot", format!("must be positive, got {}", self.spot)));
        }
        if self.strike < 0.0 {
            return Err(invalid(
                "strike",
                format!("must be non-negative, got {}", self.strike),
            ));
        }
        if self.volatility < 0.0 {
            return Err(invalid(
                "volatility",
                format!("must be non-negative, got {}", self.volatility),
            ));
        }
        if self.tenor <= 0.0 {
            return Err(invalid("tenor", format!("must be positive, got {}", self.tenor)));
        }
        if self.time_step <= 0.0 {
            return Err(invalid(
                "time_step",
                format!("must be positive, got {}", self.time_step),
            ));
        }
        if self.barrier.is_nan() || self.barrier == f64::NEG_INFINITY {
            return Err(invalid(
                "barrier",
                format!("must be a number or +inf, got {}", self.barrier),
            ));
        }
        if self.num_timesteps() == 0 {
            return Err(SpecError::NoTimesteps {
                tenor: self.tenor,
                time_step: self.time_step,
            });
        }
        Ok(())
    }
}

#[inline]
fn invalid(name: &'static str, reason: String) -> SpecError {
    SpecError::InvalidParameter { name, reason }
}

#[inline]
fn require_finite(name: &'static str, value: f64) -> Result<(), SpecError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, format!("must be finite, got {}", value)))
    }
}

/// Builder for [`OptionSpec`].
///
/// `barrier` defaults to `+inf` (never knocked) and `option_type` to
/// [`OptionType::Call`]; every other field is required.
#[derive(Clone, Debug, Default)]
pub struct OptionSpecBuilder {
    spot: Option<f64>,
    strike: Option<f64>,
    risk_free_rate: Option<f64>,
    volatility: Option<f64>,
    tenor: Option<f64>,
    time_step: Option<f64>,
    barrier: Option<f64>,
    option_type: OptionType,
}

impl OptionSpecBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the strike price.
    #[inline]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the risk-free rate.
    #[inline]
    pub fn risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Sets the volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the tenor in years.
    #[inline]
    pub fn tenor(mut self, tenor: f64) -> Self {
        self.tenor = Some(tenor);
        self
    }

    /// Sets the simulation time step in years.
    #[inline]
    pub fn time_step(mut self, time_step: f64) -> Self {
        self.time_step = Some(time_step);
        self
    }

    /// Sets the barrier level.
    #[inline]
    pub fn barrier(mut self, barrier: f64) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Sets the call/put direction.
    #[inline]
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Builds and validates the contract.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::MissingParameter` for unset required fields and
    /// the errors of [`OptionSpec::validate`] otherwise.
    pub fn build(self) -> Result<OptionSpec, SpecError> {
        let spec = OptionSpec {
            spot: self.spot.ok_or(SpecError::MissingParameter("spot"))?,
            strike: self.strike.ok_or(SpecError::MissingParameter("strike"))?,
            risk_free_rate: self
                .risk_free_rate
                .ok_or(SpecError::MissingParameter("risk_free_rate"))?,
            volatility: self
                .volatility
                .ok_or(SpecError::MissingParameter("volatility"))?,
            tenor: self.tenor.ok_or(SpecError::MissingParameter("tenor"))?,
            time_step: self
                .time_step
                .ok_or(SpecError::MissingParameter("time_step"))?,
            barrier: self.barrier.unwrap_or(f64::INFINITY),
            option_type: self.option_type,
        };

        spec.validate()?;
        Ok(spec)
    }
}
