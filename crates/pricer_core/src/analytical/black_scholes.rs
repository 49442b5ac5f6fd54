//! Black-Scholes price of a European option.
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use super::distributions::norm_cdf;
use crate::types::{OptionSpec, OptionType};

/// Black-Scholes price of a European call or put.
///
/// Degenerate inputs (zero volatility or zero tenor) collapse to the
/// discounted intrinsic value of the forward.
pub fn black_scholes_price(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    tenor: f64,
    option_type: OptionType,
) -> f64 {
    let discount = (-rate * tenor).exp();
    let vol_sqrt_t = volatility * tenor.sqrt();

    if vol_sqrt_t <= 1e-12 {
        let forward_intrinsic = option_type.sign() * (spot - strike * discount);
        return forward_intrinsic.max(0.0);
    }

    let d1 = ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * tenor) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * discount * norm_cdf(d2),
        OptionType::Put => strike * discount * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

/// Black-Scholes price of the European payoff embedded in `spec`, ignoring the barrier.
pub fn black_scholes_spec_price(spec: &OptionSpec) -> f64 {
    black_scholes_price(
        spec.spot(),
        spec.strike(),
        spec.risk_free_rate(),
        spec.volatility(),
        spec.tenor(),
        spec.option_type(),
    )
}
