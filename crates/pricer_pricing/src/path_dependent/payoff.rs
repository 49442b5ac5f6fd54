//! Payoff functions and observation flags.
//!
//! Every [`PayoffKind`] maps to a pure function of a [`PathSummary`], so
//! payoffs can be tested without running a simulation.

use num_traits::Float;
use pricer_core::types::PayoffKind;

/// Observation type flags for path-dependent payoffs.
///
/// Specifies which path statistics a valuation pass needs. The terminal
/// price is always tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObservationType {
    /// Whether the arithmetic average is needed (Asian options)
    pub needs_average: bool,
    /// Whether the path maximum is needed (up barriers)
    pub needs_max: bool,
    /// Whether the path minimum is needed (lookbacks)
    pub needs_min: bool,
}

impl ObservationType {
    /// Only the terminal price.
    #[inline]
    pub fn terminal_only() -> Self {
        Self::default()
    }

    /// Arithmetic Asian options.
    #[inline]
    pub fn arithmetic_asian() -> Self {
        Self {
            needs_average: true,
            ..Default::default()
        }
    }

    /// Up barrier options.
    #[inline]
    pub fn barrier() -> Self {
        Self {
            needs_max: true,
            ..Default::default()
        }
    }

    /// Floating lookback options.
    #[inline]
    pub fn lookback() -> Self {
        Self {
            needs_min: true,
            ..Default::default()
        }
    }

    /// Every statistic.
    #[inline]
    pub fn all() -> Self {
        Self {
            needs_average: true,
            needs_max: true,
            needs_min: true,
        }
    }

    /// Statistics needed to value `kind`.
    pub fn for_payoff(kind: PayoffKind) -> Self {
        match kind {
            PayoffKind::PlainVanilla => Self::terminal_only(),
            PayoffKind::Asian => Self::arithmetic_asian(),
            PayoffKind::Lookback => Self::lookback(),
            PayoffKind::Knockout | PayoffKind::Knockin => Self::barrier(),
        }
    }
}

/// Absolute-price statistics of one path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSummary<T> {
    /// Price after the last step.
    pub terminal: T,
    /// Arithmetic mean over all steps.
    pub average: T,
    /// Lowest price over all steps.
    pub minimum: T,
    /// Whether any price exceeded the barrier.
    pub breached: bool,
}

/// Payoff of one path.
///
/// `sign` is `+1` for a call and `−1` for a put. The lookback is always the
/// call-style floating lookback `terminal − minimum` and ignores `sign`.
/// Knock-out and knock-in pay nothing when their barrier condition fails.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PayoffKind;
/// use pricer_pricing::path_dependent::{payoff, PathSummary};
///
/// let summary = PathSummary { terminal: 42.0, average: 39.0, minimum: 37.0, breached: true };
///
/// assert_eq!(payoff(PayoffKind::PlainVanilla, &summary, 35.0, 1.0), 7.0);
/// assert_eq!(payoff(PayoffKind::Asian, &summary, 35.0, 1.0), 4.0);
/// assert_eq!(payoff(PayoffKind::Lookback, &summary, 35.0, -1.0), 5.0);
/// assert_eq!(payoff(PayoffKind::Knockout, &summary, 35.0, 1.0), 0.0);
/// assert_eq!(payoff(PayoffKind::Knockin, &summary, 35.0, 1.0), 7.0);
/// ```
#[inline]
pub fn payoff<T: Float>(kind: PayoffKind, summary: &PathSummary<T>, strike: T, sign: T) -> T {
    match kind {
        PayoffKind::PlainVanilla => intrinsic(summary.terminal, strike, sign),
        PayoffKind::Asian => intrinsic(summary.average, strike, sign),
        PayoffKind::Lookback => (summary.terminal - summary.minimum).max(T::zero()),
        PayoffKind::Knockout => {
            if summary.breached {
                T::zero()
            } else {
                intrinsic(summary.terminal, strike, sign)
            }
        }
        PayoffKind::Knockin => {
            if summary.breached {
                intrinsic(summary.terminal, strike, sign)
            } else {
                T::zero()
            }
        }
    }
}

/// `max(0, sign · (underlying − strike))`.
#[inline]
pub fn intrinsic<T: Float>(underlying: T, strike: T, sign: T) -> T {
    (sign * (underlying - strike)).max(T::zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(terminal: f64, breached: bool) -> PathSummary<f64> {
        PathSummary {
            terminal,
            average: 36.0,
            minimum: 30.0,
            breached,
        }
    }

    #[test]
    fn test_put_payoffs() {
        let s = summary(32.0, false);
        assert_eq!(payoff(PayoffKind::PlainVanilla, &s, 35.0, -1.0), 3.0);
        assert_eq!(payoff(PayoffKind::Asian, &s, 35.0, -1.0), 0.0);
        assert_eq!(payoff(PayoffKind::Knockout, &s, 35.0, -1.0), 3.0);
        assert_eq!(payoff(PayoffKind::Knockin, &s, 35.0, -1.0), 0.0);
    }

    #[test]
    fn test_lookback_ignores_option_type() {
        let s = summary(40.0, false);
        let call = payoff(PayoffKind::Lookback, &s, 35.0, 1.0);
        let put = payoff(PayoffKind::Lookback, &s, 35.0, -1.0);
        assert_eq!(call, 10.0);
        assert_eq!(put, call);
    }

    #[test]
    fn test_knock_payoffs_partition_vanilla() {
        for terminal in [20.0, 35.0, 41.5, 60.0] {
            for breached in [false, true] {
                for sign in [1.0, -1.0] {
                    let s = summary(terminal, breached);
                    let vanilla = payoff(PayoffKind::PlainVanilla, &s, 35.0, sign);
                    let ko = payoff(PayoffKind::Knockout, &s, 35.0, sign);
                    let ki = payoff(PayoffKind::Knockin, &s, 35.0, sign);
                    assert_eq!(ko + ki, vanilla);
                    assert!(ko == 0.0 || ki == 0.0);
                }
            }
        }
    }

    #[test]
    fn test_lookback_dominates_call_above_floor() {
        let s = summary(45.0, false);
        let lookback = payoff(PayoffKind::Lookback, &s, 0.0, 1.0);
        for strike in [30.0, 33.0, 40.0, 50.0] {
            assert!(lookback >= intrinsic(s.terminal, strike, 1.0));
        }
    }

    #[test]
    fn test_observation_for_payoff() {
        assert!(ObservationType::for_payoff(PayoffKind::Asian).needs_average);
        assert!(ObservationType::for_payoff(PayoffKind::Knockin).needs_max);
        assert!(ObservationType::for_payoff(PayoffKind::Lookback).needs_min);
        assert_eq!(
            ObservationType::for_payoff(PayoffKind::PlainVanilla),
            ObservationType::terminal_only()
        );
    }
}
