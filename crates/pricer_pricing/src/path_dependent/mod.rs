//! Path-dependent payoff valuation.
//!
//! # Key Components
//!
//! - [`PathObserver`]: streaming statistics over one path
//! - [`ObservationType`]: flags selecting which statistics a pass needs
//! - [`payoff`]: pure payoff function per [`PayoffKind`](pricer_core::types::PayoffKind)
//! - [`ValuationPass`]: the four device passes (vanilla, Asian, lookback, barrier)
//!
//! The barrier pass values knock-out and knock-in together, reducing a
//! [`PayoffPair`] so that both valuations see the same breach test for every
//! path.

mod evaluator;
mod observer;
mod payoff;

pub use evaluator::{finish_value, PayoffPair, ValuationPass};
pub(crate) use evaluator::run_valuation_pass;
pub use observer::PathObserver;
pub use payoff::{intrinsic, payoff, ObservationType, PathSummary};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::PayoffKind;

    fn observe(prices: &[f64], observation: ObservationType) -> PathObserver<f64> {
        let mut observer = PathObserver::new(observation);
        for &price in prices {
            observer.observe(price);
        }
        observer
    }

    #[test]
    fn test_asian_call_from_observed_path() {
        let observer = observe(&[1.0, 1.1, 1.2, 1.3], ObservationType::arithmetic_asian());
        let summary = observer.summarise(40.0, f64::INFINITY);

        // Average 46, strike 35.
        assert_relative_eq!(
            payoff(PayoffKind::Asian, &summary, 35.0, 1.0),
            11.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_up_and_out_knocked_by_intermediate_peak() {
        let observer = observe(&[1.0, 1.2, 1.05], ObservationType::barrier());
        let summary = observer.summarise(40.0, 45.0);

        assert!(summary.breached);
        assert_eq!(payoff(PayoffKind::Knockout, &summary, 35.0, 1.0), 0.0);
        assert_relative_eq!(
            payoff(PayoffKind::Knockin, &summary, 35.0, 1.0),
            7.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lookback_uses_path_minimum() {
        let observer = observe(&[0.9, 0.8, 1.1], ObservationType::lookback());
        let summary = observer.summarise(40.0, f64::INFINITY);

        assert_relative_eq!(
            payoff(PayoffKind::Lookback, &summary, 35.0, 1.0),
            12.0,
            epsilon = 1e-12
        );
    }
}
