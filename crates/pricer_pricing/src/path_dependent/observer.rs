//! PathObserver: streaming statistics over one simulated path.
//!
//! Statistics are accumulated incrementally as normalised prices are
//! observed, so a valuation pass never materialises a path on its own.

use num_traits::Float;

use super::{ObservationType, PathSummary};

/// Streaming path observation statistics.
///
/// Only the statistics requested by the [`ObservationType`] are updated;
/// the terminal price is always tracked.
///
/// # Example
///
/// ```
/// use pricer_pricing::path_dependent::{ObservationType, PathObserver};
///
/// let mut observer: PathObserver<f64> = PathObserver::new(ObservationType::all());
///
/// observer.observe(1.00);
/// observer.observe(1.05);
/// observer.observe(0.95);
/// observer.observe(1.10);
///
/// assert_eq!(observer.count(), 4);
/// assert_eq!(observer.maximum(), 1.10);
/// assert_eq!(observer.minimum(), 0.95);
/// assert_eq!(observer.terminal(), 1.10);
/// ```
#[derive(Clone, Debug)]
pub struct PathObserver<T: Float> {
    observation: ObservationType,
    /// Running sum for arithmetic average: Σ S_i
    running_sum: T,
    running_max: T,
    running_min: T,
    count: usize,
    terminal: T,
}

impl<T: Float> PathObserver<T> {
    /// Creates an empty observer tracking the statistics in `observation`.
    #[inline]
    pub fn new(observation: ObservationType) -> Self {
        Self {
            observation,
            running_sum: T::zero(),
            running_max: T::neg_infinity(),
            running_min: T::infinity(),
            count: 0,
            terminal: T::zero(),
        }
    }

    /// Observes the next price of the path.
    #[inline]
    pub fn observe(&mut self, price: T) {
        if self.observation.needs_average {
            self.running_sum = self.running_sum + price;
        }
        if self.observation.needs_max {
            self.running_max = self.running_max.max(price);
        }
        if self.observation.needs_min {
            self.running_min = self.running_min.min(price);
        }
        self.count += 1;
        self.terminal = price;
    }

    /// Arithmetic average of observed prices, `0` before the first observation.
    #[inline]
    pub fn arithmetic_average(&self) -> T {
        match T::from(self.count) {
            Some(n) if self.count > 0 => self.running_sum / n,
            _ => T::zero(),
        }
    }

    /// Maximum observed price, `-inf` if none or not tracked.
    #[inline]
    pub fn maximum(&self) -> T {
        self.running_max
    }

    /// Minimum observed price, `+inf` if none or not tracked.
    #[inline]
    pub fn minimum(&self) -> T {
        self.running_min
    }

    /// Last observed price.
    #[inline]
    pub fn terminal(&self) -> T {
        self.terminal
    }

    /// Number of observations.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Scales the normalised statistics by `spot` and tests them against `barrier`.
    ///
    /// The path is breached if any observed absolute price exceeded `barrier`.
    #[inline]
    pub fn summarise(&self, spot: T, barrier: T) -> PathSummary<T> {
        PathSummary {
            terminal: spot * self.terminal,
            average: spot * self.arithmetic_average(),
            minimum: spot * self.running_min,
            breached: spot * self.running_max > barrier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_observer_tracks_requested_statistics_only() {
        let mut observer: PathObserver<f64> = PathObserver::new(ObservationType::terminal_only());
        observer.observe(1.2);
        observer.observe(0.8);

        assert_eq!(observer.terminal(), 0.8);
        assert_eq!(observer.arithmetic_average(), 0.0);
        assert_eq!(observer.maximum(), f64::NEG_INFINITY);
        assert_eq!(observer.minimum(), f64::INFINITY);
    }

    #[test]
    fn test_arithmetic_average() {
        let mut observer: PathObserver<f64> = PathObserver::new(ObservationType::arithmetic_asian());
        for price in [1.0, 1.05, 1.10, 0.95, 1.0] {
            observer.observe(price);
        }
        assert_relative_eq!(observer.arithmetic_average(), 1.02, epsilon = 1e-12);
    }

    #[test]
    fn test_summarise_scales_by_spot() {
        let mut observer: PathObserver<f64> = PathObserver::new(ObservationType::all());
        for price in [1.0, 1.2, 0.9, 1.1] {
            observer.observe(price);
        }

        let summary = observer.summarise(40.0, 45.0);
        assert_relative_eq!(summary.terminal, 44.0, epsilon = 1e-12);
        assert_relative_eq!(summary.average, 42.0, epsilon = 1e-12);
        assert_relative_eq!(summary.minimum, 36.0, epsilon = 1e-12);
        assert!(summary.breached);

        let summary = observer.summarise(40.0, 50.0);
        assert!(!summary.breached);
    }

    #[test]
    fn test_infinite_barrier_never_breached() {
        let mut observer: PathObserver<f32> = PathObserver::new(ObservationType::barrier());
        observer.observe(1.0e30);
        assert!(!observer.summarise(40.0, f32::INFINITY).breached);
    }
}
