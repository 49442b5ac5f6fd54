//! Valuation tags and the result of a pricing run.

use std::fmt;
use std::time::Duration;

use super::Precision;

/// Closed set of payoff valuations produced by one pricing run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PayoffKind {
    /// European payoff on the terminal price.
    PlainVanilla,
    /// Arithmetic-average price option.
    Asian,
    /// Floating-strike lookback call: terminal price less the path minimum.
    Lookback,
    /// Up-and-out: pays the vanilla payoff only if the barrier was never crossed.
    Knockout,
    /// Up-and-in: pays the vanilla payoff only if the barrier was crossed.
    Knockin,
}

impl PayoffKind {
    /// All kinds, in report order.
    pub const ALL: [PayoffKind; 5] = [
        PayoffKind::PlainVanilla,
        PayoffKind::Asian,
        PayoffKind::Lookback,
        PayoffKind::Knockout,
        PayoffKind::Knockin,
    ];

    /// Short snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoffKind::PlainVanilla => "plain_vanilla",
            PayoffKind::Asian => "asian",
            PayoffKind::Lookback => "lookback",
            PayoffKind::Knockout => "knockout",
            PayoffKind::Knockin => "knockin",
        }
    }
}

impl fmt::Display for PayoffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally supplied expected value used for pass/fail reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expectation {
    /// Valuation the expected value refers to.
    pub kind: PayoffKind,
    /// Expected (golden) present value.
    pub value: f64,
    /// Maximum accepted absolute deviation.
    pub tolerance: f64,
}

/// Present values and run metadata of one pricing run.
///
/// Starts zeroed; each valuation pass records its value through
/// [`OptionResult::record`], and the serial reference pricer fills
/// [`OptionResult::plain_vanilla_reference`]. The caller receives the
/// finished result by value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptionResult {
    plain_vanilla: f64,
    plain_vanilla_reference: f64,
    asian: f64,
    knockout: f64,
    knockin: f64,
    lookback: f64,
    num_paths: usize,
    num_timesteps: usize,
    precision: Precision,
    group_size: usize,
    group_count: usize,
    elapsed_parallel: Duration,
    elapsed_reference: Option<Duration>,
    expectation: Option<Expectation>,
}

impl OptionResult {
    /// Creates a zeroed result for a run of `num_paths` paths of `num_timesteps` steps.
    pub fn new(num_paths: usize, num_timesteps: usize, precision: Precision) -> Self {
        Self {
            plain_vanilla: 0.0,
            plain_vanilla_reference: 0.0,
            asian: 0.0,
            knockout: 0.0,
            knockin: 0.0,
            lookback: 0.0,
            num_paths,
            num_timesteps,
            precision,
            group_size: 0,
            group_count: 0,
            elapsed_parallel: Duration::ZERO,
            elapsed_reference: None,
            expectation: None,
        }
    }

    /// Records the present value of one valuation.
    pub fn record(&mut self, kind: PayoffKind, value: f64) {
        match kind {
            PayoffKind::PlainVanilla => self.plain_vanilla = value,
            PayoffKind::Asian => self.asian = value,
            PayoffKind::Lookback => self.lookback = value,
            PayoffKind::Knockout => self.knockout = value,
            PayoffKind::Knockin => self.knockin = value,
        }
    }

    /// Returns the present value of one valuation.
    pub fn value(&self, kind: PayoffKind) -> f64 {
        match kind {
            PayoffKind::PlainVanilla => self.plain_vanilla,
            PayoffKind::Asian => self.asian,
            PayoffKind::Lookback => self.lookback,
            PayoffKind::Knockout => self.knockout,
            PayoffKind::Knockin => self.knockin,
        }
    }

    /// Records the serial reference value and the time taken to compute it.
    pub fn record_reference(&mut self, value: f64, elapsed: Duration) {
        self.plain_vanilla_reference = value;
        self.elapsed_reference = Some(elapsed);
    }

    /// Records the launch shape used by the parallel run.
    pub fn set_launch_shape(&mut self, group_size: usize, group_count: usize) {
        self.group_size = group_size;
        self.group_count = group_count;
    }

    /// Records the wall-clock time of the parallel run.
    pub fn set_elapsed_parallel(&mut self, elapsed: Duration) {
        self.elapsed_parallel = elapsed;
    }

    /// Attaches an expected value for pass/fail reporting.
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectation = Some(expectation);
        self
    }

    /// Parallel plain vanilla value.
    #[inline]
    pub fn plain_vanilla(&self) -> f64 {
        self.plain_vanilla
    }

    /// Serial reference plain vanilla value (zero until the reference ran).
    #[inline]
    pub fn plain_vanilla_reference(&self) -> f64 {
        self.plain_vanilla_reference
    }

    /// Arithmetic Asian value.
    #[inline]
    pub fn asian(&self) -> f64 {
        self.asian
    }

    /// Knock-out value.
    #[inline]
    pub fn knockout(&self) -> f64 {
        self.knockout
    }

    /// Knock-in value.
    #[inline]
    pub fn knockin(&self) -> f64 {
        self.knockin
    }

    /// Floating lookback value.
    #[inline]
    pub fn lookback(&self) -> f64 {
        self.lookback
    }

    /// Knock-out plus knock-in; equals the plain vanilla value up to rounding.
    #[inline]
    pub fn knockout_plus_knockin(&self) -> f64 {
        self.knockout + self.knockin
    }

    /// Number of simulated paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Number of time steps per path.
    #[inline]
    pub fn num_timesteps(&self) -> usize {
        self.num_timesteps
    }

    /// Precision the parallel run used.
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Lanes per group of the parallel run.
    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Group count of the parallel run.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Total lanes launched.
    #[inline]
    pub fn lane_count(&self) -> usize {
        self.group_size * self.group_count
    }

    /// Wall-clock time of the parallel run.
    #[inline]
    pub fn elapsed_parallel(&self) -> Duration {
        self.elapsed_parallel
    }

    /// Wall-clock time of the serial reference run, if it ran.
    #[inline]
    pub fn elapsed_reference(&self) -> Option<Duration> {
        self.elapsed_reference
    }

    /// Attached expected value, if any.
    #[inline]
    pub fn expectation(&self) -> Option<&Expectation> {
        self.expectation.as_ref()
    }

    /// Simulated paths per second of the parallel run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_parallel.as_secs_f64();
        if secs > 0.0 {
            self.num_paths as f64 / secs
        } else {
            0.0
        }
    }

    /// Parallel-over-serial speed-up, if the reference ran.
    pub fn speedup(&self) -> Option<f64> {
        let parallel = self.elapsed_parallel.as_secs_f64();
        self.elapsed_reference
            .filter(|_| parallel > 0.0)
            .map(|serial| serial.as_secs_f64() / parallel)
    }

    /// Compares the expected valuation against its golden value.
    ///
    /// Returns `None` when no expectation is attached.
    pub fn within_tolerance(&self) -> Option<bool> {
        self.expectation
            .map(|e| (self.value(e.kind) - e.value).abs() <= e.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_starts_zeroed() {
        let result = OptionResult::new(1000, 87, Precision::Double);
        for kind in PayoffKind::ALL {
            assert_eq!(result.value(kind), 0.0);
        }
        assert_eq!(result.plain_vanilla_reference(), 0.0);
        assert!(result.elapsed_reference().is_none());
        assert!(result.within_tolerance().is_none());
    }

    #[test]
    fn test_record_and_read_back() {
        let mut result = OptionResult::new(1000, 87, Precision::Single);
        result.record(PayoffKind::Knockout, 2.5);
        result.record(PayoffKind::Knockin, 3.0);
        result.record(PayoffKind::Asian, 5.16);

        assert_eq!(result.knockout(), 2.5);
        assert_eq!(result.knockin(), 3.0);
        assert_eq!(result.knockout_plus_knockin(), 5.5);
        assert_eq!(result.value(PayoffKind::Asian), 5.16);
    }

    #[test]
    fn test_expectation_check() {
        let mut result = OptionResult::new(1000, 87, Precision::Double).with_expectation(
            Expectation {
                kind: PayoffKind::Asian,
                value: 5.162534,
                tolerance: 0.1,
            },
        );

        result.record(PayoffKind::Asian, 5.2);
        assert_eq!(result.within_tolerance(), Some(true));

        result.record(PayoffKind::Asian, 5.4);
        assert_eq!(result.within_tolerance(), Some(false));
    }

    #[test]
    fn test_throughput_and_speedup() {
        let mut result = OptionResult::new(1000, 10, Precision::Double);
        assert_eq!(result.throughput(), 0.0);
        assert!(result.speedup().is_none());

        result.set_elapsed_parallel(Duration::from_millis(500));
        result.record_reference(5.5, Duration::from_secs(2));
        result.set_launch_shape(256, 4);

        assert_eq!(result.throughput(), 2000.0);
        assert_eq!(result.speedup(), Some(4.0));
        assert_eq!(result.lane_count(), 1024);
    }
}
