//! Valuation passes over a simulated path matrix.
//!
//! Each pass walks its lanes' paths with a grid-stride loop, accumulates one
//! payoff per path into the lane's slot of group-local memory, reduces the
//! group with [`reduce_sum`] and writes one partial sum per group. The host
//! then finishes each value with [`finish_value`].

use std::ops::AddAssign;

use pricer_core::types::PayoffKind;

use super::{payoff, ObservationType, PathObserver};
use crate::device::{ComputeBackend, DeviceBuffer, DeviceError, DisjointWriter, KernelKind, LaunchShape};
use crate::mc::{reduce_sum, DeviceOptionParams};
use crate::real::Real;

/// The four independent valuation passes of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValuationPass {
    /// Terminal-price European payoff.
    PlainVanilla,
    /// Arithmetic-average payoff.
    Asian,
    /// Floating lookback payoff.
    Lookback,
    /// Knock-out and knock-in payoffs in one pass.
    Barrier,
}

impl ValuationPass {
    /// All passes in launch order.
    pub const ALL: [ValuationPass; 4] = [
        ValuationPass::PlainVanilla,
        ValuationPass::Asian,
        ValuationPass::Lookback,
        ValuationPass::Barrier,
    ];

    /// Kernel this pass launches.
    pub fn kernel(&self) -> KernelKind {
        match self {
            ValuationPass::PlainVanilla => KernelKind::PlainVanilla,
            ValuationPass::Asian => KernelKind::Asian,
            ValuationPass::Lookback => KernelKind::Lookback,
            ValuationPass::Barrier => KernelKind::Barrier,
        }
    }

    /// Valuations produced, in partial-sum buffer order.
    pub fn payoffs(&self) -> &'static [PayoffKind] {
        match self {
            ValuationPass::PlainVanilla => &[PayoffKind::PlainVanilla],
            ValuationPass::Asian => &[PayoffKind::Asian],
            ValuationPass::Lookback => &[PayoffKind::Lookback],
            ValuationPass::Barrier => &[PayoffKind::Knockout, PayoffKind::Knockin],
        }
    }

    /// Partial sums written per group.
    #[inline]
    pub fn partials_per_group(&self) -> usize {
        self.payoffs().len()
    }

    /// Path statistics the pass observes.
    pub fn observation(&self) -> ObservationType {
        ObservationType::for_payoff(self.payoffs()[0])
    }

    pub(crate) fn buffer_label(&self) -> &'static str {
        match self {
            ValuationPass::PlainVanilla => "partials_plain_vanilla",
            ValuationPass::Asian => "partials_asian",
            ValuationPass::Lookback => "partials_lookback",
            ValuationPass::Barrier => "partials_barrier",
        }
    }
}

/// Knock-out and knock-in sums reduced together by the barrier pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffPair<T> {
    /// Knock-out component.
    pub knockout: T,
    /// Knock-in component.
    pub knockin: T,
}

impl<T: AddAssign> AddAssign for PayoffPair<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.knockout += rhs.knockout;
        self.knockin += rhs.knockin;
    }
}

/// Runs one valuation pass, leaving `partials_per_group × group_count`
/// partial sums in `partials`.
///
/// Component `c` of group `g` is stored at `c * group_count + g`, so the
/// barrier pass's knock-in sums follow its knock-out sums in one buffer.
pub(crate) fn run_valuation_pass<T: Real, B: ComputeBackend>(
    backend: &B,
    shape: &LaunchShape,
    pass: ValuationPass,
    params: &DeviceOptionParams<T>,
    paths: &DeviceBuffer<'_, T, B>,
    num_paths: usize,
    partials: &mut DeviceBuffer<'_, T, B>,
) -> Result<(), DeviceError> {
    let matrix = paths.device_slice();
    let observation = pass.observation();
    let group_count = shape.group_count();

    let summarise = |path: usize| {
        let mut observer = PathObserver::new(observation);
        for step in 0..params.num_timesteps {
            observer.observe(matrix[step * num_paths + path]);
        }
        observer.summarise(params.spot, params.barrier)
    };

    match pass {
        ValuationPass::Barrier => launch_reduction(
            backend,
            pass.kernel(),
            shape,
            num_paths,
            partials,
            |path| {
                let summary = summarise(path);
                PayoffPair {
                    knockout: payoff(PayoffKind::Knockout, &summary, params.strike, params.sign),
                    knockin: payoff(PayoffKind::Knockin, &summary, params.strike, params.sign),
                }
            },
            |out, group, total: PayoffPair<T>| {
                // Safety: each group writes only its own slot of each component.
                unsafe {
                    out.write(group, total.knockout);
                    out.write(group_count + group, total.knockin);
                }
            },
        ),
        _ => {
            let kind = pass.payoffs()[0];
            launch_reduction(
                backend,
                pass.kernel(),
                shape,
                num_paths,
                partials,
                |path| payoff(kind, &summarise(path), params.strike, params.sign),
                |out, group, total: T| {
                    // Safety: each group writes only its own slot.
                    unsafe { out.write(group, total) }
                },
            )
        }
    }
}

/// Grid-stride accumulation followed by a group reduction.
fn launch_reduction<T, V, B, P, S>(
    backend: &B,
    kernel: KernelKind,
    shape: &LaunchShape,
    num_paths: usize,
    partials: &mut DeviceBuffer<'_, T, B>,
    per_path: P,
    store: S,
) -> Result<(), DeviceError>
where
    T: Real,
    V: Copy + Default + AddAssign + Send,
    B: ComputeBackend,
    P: Fn(usize) -> V + Sync + Send,
    S: Fn(&DisjointWriter<'_, T>, usize, V) + Sync + Send,
{
    let writer = DisjointWriter::new(partials.device_slice_mut());
    let mut local = vec![V::default(); shape.lane_count()];

    backend.launch(kernel, shape, local.as_mut_slice(), |ctx, local| {
        for (lane, slot) in local.iter_mut().enumerate() {
            let mut sum = V::default();
            for path in ctx.grid_stride(lane, num_paths) {
                sum += per_path(path);
            }
            *slot = sum;
        }
        let total = reduce_sum(local);
        store(&writer, ctx.group_id(), total);
    })?;
    Ok(())
}

/// Host finishing step: sums the partials, divides by the path count and discounts.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::path_dependent::finish_value;
///
/// let value = finish_value(&[3.0_f64, 5.0], 4, 0.5);
/// assert_eq!(value, 1.0);
/// ```
pub fn finish_value<T: Real>(partials: &[T], num_paths: usize, discount: T) -> f64 {
    let mut total = T::zero();
    for &partial in partials {
        total += partial;
    }
    (total / T::from_host(num_paths as f64) * discount).to_host()
}
