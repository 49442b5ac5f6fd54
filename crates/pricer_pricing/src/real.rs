//! Device scalar types.
//!
//! Every device pass of a run is monomorphised over one [`Real`] so that the
//! transcendental functions (`exp`, `sqrt`) and the normal sampler always
//! match the configured [`Precision`].

use std::fmt::Debug;
use std::ops::AddAssign;

use num_traits::Float;
use pricer_core::types::Precision;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Floating-point scalar usable inside device passes.
pub trait Real: Float + AddAssign + Default + Debug + Send + Sync + 'static {
    /// Precision tag of this scalar type.
    const PRECISION: Precision;

    /// Converts a host `f64` parameter into this precision.
    fn from_host(value: f64) -> Self;

    /// Widens a device value back to `f64` for the host.
    fn to_host(self) -> f64;

    /// Draws one standard normal variate in this precision.
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline]
    fn from_host(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_host(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardNormal.sample(rng)
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn from_host(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_host(self) -> f64 {
        self
    }

    #[inline]
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardNormal.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_tags() {
        assert_eq!(<f32 as Real>::PRECISION, Precision::Single);
        assert_eq!(<f64 as Real>::PRECISION, Precision::Double);
    }

    #[test]
    fn test_host_conversion() {
        assert_eq!(<f32 as Real>::from_host(0.5), 0.5_f32);
        assert_eq!(<f32 as Real>::to_host(0.25_f32), 0.25);
        assert_eq!(<f64 as Real>::from_host(1.0 / 3.0), 1.0 / 3.0);
    }
}
