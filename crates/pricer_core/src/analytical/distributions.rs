//! Standard normal distribution functions.
//!
//! Generic over `T: Float` so single- and double-precision callers share
//! one implementation.

use num_traits::Float;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Abramowitz and Stegun (7.1.26) coefficients.
const ERFC_A: [f64; 5] = [
    0.254829592,
    -0.284496736,
    1.421413741,
    -1.453152027,
    1.061405429,
];
const ERFC_P: f64 = 0.3275911;

#[inline]
fn lit<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Complementary error function approximation using Horner's method.
///
/// Maximum absolute error of 1.5e-7 for all x.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let abs_x = x.abs();

    let t = one / (one + lit::<T>(ERFC_P) * abs_x);
    let poly = lit::<T>(ERFC_A[0])
        + t * (lit::<T>(ERFC_A[1])
            + t * (lit::<T>(ERFC_A[2]) + t * (lit::<T>(ERFC_A[3]) + t * lit::<T>(ERFC_A[4]))));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    // erfc(-x) = 2 - erfc(x)
    if x < T::zero() {
        lit::<T>(2.0) - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function, `Φ(x) = erfc(-x/√2) / 2`.
///
/// # Examples
/// ```
/// use pricer_core::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    lit::<T>(0.5) * erfc_approx(-x / lit::<T>(SQRT_2))
}

/// Standard normal probability density function, `φ(x) = exp(-x²/2) / √(2π)`.
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    lit::<T>(FRAC_1_SQRT_2PI) * (-lit::<T>(0.5) * x * x).exp()
}
