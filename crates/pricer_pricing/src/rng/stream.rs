//! Per-lane random streams.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::real::Real;

/// Independent normal generator owned by one device lane.
///
/// A stream is keyed on `(seed, subsequence, offset)`: lanes of one run
/// share `seed`, use their global lane index as `subsequence`, and start at
/// `offset` zero. Streams with different keys are statistically
/// independent.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::LaneStream;
///
/// let mut a = LaneStream::keyed(1234, 7, 0);
/// let mut b = LaneStream::keyed(1234, 7, 0);
/// assert_eq!(a.next_normal::<f64>(), b.next_normal::<f64>());
/// ```
#[derive(Clone, Debug)]
pub struct LaneStream {
    inner: StdRng,
    seed: u64,
    subsequence: u64,
}

impl LaneStream {
    /// Creates the stream for `(seed, subsequence)`, skipping `offset` draws.
    pub fn keyed(seed: u64, subsequence: u64, offset: u64) -> Self {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_le_bytes());
        key[8..16].copy_from_slice(&subsequence.to_le_bytes());

        let mut inner = StdRng::from_seed(key);
        for _ in 0..offset {
            inner.next_u64();
        }

        Self {
            inner,
            seed,
            subsequence,
        }
    }

    /// Run seed this stream was keyed with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Subsequence (lane index) this stream was keyed with.
    #[inline]
    pub fn subsequence(&self) -> u64 {
        self.subsequence
    }

    /// Draws a standard normal variate at precision `T`.
    #[inline]
    pub fn next_normal<T: Real>(&mut self) -> T {
        T::sample_normal(&mut self.inner)
    }
}

impl Default for LaneStream {
    fn default() -> Self {
        Self::keyed(0, 0, 0)
    }
}
