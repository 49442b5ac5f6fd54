//! Group-level tree reduction.

use std::ops::AddAssign;

/// Sums a group's local buffer in place and returns the total.
///
/// At each step `k = n/2, n/4, …, 1` (with `n` the buffer length rounded up
/// to a power of two) lane `j < k` adds `local[j + k]` into `local[j]`;
/// slots past the end of the buffer count as zero. Every step completes
/// before the next begins, and lane 0 holds the result.
///
/// An empty buffer sums to `V::default()`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::reduce_sum;
///
/// let mut local = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(reduce_sum(&mut local), 15.0);
/// assert_eq!(local[0], 15.0);
/// ```
pub fn reduce_sum<V: Copy + Default + AddAssign>(local: &mut [V]) -> V {
    let len = local.len();
    if len == 0 {
        return V::default();
    }

    let mut k = len.next_power_of_two() / 2;
    while k > 0 {
        for j in 0..k {
            if j + k < len {
                let upper = local[j + k];
                local[j] += upper;
            }
        }
        k /= 2;
    }
    local[0]
}
