//! Direct summation over the kernel support.

use super::Plane;
use crate::dtype::ConvElement;

/// Indices `k` in `0..kernel_len` with `0 <= at - k < x_len`, as an inclusive range.
#[inline]
fn support(at: i64, kernel_len: usize, x_len: usize) -> Option<(usize, usize)> {
    let lo = (at - x_len as i64 + 1).max(0);
    let hi = at.min(kernel_len as i64 - 1);
    if lo > hi {
        None
    } else {
        Some((lo as usize, hi as usize))
    }
}

pub(super) fn convolve<T: ConvElement>(
    kernel: &[T],
    kp: Plane,
    x: &[T],
    xp: Plane,
    result: &mut [T],
    rp: Plane,
    start: [i64; 2],
) {
    for r0 in 0..rp.rows {
        let i0 = r0 as i64 + start[0];
        let rows = support(i0, kp.rows, xp.rows);
        for r1 in 0..rp.cols {
            let i1 = r1 as i64 + start[1];
            let mut sum = T::zero();
            if let (Some((k0_lo, k0_hi)), Some((k1_lo, k1_hi))) =
                (rows, support(i1, kp.cols, xp.cols))
            {
                for k0 in k0_lo..=k0_hi {
                    let j0 = (i0 - k0 as i64) as usize;
                    for k1 in k1_lo..=k1_hi {
                        let j1 = (i1 - k1 as i64) as usize;
                        sum = sum + kernel[kp.index(k0, k1)] * x[xp.index(j0, j1)];
                    }
                }
            }
            result[rp.index(r0, r1)] = sum;
        }
    }
}
