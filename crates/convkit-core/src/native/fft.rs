//! Transform-domain evaluation.
//!
//! Kernel and input are zero-padded to the full output size, transformed with
//! separable row/column FFTs, multiplied and transformed back. All arithmetic
//! is done in `Complex<f64>`.

use super::Plane;
use crate::dtype::ConvElement;
use crate::error::EngineError;
use num_traits::Zero;
use rustfft::{num_complex::Complex, FftDirection, FftPlanner};

fn transform_2d(
    planner: &mut FftPlanner<f64>,
    buffer: &mut [Complex<f64>],
    rows: usize,
    cols: usize,
    direction: FftDirection,
) {
    // Buffer length is a multiple of `cols`, so this transforms every row.
    planner.plan_fft(cols, direction).process(buffer);

    if rows > 1 {
        let column_fft = planner.plan_fft(rows, direction);
        let mut column = vec![Complex::zero(); rows];
        for c in 0..cols {
            for (r, slot) in column.iter_mut().enumerate() {
                *slot = buffer[r * cols + c];
            }
            column_fft.process(&mut column);
            for (r, value) in column.iter().enumerate() {
                buffer[r * cols + c] = *value;
            }
        }
    }
}

fn padded<T: ConvElement>(
    data: &[T],
    plane: Plane,
    elements: usize,
    cols: usize,
) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::zero(); elements];
    for r in 0..plane.rows {
        for c in 0..plane.cols {
            out[r * cols + c] = data[plane.index(r, c)].to_c64();
        }
    }
    out
}

/// Rows, columns and element count of the full convolution plane.
fn full_plane(kp: Plane, xp: Plane) -> Result<(usize, usize, usize), EngineError> {
    let too_large = || {
        EngineError::bad_buffer(
            "execute",
            format!(
                "full convolution plane of {}x{} by {}x{} does not fit in memory",
                kp.rows, kp.cols, xp.rows, xp.cols
            ),
        )
    };
    let rows = kp.rows.checked_add(xp.rows - 1).ok_or_else(too_large)?;
    let cols = kp.cols.checked_add(xp.cols - 1).ok_or_else(too_large)?;
    let elements = rows.checked_mul(cols).ok_or_else(too_large)?;
    Ok((rows, cols, elements))
}

pub(super) fn convolve<T: ConvElement>(
    kernel: &[T],
    kp: Plane,
    x: &[T],
    xp: Plane,
    result: &mut [T],
    rp: Plane,
    start: [i64; 2],
) -> Result<(), EngineError> {
    let (rows, cols, elements) = full_plane(kp, xp)?;

    let mut planner = FftPlanner::new();
    let mut spectrum = padded(kernel, kp, elements, cols);
    let mut x_spectrum = padded(x, xp, elements, cols);
    transform_2d(&mut planner, &mut spectrum, rows, cols, FftDirection::Forward);
    transform_2d(&mut planner, &mut x_spectrum, rows, cols, FftDirection::Forward);

    for (a, b) in spectrum.iter_mut().zip(x_spectrum.iter()) {
        *a *= *b;
    }
    transform_2d(&mut planner, &mut spectrum, rows, cols, FftDirection::Inverse);

    let scale = 1.0 / elements as f64;
    for r0 in 0..rp.rows {
        let i0 = r0 as i64 + start[0];
        for r1 in 0..rp.cols {
            let i1 = r1 as i64 + start[1];
            let inside = (0..rows as i64).contains(&i0) && (0..cols as i64).contains(&i1);
            result[rp.index(r0, r1)] = if inside {
                T::from_c64(spectrum[i0 as usize * cols + i1 as usize] * scale)
            } else {
                T::zero()
            };
        }
    }
    Ok(())
}
