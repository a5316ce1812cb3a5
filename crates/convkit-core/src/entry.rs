//! Typed entry points, one per shape and element type.
//!
//! `s`, `d`, `c` and `z` select `f32`, `f64`, `Complex32` and `Complex64`.
//! Each entry point only binds the shared protocol to its element type and
//! converts the outcome into a [`ConvolutionStatus`].

use crate::descriptor::{descriptor_1d, descriptor_2d};
use crate::dtype::ConvElement;
use crate::engine::ConvEngine;
use crate::error::{ConvolutionStatus, Result};
use crate::protocol::convolve_nd;
use num_complex::{Complex32, Complex64};

/// 1-D convolution of `x` with `kernel`, written into `result` starting at
/// index `first_x` of the full convolution sequence.
#[allow(clippy::too_many_arguments)]
pub fn convolve_1d<T, E>(
    engine: &E,
    kernel: &[T],
    kernel_length: i32,
    x: &[T],
    x_length: i32,
    first_x: i32,
    result: &mut [T],
    result_length: i32,
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let descriptor = descriptor_1d(kernel_length, x_length, first_x, result_length);
    convolve_nd(engine, &descriptor, kernel, x, result)
}

/// 2-D row-major convolution; `result` is anchored at `(first_x1, first_x2)`
/// of the full convolution plane.
#[allow(clippy::too_many_arguments)]
pub fn convolve_2d<T, E>(
    engine: &E,
    kernel: &[T],
    kernel_length1: i32,
    kernel_length2: i32,
    x: &[T],
    x_length1: i32,
    x_length2: i32,
    first_x1: i32,
    first_x2: i32,
    result: &mut [T],
    result_length1: i32,
    result_length2: i32,
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let descriptor = descriptor_2d(
        kernel_length1,
        kernel_length2,
        x_length1,
        x_length2,
        first_x1,
        first_x2,
        result_length1,
        result_length2,
    );
    convolve_nd(engine, &descriptor, kernel, x, result)
}

fn report(entry: &'static str, outcome: Result<()>) -> ConvolutionStatus {
    if let Err(e) = &outcome {
        match e.engine_error() {
            Some(cause) => tracing::debug!(entry, error = %e, %cause, "convolution failed"),
            None => tracing::debug!(entry, error = %e, "convolution failed"),
        }
    }
    ConvolutionStatus::from(outcome)
}

macro_rules! conv1d_entry {
    ($name:ident, $t:ty) => {
        #[doc = concat!("1-D convolution over `", stringify!($t), "` buffers.")]
        #[allow(clippy::too_many_arguments)]
        pub fn $name<E: ConvEngine<$t>>(
            engine: &E,
            kernel: &[$t],
            kernel_length: i32,
            x: &[$t],
            x_length: i32,
            first_x: i32,
            result: &mut [$t],
            result_length: i32,
        ) -> ConvolutionStatus {
            report(
                stringify!($name),
                convolve_1d(
                    engine,
                    kernel,
                    kernel_length,
                    x,
                    x_length,
                    first_x,
                    result,
                    result_length,
                ),
            )
        }
    };
}

macro_rules! conv2d_entry {
    ($name:ident, $t:ty) => {
        #[doc = concat!("2-D row-major convolution over `", stringify!($t), "` buffers.")]
        #[allow(clippy::too_many_arguments)]
        pub fn $name<E: ConvEngine<$t>>(
            engine: &E,
            kernel: &[$t],
            kernel_length1: i32,
            kernel_length2: i32,
            x: &[$t],
            x_length1: i32,
            x_length2: i32,
            first_x1: i32,
            first_x2: i32,
            result: &mut [$t],
            result_length1: i32,
            result_length2: i32,
        ) -> ConvolutionStatus {
            report(
                stringify!($name),
                convolve_2d(
                    engine,
                    kernel,
                    kernel_length1,
                    kernel_length2,
                    x,
                    x_length1,
                    x_length2,
                    first_x1,
                    first_x2,
                    result,
                    result_length1,
                    result_length2,
                ),
            )
        }
    };
}

conv1d_entry!(s_conv1d, f32);
conv1d_entry!(d_conv1d, f64);
conv1d_entry!(c_conv1d, Complex32);
conv1d_entry!(z_conv1d, Complex64);

conv2d_entry!(s_conv2d, f32);
conv2d_entry!(d_conv2d, f64);
conv2d_entry!(c_conv2d, Complex32);
conv2d_entry!(z_conv2d, Complex64);
