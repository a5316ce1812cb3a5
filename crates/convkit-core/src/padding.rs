//! Convolution framed by a padding mode.
//!
//! A padding mode picks the start offset and result length of the window into
//! the full convolution sequence, then runs the ordinary task protocol.

use crate::dtype::ConvElement;
use crate::engine::ConvEngine;
use crate::entry::{convolve_1d, convolve_2d};
use crate::error::{ConvError, Result};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// Output framing for 1-D convolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Padding {
    /// Only positions where kernel and input fully overlap: `n - k + 1` samples.
    #[default]
    Valid,
    /// `n` samples centred on the input; for even kernels the window is
    /// shifted one sample towards the end.
    Same,
    /// `n` samples aligned with the input start, each depending only on
    /// current and earlier inputs.
    Causal,
    /// Every non-zero position: `n + k - 1` samples.
    Full,
}

/// Output framing for 2-D convolution, applied independently per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Padding2D {
    #[default]
    Valid,
    Same,
    Full,
}

/// Start offset and length of a window into the full convolution sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub len: usize,
}

impl Padding {
    /// Window for a kernel of `kernel_len` over an input of `x_len`.
    ///
    /// Returns `None` for empty operands, and for `Valid` when the kernel is
    /// longer than the input.
    pub fn window(self, kernel_len: usize, x_len: usize) -> Option<Window> {
        if kernel_len == 0 || x_len == 0 {
            return None;
        }
        match self {
            Padding::Valid if x_len < kernel_len => None,
            Padding::Valid => Some(Window {
                start: kernel_len - 1,
                len: x_len - kernel_len + 1,
            }),
            Padding::Same => Some(Window {
                start: kernel_len / 2,
                len: x_len,
            }),
            Padding::Causal => Some(Window {
                start: 0,
                len: x_len,
            }),
            Padding::Full => Some(Window {
                start: 0,
                len: x_len + kernel_len - 1,
            }),
        }
    }
}

impl Padding2D {
    fn axis(self) -> Padding {
        match self {
            Padding2D::Valid => Padding::Valid,
            Padding2D::Same => Padding::Same,
            Padding2D::Full => Padding::Full,
        }
    }

    /// Per-axis windows for `kernel_dim` over `x_dim` (rows, cols).
    pub fn window(self, kernel_dim: (usize, usize), x_dim: (usize, usize)) -> Option<(Window, Window)> {
        let axis = self.axis();
        Some((
            axis.window(kernel_dim.0, x_dim.0)?,
            axis.window(kernel_dim.1, x_dim.1)?,
        ))
    }
}

fn to_i32(operation: &str, what: &str, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        ConvError::invalid_argument(operation, format!("{what} {value} exceeds the i32 range"))
    })
}

fn window_1d(operation: &str, padding: Padding, kernel_len: usize, x_len: usize) -> Result<Window> {
    padding.window(kernel_len, x_len).ok_or_else(|| {
        ConvError::invalid_argument(
            operation,
            format!("no {padding:?} window for kernel length {kernel_len} over input length {x_len}"),
        )
    })
}

fn window_2d(
    operation: &str,
    padding: Padding2D,
    kernel_dim: (usize, usize),
    x_dim: (usize, usize),
) -> Result<(Window, Window)> {
    padding.window(kernel_dim, x_dim).ok_or_else(|| {
        ConvError::invalid_argument(
            operation,
            format!("no {padding:?} window for kernel {kernel_dim:?} over input {x_dim:?}"),
        )
    })
}

/// Convolve `x` with `kernel` and return the window selected by `padding`.
pub fn conv1d<T, E>(engine: &E, kernel: &[T], x: &[T], padding: Padding) -> Result<Vec<T>>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let window = window_1d("conv1d", padding, kernel.len(), x.len())?;
    let mut result = vec![T::zero(); window.len];
    run_1d("conv1d", engine, kernel, x, window, &mut result)?;
    Ok(result)
}

/// Like [`conv1d`], writing into `result`, whose length must match the window.
pub fn conv1d_into<T, E>(
    engine: &E,
    kernel: &[T],
    x: &[T],
    result: &mut [T],
    padding: Padding,
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let window = window_1d("conv1d_into", padding, kernel.len(), x.len())?;
    if result.len() != window.len {
        return Err(ConvError::invalid_argument(
            "conv1d_into",
            format!(
                "result length {} does not match {padding:?} window length {}",
                result.len(),
                window.len
            ),
        ));
    }
    run_1d("conv1d_into", engine, kernel, x, window, result)
}

fn run_1d<T, E>(
    operation: &str,
    engine: &E,
    kernel: &[T],
    x: &[T],
    window: Window,
    result: &mut [T],
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    convolve_1d(
        engine,
        kernel,
        to_i32(operation, "kernel length", kernel.len())?,
        x,
        to_i32(operation, "input length", x.len())?,
        to_i32(operation, "start offset", window.start)?,
        result,
        to_i32(operation, "result length", window.len)?,
    )
}

/// 2-D convolution of `x` with `kernel`, framed by `padding` on both axes.
pub fn conv2d<T, E>(
    engine: &E,
    kernel: ArrayView2<'_, T>,
    x: ArrayView2<'_, T>,
    padding: Padding2D,
) -> Result<Array2<T>>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let (rows, cols) = window_2d("conv2d", padding, kernel.dim(), x.dim())?;
    let mut result = Array2::zeros((rows.len, cols.len));
    run_2d("conv2d", engine, kernel, x, (rows, cols), result.view_mut())?;
    Ok(result)
}

/// Like [`conv2d`], writing into `result`, which must be in standard
/// (row-major, contiguous) layout and match the window shape.
pub fn conv2d_into<T, E>(
    engine: &E,
    kernel: ArrayView2<'_, T>,
    x: ArrayView2<'_, T>,
    result: ArrayViewMut2<'_, T>,
    padding: Padding2D,
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let (rows, cols) = window_2d("conv2d_into", padding, kernel.dim(), x.dim())?;
    if result.dim() != (rows.len, cols.len) {
        return Err(ConvError::invalid_argument(
            "conv2d_into",
            format!(
                "result shape {:?} does not match {padding:?} window shape {:?}",
                result.dim(),
                (rows.len, cols.len)
            ),
        ));
    }
    run_2d("conv2d_into", engine, kernel, x, (rows, cols), result)
}

fn run_2d<T, E>(
    operation: &str,
    engine: &E,
    kernel: ArrayView2<'_, T>,
    x: ArrayView2<'_, T>,
    (rows, cols): (Window, Window),
    mut result: ArrayViewMut2<'_, T>,
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let kernel_dim = kernel.dim();
    let x_dim = x.dim();
    let kernel = kernel.as_standard_layout();
    let x = x.as_standard_layout();
    let contiguous = |what: &str| {
        ConvError::invalid_argument(operation, format!("{what} is not in standard layout"))
    };
    let kernel = kernel.as_slice().ok_or_else(|| contiguous("kernel"))?;
    let x = x.as_slice().ok_or_else(|| contiguous("input"))?;
    let result = result
        .as_slice_mut()
        .ok_or_else(|| contiguous("result"))?;

    convolve_2d(
        engine,
        kernel,
        to_i32(operation, "kernel rows", kernel_dim.0)?,
        to_i32(operation, "kernel cols", kernel_dim.1)?,
        x,
        to_i32(operation, "input rows", x_dim.0)?,
        to_i32(operation, "input cols", x_dim.1)?,
        to_i32(operation, "row offset", rows.start)?,
        to_i32(operation, "col offset", cols.start)?,
        result,
        to_i32(operation, "result rows", rows.len)?,
        to_i32(operation, "result cols", cols.len)?,
    )
}
