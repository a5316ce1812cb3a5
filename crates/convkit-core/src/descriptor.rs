//! Shape descriptors handed to the engine.
//!
//! A descriptor carries the rank, the kernel/input/result sizes, their strides
//! and the start offset. Only the builders differ between 1-D and 2-D; every
//! task phase after them is rank-agnostic.
//!
//! Lengths and offsets are passed through untouched. Zero or negative values
//! are for the engine to accept or refuse.

/// Dimension, size, stride and offset descriptors for one convolution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvDescriptor {
    pub rank: usize,
    pub kernel_shape: Vec<i32>,
    pub x_shape: Vec<i32>,
    pub result_shape: Vec<i32>,
    pub kernel_strides: Vec<i32>,
    pub x_strides: Vec<i32>,
    pub result_strides: Vec<i32>,
    pub start: Vec<i32>,
}

impl ConvDescriptor {
    /// Build a descriptor for row-major arrays of any rank.
    ///
    /// Each array's strides come from its own shape.
    pub fn row_major(
        kernel_shape: &[i32],
        x_shape: &[i32],
        start: &[i32],
        result_shape: &[i32],
    ) -> Self {
        Self {
            rank: kernel_shape.len(),
            kernel_shape: kernel_shape.to_vec(),
            x_shape: x_shape.to_vec(),
            result_shape: result_shape.to_vec(),
            kernel_strides: row_major_strides(kernel_shape),
            x_strides: row_major_strides(x_shape),
            result_strides: row_major_strides(result_shape),
            start: start.to_vec(),
        }
    }

    /// Number of elements the result buffer must hold.
    pub fn result_len(&self) -> usize {
        element_count(&self.result_shape)
    }
}

/// Descriptor for a 1-D call. Strides are all 1.
pub fn descriptor_1d(
    kernel_length: i32,
    x_length: i32,
    first_x: i32,
    result_length: i32,
) -> ConvDescriptor {
    let descriptor =
        ConvDescriptor::row_major(&[kernel_length], &[x_length], &[first_x], &[result_length]);
    tracing::trace!(?descriptor, "built 1-D descriptor");
    descriptor
}

/// Descriptor for a 2-D row-major call.
///
/// Row strides are `{length2, 1}` taken from the owning array's width; kernel,
/// input and result may all have different widths.
#[allow(clippy::too_many_arguments)]
pub fn descriptor_2d(
    kernel_length1: i32,
    kernel_length2: i32,
    x_length1: i32,
    x_length2: i32,
    first_x1: i32,
    first_x2: i32,
    result_length1: i32,
    result_length2: i32,
) -> ConvDescriptor {
    let descriptor = ConvDescriptor::row_major(
        &[kernel_length1, kernel_length2],
        &[x_length1, x_length2],
        &[first_x1, first_x2],
        &[result_length1, result_length2],
    );
    tracing::trace!(?descriptor, "built 2-D descriptor");
    descriptor
}

/// Row-major strides: the innermost dimension is contiguous.
pub fn row_major_strides(shape: &[i32]) -> Vec<i32> {
    let mut strides = vec![1i32; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1].wrapping_mul(shape[axis + 1]);
    }
    strides
}

/// Product of the dimensions, with non-positive dimensions counting as empty.
pub fn element_count(shape: &[i32]) -> usize {
    shape
        .iter()
        .map(|&d| usize::try_from(d).unwrap_or(0))
        .product()
}
