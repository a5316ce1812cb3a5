//! Element types accepted by convolution tasks.
//!
//! Four element types are supported. Each one is bound to exactly one engine
//! instantiation and is never mixed with another inside a single call.

use num_complex::{Complex, Complex32, Complex64};
use num_traits::Zero;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Mul};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum DType {
    Float32,
    Float64,
    Complex32, // 2 * f32, interleaved (re, im)
    Complex64, // 2 * f64, interleaved (re, im)
}

impl DType {
    pub const ALL: [DType; 4] = [
        DType::Float32,
        DType::Float64,
        DType::Complex32,
        DType::Complex64,
    ];

    pub fn size(&self) -> usize {
        match self {
            DType::Float32 => 4,
            DType::Float64 => 8,
            DType::Complex32 => 8,
            DType::Complex64 => 16,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex32 => "complex32",
            DType::Complex64 => "complex64",
        }
    }

    /// One-letter prefix used by the exported entry points (`s_conv1d`, ...).
    pub fn prefix(&self) -> char {
        match self {
            DType::Float32 => 's',
            DType::Float64 => 'd',
            DType::Complex32 => 'c',
            DType::Complex64 => 'z',
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, DType::Complex32 | DType::Complex64)
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Scalar type a convolution task can operate on.
///
/// Arithmetic in the element's own precision is used by direct summation.
/// Transform-domain evaluation widens every element to `Complex<f64>` and
/// narrows the result back, which is lossless for all four types on the way
/// in and rounds once on the way out.
pub trait ConvElement:
    Copy + Debug + Zero + Add<Output = Self> + Mul<Output = Self> + Send + Sync + 'static
{
    const DTYPE: DType;

    fn to_c64(self) -> Complex<f64>;

    fn from_c64(value: Complex<f64>) -> Self;
}

impl ConvElement for f32 {
    const DTYPE: DType = DType::Float32;

    fn to_c64(self) -> Complex<f64> {
        Complex::new(self as f64, 0.0)
    }

    fn from_c64(value: Complex<f64>) -> Self {
        value.re as f32
    }
}

impl ConvElement for f64 {
    const DTYPE: DType = DType::Float64;

    fn to_c64(self) -> Complex<f64> {
        Complex::new(self, 0.0)
    }

    fn from_c64(value: Complex<f64>) -> Self {
        value.re
    }
}

impl ConvElement for Complex32 {
    const DTYPE: DType = DType::Complex32;

    fn to_c64(self) -> Complex<f64> {
        Complex::new(self.re as f64, self.im as f64)
    }

    fn from_c64(value: Complex<f64>) -> Self {
        Complex32::new(value.re as f32, value.im as f32)
    }
}

impl ConvElement for Complex64 {
    const DTYPE: DType = DType::Complex64;

    fn to_c64(self) -> Complex<f64> {
        self
    }

    fn from_c64(value: Complex<f64>) -> Self {
        value
    }
}

/// Get the DType of an element type
pub fn dtype_of<T: ConvElement>() -> DType {
    T::DTYPE
}
