//! C ABI for convkit convolution tasks.
//!
//! Exports `{s,d,c,z}_conv1d` and `{s,d,c,z}_conv2d`, each returning the
//! integer status 0 (success), 1 (task creation failed), 2 (task execution
//! failed) or 3 (task destruction failed). Complex buffers are interleaved
//! `(re, im)` pairs of `float` or `double`.
//!
//! Buffers must hold at least as many elements as their stated lengths. A
//! non-positive length is forwarded to the engine, which refuses it at task
//! creation.

use convkit_core::native::{CONVOLUTION_VERSION, MAX_RANK, REVISION};
use convkit_core::{entry, ConvolutionStatus, NativeEngine};
use num_complex::{Complex32, Complex64};
use std::os::raw::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// `convkit_query_capability` selector for the engine revision.
pub const CAPABILITY_REVISION: c_int = 0;
/// Selector for the convolution capability major version.
pub const CAPABILITY_CONVOLUTION_MAJOR: c_int = 1;
/// Selector for the convolution capability minor version.
pub const CAPABILITY_CONVOLUTION_MINOR: c_int = 2;
/// Selector for the highest supported rank.
pub const CAPABILITY_MAX_RANK: c_int = 3;

/// View `len` elements at `ptr`, or nothing for a null pointer or non-positive length.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` elements.
unsafe fn input<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        // SAFETY: caller guarantees `ptr` addresses `len` readable elements.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

/// # Safety
/// A non-null `ptr` must be valid for writes of `len` elements and not alias
/// any other buffer passed to the same call.
unsafe fn output<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        &mut []
    } else {
        // SAFETY: caller guarantees `ptr` addresses `len` writable, unaliased elements.
        unsafe { std::slice::from_raw_parts_mut(ptr, len) }
    }
}

/// Element count for a flat buffer of the given dimensions.
fn flat_len(dims: &[c_int]) -> usize {
    dims.iter()
        .try_fold(1usize, |acc, &d| {
            usize::try_from(d).ok().and_then(|d| acc.checked_mul(d))
        })
        .unwrap_or(0)
}

/// Run `call`, turning a panic into `TaskExecutionFailed`.
fn guarded(entry: &'static str, call: impl FnOnce() -> ConvolutionStatus) -> c_int {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(status) => status.code(),
        Err(_) => {
            tracing::error!(entry, "panic while running convolution task");
            ConvolutionStatus::TaskExecutionFailed.code()
        }
    }
}

macro_rules! export_conv1d {
    ($name:ident, $t:ty) => {
        /// # Safety
        /// `kernel`, `x` and `result` must point to at least `kernel_length`,
        /// `x_length` and `result_length` elements; `result` must be writable
        /// and must not overlap the inputs.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            kernel: *const $t,
            kernel_length: c_int,
            x: *const $t,
            x_length: c_int,
            first_x: c_int,
            result: *mut $t,
            result_length: c_int,
        ) -> c_int {
            guarded(stringify!($name), || {
                // SAFETY: buffer validity is the caller's contract above.
                let (kernel, x, result) = unsafe {
                    (
                        input(kernel, flat_len(&[kernel_length])),
                        input(x, flat_len(&[x_length])),
                        output(result, flat_len(&[result_length])),
                    )
                };
                entry::$name(
                    &NativeEngine::new(),
                    kernel,
                    kernel_length,
                    x,
                    x_length,
                    first_x,
                    result,
                    result_length,
                )
            })
        }
    };
}

macro_rules! export_conv2d {
    ($name:ident, $t:ty) => {
        /// # Safety
        /// `kernel`, `x` and `result` must point to row-major buffers of at
        /// least `length1 * length2` elements each; `result` must be writable
        /// and must not overlap the inputs.
        #[no_mangle]
        #[allow(clippy::too_many_arguments)]
        pub unsafe extern "C" fn $name(
            kernel: *const $t,
            kernel_length1: c_int,
            kernel_length2: c_int,
            x: *const $t,
            x_length1: c_int,
            x_length2: c_int,
            first_x1: c_int,
            first_x2: c_int,
            result: *mut $t,
            result_length1: c_int,
            result_length2: c_int,
        ) -> c_int {
            guarded(stringify!($name), || {
                // SAFETY: buffer validity is the caller's contract above.
                let (kernel, x, result) = unsafe {
                    (
                        input(kernel, flat_len(&[kernel_length1, kernel_length2])),
                        input(x, flat_len(&[x_length1, x_length2])),
                        output(result, flat_len(&[result_length1, result_length2])),
                    )
                };
                entry::$name(
                    &NativeEngine::new(),
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
                )
            })
        }
    };
}

export_conv1d!(s_conv1d, f32);
export_conv1d!(d_conv1d, f64);
export_conv1d!(c_conv1d, Complex32);
export_conv1d!(z_conv1d, Complex64);

export_conv2d!(s_conv2d, f32);
export_conv2d!(d_conv2d, f64);
export_conv2d!(c_conv2d, Complex32);
export_conv2d!(z_conv2d, Complex64);

/// Report a capability value; unknown selectors return -1.
#[no_mangle]
pub extern "C" fn convkit_query_capability(capability: c_int) -> c_int {
    match capability {
        CAPABILITY_REVISION => REVISION,
        CAPABILITY_CONVOLUTION_MAJOR => CONVOLUTION_VERSION.0,
        CAPABILITY_CONVOLUTION_MINOR => CONVOLUTION_VERSION.1,
        CAPABILITY_MAX_RANK => MAX_RANK as c_int,
        _ => -1,
    }
}

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Returns 0 when installed and 1 when a global subscriber already exists.
#[no_mangle]
pub extern "C" fn convkit_init_logging() -> c_int {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
