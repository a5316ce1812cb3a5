//! # convkit - Linear Convolution Tasks for Rust
//!
//! convkit computes windows of the full linear convolution of a kernel with an
//! input signal, for real and complex single/double precision data in one and
//! two dimensions. Every call runs through a scoped task with four phases:
//!
//! - **Create** a task for the kernel, input and result shapes
//! - **Set start**, the offset of the result window into the full convolution
//! - **Execute** over row-major buffers
//! - **Destroy** the task, always, even when execution failed
//!
//! The outcome is a [`ConvolutionStatus`](prelude::ConvolutionStatus). A
//! destruction failure outranks an execution failure.
//!
//! ## Quick Start
//!
//! ### Raw entry points
//!
//! ```rust
//! use convkit::prelude::*;
//!
//! let engine = NativeEngine::new();
//! let mut result = [0.0f32; 5];
//! let status = s_conv1d(
//!     &engine,
//!     &[1.0, 1.0, 1.0], 3,
//!     &[1.0, 2.0, 3.0, 4.0, 5.0], 5,
//!     0,
//!     &mut result, 5,
//! );
//! assert!(status.is_success());
//! assert_eq!(result, [1.0, 3.0, 6.0, 9.0, 12.0]);
//! ```
//!
//! ### Padding modes
//!
//! ```rust
//! use convkit::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = NativeEngine::new();
//! let same = conv1d(&engine, &[0.5f64, -1.0, 0.3], &[12.0, 3.0, -5.0, 16.0], Padding::Same)?;
//! assert_eq!(same.len(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Engines
//!
//! The bundled [`NativeEngine`](prelude::NativeEngine) picks direct summation
//! or FFT evaluation per task, driven by
//! [`EngineConfig`](prelude::EngineConfig). Other backends plug in by
//! implementing [`ConvEngine`](prelude::ConvEngine).

#![deny(missing_docs)]
#![warn(clippy::all)]

pub use convkit_core as core;

/// Prelude module for convenient imports
///
/// ```rust
/// use convkit::prelude::*;
/// ```
pub mod prelude {
    // Status and errors
    pub use crate::core::{ConvError, ConvolutionStatus, EngineError};

    // Element types
    pub use crate::core::{Complex32, Complex64, ConvElement, DType};

    // Engines and tasks
    pub use crate::core::{ConvEngine, ConvMode, ConvTask, EngineConfig, NativeEngine};

    // Raw entry points
    pub use crate::core::{
        c_conv1d, c_conv2d, d_conv1d, d_conv2d, s_conv1d, s_conv2d, z_conv1d, z_conv2d,
    };

    // Padding-mode convenience
    pub use crate::core::{conv1d, conv1d_into, conv2d, conv2d_into, Padding, Padding2D};

    // Providers
    pub use crate::core::{Conv1dProvider, ConvolutionProvider, EngineProvider};
}

/// The version of convkit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version string of convkit
pub fn version() -> &'static str {
    VERSION
}
