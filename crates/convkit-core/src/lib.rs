//! # convkit-core
//!
//! Linear convolution of 1-D and 2-D arrays driven through a convolution
//! engine's task lifecycle: create a task, set its start offset, execute it
//! and destroy it.
//!
//! Four element types are supported (`f32`, `f64`, `Complex32`, `Complex64`)
//! through eight typed entry points named `{s,d,c,z}_conv{1,2}d`. Each one
//! reports a [`ConvolutionStatus`]; the task is released on every path that
//! created it.
//!
//! ```rust
//! use convkit_core::{s_conv1d, ConvolutionStatus, NativeEngine};
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
//! assert_eq!(status, ConvolutionStatus::Success);
//! assert_eq!(result, [1.0, 3.0, 6.0, 9.0, 12.0]);
//! ```

pub mod config;
pub mod descriptor;
pub mod dtype;
pub mod engine;
pub mod entry;
pub mod error;
pub mod native;
pub mod padding;
pub mod protocol;
pub mod provider;
pub mod task;

pub use config::EngineConfig;
pub use descriptor::{descriptor_1d, descriptor_2d, ConvDescriptor};
pub use dtype::{dtype_of, ConvElement, DType};
pub use engine::{ConvEngine, ConvMode};
pub use entry::{
    c_conv1d, c_conv2d, convolve_1d, convolve_2d, d_conv1d, d_conv2d, s_conv1d, s_conv2d,
    z_conv1d, z_conv2d,
};
pub use error::{ConvError, ConvolutionStatus, EngineError, Result};
pub use native::{Method, NativeEngine, NativeTask};
pub use num_complex::{Complex32, Complex64};
pub use padding::{conv1d, conv1d_into, conv2d, conv2d_into, Padding, Padding2D, Window};
pub use protocol::convolve_nd;
pub use provider::{CompleteEngine, Conv1dProvider, ConvolutionProvider, EngineProvider};
pub use task::ConvTask;
