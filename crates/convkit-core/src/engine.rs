//! Capability exposed by a convolution engine.
//!
//! The engine owns the numerical kernel. Callers only see a task handle that
//! is created, configured with a start offset, executed once and deleted.

use crate::dtype::ConvElement;
use crate::error::EngineError;

/// Algorithm selection requested at task creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConvMode {
    /// Engine picks direct summation or a transform-domain method from the sizes.
    #[default]
    Auto,
    Direct,
    Fft,
}

/// Per-element-type convolution engine.
///
/// Implemented once per element type (or generically over [`ConvElement`]).
/// `Task` is opaque to callers; it is moved into [`ConvEngine::delete_task`]
/// so a deleted task cannot be touched again.
pub trait ConvEngine<T: ConvElement> {
    type Task;

    /// Short engine name used in log output.
    fn name(&self) -> &str;

    /// Human-readable description, defaulting to the name.
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn new_task(
        &self,
        mode: ConvMode,
        kernel_shape: &[i32],
        x_shape: &[i32],
        result_shape: &[i32],
    ) -> Result<Self::Task, EngineError>;

    fn set_start(&self, task: &mut Self::Task, start: &[i32]) -> Result<(), EngineError>;

    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        task: &mut Self::Task,
        kernel: &[T],
        kernel_strides: &[i32],
        x: &[T],
        x_strides: &[i32],
        result: &mut [T],
        result_strides: &[i32],
    ) -> Result<(), EngineError>;

    fn delete_task(&self, task: Self::Task) -> Result<(), EngineError>;
}

