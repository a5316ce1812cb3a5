//! Scoped ownership of one engine task.

use crate::descriptor::ConvDescriptor;
use crate::dtype::ConvElement;
use crate::engine::{ConvEngine, ConvMode};
use crate::error::{EngineError, STATUS_BAD_TASK};
use std::marker::PhantomData;

/// An engine task owned for the duration of one call.
///
/// Created by [`ConvTask::create`] and released exactly once: either
/// explicitly through [`ConvTask::destroy`], which reports the engine's
/// status, or by `Drop` when the owner unwinds without reaching it.
pub struct ConvTask<'e, T: ConvElement, E: ConvEngine<T>> {
    engine: &'e E,
    handle: Option<E::Task>,
    _element: PhantomData<T>,
}

impl<'e, T: ConvElement, E: ConvEngine<T>> ConvTask<'e, T, E> {
    /// Ask the engine for a task sized by `descriptor`.
    pub fn create(
        engine: &'e E,
        mode: ConvMode,
        descriptor: &ConvDescriptor,
    ) -> Result<Self, EngineError> {
        let handle = engine.new_task(
            mode,
            &descriptor.kernel_shape,
            &descriptor.x_shape,
            &descriptor.result_shape,
        )?;
        tracing::debug!(
            engine = engine.name(),
            dtype = %T::DTYPE,
            rank = descriptor.rank,
            kernel = ?descriptor.kernel_shape,
            x = ?descriptor.x_shape,
            result = ?descriptor.result_shape,
            "created convolution task"
        );
        Ok(Self {
            engine,
            handle: Some(handle),
            _element: PhantomData,
        })
    }

    pub fn set_start(&mut self, start: &[i32]) -> Result<(), EngineError> {
        let engine = self.engine;
        engine.set_start(self.handle_mut("set_start")?, start)
    }

    /// Run the task with the strides recorded in `descriptor`.
    pub fn execute(
        &mut self,
        descriptor: &ConvDescriptor,
        kernel: &[T],
        x: &[T],
        result: &mut [T],
    ) -> Result<(), EngineError> {
        let engine = self.engine;
        engine.execute(
            self.handle_mut("execute")?,
            kernel,
            &descriptor.kernel_strides,
            x,
            &descriptor.x_strides,
            result,
            &descriptor.result_strides,
        )
    }

    /// Release the task and report the engine's deletion status.
    pub fn destroy(mut self) -> Result<(), EngineError> {
        match self.handle.take() {
            Some(handle) => {
                let status = self.engine.delete_task(handle);
                tracing::debug!(
                    engine = self.engine.name(),
                    ok = status.is_ok(),
                    "destroyed convolution task"
                );
                status
            }
            None => Err(EngineError::new(
                STATUS_BAD_TASK,
                "delete_task",
                "task already released",
            )),
        }
    }

    fn handle_mut(&mut self, operation: &str) -> Result<&mut E::Task, EngineError> {
        self.handle
            .as_mut()
            .ok_or_else(|| EngineError::new(STATUS_BAD_TASK, operation, "task already released"))
    }
}

impl<T: ConvElement, E: ConvEngine<T>> Drop for ConvTask<'_, T, E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            match self.engine.delete_task(handle) {
                Ok(()) => tracing::warn!(
                    engine = self.engine.name(),
                    "convolution task released without explicit destroy"
                ),
                Err(e) => tracing::error!(
                    engine = self.engine.name(),
                    error = %e,
                    "failed to release convolution task on drop"
                ),
            }
        }
    }
}
