//! The four-phase task protocol shared by every shape and element type.
//!
//! create -> set start -> execute -> destroy. Destruction runs whenever
//! creation succeeded, and its failure outranks an execution failure.

use crate::descriptor::ConvDescriptor;
use crate::dtype::ConvElement;
use crate::engine::{ConvEngine, ConvMode};
use crate::error::{ConvError, Result};
use crate::task::ConvTask;

/// Run one convolution task described by `descriptor`.
///
/// Buffers are not checked against the descriptor here; the engine reports a
/// mismatch as an execution failure. On error the contents of `result` are
/// unspecified.
pub fn convolve_nd<T, E>(
    engine: &E,
    descriptor: &ConvDescriptor,
    kernel: &[T],
    x: &[T],
    result: &mut [T],
) -> Result<()>
where
    T: ConvElement,
    E: ConvEngine<T>,
{
    let mut task = ConvTask::<T, E>::create(engine, ConvMode::Auto, descriptor)
        .map_err(ConvError::TaskCreationFailed)?;

    // The start offset is configured fire-and-forget. A rejected offset
    // surfaces through execution instead.
    if let Err(e) = task.set_start(&descriptor.start) {
        tracing::warn!(error = %e, start = ?descriptor.start, "start offset not accepted");
    }

    let executed = task.execute(descriptor, kernel, x, result);

    task.destroy().map_err(ConvError::TaskDestructionFailed)?;
    executed.map_err(ConvError::TaskExecutionFailed)
}
