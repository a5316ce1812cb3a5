//! Pure-Rust convolution engine.
//!
//! Implements the task capability for all four element types. A task computes
//! the natural (full) linear convolution `z[i] = Σ_j x[j]·h[i−j]` and writes
//! `result[i] = z[i + start]`, with zero wherever `i + start` lies outside the
//! full index space.
//!
//! 1-D tasks are evaluated as 2-D tasks with a single row.

mod direct;
mod fft;

use crate::config::EngineConfig;
use crate::dtype::ConvElement;
use crate::engine::{ConvEngine, ConvMode};
use crate::error::{EngineError, STATUS_BAD_TASK};

/// Highest rank accepted by the engine.
pub const MAX_RANK: usize = 2;

/// Engine revision reported through capability queries.
pub const REVISION: i32 = 1;
/// Convolution capability version (major, minor).
pub const CONVOLUTION_VERSION: (i32, i32) = (1, 0);

/// Evaluation method chosen for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Direct,
    Fft,
}

/// Native engine task state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTask {
    rank: usize,
    method: Method,
    kernel_dims: [usize; 2],
    x_dims: [usize; 2],
    result_dims: [usize; 2],
    start: [i64; 2],
}

impl NativeTask {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn start(&self) -> &[i64] {
        &self.start[MAX_RANK - self.rank..]
    }
}

/// A 2-D view over a flat buffer: dimensions plus element strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Plane {
    pub rows: usize,
    pub cols: usize,
    pub row_stride: usize,
    pub col_stride: usize,
}

impl Plane {
    fn new(dims: [usize; 2], strides: [usize; 2]) -> Self {
        Self {
            rows: dims[0],
            cols: dims[1],
            row_stride: strides[0],
            col_stride: strides[1],
        }
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.row_stride + col * self.col_stride
    }

    /// Minimum buffer length addressed by this view.
    fn extent(&self) -> Option<usize> {
        let last_row = (self.rows - 1).checked_mul(self.row_stride)?;
        let last_col = (self.cols - 1).checked_mul(self.col_stride)?;
        last_row.checked_add(last_col)?.checked_add(1)
    }
}

/// Reference engine evaluating tasks by direct summation or FFT
#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    config: EngineConfig,
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn describe(&self) -> String {
        format!(
            "convkit native engine r{REVISION} (conv v{}.{}, fft from {} kernel elements)",
            CONVOLUTION_VERSION.0, CONVOLUTION_VERSION.1, self.config.fft_min_kernel
        )
    }

    fn select_method(
        &self,
        mode: ConvMode,
        kernel: [usize; 2],
        x: [usize; 2],
        result: [usize; 2],
    ) -> Method {
        match mode {
            ConvMode::Direct => Method::Direct,
            ConvMode::Fft => Method::Fft,
            ConvMode::Auto => {
                let kernel_elements = kernel[0].saturating_mul(kernel[1]);
                let result_elements = result[0].saturating_mul(result[1]);
                let full_elements = (kernel[0] + x[0] - 1).saturating_mul(kernel[1] + x[1] - 1);
                if self
                    .config
                    .prefers_fft(kernel_elements, result_elements, full_elements)
                {
                    Method::Fft
                } else {
                    Method::Direct
                }
            }
        }
    }
}

/// Lift a rank-1 or rank-2 shape to 2-D, refusing non-positive sizes.
fn lift_dims(name: &str, shape: &[i32], rank: usize) -> Result<[usize; 2], EngineError> {
    if shape.len() != rank {
        return Err(EngineError::bad_shape(
            "new_task",
            format!("{name} has {} dimensions, expected {rank}", shape.len()),
        ));
    }
    let mut dims = [1usize; 2];
    for (axis, &len) in shape.iter().enumerate() {
        if len <= 0 {
            return Err(EngineError::bad_shape(
                "new_task",
                format!("{name} length {len} along axis {axis} must be positive"),
            ));
        }
        dims[MAX_RANK - rank + axis] = len as usize;
    }
    Ok(dims)
}

fn lift_strides(name: &str, strides: &[i32], rank: usize) -> Result<[usize; 2], EngineError> {
    if strides.len() != rank {
        return Err(EngineError::bad_stride(
            "execute",
            format!("{name} has {} strides, expected {rank}", strides.len()),
        ));
    }
    let mut lifted = [0usize; 2];
    for (axis, &stride) in strides.iter().enumerate() {
        if stride <= 0 {
            return Err(EngineError::bad_stride(
                "execute",
                format!("{name} stride {stride} along axis {axis} must be positive"),
            ));
        }
        lifted[MAX_RANK - rank + axis] = stride as usize;
    }
    Ok(lifted)
}

fn checked_plane(
    name: &str,
    dims: [usize; 2],
    strides: &[i32],
    rank: usize,
    available: usize,
) -> Result<Plane, EngineError> {
    let plane = Plane::new(dims, lift_strides(name, strides, rank)?);
    match plane.extent() {
        Some(needed) if needed <= available => Ok(plane),
        Some(needed) => Err(EngineError::bad_buffer(
            "execute",
            format!("{name} buffer holds {available} elements, descriptor needs {needed}"),
        )),
        None => Err(EngineError::bad_buffer(
            "execute",
            format!("{name} descriptor addresses more elements than fit in memory"),
        )),
    }
}

impl<T: ConvElement> ConvEngine<T> for NativeEngine {
    type Task = NativeTask;

    fn name(&self) -> &str {
        "native"
    }

    fn describe(&self) -> String {
        NativeEngine::describe(self)
    }

    fn new_task(
        &self,
        mode: ConvMode,
        kernel_shape: &[i32],
        x_shape: &[i32],
        result_shape: &[i32],
    ) -> Result<NativeTask, EngineError> {
        let rank = kernel_shape.len();
        if rank == 0 || rank > MAX_RANK {
            return Err(EngineError::bad_shape(
                "new_task",
                format!("rank {rank} is not supported (1..={MAX_RANK})"),
            ));
        }
        let kernel_dims = lift_dims("kernel", kernel_shape, rank)?;
        let x_dims = lift_dims("x", x_shape, rank)?;
        let result_dims = lift_dims("result", result_shape, rank)?;
        let method = self.select_method(mode, kernel_dims, x_dims, result_dims);
        tracing::trace!(?method, rank, "native task sized");
        Ok(NativeTask {
            rank,
            method,
            kernel_dims,
            x_dims,
            result_dims,
            start: [0; 2],
        })
    }

    fn set_start(&self, task: &mut NativeTask, start: &[i32]) -> Result<(), EngineError> {
        if start.len() != task.rank {
            return Err(EngineError::bad_start(
                "set_start",
                format!("{} offsets given for a rank {} task", start.len(), task.rank),
            ));
        }
        let mut lifted = [0i64; 2];
        for (axis, &offset) in start.iter().enumerate() {
            lifted[MAX_RANK - task.rank + axis] = offset as i64;
        }
        task.start = lifted;
        Ok(())
    }

    fn execute(
        &self,
        task: &mut NativeTask,
        kernel: &[T],
        kernel_strides: &[i32],
        x: &[T],
        x_strides: &[i32],
        result: &mut [T],
        result_strides: &[i32],
    ) -> Result<(), EngineError> {
        let rank = task.rank;
        let kp = checked_plane("kernel", task.kernel_dims, kernel_strides, rank, kernel.len())?;
        let xp = checked_plane("x", task.x_dims, x_strides, rank, x.len())?;
        let rp = checked_plane("result", task.result_dims, result_strides, rank, result.len())?;
        match task.method {
            Method::Direct => {
                direct::convolve(kernel, kp, x, xp, result, rp, task.start);
                Ok(())
            }
            Method::Fft => fft::convolve(kernel, kp, x, xp, result, rp, task.start),
        }
    }

    fn delete_task(&self, task: NativeTask) -> Result<(), EngineError> {
        if task.rank == 0 || task.rank > MAX_RANK {
            return Err(EngineError::new(
                STATUS_BAD_TASK,
                "delete_task",
                "task was not created by this engine",
            ));
        }
        Ok(())
    }
}
