//! Provider facade over an engine covering all four element types.

use crate::dtype::ConvElement;
use crate::engine::ConvEngine;
use crate::entry::convolve_1d;
use crate::error::{ConvError, EngineError, Result, STATUS_VERIFY_FAILED};
use crate::native::NativeEngine;
use num_complex::{Complex32, Complex64};
use num_traits::One;

/// Engine implementing the task capability for every element type
pub trait CompleteEngine:
    ConvEngine<f32> + ConvEngine<f64> + ConvEngine<Complex32> + ConvEngine<Complex64>
{
}

impl<E> CompleteEngine for E where
    E: ConvEngine<f32> + ConvEngine<f64> + ConvEngine<Complex32> + ConvEngine<Complex64>
{
}

/// Provider lifecycle shared by all element types
pub trait ConvolutionProvider {
    /// Whether the provider can run at all. Verification may still fail.
    fn is_available(&self) -> bool;

    /// Check that the provider produces correct results for every element type.
    fn initialize_verify(&self) -> Result<()>;

    /// Release anything held between calls. Tasks never outlive a call, so
    /// nothing is held unless an engine caches plans.
    fn free_resources(&self) {}

    fn describe(&self) -> String;
}

/// 1-D convolution for one element type
pub trait Conv1dProvider<T: ConvElement> {
    /// Convolve `x` with `kernel`, filling `y` from index `x_offset` of the
    /// full convolution sequence.
    fn conv1d(&self, kernel: &[T], x: &[T], x_offset: i32, y: &mut [T]) -> Result<()>;
}

/// Provider backed by a task engine
#[derive(Debug, Clone, Default)]
pub struct EngineProvider<E> {
    engine: E,
}

impl<E> EngineProvider<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl EngineProvider<NativeEngine> {
    pub fn native() -> Self {
        Self::new(NativeEngine::new())
    }
}

fn length(operation: &str, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        ConvError::invalid_argument(operation, format!("length {len} exceeds the i32 range"))
    })
}

/// Convolve `[1, 1]` with `[1, 1]` and expect `[1, 2, 1]`.
fn self_test<T, E>(engine: &E) -> Result<()>
where
    T: ConvElement + One + PartialEq,
    E: ConvEngine<T>,
{
    let one = T::one();
    let two = one + one;
    let mut result = [T::zero(); 3];
    convolve_1d(engine, &[one, one], 2, &[one, one], 2, 0, &mut result, 3)?;
    if result != [one, two, one] {
        return Err(ConvError::TaskExecutionFailed(EngineError::new(
            STATUS_VERIFY_FAILED,
            "initialize_verify",
            format!("{} self-test produced {result:?}", T::DTYPE),
        )));
    }
    Ok(())
}

impl<E: CompleteEngine> ConvolutionProvider for EngineProvider<E> {
    fn is_available(&self) -> bool {
        true
    }

    fn initialize_verify(&self) -> Result<()> {
        self_test::<f32, E>(&self.engine)?;
        self_test::<f64, E>(&self.engine)?;
        self_test::<Complex32, E>(&self.engine)?;
        self_test::<Complex64, E>(&self.engine)?;
        tracing::debug!(
            engine = ConvEngine::<f64>::name(&self.engine),
            "convolution provider verified"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        ConvEngine::<f64>::describe(&self.engine)
    }
}

impl<T: ConvElement, E: ConvEngine<T>> Conv1dProvider<T> for EngineProvider<E> {
    fn conv1d(&self, kernel: &[T], x: &[T], x_offset: i32, y: &mut [T]) -> Result<()> {
        let result_length = length("conv1d", y.len())?;
        convolve_1d(
            &self.engine,
            kernel,
            length("conv1d", kernel.len())?,
            x,
            length("conv1d", x.len())?,
            x_offset,
            y,
            result_length,
        )
    }
}
