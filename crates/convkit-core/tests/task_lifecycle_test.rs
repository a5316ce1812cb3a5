use convkit_core::{
    convolve_nd, d_conv1d, descriptor_1d, s_conv1d, s_conv2d, z_conv1d, Complex64, ConvElement,
    ConvEngine, ConvError, ConvMode, ConvTask, ConvolutionStatus, EngineError, NativeEngine,
    NativeTask,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Native engine wrapped with call counters and failure switches.
#[derive(Default)]
struct CountingEngine {
    inner: NativeEngine,
    created: AtomicUsize,
    executed: AtomicUsize,
    destroyed: AtomicUsize,
    fail_execute: AtomicBool,
    fail_delete: AtomicBool,
    panic_execute: AtomicBool,
}

impl CountingEngine {
    fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl<T: ConvElement> ConvEngine<T> for CountingEngine {
    type Task = NativeTask;

    fn name(&self) -> &str {
        "counting"
    }

    fn new_task(
        &self,
        mode: ConvMode,
        kernel_shape: &[i32],
        x_shape: &[i32],
        result_shape: &[i32],
    ) -> Result<NativeTask, EngineError> {
        let task =
            ConvEngine::<T>::new_task(&self.inner, mode, kernel_shape, x_shape, result_shape)?;
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(task)
    }

    fn set_start(&self, task: &mut NativeTask, start: &[i32]) -> Result<(), EngineError> {
        ConvEngine::<T>::set_start(&self.inner, task, start)
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
        self.executed.fetch_add(1, Ordering::SeqCst);
        if self.panic_execute.load(Ordering::SeqCst) {
            panic!("engine fault");
        }
        if self.fail_execute.load(Ordering::SeqCst) {
            return Err(EngineError::bad_buffer("execute", "injected"));
        }
        self.inner.execute(
            task,
            kernel,
            kernel_strides,
            x,
            x_strides,
            result,
            result_strides,
        )
    }

    fn delete_task(&self, task: NativeTask) -> Result<(), EngineError> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        ConvEngine::<T>::delete_task(&self.inner, task)?;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(EngineError::new(-99, "delete_task", "injected"));
        }
        Ok(())
    }
}

#[test]
fn test_create_and_destroy_counts_match_across_calls() {
    let engine = CountingEngine::default();
    let mut out = [0.0f32; 6];

    // success
    assert!(s_conv1d(&engine, &[1.0; 3], 3, &[1.0; 4], 4, 0, &mut out, 6).is_success());
    // creation refused: no task, nothing to destroy
    assert_eq!(
        s_conv1d(&engine, &[1.0; 3], 0, &[1.0; 4], 4, 0, &mut out, 6),
        ConvolutionStatus::TaskCreationFailed
    );
    // execution refused by a short buffer
    assert_eq!(
        s_conv1d(&engine, &[1.0; 3], 3, &[1.0; 4], 4, 0, &mut out, 7),
        ConvolutionStatus::TaskExecutionFailed
    );
    // 2-D call on the same engine
    assert!(s_conv2d(&engine, &[1.0; 2], 1, 2, &[1.0; 3], 1, 3, 0, 0, &mut out, 1, 4).is_success());

    assert_eq!(engine.created(), 3);
    assert_eq!(engine.destroyed(), engine.created());
    assert_eq!(engine.executed(), 3);
}

#[test]
fn test_creation_failure_never_executes_or_destroys() {
    let engine = CountingEngine::default();
    let mut out = [0.0f64; 3];
    let status = d_conv1d(&engine, &[], 0, &[], 0, 0, &mut out, 3);
    assert_eq!(status, ConvolutionStatus::TaskCreationFailed);
    assert_eq!(engine.created(), 0);
    assert_eq!(engine.executed(), 0);
    assert_eq!(engine.destroyed(), 0);
}

#[test]
fn test_execution_failure_reported_after_destroy() {
    let engine = CountingEngine::default();
    engine.fail_execute.store(true, Ordering::SeqCst);
    let mut out = [0.0f64; 3];
    let status = d_conv1d(&engine, &[1.0], 1, &[1.0; 3], 3, 0, &mut out, 3);
    assert_eq!(status, ConvolutionStatus::TaskExecutionFailed);
    assert_eq!(engine.destroyed(), 1);
}

#[test]
fn test_destruction_failure_takes_priority() {
    let engine = CountingEngine::default();
    engine.fail_execute.store(true, Ordering::SeqCst);
    engine.fail_delete.store(true, Ordering::SeqCst);
    let mut out = [Complex64::new(0.0, 0.0); 2];
    let one = [Complex64::new(1.0, 0.0); 2];
    let status = z_conv1d(&engine, &one, 2, &one, 2, 0, &mut out, 2);
    assert_eq!(status, ConvolutionStatus::TaskDestructionFailed);
    assert_eq!(engine.destroyed(), 1);

    engine.fail_execute.store(false, Ordering::SeqCst);
    let status = z_conv1d(&engine, &one, 2, &one, 2, 0, &mut out, 2);
    assert_eq!(status, ConvolutionStatus::TaskDestructionFailed);
    assert_eq!(engine.destroyed(), 2);
}

#[test]
fn test_destruction_error_carries_engine_status() {
    let engine = CountingEngine::default();
    engine.fail_delete.store(true, Ordering::SeqCst);
    let d = descriptor_1d(1, 1, 0, 1);
    let mut out = [0.0f32; 1];
    let err = convolve_nd(&engine, &d, &[2.0], &[3.0], &mut out).unwrap_err();
    match err {
        ConvError::TaskDestructionFailed(e) => assert_eq!(e.code, -99),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_task_released_when_execution_panics() {
    let engine = CountingEngine::default();
    engine.panic_execute.store(true, Ordering::SeqCst);
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut out = [0.0f32; 3];
        s_conv1d(&engine, &[1.0], 1, &[1.0; 3], 3, 0, &mut out, 3)
    }));
    assert!(outcome.is_err());
    assert_eq!(engine.created(), 1);
    assert_eq!(engine.destroyed(), 1);
}

#[test]
fn test_explicit_destroy_releases_once() {
    let engine = CountingEngine::default();
    let d = descriptor_1d(2, 2, 0, 3);
    let task = ConvTask::<f64, _>::create(&engine, ConvMode::Auto, &d).unwrap();
    task.destroy().unwrap();
    assert_eq!(engine.destroyed(), 1);

    // Dropped without destroy: released by Drop.
    {
        let _task = ConvTask::<f64, _>::create(&engine, ConvMode::Auto, &d).unwrap();
    }
    assert_eq!(engine.created(), 2);
    assert_eq!(engine.destroyed(), 2);
}

#[test]
fn test_concurrent_calls_use_independent_tasks() {
    let engine = CountingEngine::default();
    std::thread::scope(|scope| {
        for t in 0..8 {
            let engine = &engine;
            scope.spawn(move || {
                let x: Vec<f64> = (0..32).map(|i| (i + t) as f64).collect();
                for _ in 0..25 {
                    let mut out = vec![0.0f64; 32];
                    let status = d_conv1d(engine, &[1.0, -1.0], 2, &x, 32, 1, &mut out, 32);
                    assert!(status.is_success());
                    // First difference of a ramp, then the trailing edge.
                    assert!(out[..31].iter().all(|&v| v == 1.0));
                    assert_eq!(out[31], -((31 + t) as f64));
                }
            });
        }
    });
    assert_eq!(engine.created(), 200);
    assert_eq!(engine.destroyed(), 200);
}
