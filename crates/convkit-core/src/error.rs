use thiserror::Error;

/// Engine status reported for a task that was not found or already released.
pub const STATUS_BAD_TASK: i32 = -1;
/// Engine status for a rank or size descriptor the engine refuses.
pub const STATUS_BAD_SHAPE: i32 = -2;
/// Engine status for a start offset with the wrong number of components.
pub const STATUS_BAD_START: i32 = -3;
/// Engine status for a non-positive or inconsistent stride.
pub const STATUS_BAD_STRIDE: i32 = -4;
/// Engine status for a buffer shorter than its descriptor requires.
pub const STATUS_BAD_BUFFER: i32 = -5;
/// Engine status for a task whose output failed verification.
pub const STATUS_VERIFY_FAILED: i32 = -6;

/// Failure reported by a convolution engine for one task phase
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("engine status {code} in '{operation}': {reason}")]
pub struct EngineError {
    pub code: i32,
    pub operation: String,
    pub reason: String,
}

impl EngineError {
    pub fn new(code: i32, operation: &str, reason: impl Into<String>) -> Self {
        Self {
            code,
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn bad_shape(operation: &str, reason: impl Into<String>) -> Self {
        Self::new(STATUS_BAD_SHAPE, operation, reason)
    }

    pub fn bad_start(operation: &str, reason: impl Into<String>) -> Self {
        Self::new(STATUS_BAD_START, operation, reason)
    }

    pub fn bad_stride(operation: &str, reason: impl Into<String>) -> Self {
        Self::new(STATUS_BAD_STRIDE, operation, reason)
    }

    pub fn bad_buffer(operation: &str, reason: impl Into<String>) -> Self {
        Self::new(STATUS_BAD_BUFFER, operation, reason)
    }
}

/// Errors surfaced by convolution calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvError {
    #[error("convolution task creation failed")]
    TaskCreationFailed(#[source] EngineError),

    #[error("convolution task execution failed")]
    TaskExecutionFailed(#[source] EngineError),

    #[error("convolution task destruction failed")]
    TaskDestructionFailed(#[source] EngineError),

    #[error("Invalid argument in operation '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },
}

impl ConvError {
    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    /// Status code this error is reported as across the call boundary.
    ///
    /// `InvalidArgument` is only produced before a task exists, so it shares
    /// the creation code.
    pub fn status(&self) -> ConvolutionStatus {
        match self {
            ConvError::TaskCreationFailed(_) | ConvError::InvalidArgument { .. } => {
                ConvolutionStatus::TaskCreationFailed
            }
            ConvError::TaskExecutionFailed(_) => ConvolutionStatus::TaskExecutionFailed,
            ConvError::TaskDestructionFailed(_) => ConvolutionStatus::TaskDestructionFailed,
        }
    }

    /// Underlying engine failure, if the error came from the engine.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            ConvError::TaskCreationFailed(e)
            | ConvError::TaskExecutionFailed(e)
            | ConvError::TaskDestructionFailed(e) => Some(e),
            ConvError::InvalidArgument { .. } => None,
        }
    }
}

/// Result type for convolution operations
pub type Result<T> = std::result::Result<T, ConvError>;

/// Integer status returned by the typed entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ConvolutionStatus {
    Success = 0,
    TaskCreationFailed = 1,
    TaskExecutionFailed = 2,
    TaskDestructionFailed = 3,
}

impl ConvolutionStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ConvolutionStatus::Success),
            1 => Some(ConvolutionStatus::TaskCreationFailed),
            2 => Some(ConvolutionStatus::TaskExecutionFailed),
            3 => Some(ConvolutionStatus::TaskDestructionFailed),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == ConvolutionStatus::Success
    }
}

impl From<Result<()>> for ConvolutionStatus {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => ConvolutionStatus::Success,
            Err(e) => e.status(),
        }
    }
}

impl std::fmt::Display for ConvolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConvolutionStatus::Success => "success",
            ConvolutionStatus::TaskCreationFailed => "task creation failed",
            ConvolutionStatus::TaskExecutionFailed => "task execution failed",
            ConvolutionStatus::TaskDestructionFailed => "task destruction failed",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(ConvolutionStatus::Success.code(), 0);
        assert_eq!(ConvolutionStatus::TaskCreationFailed.code(), 1);
        assert_eq!(ConvolutionStatus::TaskExecutionFailed.code(), 2);
        assert_eq!(ConvolutionStatus::TaskDestructionFailed.code(), 3);
        for code in 0..4 {
            assert_eq!(ConvolutionStatus::from_code(code).unwrap().code(), code);
        }
        assert_eq!(ConvolutionStatus::from_code(4), None);
        assert_eq!(ConvolutionStatus::from_code(-1), None);
    }

    #[test]
    fn test_error_to_status() {
        let engine = EngineError::bad_shape("new_task", "rank 3");
        assert_eq!(
            ConvError::TaskCreationFailed(engine.clone()).status(),
            ConvolutionStatus::TaskCreationFailed
        );
        assert_eq!(
            ConvError::TaskExecutionFailed(engine.clone()).status(),
            ConvolutionStatus::TaskExecutionFailed
        );
        assert_eq!(
            ConvError::TaskDestructionFailed(engine).status(),
            ConvolutionStatus::TaskDestructionFailed
        );
        assert_eq!(
            ConvolutionStatus::from(Ok(())),
            ConvolutionStatus::Success
        );
    }

    #[test]
    fn test_engine_reason_is_reported_once_through_source() {
        use std::error::Error;

        let err = ConvError::TaskExecutionFailed(EngineError::bad_buffer("execute", "x too short"));
        assert_eq!(err.to_string(), "convolution task execution failed");
        let source = err.source().map(|e| e.to_string()).unwrap_or_default();
        assert!(source.contains("x too short"));
        assert_eq!(err.engine_error().map(|e| e.code), Some(STATUS_BAD_BUFFER));
    }
}
