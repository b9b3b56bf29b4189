use crate::session::CaptureStage;

/// Errors returned by the capture and fulfilment core.
///
/// Every variant is a caller contract violation. The core performs no I/O, so nothing here is
/// transient and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cannot {operation} while the capture session is in {stage}")]
    InvalidStateTransition {
        operation: &'static str,
        stage: CaptureStage,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
