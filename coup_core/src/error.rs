use thiserror::Error;

/// Errors produced by the engine.
///
/// `IllegalEvent` is an expected, caller-facing rejection: the input state is
/// unchanged. `InvariantViolation` means a precondition that every guard should
/// already have ruled out held anyway -- it indicates an engine bug, not a
/// player mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("illegal event: {reason}")]
    IllegalEvent { reason: String },
    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },
}

impl EngineError {
    pub fn illegal(reason: impl Into<String>) -> EngineError {
        EngineError::IllegalEvent {
            reason: reason.into(),
        }
    }

    pub fn invariant(detail: impl Into<String>) -> EngineError {
        EngineError::InvariantViolation {
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
