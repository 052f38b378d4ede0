use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Training not found: {0}")]
    TrainingNotFound(String),
    #[error("Session not found: {session_id} (training {training_id})")]
    SessionNotFound {
        training_id: String,
        session_id: String,
    },
    #[error("Adjustment not found: {0}")]
    AdjustmentNotFound(String),
    #[error("Duplicate id: {0}")]
    Duplicate(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
