pub mod adjustment_service;
pub mod session_service;
pub mod summary_service;
pub mod training_service;

pub use adjustment_service::AdjustmentService;
pub use session_service::SessionService;
pub use summary_service::SummaryService;
pub use training_service::TrainingService;

use crate::core::errors::CoreError;
use crate::core::schedule::ScheduleError;
use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ServiceError {
    /// The mutation-layer error, if this is one.
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            ServiceError::Core(err) => Some(err),
            _ => None,
        }
    }
}

pub(crate) fn ensure_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!("{field} cannot be negative")));
    }
    Ok(())
}
