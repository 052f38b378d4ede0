//! Business logic helpers for managing trainings.

use crate::core::errors::CoreError;
use crate::core::schedule::{generate_schedule_sessions, ScheduleRequest};
use crate::core::services::{ensure_amount, ServiceResult};
use crate::domain::{Training, TrainingLedger};

/// Provides validated CRUD helpers for ledger trainings.
pub struct TrainingService;

impl TrainingService {
    /// Adds a new training and returns its identifier.
    pub fn add(ledger: &mut TrainingLedger, mut training: Training) -> ServiceResult<String> {
        Self::validate(&training)?;
        if ledger.training(&training.id).is_some() {
            return Err(CoreError::Duplicate(training.id).into());
        }
        training.sort_sessions();
        let id = training.id.clone();
        tracing::debug!(training = %id, sessions = training.sessions.len(), "training added");
        ledger.trainings.push(training);
        Ok(id)
    }

    /// Builds the sessions from `request` and adds the training with them.
    ///
    /// The request's training id is replaced by the training's own id so
    /// generated session ids always belong to it.
    pub fn add_scheduled(
        ledger: &mut TrainingLedger,
        training: Training,
        request: &ScheduleRequest,
    ) -> ServiceResult<String> {
        let request = ScheduleRequest {
            training_id: training.id.clone(),
            ..request.clone()
        };
        let sessions = generate_schedule_sessions(&request)?;
        let mut training = training.with_sessions(sessions);
        if training.schedule.is_empty() {
            training.schedule = format!("{} {}", request.weekday_summary(), request.time_label());
        }
        Self::add(ledger, training)
    }

    /// Updates the training identified by `id` via the provided mutator.
    ///
    /// The mutator works on a copy; nothing changes unless the result validates.
    pub fn update<F>(ledger: &mut TrainingLedger, id: &str, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Training),
    {
        let current = ledger
            .training_mut(id)
            .ok_or_else(|| CoreError::TrainingNotFound(id.to_string()))?;
        let mut draft = current.clone();
        mutator(&mut draft);
        if draft.id != id {
            return Err(CoreError::InvalidOperation("training ids cannot be changed".into()).into());
        }
        Self::validate(&draft)?;
        draft.sort_sessions();
        *current = draft;
        Ok(())
    }

    /// Removes the training and every session it owns.
    pub fn remove(ledger: &mut TrainingLedger, id: &str) -> ServiceResult<Training> {
        let index = ledger
            .trainings
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TrainingNotFound(id.to_string()))?;
        Ok(ledger.trainings.remove(index))
    }

    pub fn set_rate(ledger: &mut TrainingLedger, id: &str, hourly_rate: f64) -> ServiceResult<()> {
        Self::update(ledger, id, |training| training.hourly_rate = hourly_rate)
    }

    /// Sets or clears the flat extra.
    pub fn set_extra(ledger: &mut TrainingLedger, id: &str, extra: Option<f64>) -> ServiceResult<()> {
        Self::update(ledger, id, |training| training.extra_value = extra)
    }

    pub fn find<'a>(ledger: &'a TrainingLedger, id: &str) -> ServiceResult<&'a Training> {
        Ok(ledger
            .training(id)
            .ok_or_else(|| CoreError::TrainingNotFound(id.to_string()))?)
    }

    fn validate(training: &Training) -> Result<(), CoreError> {
        if training.name.trim().is_empty() {
            return Err(CoreError::Validation("training name cannot be empty".into()));
        }
        ensure_amount("hourly rate", training.hourly_rate)?;
        if let Some(extra) = training.extra_value {
            ensure_amount("extra value", extra)?;
        }
        Ok(())
    }
}
