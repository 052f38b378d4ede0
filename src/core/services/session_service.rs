//! Session-level mutations. Every session is addressed through its owning training.

use chrono::NaiveDate;

use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{Session, SessionDuration, Training, TrainingLedger};

pub struct SessionService;

impl SessionService {
    /// Appends a session with the next free id and returns that id.
    pub fn add(
        ledger: &mut TrainingLedger,
        training_id: &str,
        date: NaiveDate,
        time: impl Into<String>,
        duration: SessionDuration,
    ) -> ServiceResult<String> {
        let training = owning_training(ledger, training_id)?;
        let id = training.next_session_id();
        training.sessions.push(Session::new(id.clone(), date, time, duration));
        training.total_sessions = training.sessions.len() as u32;
        training.sort_sessions();
        Ok(id)
    }

    pub fn update<F>(ledger: &mut TrainingLedger, training_id: &str, session_id: &str, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Session),
    {
        let training = owning_training(ledger, training_id)?;
        let session = training
            .session_mut(session_id)
            .ok_or_else(|| missing(training_id, session_id))?;
        mutator(session);
        session.id = session_id.to_string();
        training.sort_sessions();
        Ok(())
    }

    /// Reschedules a session to another day.
    pub fn move_to(
        ledger: &mut TrainingLedger,
        training_id: &str,
        session_id: &str,
        date: NaiveDate,
    ) -> ServiceResult<()> {
        Self::update(ledger, training_id, session_id, |session| session.date = date)
    }

    pub fn set_validated(
        ledger: &mut TrainingLedger,
        training_id: &str,
        session_id: &str,
        validated: bool,
    ) -> ServiceResult<()> {
        Self::update(ledger, training_id, session_id, |session| {
            session.validated = Some(validated)
        })
    }

    pub fn remove(ledger: &mut TrainingLedger, training_id: &str, session_id: &str) -> ServiceResult<Session> {
        let training = owning_training(ledger, training_id)?;
        let index = training
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| missing(training_id, session_id))?;
        let removed = training.sessions.remove(index);
        training.total_sessions = training.sessions.len() as u32;
        Ok(removed)
    }
}

fn owning_training<'a>(ledger: &'a mut TrainingLedger, training_id: &str) -> Result<&'a mut Training, CoreError> {
    ledger
        .training_mut(training_id)
        .ok_or_else(|| CoreError::TrainingNotFound(training_id.to_string()))
}

fn missing(training_id: &str, session_id: &str) -> CoreError {
    CoreError::SessionNotFound {
        training_id: training_id.to_string(),
        session_id: session_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::ServiceError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> TrainingLedger {
        let training = Training::new("Course", "Ana", 30.0).with_id("course");
        TrainingLedger::new(vec![training], Vec::new())
    }

    #[test]
    fn add_assigns_sequential_ids_and_keeps_order() {
        let mut ledger = ledger();
        let later = SessionService::add(&mut ledger, "course", date(2026, 3, 9), "10:00 - 12:00", SessionDuration::from_hours(2)).unwrap();
        let earlier = SessionService::add(&mut ledger, "course", date(2026, 3, 2), "10:00 - 12:00", SessionDuration::from_hours(2)).unwrap();
        assert_eq!(later, "course-s0");
        assert_eq!(earlier, "course-s1");

        let training = ledger.training("course").unwrap();
        assert_eq!(training.sessions[0].id, "course-s1");
        assert_eq!(training.total_sessions, 2);
    }

    #[test]
    fn move_and_validate_session() {
        let mut ledger = ledger();
        let id = SessionService::add(&mut ledger, "course", date(2026, 3, 9), "", SessionDuration::from_hours(1)).unwrap();
        SessionService::move_to(&mut ledger, "course", &id, date(2026, 4, 1)).unwrap();
        SessionService::set_validated(&mut ledger, "course", &id, true).unwrap();

        let session = ledger.training("course").unwrap().session(&id).unwrap();
        assert_eq!(session.date, date(2026, 4, 1));
        assert!(session.is_validated());
    }

    #[test]
    fn unknown_session_is_reported() {
        let mut ledger = ledger();
        let err = SessionService::remove(&mut ledger, "course", "course-s9").expect_err("missing session");
        assert!(matches!(err, ServiceError::Core(CoreError::SessionNotFound { .. })));
        let err = SessionService::move_to(&mut ledger, "ghost", "x", date(2026, 1, 1)).expect_err("missing training");
        assert!(matches!(err, ServiceError::Core(CoreError::TrainingNotFound(_))));
    }
}
