//! Expands a weekly recurrence pattern into concrete sessions.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use thiserror::Error;

use crate::domain::{Session, SessionDuration};

/// How many days ahead of the start date the expansion looks before giving up.
pub const SCHEDULE_LOOKAHEAD_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub training_id: String,
    pub start_date: NaiveDate,
    pub weekdays: Vec<Weekday>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub target_sessions: u32,
}

impl ScheduleRequest {
    /// `"HH:MM - HH:MM"` label shared by every generated session.
    pub fn time_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    pub fn session_duration(&self) -> SessionDuration {
        let minutes = (self.end_time - self.start_time).num_minutes().max(0);
        SessionDuration::from_hours((minutes / 60) as u32)
    }

    pub fn weekday_summary(&self) -> String {
        self.weekdays
            .iter()
            .map(|day| day.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("session end {end} must be after start {start}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },
}

/// Walks forward day by day from the start date, emitting a session on each
/// selected weekday until the target count or the lookahead limit is reached.
pub fn generate_schedule_sessions(request: &ScheduleRequest) -> Result<Vec<Session>, ScheduleError> {
    if request.end_time <= request.start_time {
        return Err(ScheduleError::InvalidTimeRange {
            start: request.start_time,
            end: request.end_time,
        });
    }

    let target = request.target_sessions as usize;
    let mut sessions = Vec::with_capacity(target);
    if request.weekdays.is_empty() || target == 0 {
        return Ok(sessions);
    }

    let duration = request.session_duration();
    let time = request.time_label();
    let mut offset = 0;
    while sessions.len() < target && offset < SCHEDULE_LOOKAHEAD_DAYS {
        let date = request.start_date + Duration::days(offset);
        if request.weekdays.contains(&date.weekday()) {
            let id = format!("{}-s{}", request.training_id, sessions.len());
            sessions.push(Session::new(id, date, time.clone(), duration));
        }
        offset += 1;
    }

    if sessions.len() < target {
        tracing::debug!(
            training = %request.training_id,
            generated = sessions.len(),
            target,
            "schedule lookahead exhausted before reaching target"
        );
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(weekdays: Vec<Weekday>, target: u32) -> ScheduleRequest {
        ScheduleRequest {
            training_id: "course".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            weekdays,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            target_sessions: target,
        }
    }

    #[test]
    fn monday_wednesday_pattern_alternates() {
        let sessions = generate_schedule_sessions(&request(vec![Weekday::Mon, Weekday::Wed], 4)).unwrap();
        let weekdays: Vec<Weekday> = sessions.iter().map(|s| s.date.weekday()).collect();
        assert_eq!(weekdays, vec![Weekday::Mon, Weekday::Wed, Weekday::Mon, Weekday::Wed]);
        assert!(sessions.iter().all(|s| s.duration.label() == "2h"));
        assert!(sessions.iter().all(|s| s.time == "10:00 - 12:00"));
        assert_eq!(sessions[3].id, "course-s3");
        assert_eq!(sessions[3].date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    }

    #[test]
    fn lookahead_caps_generated_sessions() {
        let sessions = generate_schedule_sessions(&request(vec![Weekday::Fri], 100)).unwrap();
        assert_eq!(sessions.len(), 52);
    }

    #[test]
    fn empty_weekdays_generate_nothing() {
        assert!(generate_schedule_sessions(&request(Vec::new(), 4)).unwrap().is_empty());
    }

    #[test]
    fn inverted_times_are_rejected() {
        let mut req = request(vec![Weekday::Mon], 2);
        req.end_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(matches!(
            generate_schedule_sessions(&req),
            Err(ScheduleError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn partial_hours_are_truncated() {
        let mut req = request(vec![Weekday::Mon], 1);
        req.end_time = NaiveTime::from_hms_opt(12, 45, 0).unwrap();
        let sessions = generate_schedule_sessions(&req).unwrap();
        assert_eq!(sessions[0].duration.whole_hours(), 2);
        assert_eq!(sessions[0].time, "10:00 - 12:45");
    }
}
