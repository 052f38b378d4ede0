#![allow(dead_code)]

use chrono::NaiveDate;
use trainer_ledger::domain::{DateRange, Session, SessionDuration, Training, YearMonth};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn months(start: (i32, u32), end: (i32, u32)) -> DateRange {
    DateRange::from_months(
        YearMonth::new(start.0, start.1).expect("valid month"),
        YearMonth::new(end.0, end.1).expect("valid month"),
    )
}

/// A training whose sessions are `(date, hours)` pairs.
pub fn training(id: &str, rate: f64, extra: Option<f64>, slots: &[(NaiveDate, u32)]) -> Training {
    let sessions = slots
        .iter()
        .enumerate()
        .map(|(index, (day, hours))| {
            Session::new(
                format!("{id}-s{index}"),
                *day,
                "10:00 - 12:00",
                SessionDuration::from_hours(*hours),
            )
        })
        .collect();
    let mut training = Training::new(id, "Instructor", rate)
        .with_id(id)
        .with_sessions(sessions);
    training.extra_value = extra;
    training
}
