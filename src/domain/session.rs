use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::calendar::flexible_date;
use crate::domain::common::{Displayable, Identifiable};

const MINUTES_PER_HOUR: u32 = 60;
/// A session happens within one day.
const MAX_SESSION_HOURS: u32 = 24;

/// Length of a session, stored in minutes and consumed in whole hours.
///
/// Persisted as the label `"<hours>h"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionDuration {
    minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("duration `{0}` does not start with a whole number of hours")]
    Malformed(String),
    #[error("duration `{0}` has fractional hours, which are not supported")]
    Fractional(String),
    #[error("duration `{0}` is longer than {MAX_SESSION_HOURS} hours")]
    TooLong(String),
}

impl SessionDuration {
    pub const ZERO: SessionDuration = SessionDuration { minutes: 0 };

    /// Saturates instead of overflowing; [`SessionDuration::parse`] rejects such values.
    pub fn from_hours(hours: u32) -> Self {
        Self {
            minutes: hours.saturating_mul(MINUTES_PER_HOUR),
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Truncated hour count used by every income and workload calculation.
    pub fn whole_hours(&self) -> u32 {
        self.minutes / MINUTES_PER_HOUR
    }

    pub fn label(&self) -> String {
        format!("{}h", self.whole_hours())
    }

    /// Parses labels such as `"2h"`, `"2"` or `"2 h"`.
    pub fn parse(raw: &str) -> Result<Self, DurationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DurationError::Empty);
        }
        let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(DurationError::Malformed(trimmed.to_string()));
        }
        let rest = trimmed[digits.len()..].trim_start();
        if rest.starts_with(['.', ',']) && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return Err(DurationError::Fractional(trimmed.to_string()));
        }
        if !(rest.is_empty() || rest.eq_ignore_ascii_case("h")) {
            return Err(DurationError::Malformed(trimmed.to_string()));
        }
        // Digit runs too long for u32 are as unusable as any other oversized value.
        match digits.parse::<u32>() {
            Ok(hours) if hours <= MAX_SESSION_HOURS => Ok(Self::from_hours(hours)),
            _ => Err(DurationError::TooLong(trimmed.to_string())),
        }
    }

    /// Parse used when hydrating persisted data: unreadable labels count as zero.
    pub fn parse_lenient(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(duration) => duration,
            Err(err) => {
                tracing::warn!(duration = raw, error = %err, "treating session duration as zero");
                Self::ZERO
            }
        }
    }
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for SessionDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for SessionDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// A single dated occurrence of a training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    /// Display-only time range, e.g. `"10:00 - 12:00"`.
    pub time: String,
    pub duration: SessionDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated: Option<bool>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
        duration: SessionDuration,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            time: time.into(),
            duration,
            validated: None,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated.unwrap_or(false)
    }
}

impl Identifiable for Session {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Session {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.date, self.time, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_leading_hours() {
        assert_eq!(SessionDuration::parse("2h").unwrap().whole_hours(), 2);
        assert_eq!(SessionDuration::parse(" 9 h ").unwrap().whole_hours(), 9);
        assert_eq!(SessionDuration::parse("4").unwrap().whole_hours(), 4);
    }

    #[test]
    fn parse_reports_explicit_failures() {
        assert_eq!(SessionDuration::parse(""), Err(DurationError::Empty));
        assert!(matches!(
            SessionDuration::parse("1.5h"),
            Err(DurationError::Fractional(_))
        ));
        assert!(matches!(
            SessionDuration::parse("two hours"),
            Err(DurationError::Malformed(_))
        ));
        assert!(matches!(
            SessionDuration::parse("-2h"),
            Err(DurationError::Malformed(_))
        ));
    }

    #[test]
    fn lenient_parse_falls_back_to_zero() {
        assert_eq!(SessionDuration::parse_lenient("abc"), SessionDuration::ZERO);
        assert_eq!(SessionDuration::parse_lenient("100000000h"), SessionDuration::ZERO);
    }

    #[test]
    fn oversized_durations_are_rejected() {
        assert_eq!(SessionDuration::parse("24h").unwrap().whole_hours(), 24);
        assert!(matches!(SessionDuration::parse("25h"), Err(DurationError::TooLong(_))));
        assert!(matches!(
            SessionDuration::parse("100000000h"),
            Err(DurationError::TooLong(_))
        ));
        assert!(matches!(
            SessionDuration::parse("99999999999999999999h"),
            Err(DurationError::TooLong(_))
        ));
        assert_eq!(SessionDuration::from_hours(u32::MAX).minutes(), u32::MAX);
    }

    #[test]
    fn whole_hours_truncates_minutes() {
        assert_eq!(SessionDuration::from_minutes(150).whole_hours(), 2);
        assert_eq!(SessionDuration::from_minutes(150).label(), "2h");
    }

    #[test]
    fn session_hydrates_from_timestamp_dates() {
        let json = r#"{"id":"t-s0","date":"2026-03-02T12:00:00.000Z","time":"15:00 - 17:00","duration":"2h","trainingId":"t"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(session.duration.whole_hours(), 2);
        assert!(!session.is_validated());
    }
}
