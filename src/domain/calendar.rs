use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month without a day component, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months past chrono's supported range clamp to `NaiveDate::MAX`.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MAX)
    }

    /// Last day of the month; the final representable month ends on `NaiveDate::MAX`.
    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The month immediately after this one, rolling over into the next year.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Three-letter label such as `Mar`, suffixed with the short year when it
    /// differs from `reference_year` (`Jan'27`).
    pub fn short_label(&self, reference_year: i32) -> String {
        let name = MONTH_ABBREVIATIONS[(self.month - 1) as usize];
        if self.year == reference_year {
            name.to_string()
        } else {
            format!("{}'{:02}", name, self.year.rem_euclid(100))
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month `{0}` (use YYYY-MM)")]
pub struct YearMonthParseError(pub String);

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || YearMonthParseError(trimmed.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive date range used for every period query.
///
/// A range whose `end` precedes its `start` is empty: it contains no dates and
/// enumerates no months.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Covers `start`'s first day through `end`'s last day.
    pub fn from_months(start: YearMonth, end: YearMonth) -> Self {
        Self {
            start: start.first_day(),
            end: end.last_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Every month touched by the range, in chronological order.
    pub fn months(&self) -> Vec<YearMonth> {
        if self.is_empty() {
            return Vec::new();
        }
        let last = YearMonth::from_date(self.end);
        let mut current = YearMonth::from_date(self.start);
        let mut months = Vec::new();
        while current <= last {
            months.push(current);
            current = current.succ();
        }
        months
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Accepts `YYYY-MM-DD` as well as RFC 3339 date-times.
///
/// Timestamps are instants (local midnight serialized as UTC), so they are
/// read back as the calendar day they fall on in the local time zone.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    parse_flexible_date_in(raw, &Local)
}

/// [`parse_flexible_date`] with timestamps placed in `zone`.
pub fn parse_flexible_date_in<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.with_timezone(zone).date_naive());
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

pub(crate) mod flexible_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_flexible_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn last_day_handles_leap_years_and_december() {
        assert_eq!(ym(2024, 2).last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(ym(2026, 2).last_day(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(ym(2026, 12).last_day(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn months_steps_across_year_boundary() {
        let range = DateRange::from_months(ym(2026, 11), ym(2027, 2));
        let labels: Vec<String> = range.months().iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2026-11", "2026-12", "2027-01", "2027-02"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::from_months(ym(2026, 5), ym(2026, 3));
        assert!(range.is_empty());
        assert!(range.months().is_empty());
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
    }

    #[test]
    fn year_month_parses_and_rejects() {
        assert_eq!("2026-03".parse::<YearMonth>().unwrap(), ym(2026, 3));
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }

    #[test]
    fn short_label_marks_foreign_years() {
        assert_eq!(ym(2026, 3).short_label(2026), "Mar");
        assert_eq!(ym(2027, 1).short_label(2026), "Jan'27");
    }

    #[test]
    fn flexible_date_accepts_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        assert_eq!(parse_flexible_date("2026-02-02"), Some(expected));
        assert_eq!(parse_flexible_date("2026-02-02T12:00:00.000Z"), Some(expected));
        assert_eq!(parse_flexible_date("not a date"), None);
    }

    #[test]
    fn timestamps_land_on_the_local_calendar_day() {
        use chrono::FixedOffset;

        // Local midnight of 1 April in a UTC+1 zone, as stored by the web client.
        let lisbon_summer = FixedOffset::east_opt(3600).unwrap();
        let stamp = "2026-03-31T23:00:00.000Z";
        assert_eq!(
            parse_flexible_date_in(stamp, &lisbon_summer),
            NaiveDate::from_ymd_opt(2026, 4, 1)
        );
        assert_eq!(
            parse_flexible_date_in(stamp, &chrono::Utc),
            NaiveDate::from_ymd_opt(2026, 3, 31)
        );
        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();
        assert_eq!(
            parse_flexible_date_in("2026-03-02T04:00:00.000Z", &new_york),
            NaiveDate::from_ymd_opt(2026, 3, 2)
        );
    }

    #[test]
    fn final_representable_month_does_not_overflow() {
        let last = YearMonth::from_date(NaiveDate::MAX);
        assert_eq!(last.last_day(), NaiveDate::MAX);
        let range = DateRange::from_months(last, last);
        assert_eq!(range.end, NaiveDate::MAX);
        assert_eq!(range.months(), vec![last]);
        assert!(range.contains(NaiveDate::MAX));
    }
}
