//! Turns the user's period selection into the inclusive date range every query runs on.

use chrono::NaiveDate;

use crate::domain::{AnalysisMode, AnalysisSettings, DateRange, YearMonth};

/// What period is currently being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelection {
    /// The calendar month containing `viewed`.
    Month { viewed: NaiveDate },
    /// `start`'s first day through `end`'s last day.
    Custom { start: YearMonth, end: YearMonth },
}

impl PeriodSelection {
    pub fn from_settings(settings: &AnalysisSettings, viewed: NaiveDate) -> Self {
        match settings.mode {
            AnalysisMode::Month => PeriodSelection::Month { viewed },
            AnalysisMode::Custom => PeriodSelection::Custom {
                start: settings.start_month,
                end: settings.end_month,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("custom period ends ({end}) before it starts ({start})")]
    Inverted { start: YearMonth, end: YearMonth },
}

/// Resolves a selection to its inclusive range.
///
/// An inverted custom selection is returned as-is: the range is empty and every
/// aggregate over it is zero.
pub fn resolve_period(selection: &PeriodSelection) -> DateRange {
    match *selection {
        PeriodSelection::Month { viewed } => {
            let month = YearMonth::from_date(viewed);
            DateRange::from_months(month, month)
        }
        PeriodSelection::Custom { start, end } => DateRange::from_months(start, end),
    }
}

/// Like [`resolve_period`] but reports inverted custom selections.
pub fn resolve_period_checked(selection: &PeriodSelection) -> Result<DateRange, PeriodError> {
    if let PeriodSelection::Custom { start, end } = *selection {
        if end < start {
            return Err(PeriodError::Inverted { start, end });
        }
    }
    Ok(resolve_period(selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_mode_covers_whole_month() {
        let range = resolve_period(&PeriodSelection::Month {
            viewed: date(2026, 2, 17),
        });
        assert_eq!(range.start, date(2026, 2, 1));
        assert_eq!(range.end, date(2026, 2, 28));
        assert!(range.contains(date(2026, 2, 28)));
    }

    #[test]
    fn custom_mode_spans_month_bounds() {
        let range = resolve_period(&PeriodSelection::Custom {
            start: YearMonth::new(2026, 3).unwrap(),
            end: YearMonth::new(2026, 4).unwrap(),
        });
        assert_eq!(range.start, date(2026, 3, 1));
        assert_eq!(range.end, date(2026, 4, 30));
    }

    #[test]
    fn inverted_selection_is_reported_and_empty() {
        let selection = PeriodSelection::Custom {
            start: YearMonth::new(2026, 6).unwrap(),
            end: YearMonth::new(2026, 2).unwrap(),
        };
        assert!(matches!(
            resolve_period_checked(&selection),
            Err(PeriodError::Inverted { .. })
        ));
        assert!(resolve_period(&selection).is_empty());
    }

    #[test]
    fn settings_pick_mode() {
        let settings = AnalysisSettings {
            mode: AnalysisMode::Custom,
            start_month: YearMonth::new(2026, 1).unwrap(),
            end_month: YearMonth::new(2026, 3).unwrap(),
        };
        let viewed = date(2026, 7, 1);
        assert_eq!(
            PeriodSelection::from_settings(&settings, viewed),
            PeriodSelection::Custom {
                start: settings.start_month,
                end: settings.end_month
            }
        );
        let month_settings = AnalysisSettings {
            mode: AnalysisMode::Month,
            ..settings
        };
        assert_eq!(
            PeriodSelection::from_settings(&month_settings, viewed),
            PeriodSelection::Month { viewed }
        );
    }
}
