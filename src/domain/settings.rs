use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::YearMonth;

pub const DEFAULT_TAX_RATE: f64 = 25.0;

/// Withholding percentage in the `0..=100` range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TaxRate(f64);

impl TaxRate {
    pub fn new(percent: f64) -> Option<Self> {
        (percent.is_finite() && (0.0..=100.0).contains(&percent)).then_some(Self(percent))
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    /// Tax withheld from `gross`.
    pub fn withheld(&self, gross: f64) -> f64 {
        gross * self.0 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self(DEFAULT_TAX_RATE)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let percent = f64::deserialize(deserializer)?;
        TaxRate::new(percent)
            .ok_or_else(|| serde::de::Error::custom(format!("tax rate {percent} outside 0..=100")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Month,
    Custom,
}

/// Persisted analysis preferences: which period semantics the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    pub mode: AnalysisMode,
    pub start_month: YearMonth,
    pub end_month: YearMonth,
}

impl AnalysisSettings {
    /// Month mode on `today`, with the custom bounds spanning January..today's month.
    pub fn for_today(today: NaiveDate) -> Self {
        let current = YearMonth::from_date(today);
        let january = YearMonth::new(today.year(), 1).unwrap_or(current);
        Self {
            mode: AnalysisMode::Month,
            start_month: january,
            end_month: current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_rate_rejects_out_of_range_values() {
        assert!(TaxRate::new(-1.0).is_none());
        assert!(TaxRate::new(100.5).is_none());
        assert!(TaxRate::new(f64::NAN).is_none());
        assert_eq!(TaxRate::new(25.0).unwrap().withheld(410.0), 102.5);
    }

    #[test]
    fn analysis_settings_use_camel_case_months() {
        let settings = AnalysisSettings {
            mode: AnalysisMode::Custom,
            start_month: YearMonth::new(2026, 1).unwrap(),
            end_month: YearMonth::new(2026, 6).unwrap(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            json,
            r#"{"mode":"custom","startMonth":"2026-01","endMonth":"2026-06"}"#
        );
    }
}
