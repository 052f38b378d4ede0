//! Application state shared by the shell and the storage layer.

use chrono::{Datelike, NaiveDate};

use crate::core::aggregation::{FinancialSummary, TrainingBreakdown};
use crate::core::insights::WorkloadInsights;
use crate::core::period::{resolve_period, resolve_period_checked, PeriodError, PeriodSelection};
use crate::core::services::SummaryService;
use crate::core::withholding::{WithholdingProjection, WithholdingSchedule};
use crate::domain::{AnalysisMode, AnalysisSettings, DateRange, TaxRate, TrainingLedger, YearMonth};

/// Everything a query needs, passed explicitly instead of living in globals.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub ledger: TrainingLedger,
    pub tax_rate: TaxRate,
    pub analysis: AnalysisSettings,
    pub withholding: WithholdingSchedule,
    /// Day whose month is shown in month mode.
    pub viewed: NaiveDate,
}

impl AppState {
    pub fn new(
        ledger: TrainingLedger,
        tax_rate: TaxRate,
        analysis: AnalysisSettings,
        withholding: WithholdingSchedule,
        viewed: NaiveDate,
    ) -> Self {
        Self {
            ledger,
            tax_rate,
            analysis,
            withholding,
            viewed,
        }
    }

    /// Demo data with default settings, viewing `today`.
    pub fn seeded(today: NaiveDate) -> Self {
        Self::new(
            TrainingLedger::seeded(),
            TaxRate::default(),
            AnalysisSettings::for_today(today),
            WithholdingSchedule::default_for(today.year()),
            today,
        )
    }

    pub fn selection(&self) -> PeriodSelection {
        PeriodSelection::from_settings(&self.analysis, self.viewed)
    }

    pub fn range(&self) -> DateRange {
        resolve_period(&self.selection())
    }

    pub fn checked_range(&self) -> Result<DateRange, PeriodError> {
        resolve_period_checked(&self.selection())
    }

    pub fn view_month(&mut self, viewed: NaiveDate) {
        self.analysis.mode = AnalysisMode::Month;
        self.viewed = viewed;
    }

    /// Switches to a custom range. Inverted ranges are stored but reported.
    pub fn view_custom(&mut self, start: YearMonth, end: YearMonth) -> Result<(), PeriodError> {
        self.analysis.mode = AnalysisMode::Custom;
        self.analysis.start_month = start;
        self.analysis.end_month = end;
        self.checked_range().map(|_| ())
    }

    pub fn summary(&self) -> FinancialSummary {
        SummaryService::summarize(&self.ledger, &self.range(), self.tax_rate)
    }

    pub fn breakdown(&self) -> Vec<TrainingBreakdown> {
        SummaryService::breakdown(&self.ledger, &self.range())
    }

    pub fn insights(&self) -> WorkloadInsights {
        SummaryService::insights(&self.ledger, &self.range())
    }

    pub fn withholding_projections(&self) -> Vec<WithholdingProjection> {
        SummaryService::withholding(&self.ledger, &self.withholding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
    }

    #[test]
    fn seeded_state_views_current_month() {
        let state = AppState::seeded(today());
        assert_eq!(state.analysis.mode, AnalysisMode::Month);
        assert_eq!(state.range(), DateRange::from_months(YearMonth::new(2026, 3).unwrap(), YearMonth::new(2026, 3).unwrap()));
        assert_eq!(state.withholding.year, 2026);
    }

    #[test]
    fn inverted_custom_view_is_reported_and_zero() {
        let mut state = AppState::seeded(today());
        let result = state.view_custom(YearMonth::new(2026, 5).unwrap(), YearMonth::new(2026, 2).unwrap());
        assert!(result.is_err());
        let summary = state.summary();
        assert_eq!(summary.gross, 0.0);
        assert!(summary.months.is_empty());
    }

    #[test]
    fn custom_view_aggregates_range() {
        let mut state = AppState::seeded(today());
        state
            .view_custom(YearMonth::new(2026, 2).unwrap(), YearMonth::new(2026, 3).unwrap())
            .unwrap();
        let summary = state.summary();
        assert_eq!(summary.months.len(), 2);
        assert_eq!(summary.hours, 33);
    }
}
