use crate::core::aggregation::{
    aggregate, per_training_breakdown, ExtrasAttribution, FinancialSummary, TrainingBreakdown,
};
use crate::core::insights::{workload_insights, WorkloadInsights};
use crate::core::withholding::{project_withholding, WithholdingProjection, WithholdingSchedule};
use crate::domain::{DateRange, TaxRate, TrainingLedger};

/// Read-only queries over a ledger.
pub struct SummaryService;

impl SummaryService {
    pub fn summarize(ledger: &TrainingLedger, range: &DateRange, tax_rate: TaxRate) -> FinancialSummary {
        aggregate(&ledger.trainings, &ledger.adjustments, range, tax_rate)
    }

    pub fn breakdown(ledger: &TrainingLedger, range: &DateRange) -> Vec<TrainingBreakdown> {
        per_training_breakdown(&ledger.trainings, range, ExtrasAttribution::OncePerRange)
    }

    pub fn insights(ledger: &TrainingLedger, range: &DateRange) -> WorkloadInsights {
        let summary = aggregate(&ledger.trainings, &[], range, TaxRate::default());
        workload_insights(&summary.months)
    }

    pub fn withholding(ledger: &TrainingLedger, schedule: &WithholdingSchedule) -> Vec<WithholdingProjection> {
        project_withholding(&ledger.trainings, schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AdjustmentService, TrainingService};
    use crate::domain::{FinancialAdjustment, YearMonth};
    use chrono::NaiveDate;

    fn first_half() -> DateRange {
        DateRange::from_months(YearMonth::new(2026, 1).unwrap(), YearMonth::new(2026, 6).unwrap())
    }

    #[test]
    fn deleting_a_training_drops_its_sessions_from_queries() {
        let mut ledger = TrainingLedger::seeded();
        let before = SummaryService::summarize(&ledger, &first_half(), TaxRate::default());
        let removed = TrainingService::remove(&mut ledger, "viz-modules").unwrap();
        let after = SummaryService::summarize(&ledger, &first_half(), TaxRate::default());

        let removed_hours: u32 = removed.sessions.iter().map(|s| s.duration.whole_hours()).sum();
        assert_eq!(before.hours - after.hours, removed_hours);
        assert!(SummaryService::breakdown(&ledger, &first_half())
            .iter()
            .all(|row| row.training_id != "viz-modules"));
    }

    #[test]
    fn deleting_an_adjustment_drops_it_from_totals() {
        let mut ledger = TrainingLedger::seeded();
        let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let id = AdjustmentService::add(&mut ledger, FinancialAdjustment::new("Bonus", 120.0, date)).unwrap();
        let with = SummaryService::summarize(&ledger, &first_half(), TaxRate::default());
        AdjustmentService::remove(&mut ledger, &id).unwrap();
        let without = SummaryService::summarize(&ledger, &first_half(), TaxRate::default());

        assert_eq!(with.adjustments_total, 120.0);
        assert_eq!(without.adjustments_total, 0.0);
        assert_eq!(with.gross - without.gross, 120.0);
    }

    #[test]
    fn seeded_ledger_has_expected_peak() {
        let ledger = TrainingLedger::seeded();
        let insights = SummaryService::insights(&ledger, &first_half());
        assert_eq!(insights.peak_month, YearMonth::new(2026, 2));
        assert_eq!(insights.months.len(), 6);
    }
}
