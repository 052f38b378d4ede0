//! Period-based financial aggregation.
//!
//! Every figure is recomputed from the trainings and adjustments passed in;
//! nothing is cached between queries. Both extras rules run through the same
//! activity walk and differ only in how [`ExtrasAttribution`] credits a
//! training's flat extra.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::domain::{DateRange, FinancialAdjustment, TaxRate, Training, YearMonth};

/// How a training's flat extra is credited over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrasAttribution {
    /// Once for every calendar month in which the training has a session.
    #[default]
    PerActiveMonth,
    /// Once for the whole range, credited to the training's first active month.
    OncePerRange,
}

/// Figures for one calendar month of a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub hours: u32,
    pub sessions: usize,
    pub training_income: f64,
    pub extras: f64,
}

impl MonthlyBucket {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            hours: 0,
            sessions: 0,
            training_income: 0.0,
            extras: 0.0,
        }
    }

    /// Hourly income plus attributed extras.
    pub fn revenue(&self) -> f64 {
        self.training_income + self.extras
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub range: DateRange,
    pub tax_rate: TaxRate,
    pub hours: u32,
    pub sessions: usize,
    pub training_income: f64,
    pub extras_total: f64,
    pub adjustments_total: f64,
    pub gross: f64,
    pub tax: f64,
    pub net: f64,
    /// One bucket per month of the range, empty months included.
    pub months: Vec<MonthlyBucket>,
    /// Adjustments dated inside the range, chronologically.
    pub adjustments: Vec<FinancialAdjustment>,
}

impl FinancialSummary {
    /// Income earned from sessions and extras, before adjustments.
    pub fn revenue(&self) -> f64 {
        self.training_income + self.extras_total
    }
}

/// Per-training totals for a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingBreakdown {
    pub training_id: String,
    pub name: String,
    pub color: String,
    pub hourly_rate: f64,
    pub hours: u32,
    pub sessions: usize,
    pub income: f64,
    pub extras: f64,
}

impl TrainingBreakdown {
    pub fn total(&self) -> f64 {
        self.income + self.extras
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Activity {
    hours: u32,
    sessions: usize,
}

/// Sessions inside `range`, grouped by (month, training position).
fn collect_activity(trainings: &[Training], range: &DateRange) -> BTreeMap<(YearMonth, usize), Activity> {
    let mut cells: BTreeMap<(YearMonth, usize), Activity> = BTreeMap::new();
    for (position, training) in trainings.iter().enumerate() {
        for session in training.sessions.iter().filter(|s| range.contains(s.date)) {
            let cell = cells
                .entry((YearMonth::from_date(session.date), position))
                .or_default();
            cell.hours += session.duration.whole_hours();
            cell.sessions += 1;
        }
    }
    cells
}

/// Extra credits as (month, training position, amount), in chronological order.
fn attribute_extras(
    trainings: &[Training],
    cells: &BTreeMap<(YearMonth, usize), Activity>,
    mode: ExtrasAttribution,
) -> Vec<(YearMonth, usize, f64)> {
    let mut credited_months: HashSet<(&str, YearMonth)> = HashSet::new();
    let mut credited_trainings: HashSet<&str> = HashSet::new();
    let mut credits = Vec::new();

    for &(month, position) in cells.keys() {
        let training = &trainings[position];
        let Some(extra) = training.effective_extra() else {
            continue;
        };
        let first_time = match mode {
            ExtrasAttribution::PerActiveMonth => {
                credited_months.insert((training.id.as_str(), month))
            }
            ExtrasAttribution::OncePerRange => credited_trainings.insert(training.id.as_str()),
        };
        if first_time {
            credits.push((month, position, extra));
        }
    }
    credits
}

/// Summarizes `range` with the per-active-month extras rule.
pub fn aggregate(
    trainings: &[Training],
    adjustments: &[FinancialAdjustment],
    range: &DateRange,
    tax_rate: TaxRate,
) -> FinancialSummary {
    aggregate_with(
        trainings,
        adjustments,
        range,
        tax_rate,
        ExtrasAttribution::PerActiveMonth,
    )
}

pub fn aggregate_with(
    trainings: &[Training],
    adjustments: &[FinancialAdjustment],
    range: &DateRange,
    tax_rate: TaxRate,
    mode: ExtrasAttribution,
) -> FinancialSummary {
    let cells = collect_activity(trainings, range);
    let mut months: Vec<MonthlyBucket> = range.months().into_iter().map(MonthlyBucket::empty).collect();
    let slots: HashMap<YearMonth, usize> = months
        .iter()
        .enumerate()
        .map(|(slot, bucket)| (bucket.month, slot))
        .collect();

    for (&(month, position), activity) in &cells {
        if let Some(&slot) = slots.get(&month) {
            let bucket = &mut months[slot];
            bucket.hours += activity.hours;
            bucket.sessions += activity.sessions;
            bucket.training_income += f64::from(activity.hours) * trainings[position].hourly_rate;
        }
    }
    for (month, _, extra) in attribute_extras(trainings, &cells, mode) {
        if let Some(&slot) = slots.get(&month) {
            months[slot].extras += extra;
        }
    }

    let mut in_range: Vec<FinancialAdjustment> = adjustments
        .iter()
        .filter(|adjustment| range.contains(adjustment.date))
        .cloned()
        .collect();
    in_range.sort_by_key(|adjustment| adjustment.date);

    let hours = months.iter().map(|b| b.hours).sum();
    let sessions = months.iter().map(|b| b.sessions).sum();
    let training_income: f64 = months.iter().map(|b| b.training_income).sum();
    let extras_total: f64 = months.iter().map(|b| b.extras).sum();
    let adjustments_total: f64 = in_range.iter().map(|a| a.value).sum();
    let gross = training_income + extras_total + adjustments_total;
    let tax = tax_rate.withheld(gross);

    tracing::debug!(%range, hours, gross, ?mode, "aggregated period");

    FinancialSummary {
        range: *range,
        tax_rate,
        hours,
        sessions,
        training_income,
        extras_total,
        adjustments_total,
        gross,
        tax,
        net: gross - tax,
        months,
        adjustments: in_range,
    }
}

/// Totals per training with at least one session in `range`, highest total first.
pub fn per_training_breakdown(
    trainings: &[Training],
    range: &DateRange,
    mode: ExtrasAttribution,
) -> Vec<TrainingBreakdown> {
    let cells = collect_activity(trainings, range);
    let mut rows: BTreeMap<usize, TrainingBreakdown> = BTreeMap::new();

    for (&(_, position), activity) in &cells {
        let training = &trainings[position];
        let row = rows.entry(position).or_insert_with(|| TrainingBreakdown {
            training_id: training.id.clone(),
            name: training.name.clone(),
            color: training.color.clone(),
            hourly_rate: training.hourly_rate,
            hours: 0,
            sessions: 0,
            income: 0.0,
            extras: 0.0,
        });
        row.hours += activity.hours;
        row.sessions += activity.sessions;
        row.income += f64::from(activity.hours) * training.hourly_rate;
    }
    for (_, position, extra) in attribute_extras(trainings, &cells, mode) {
        if let Some(row) = rows.get_mut(&position) {
            row.extras += extra;
        }
    }

    let mut breakdown: Vec<TrainingBreakdown> = rows.into_values().collect();
    breakdown.sort_by(|a, b| b.total().partial_cmp(&a.total()).unwrap_or(Ordering::Equal));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Session, SessionDuration};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(id: &str, date: NaiveDate, hours: u32) -> Session {
        Session::new(id, date, "10:00 - 12:00", SessionDuration::from_hours(hours))
    }

    fn march_april_training() -> Training {
        Training::new("Course", "Ana", 35.0)
            .with_id("course")
            .with_extra(100.0)
            .with_sessions(vec![
                session("course-s0", date(2026, 3, 2), 2),
                session("course-s1", date(2026, 3, 4), 2),
                session("course-s2", date(2026, 4, 6), 2),
            ])
    }

    fn march_april() -> DateRange {
        DateRange::from_months(YearMonth::new(2026, 3).unwrap(), YearMonth::new(2026, 4).unwrap())
    }

    #[test]
    fn reference_scenario_matches_expected_figures() {
        let trainings = vec![march_april_training()];
        let summary = aggregate(&trainings, &[], &march_april(), TaxRate::new(25.0).unwrap());

        assert_eq!(summary.months.len(), 2);
        assert_eq!(summary.months[0].hours, 4);
        assert_eq!(summary.months[0].revenue(), 240.0);
        assert_eq!(summary.months[1].hours, 2);
        assert_eq!(summary.months[1].revenue(), 170.0);

        assert_eq!(summary.hours, 6);
        assert_eq!(summary.training_income, 210.0);
        assert_eq!(summary.extras_total, 200.0);
        assert_eq!(summary.gross, 410.0);
        assert_eq!(summary.tax, 102.5);
        assert_eq!(summary.net, 307.5);

        let breakdown = per_training_breakdown(&trainings, &march_april(), ExtrasAttribution::OncePerRange);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].hours, 6);
        assert_eq!(breakdown[0].total(), 310.0);
    }

    #[test]
    fn monthly_and_once_extras_rules_differ_across_months() {
        let trainings = vec![march_april_training()];
        let monthly = aggregate(&trainings, &[], &march_april(), TaxRate::default());
        let once = per_training_breakdown(&trainings, &march_april(), ExtrasAttribution::OncePerRange);
        assert_eq!(monthly.extras_total, 200.0);
        assert_eq!(once[0].extras, 100.0);
        assert_ne!(monthly.extras_total, once[0].extras);
    }

    #[test]
    fn once_per_range_credits_first_active_month() {
        let trainings = vec![march_april_training()];
        let summary = aggregate_with(
            &trainings,
            &[],
            &march_april(),
            TaxRate::default(),
            ExtrasAttribution::OncePerRange,
        );
        assert_eq!(summary.months[0].extras, 100.0);
        assert_eq!(summary.months[1].extras, 0.0);
        assert_eq!(summary.extras_total, 100.0);
    }

    #[test]
    fn empty_inputs_produce_zero_summary() {
        for rate in [0.0, 25.0, 100.0] {
            let summary = aggregate(&[], &[], &march_april(), TaxRate::new(rate).unwrap());
            assert_eq!(summary.hours, 0);
            assert_eq!(summary.gross, 0.0);
            assert_eq!(summary.tax, 0.0);
            assert_eq!(summary.net, 0.0);
            assert_eq!(summary.months.len(), 2);
        }
    }

    #[test]
    fn empty_months_still_get_buckets() {
        let trainings = vec![march_april_training()];
        let range = DateRange::from_months(YearMonth::new(2026, 1).unwrap(), YearMonth::new(2026, 5).unwrap());
        let summary = aggregate(&trainings, &[], &range, TaxRate::default());
        let hours: Vec<u32> = summary.months.iter().map(|b| b.hours).collect();
        assert_eq!(hours, vec![0, 0, 4, 2, 0]);
    }

    #[test]
    fn adjustments_in_range_are_added_to_gross() {
        let trainings = vec![march_april_training()];
        let adjustments = vec![
            FinancialAdjustment::new("Travel", 50.0, date(2026, 3, 15)),
            FinancialAdjustment::new("Fee", -20.0, date(2026, 4, 1)),
            FinancialAdjustment::new("Outside", 999.0, date(2026, 5, 1)),
        ];
        let summary = aggregate(&trainings, &adjustments, &march_april(), TaxRate::new(0.0).unwrap());
        assert_eq!(summary.adjustments_total, 30.0);
        assert_eq!(summary.adjustments.len(), 2);
        assert_eq!(summary.gross, 440.0);
        assert_eq!(summary.net, 440.0);
        assert_eq!(summary.months.iter().map(|b| b.revenue()).sum::<f64>(), 410.0);
    }

    #[test]
    fn breakdown_sorts_by_total_descending() {
        let cheap = Training::new("Cheap", "B", 10.0)
            .with_id("cheap")
            .with_sessions(vec![session("cheap-s0", date(2026, 3, 3), 2)]);
        let idle = Training::new("Idle", "C", 90.0).with_id("idle");
        let trainings = vec![cheap, march_april_training(), idle];
        let breakdown = per_training_breakdown(&trainings, &march_april(), ExtrasAttribution::OncePerRange);
        let ids: Vec<&str> = breakdown.iter().map(|row| row.training_id.as_str()).collect();
        assert_eq!(ids, vec!["course", "cheap"]);
    }

    #[test]
    fn inverted_range_yields_nothing() {
        let trainings = vec![march_april_training()];
        let range = DateRange::new(date(2026, 4, 30), date(2026, 3, 1));
        let summary = aggregate(&trainings, &[], &range, TaxRate::default());
        assert!(summary.months.is_empty());
        assert_eq!(summary.gross, 0.0);
    }
}
