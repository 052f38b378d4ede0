//! Advance tax ("withholding") simulation.
//!
//! A schedule groups calendar months of one year into lumps. Each lump is paid
//! at the start of its due month on the revenue earned in its months.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::aggregation::{aggregate, MonthlyBucket};
use crate::domain::{DateRange, TaxRate, Training, YearMonth};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithholdingLump {
    pub label: String,
    /// Month numbers (1-12) covered by this payment.
    pub months: Vec<u32>,
    #[serde(default)]
    pub tax_rate: TaxRate,
    pub due_month: u32,
}

impl WithholdingLump {
    pub fn new(label: impl Into<String>, months: Vec<u32>, tax_rate: TaxRate, due_month: u32) -> Self {
        Self {
            label: label.into(),
            months,
            tax_rate,
            due_month,
        }
    }

    fn last_month(&self) -> u32 {
        self.months.iter().copied().max().unwrap_or(0)
    }

    /// First day of the due month; rolls into the next year when the lump
    /// ends after its due month.
    pub fn due_date(&self, year: i32) -> Option<NaiveDate> {
        let due_year = if self.due_month < self.last_month() {
            year.checked_add(1)?
        } else {
            year
        };
        YearMonth::new(due_year, self.due_month).map(|month| month.first_day())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithholdingSchedule {
    pub year: i32,
    pub lumps: Vec<WithholdingLump>,
}

impl WithholdingSchedule {
    /// Jan+Feb paid in March, Mar+Apr+May paid in June.
    pub fn default_for(year: i32) -> Self {
        Self {
            year,
            lumps: vec![
                WithholdingLump::new("Jan+Feb", vec![1, 2], TaxRate::default(), 3),
                WithholdingLump::new("Mar+Apr+May", vec![3, 4, 5], TaxRate::default(), 6),
            ],
        }
    }

    pub fn for_year(&self, year: i32) -> Self {
        Self {
            year,
            lumps: self.lumps.clone(),
        }
    }

    /// Reports the first lump referencing a month outside 1-12.
    pub fn validate(&self) -> Result<(), String> {
        for lump in &self.lumps {
            if lump.months.is_empty() {
                return Err(format!("lump '{}' covers no months", lump.label));
            }
            let out_of_range = lump
                .months
                .iter()
                .chain(std::iter::once(&lump.due_month))
                .find(|month| !(1..=12).contains(*month));
            if let Some(month) = out_of_range {
                return Err(format!("lump '{}' references invalid month {month}", lump.label));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithholdingProjection {
    pub label: String,
    pub months: Vec<YearMonth>,
    pub revenue: f64,
    pub tax: f64,
    pub due: Option<NaiveDate>,
}

/// Projects each lump's payment from session income and per-active-month
/// extras. Adjustments are not part of the withholding base.
pub fn project_withholding(trainings: &[Training], schedule: &WithholdingSchedule) -> Vec<WithholdingProjection> {
    let year = schedule.year;
    let (Some(january), Some(december)) = (YearMonth::new(year, 1), YearMonth::new(year, 12)) else {
        return Vec::new();
    };
    let summary = aggregate(
        trainings,
        &[],
        &DateRange::from_months(january, december),
        TaxRate::default(),
    );

    schedule
        .lumps
        .iter()
        .map(|lump| {
            let months: Vec<YearMonth> = lump
                .months
                .iter()
                .filter_map(|&month| YearMonth::new(year, month))
                .collect();
            let revenue: f64 = summary
                .months
                .iter()
                .filter(|bucket| months.contains(&bucket.month))
                .map(MonthlyBucket::revenue)
                .sum();
            WithholdingProjection {
                label: lump.label.clone(),
                months,
                revenue,
                tax: lump.tax_rate.withheld(revenue),
                due: lump.due_date(year),
            }
        })
        .collect()
}

/// The earliest projection still due on or after `today`.
pub fn next_payment_due(projections: &[WithholdingProjection], today: NaiveDate) -> Option<&WithholdingProjection> {
    projections
        .iter()
        .filter(|projection| projection.due.is_some_and(|due| due >= today))
        .min_by_key(|projection| projection.due)
}
