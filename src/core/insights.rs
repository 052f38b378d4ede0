//! Workload statistics over the monthly buckets of a summary.

use serde::Serialize;

use crate::core::aggregation::MonthlyBucket;
use crate::domain::YearMonth;

const HIGH_LOAD_FACTOR: f64 = 1.2;
const LOW_LOAD_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkloadLevel {
    High,
    Normal,
    Low,
}

impl WorkloadLevel {
    fn classify(hours: u32, average: f64) -> Self {
        let hours = f64::from(hours);
        if average <= 0.0 {
            WorkloadLevel::Normal
        } else if hours >= average * HIGH_LOAD_FACTOR {
            WorkloadLevel::High
        } else if hours <= average * LOW_LOAD_FACTOR {
            WorkloadLevel::Low
        } else {
            WorkloadLevel::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkloadLevel::High => "high",
            WorkloadLevel::Normal => "normal",
            WorkloadLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLoad {
    pub month: YearMonth,
    pub hours: u32,
    pub revenue: f64,
    pub level: WorkloadLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadInsights {
    pub total_hours: u32,
    pub total_sessions: usize,
    pub total_revenue: f64,
    pub average_hours: f64,
    pub peak_month: Option<YearMonth>,
    pub low_month: Option<YearMonth>,
    pub peak_revenue_month: Option<YearMonth>,
    pub months: Vec<MonthLoad>,
}

/// Derives totals, extremes and per-month load levels. Ties go to the earliest month.
pub fn workload_insights(buckets: &[MonthlyBucket]) -> WorkloadInsights {
    let total_hours: u32 = buckets.iter().map(|b| b.hours).sum();
    let total_sessions = buckets.iter().map(|b| b.sessions).sum();
    let total_revenue = buckets.iter().map(MonthlyBucket::revenue).sum();
    let average_hours = if buckets.is_empty() {
        0.0
    } else {
        f64::from(total_hours) / buckets.len() as f64
    };

    let mut peak: Option<&MonthlyBucket> = None;
    let mut low: Option<&MonthlyBucket> = None;
    let mut peak_revenue: Option<&MonthlyBucket> = None;
    for bucket in buckets {
        if peak.map_or(true, |p| bucket.hours > p.hours) {
            peak = Some(bucket);
        }
        if low.map_or(true, |l| bucket.hours < l.hours) {
            low = Some(bucket);
        }
        if peak_revenue.map_or(true, |p| bucket.revenue() > p.revenue()) {
            peak_revenue = Some(bucket);
        }
    }

    let months = buckets
        .iter()
        .map(|bucket| MonthLoad {
            month: bucket.month,
            hours: bucket.hours,
            revenue: bucket.revenue(),
            level: WorkloadLevel::classify(bucket.hours, average_hours),
        })
        .collect();

    WorkloadInsights {
        total_hours,
        total_sessions,
        total_revenue,
        average_hours,
        peak_month: peak.map(|b| b.month),
        low_month: low.map(|b| b.month),
        peak_revenue_month: peak_revenue.map(|b| b.month),
        months,
    }
}
