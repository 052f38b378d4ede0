//! Period resolution, aggregation and the mutation layer over the domain model.

pub mod aggregation;
pub mod errors;
pub mod insights;
pub mod period;
pub mod schedule;
pub mod services;
pub mod state;
pub mod withholding;

pub use aggregation::{
    aggregate, aggregate_with, per_training_breakdown, ExtrasAttribution, FinancialSummary,
    MonthlyBucket, TrainingBreakdown,
};
pub use errors::CoreError;
pub use insights::{workload_insights, WorkloadInsights, WorkloadLevel};
pub use period::{resolve_period, resolve_period_checked, PeriodError, PeriodSelection};
pub use schedule::{generate_schedule_sessions, ScheduleError, ScheduleRequest};
pub use state::AppState;
pub use withholding::{
    next_payment_due, project_withholding, WithholdingLump, WithholdingProjection,
    WithholdingSchedule,
};
