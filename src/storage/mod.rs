pub mod json_backend;

use std::fmt;

use chrono::NaiveDate;

use crate::core::{AppState, WithholdingSchedule};
use crate::domain::{AnalysisSettings, FinancialAdjustment, TaxRate, Training};
use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// The independently persisted pieces of application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEntry {
    Trainings,
    Adjustments,
    TaxRate,
    AnalysisSettings,
}

impl StorageEntry {
    pub fn file_name(self) -> &'static str {
        match self {
            StorageEntry::Trainings => "training-data-v1.json",
            StorageEntry::Adjustments => "financial-adjustments.json",
            StorageEntry::TaxRate => "tax-retention-rate",
            StorageEntry::AnalysisSettings => "analysis-settings.json",
        }
    }
}

impl fmt::Display for StorageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A persisted entry that could not be read and was replaced by its fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    pub entry: StorageEntry,
    pub message: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entry, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub state: AppState,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Values used for entries that are missing or unreadable.
#[derive(Debug, Clone)]
pub struct StateDefaults {
    pub today: NaiveDate,
    pub tax_rate: TaxRate,
    pub withholding: WithholdingSchedule,
}

impl StateDefaults {
    pub fn for_today(today: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            today,
            tax_rate: TaxRate::default(),
            withholding: WithholdingSchedule::default_for(today.year()),
        }
    }
}

/// Abstraction over persistence backends holding the application state.
pub trait StorageBackend {
    fn load_state(&self, defaults: &StateDefaults) -> Result<LoadReport>;
    fn save_trainings(&self, trainings: &[Training]) -> Result<()>;
    fn save_adjustments(&self, adjustments: &[FinancialAdjustment]) -> Result<()>;
    fn save_tax_rate(&self, rate: TaxRate) -> Result<()>;
    fn save_analysis(&self, settings: &AnalysisSettings) -> Result<()>;
    fn is_unlocked(&self) -> Result<bool>;
    fn record_unlocked(&self) -> Result<()>;

    /// Writes every entry of `state`.
    fn save_state(&self, state: &AppState) -> Result<()> {
        self.save_trainings(&state.ledger.trainings)?;
        self.save_adjustments(&state.ledger.adjustments)?;
        self.save_tax_rate(state.tax_rate)?;
        self.save_analysis(&state.analysis)
    }

    fn save_entry(&self, state: &AppState, entry: StorageEntry) -> Result<()> {
        match entry {
            StorageEntry::Trainings => self.save_trainings(&state.ledger.trainings),
            StorageEntry::Adjustments => self.save_adjustments(&state.ledger.adjustments),
            StorageEntry::TaxRate => self.save_tax_rate(state.tax_rate),
            StorageEntry::AnalysisSettings => self.save_analysis(&state.analysis),
        }
    }
}

pub use json_backend::JsonStorage;
