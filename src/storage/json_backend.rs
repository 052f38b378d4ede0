use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::AppState,
    domain::{AnalysisSettings, FinancialAdjustment, TaxRate, Training, TrainingLedger},
    utils::persistence::{ensure_dir, read_optional, write_atomic},
};

use super::{LoadIssue, LoadReport, Result, StateDefaults, StorageBackend, StorageEntry};

const UNLOCK_MARKER: &str = "unlocked";

/// Directory-backed store: one file per entry, each replaced atomically.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, entry: StorageEntry) -> PathBuf {
        self.root.join(entry.file_name())
    }

    fn write_json<T: Serialize + ?Sized>(&self, entry: StorageEntry, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&self.entry_path(entry), &json)?;
        tracing::info!(entry = %entry, "saved");
        Ok(())
    }

    /// Reads an entry; `Ok(None)` if absent, `Ok(Some(Err(..)))` if unparseable.
    fn read_json<T: DeserializeOwned>(
        &self,
        entry: StorageEntry,
    ) -> Result<Option<std::result::Result<T, String>>> {
        let Some(data) = read_optional(&self.entry_path(entry))? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&data).map_err(|err| err.to_string())))
    }

    fn read_tax_rate(&self) -> Result<Option<std::result::Result<TaxRate, String>>> {
        let Some(data) = read_optional(&self.entry_path(StorageEntry::TaxRate))? else {
            return Ok(None);
        };
        let raw = data.trim();
        let parsed = raw
            .parse::<f64>()
            .ok()
            .and_then(TaxRate::new)
            .ok_or_else(|| format!("`{raw}` is not a percentage between 0 and 100"));
        Ok(Some(parsed))
    }
}

/// Unwraps a read result, recording an issue and falling back when it failed.
fn recover<T>(
    read: Option<std::result::Result<T, String>>,
    entry: StorageEntry,
    fallback: impl FnOnce() -> T,
    issues: &mut Vec<LoadIssue>,
) -> T {
    match read {
        Some(Ok(value)) => value,
        Some(Err(message)) => {
            tracing::warn!(entry = %entry, %message, "unreadable entry replaced by default");
            issues.push(LoadIssue { entry, message });
            fallback()
        }
        None => fallback(),
    }
}

impl StorageBackend for JsonStorage {
    fn load_state(&self, defaults: &StateDefaults) -> Result<LoadReport> {
        let mut issues = Vec::new();

        let trainings: Vec<Training> = recover(
            self.read_json(StorageEntry::Trainings)?,
            StorageEntry::Trainings,
            crate::domain::seed::demo_trainings,
            &mut issues,
        );
        let adjustments: Vec<FinancialAdjustment> = recover(
            self.read_json(StorageEntry::Adjustments)?,
            StorageEntry::Adjustments,
            Vec::new,
            &mut issues,
        );
        let tax_rate = recover(
            self.read_tax_rate()?,
            StorageEntry::TaxRate,
            || defaults.tax_rate,
            &mut issues,
        );
        let analysis = recover(
            self.read_json(StorageEntry::AnalysisSettings)?,
            StorageEntry::AnalysisSettings,
            || AnalysisSettings::for_today(defaults.today),
            &mut issues,
        );

        let state = AppState::new(
            TrainingLedger::new(trainings, adjustments),
            tax_rate,
            analysis,
            defaults.withholding.clone(),
            defaults.today,
        );
        tracing::info!(
            trainings = state.ledger.trainings.len(),
            sessions = state.ledger.session_count(),
            issues = issues.len(),
            "state loaded"
        );
        Ok(LoadReport { state, issues })
    }

    fn save_trainings(&self, trainings: &[Training]) -> Result<()> {
        self.write_json(StorageEntry::Trainings, trainings)
    }

    fn save_adjustments(&self, adjustments: &[FinancialAdjustment]) -> Result<()> {
        self.write_json(StorageEntry::Adjustments, adjustments)
    }

    fn save_tax_rate(&self, rate: TaxRate) -> Result<()> {
        write_atomic(&self.entry_path(StorageEntry::TaxRate), &rate.percent().to_string())?;
        tracing::info!(entry = %StorageEntry::TaxRate, "saved");
        Ok(())
    }

    fn save_analysis(&self, settings: &AnalysisSettings) -> Result<()> {
        self.write_json(StorageEntry::AnalysisSettings, settings)
    }

    fn is_unlocked(&self) -> Result<bool> {
        Ok(read_optional(&self.root.join(UNLOCK_MARKER))?
            .map(|data| data.trim() == "true")
            .unwrap_or(false))
    }

    fn record_unlocked(&self) -> Result<()> {
        write_atomic(&self.root.join(UNLOCK_MARKER), "true")
    }
}

impl JsonStorage {
    /// Forgets a previous successful login.
    pub fn clear_unlocked(&self) -> Result<()> {
        let marker = self.root.join(UNLOCK_MARKER);
        if marker.exists() {
            fs::remove_file(marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().join("data")).expect("json storage");
        (storage, temp)
    }

    fn defaults() -> StateDefaults {
        StateDefaults::for_today(NaiveDate::from_ymd_opt(2026, 3, 18).unwrap())
    }

    #[test]
    fn first_launch_loads_seed_and_defaults() {
        let (storage, _guard) = storage_with_temp_dir();
        let report = storage.load_state(&defaults()).expect("load");
        assert!(report.is_clean());
        assert_eq!(report.state.ledger.trainings.len(), 4);
        assert!(report.state.ledger.adjustments.is_empty());
        assert_eq!(report.state.tax_rate, TaxRate::default());
    }

    #[test]
    fn saved_state_is_reloaded() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut state = storage.load_state(&defaults()).unwrap().state;
        state.ledger.trainings.truncate(1);
        state.tax_rate = TaxRate::new(20.0).unwrap();
        storage.save_state(&state).expect("save");

        let reloaded = storage.load_state(&defaults()).unwrap();
        assert!(reloaded.is_clean());
        assert_eq!(reloaded.state.ledger, state.ledger);
        assert_eq!(reloaded.state.tax_rate.percent(), 20.0);
        assert_eq!(
            fs::read_to_string(storage.entry_path(StorageEntry::TaxRate)).unwrap(),
            "20"
        );
    }

    #[test]
    fn corrupt_entries_fall_back_with_issues() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.entry_path(StorageEntry::Trainings), "{not json").unwrap();
        fs::write(storage.entry_path(StorageEntry::TaxRate), "abc").unwrap();

        let report = storage.load_state(&defaults()).expect("load never fails on bad payloads");
        let entries: Vec<StorageEntry> = report.issues.iter().map(|issue| issue.entry).collect();
        assert_eq!(entries, vec![StorageEntry::Trainings, StorageEntry::TaxRate]);
        assert_eq!(report.state.ledger.trainings.len(), 4);
        assert_eq!(report.state.tax_rate, TaxRate::default());
    }

    #[test]
    fn unlock_marker_persists() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(!storage.is_unlocked().unwrap());
        storage.record_unlocked().unwrap();
        assert!(storage.is_unlocked().unwrap());
        storage.clear_unlocked().unwrap();
        assert!(!storage.is_unlocked().unwrap());
    }
}
