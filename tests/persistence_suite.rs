mod common;

use std::fs;

use common::date;
use tempfile::tempdir;
use trainer_ledger::config::ConfigManager;
use trainer_ledger::core::services::{SessionService, TrainingService};
use trainer_ledger::domain::{AnalysisMode, SessionDuration, YearMonth};
use trainer_ledger::storage::{JsonStorage, StateDefaults, StorageBackend, StorageEntry};

fn defaults() -> StateDefaults {
    StateDefaults::for_today(date(2026, 3, 18))
}

#[test]
fn legacy_training_payload_is_read() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(temp.path()).unwrap();
    let payload = r#"[{
        "id": "legacy",
        "name": "Legacy Course",
        "instructor": "Ana",
        "totalSessions": 2,
        "schedule": "Fri 09:00-11:00",
        "color": "blue",
        "hourlyRate": 40,
        "extraValue": 50,
        "sessions": [
            {"id": "legacy-s0", "date": "2026-03-06T12:00:00.000Z", "time": "09:00 - 11:00", "duration": "2h", "trainingId": "legacy"},
            {"id": "legacy-s1", "date": "2026-03-13", "time": "09:00 - 11:00", "duration": "??", "validated": true}
        ]
    }]"#;
    fs::write(storage.entry_path(StorageEntry::Trainings), payload).unwrap();
    fs::write(storage.entry_path(StorageEntry::TaxRate), "23\n").unwrap();

    let report = storage.load_state(&defaults()).unwrap();
    assert!(report.is_clean());
    let training = &report.state.ledger.trainings[0];
    assert_eq!(training.extra_value, Some(50.0));
    assert_eq!(training.sessions[0].date, date(2026, 3, 6));
    assert_eq!(training.sessions[1].duration, SessionDuration::ZERO);
    assert!(training.sessions[1].is_validated());
    assert_eq!(report.state.tax_rate.percent(), 23.0);
    assert_eq!(report.state.summary().hours, 2);
}

#[test]
fn oversized_duration_label_loads_as_zero() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(temp.path()).unwrap();
    let payload = r#"[{
        "id": "huge",
        "name": "Corrupted Course",
        "instructor": "Ana",
        "hourlyRate": 40,
        "sessions": [
            {"id": "huge-s0", "date": "2026-03-06", "time": "", "duration": "100000000h"},
            {"id": "huge-s1", "date": "2026-03-13", "time": "", "duration": "3h"}
        ]
    }]"#;
    fs::write(storage.entry_path(StorageEntry::Trainings), payload).unwrap();

    let report = storage.load_state(&defaults()).unwrap();
    assert!(report.is_clean());
    let sessions = &report.state.ledger.trainings[0].sessions;
    assert_eq!(sessions[0].duration, SessionDuration::ZERO);
    assert_eq!(report.state.summary().hours, 3);
    assert_eq!(report.state.summary().training_income, 120.0);
}

#[test]
fn mutations_survive_a_reload() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(temp.path().join("data")).unwrap();
    let mut state = storage.load_state(&defaults()).unwrap().state;

    TrainingService::set_rate(&mut state.ledger, "evening-rendering", 40.0).unwrap();
    SessionService::add(
        &mut state.ledger,
        "evening-rendering",
        date(2026, 3, 9),
        "15:00 - 17:00",
        SessionDuration::from_hours(2),
    )
    .unwrap();
    state
        .view_custom(YearMonth::new(2026, 2).unwrap(), YearMonth::new(2026, 4).unwrap())
        .unwrap();
    storage.save_entry(&state, StorageEntry::Trainings).unwrap();
    storage.save_entry(&state, StorageEntry::AnalysisSettings).unwrap();

    let reloaded = storage.load_state(&defaults()).unwrap().state;
    assert_eq!(reloaded.ledger, state.ledger);
    assert_eq!(reloaded.analysis.mode, AnalysisMode::Custom);
    assert_eq!(reloaded.summary(), state.summary());
}

#[test]
fn config_data_dir_controls_storage_location() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let mut config = manager.load().unwrap();
    config.data_dir = Some("ledger-files".into());
    config.default_tax_rate = 30.0;
    manager.save(&config).unwrap();

    let config = manager.load().unwrap();
    let root = config.resolve_data_dir(manager.base_dir());
    assert_eq!(root, temp.path().join("ledger-files"));

    let storage = JsonStorage::new(root.clone()).unwrap();
    let report = storage.load_state(&config.state_defaults(date(2026, 3, 18))).unwrap();
    assert_eq!(report.state.tax_rate.percent(), 30.0);
    storage.save_state(&report.state).unwrap();
    assert!(root.join("training-data-v1.json").exists());
    assert!(root.join("analysis-settings.json").exists());
}
