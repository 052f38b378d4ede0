pub mod build_info;
pub mod persistence;

use dirs::home_dir;
use std::{env, path::PathBuf, sync::Once};

const DEFAULT_DIR_NAME: &str = ".trainer_ledger";
/// Ledger entries live here, relative to the base directory, unless configured otherwise.
pub const DATA_DIR: &str = "data";
pub const CONFIG_FILE: &str = "config.json";

pub const HOME_ENV: &str = "TRAINER_LEDGER_HOME";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("trainer_ledger=info".parse().unwrap());

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}

/// Returns the application-specific base directory, defaulting to `~/.trainer_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
