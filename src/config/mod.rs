use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::core::WithholdingSchedule;
use crate::domain::settings::DEFAULT_TAX_RATE;
use crate::domain::TaxRate;
use crate::errors::LedgerError;
use crate::storage::StateDefaults;
use crate::utils::{persistence::write_atomic, CONFIG_FILE, DATA_DIR};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<LedgerError> for ConfigError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Io(io) => ConfigError::Io(io),
            LedgerError::Serde(serde) => ConfigError::Serde(serde.to_string()),
        }
    }
}

/// Login pair checked by the credential gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Percentage used until the user stores their own rate.
    pub default_tax_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Custom withholding lumps; the built-in schedule applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withholding: Option<WithholdingSchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-PT".into(),
            currency: "EUR".into(),
            default_tax_rate: DEFAULT_TAX_RATE,
            data_dir: None,
            withholding: None,
            credentials: None,
            ui_color_enabled: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if TaxRate::new(self.default_tax_rate).is_none() {
            return Err(ConfigError::Invalid(format!(
                "default_tax_rate {} must be between 0 and 100",
                self.default_tax_rate
            )));
        }
        if let Some(schedule) = &self.withholding {
            schedule.validate().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::new(self.default_tax_rate).unwrap_or_default()
    }

    /// The configured lumps applied to `year`, or the built-in schedule.
    pub fn withholding_for(&self, year: i32) -> WithholdingSchedule {
        match &self.withholding {
            Some(schedule) => schedule.for_year(year),
            None => WithholdingSchedule::default_for(year),
        }
    }

    pub fn state_defaults(&self, today: NaiveDate) -> StateDefaults {
        use chrono::Datelike;
        StateDefaults {
            today,
            tax_rate: self.tax_rate(),
            withholding: self.withholding_for(today.year()),
        }
    }

    /// Where the ledger entries live: `data_dir` if set, else under the base directory.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base.join(DATA_DIR),
        }
    }
}

/// Handles persistence of [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(crate::utils::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        let config_path = base.join(CONFIG_FILE);
        Ok(Self {
            base_dir: base,
            config_path,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the configuration, returning defaults when none has been saved.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: Config =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.config_path, &json)?;
        tracing::info!(path = %self.config_path.display(), "configuration saved");
        Ok(())
    }
}
