use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;

use crate::{
    auth::CredentialGate,
    config::{Config, ConfigManager},
    core::AppState,
    storage::JsonStorage,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub storage: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub state: AppState,
    pub gate: CredentialGate,
    /// Reference day for month navigation and payment due dates.
    pub today: NaiveDate,
    pub last_command: Option<String>,
    pub running: bool,
}
