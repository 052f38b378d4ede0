//! Core CLI dispatch, error types and shell context helpers.

use std::{env, io};

use chrono::{Local, NaiveDate, NaiveTime, Weekday};
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    auth::CredentialGate,
    config::{ConfigError, ConfigManager},
    core::{services::ServiceError, CoreError},
    domain::{SessionDuration, YearMonth},
    errors::LedgerError,
    storage::{JsonStorage, StorageBackend, StorageEntry},
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::CommandRegistry;
pub use super::shell_context::{CliMode, ShellContext};

/// Overrides the shell's notion of today (`YYYY-MM-DD`).
pub const TODAY_ENV: &str = "TRAINER_LEDGER_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager, today_from_env())
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
        today: NaiveDate,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);

        let storage = JsonStorage::new(config.resolve_data_dir(config_manager.base_dir()))?;
        let report = storage.load_state(&config.state_defaults(today))?;
        for issue in &report.issues {
            cli_io::print_warning(format!("Could not read {issue}; using defaults."));
        }
        let gate = CredentialGate::new(config.credentials.clone(), &storage)?;

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            storage,
            config_manager,
            config,
            state: report.state,
            gate,
            today,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let range = self.state.range();
        if !self.gate.is_unlocked() {
            return "trainer-ledger (locked)> ".into();
        }
        let first = YearMonth::from_date(range.start);
        let last = YearMonth::from_date(range.end);
        if first == last {
            format!("trainer-ledger [{first}]> ")
        } else {
            format!("trainer-ledger [{first}..{last}]> ")
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some((handler, open)) = self.registry.get(command).map(|entry| (entry.handler, entry.open)) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        if !open && !self.gate.is_unlocked() {
            return Err(CommandError::Locked);
        }
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    /// Asks before destructive commands; scripts never wait for an answer.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Locked => {
                cli_io::print_error(CommandError::Locked);
                cli_io::print_hint("Use `login <username> <password>`.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    /// Writes one persisted entry after a successful mutation.
    pub(crate) fn persist(&self, entry: StorageEntry) -> CommandResult {
        self.storage.save_entry(&self.state, entry)?;
        Ok(())
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        format_money(amount, &self.config.currency)
    }
}

fn today_from_env() -> NaiveDate {
    env::var(TODAY_ENV)
        .ok()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn format_money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

pub(crate) fn expect_args(args: &[&str], count: usize, usage: &str) -> CommandResult {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    } else {
        Ok(())
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_month(input: &str) -> Result<YearMonth, CommandError> {
    input.parse::<YearMonth>().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid month `{}` (use YYYY-MM)", input))
    })
}

pub(crate) fn parse_time(input: &str) -> Result<NaiveTime, CommandError> {
    NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid time `{}` (use HH:MM)", input))
    })
}

pub(crate) fn parse_amount(label: &str, input: &str) -> Result<f64, CommandError> {
    input
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("{label} must be a number, got `{input}`")))
}

pub(crate) fn parse_count(label: &str, input: &str) -> Result<u32, CommandError> {
    input
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("{label} must be a whole number, got `{input}`")))
}

pub(crate) fn parse_duration(input: &str) -> Result<SessionDuration, CommandError> {
    SessionDuration::parse(input).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

/// Comma separated weekday names, e.g. `mon,wed`.
pub(crate) fn parse_weekdays(input: &str) -> Result<Vec<Weekday>, CommandError> {
    let mut days = Vec::new();
    for raw in input.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let day = raw
            .parse::<Weekday>()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid weekday `{raw}`")))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("The ledger is locked. Log in first.")]
    Locked,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Service(ServiceError::Core(err))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Command(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn script_context(base: &std::path::Path, today: NaiveDate) -> ShellContext {
    let manager = ConfigManager::with_base_dir(base.to_path_buf()).expect("config manager");
    ShellContext::with_config_manager(CliMode::Script, manager, today).expect("shell context")
}

#[cfg(test)]
pub(crate) fn run_lines(context: &mut ShellContext, lines: &[&str]) -> Vec<CommandError> {
    let mut errors = Vec::new();
    for line in lines {
        match crate::cli::shell::dispatch_line(context, line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => errors.push(err),
        }
    }
    errors
}
