use std::io::{self, BufRead, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io::print_info;

/// Set to run commands from stdin without prompts or confirmations.
pub const SCRIPT_ENV: &str = "TRAINER_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = LineSource::open(&context)?;

    if mode == CliMode::Interactive && !context.gate.is_unlocked() {
        print_info("This ledger is locked. Use `login` to continue.");
    }

    while context.running {
        match source.read(&context.prompt())? {
            Input::Line(line) => {
                if let Err(err) = dispatch_line(&mut context, &line) {
                    context.report_error(err)?;
                }
            }
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::End => break,
        }
    }
    Ok(())
}

/// Tokenizes and runs one line. Blank lines and `#` comments are skipped.
pub(crate) fn dispatch_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = tokenize(line)?;
    let Some(raw) = tokens.first().filter(|first| !first.starts_with('#')) else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(line).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

enum Input {
    Line(String),
    Interrupted,
    End,
}

/// Where command lines come from: the line editor, or stdin in script mode.
enum LineSource {
    Editor(Box<Editor<CommandCompleter, DefaultHistory>>),
    Piped(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn open(context: &ShellContext) -> Result<Self, CliError> {
        if context.mode() == CliMode::Script {
            return Ok(LineSource::Piped(io::stdin().lock().lines()));
        }
        let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandCompleter::new(context.command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(LineSource::Editor(Box::new(editor)))
    }

    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self {
            LineSource::Piped(lines) => match lines.next() {
                Some(line) => Ok(Input::Line(line?)),
                None => Ok(Input::End),
            },
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    Ok(Input::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => {
                    print_info("Exiting shell.");
                    Ok(Input::End)
                }
                Err(err) => Err(err.into()),
            },
        }
    }
}

/// Completes the command word; arguments are left alone.
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        let word = typed.trim_start();
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let needle = word.to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((typed.len() - word.len(), candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = tokenize(r#"add-training "Studio Lighting" Rui 65"#).unwrap();
        assert_eq!(tokens, vec!["add-training", "Studio Lighting", "Rui", "65"]);
        assert!(matches!(
            tokenize("add-training \"unterminated"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn comment_lines_are_skipped() {
        let temp = tempfile::TempDir::new().unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let mut context = crate::cli::core::script_context(temp.path(), today);
        assert_eq!(
            dispatch_line(&mut context, "  # exit").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(dispatch_line(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }
}
