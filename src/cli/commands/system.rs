use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::storage::StorageEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help).open(),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).open(),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version).open(),
        CommandEntry::new("login", "Unlock the ledger", "login [username] [password]", cmd_login).open(),
        CommandEntry::new("reset", "Replace all trainings with the demo data", "reset", cmd_reset),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.registry.get(&name) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Trainer Ledger {}", meta.version));
    io::print_info(format!("  Build hash : {}", meta.git_hash));
    io::print_info(format!("  Built on   : {}", meta.built_on));
    io::print_info(format!("  Profile    : {}", meta.profile));
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !context.gate.is_enabled() {
        io::print_info("No credentials configured; the ledger is always unlocked.");
        return Ok(());
    }
    if context.gate.is_unlocked() {
        io::print_info("Already unlocked.");
        return Ok(());
    }

    let (username, password) = match args {
        [user, pass, ..] => (user.to_string(), pass.to_string()),
        _ if context.mode() == CliMode::Interactive => (
            io::prompt_text(&context.theme, "Username")?,
            io::prompt_password(&context.theme, "Password")?,
        ),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: login <username> <password>".into(),
            ))
        }
    };

    if context.gate.login(&context.storage, &username, &password)? {
        io::print_success("Unlocked.");
        Ok(())
    } else {
        Err(CommandError::Message("Invalid username or password.".into()))
    }
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Replace every training with the demo data?")? {
        io::print_info("Reset cancelled.");
        return Ok(());
    }
    context.state.ledger.reset_to_seed();
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!(
        "Restored {} demo trainings.",
        context.state.ledger.trainings.len()
    ));
    Ok(())
}
