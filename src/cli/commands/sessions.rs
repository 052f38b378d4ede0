use crate::cli::core::{expect_args, parse_date, parse_duration, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{SessionService, TrainingService};
use crate::domain::Displayable;
use crate::storage::StorageEntry;

const ADD_USAGE: &str = "add-session <training-id> <date> <hours> [time label]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "sessions",
            "List sessions of one training, or all sessions in the current period",
            "sessions [training-id]",
            cmd_sessions,
        ),
        CommandEntry::new("add-session", "Add a single session", ADD_USAGE, cmd_add_session),
        CommandEntry::new(
            "move-session",
            "Reschedule a session to another day",
            "move-session <training-id> <session-id> <date>",
            cmd_move_session,
        ),
        CommandEntry::new(
            "delete-session",
            "Delete a session",
            "delete-session <training-id> <session-id>",
            cmd_delete_session,
        ),
        CommandEntry::new(
            "validate-session",
            "Mark a session as taught (or not)",
            "validate-session <training-id> <session-id> [yes|no]",
            cmd_validate_session,
        ),
    ]
}

fn cmd_sessions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut table = Table::new(vec![
        TableColumn::left("Session"),
        TableColumn::left("Training").max_width(28),
        TableColumn::left("Date"),
        TableColumn::left("Time"),
        TableColumn::right("Hours"),
        TableColumn::left("Done"),
    ]);

    let ledger = &context.state.ledger;
    let range = context.state.range();
    let selected: Vec<_> = match args.first() {
        Some(id) => vec![TrainingService::find(ledger, id)?],
        None => ledger.trainings.iter().collect(),
    };

    let mut rows = Vec::new();
    for training in selected {
        for session in &training.sessions {
            if args.is_empty() && !range.contains(session.date) {
                continue;
            }
            rows.push((session.date, vec![
                session.id.clone(),
                training.name.clone(),
                session.date.format("%Y-%m-%d %a").to_string(),
                session.time.clone(),
                session.duration.label(),
                if session.is_validated() { "yes".into() } else { "".into() },
            ]));
        }
    }
    rows.sort_by_key(|(date, _)| *date);

    if rows.is_empty() {
        io::print_info(format!("No sessions in {range}."));
        return Ok(());
    }
    for (_, row) in rows {
        table.push_row(row);
    }
    io::print_table(&table);
    Ok(())
}

fn cmd_add_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, ADD_USAGE)?;
    let date = parse_date(args[1])?;
    let duration = parse_duration(args[2])?;
    let time = args.get(3).copied().unwrap_or_default();
    let id = SessionService::add(&mut context.state.ledger, args[0], date, time, duration)?;
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!("Session {id} added on {date} ({duration})."));
    Ok(())
}

fn cmd_move_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, "move-session <training-id> <session-id> <date>")?;
    let date = parse_date(args[2])?;
    SessionService::move_to(&mut context.state.ledger, args[0], args[1], date)?;
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!("Session {} moved to {date}.", args[1]));
    Ok(())
}

fn cmd_delete_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "delete-session <training-id> <session-id>")?;
    let label = TrainingService::find(&context.state.ledger, args[0])?
        .session(args[1])
        .map(Displayable::display_label)
        .unwrap_or_else(|| args[1].to_string());
    if !context.confirm(&format!("Delete session {label}?"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let removed = SessionService::remove(&mut context.state.ledger, args[0], args[1])?;
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!("Deleted session {} ({}).", removed.id, removed.date));
    Ok(())
}

fn cmd_validate_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "validate-session <training-id> <session-id> [yes|no]")?;
    let validated = match args.get(2).map(|raw| raw.to_lowercase()) {
        None => true,
        Some(raw) if matches!(raw.as_str(), "yes" | "y" | "true") => true,
        Some(raw) if matches!(raw.as_str(), "no" | "n" | "false") => false,
        Some(raw) => {
            return Err(CommandError::InvalidArguments(format!(
                "expected yes or no, got `{raw}`"
            )))
        }
    };
    SessionService::set_validated(&mut context.state.ledger, args[0], args[1], validated)?;
    context.persist(StorageEntry::Trainings)?;
    let state = if validated { "validated" } else { "not validated" };
    io::print_success(format!("Session {} marked {state}.", args[1]));
    Ok(())
}
