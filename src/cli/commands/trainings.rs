use crate::cli::core::{
    expect_args, parse_amount, parse_count, parse_date, parse_time, parse_weekdays, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::TrainingService;
use crate::core::ScheduleRequest;
use crate::domain::{Displayable, Training};
use crate::storage::StorageEntry;

const ADD_USAGE: &str = "add-training <name> <instructor> <hourly-rate> [extra]";
const SCHEDULE_USAGE: &str = "schedule-training <name> <instructor> <hourly-rate> <start-date> <weekdays> <start HH:MM> <end HH:MM> <count> [extra]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("trainings", "List trainings", "trainings", cmd_trainings),
        CommandEntry::new("add-training", "Add a training without sessions", ADD_USAGE, cmd_add_training),
        CommandEntry::new(
            "schedule-training",
            "Add a training with sessions from a weekly pattern",
            SCHEDULE_USAGE,
            cmd_schedule_training,
        ),
        CommandEntry::new(
            "delete-training",
            "Delete a training and its sessions",
            "delete-training <training-id>",
            cmd_delete_training,
        ),
        CommandEntry::new("set-rate", "Change a training's hourly rate", "set-rate <training-id> <rate>", cmd_set_rate),
        CommandEntry::new(
            "set-extra",
            "Set or clear a training's flat extra",
            "set-extra <training-id> <amount|none>",
            cmd_set_extra,
        ),
    ]
}

fn cmd_trainings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let trainings = &context.state.ledger.trainings;
    if trainings.is_empty() {
        io::print_info("No trainings yet. Use `add-training` or `schedule-training`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Name").max_width(32),
        TableColumn::left("Instructor").max_width(16),
        TableColumn::right("Rate"),
        TableColumn::right("Extra"),
        TableColumn::right("Sessions"),
        TableColumn::left("Schedule").max_width(28),
    ]);
    for training in trainings {
        table.push_row(vec![
            training.id.clone(),
            training.name.clone(),
            training.instructor.clone(),
            context.money(training.hourly_rate),
            training
                .effective_extra()
                .map(|extra| context.money(extra))
                .unwrap_or_else(|| "-".into()),
            training.sessions.len().to_string(),
            training.schedule.clone(),
        ]);
    }
    io::print_table(&table);
    Ok(())
}

fn draft_training(args: &[&str], extra: Option<&str>) -> Result<Training, CommandError> {
    let rate = parse_amount("hourly rate", args[2])?;
    let mut training = Training::new(args[0], args[1], rate);
    if let Some(raw) = extra {
        training = training.with_extra(parse_amount("extra", raw)?);
    }
    Ok(training)
}

fn cmd_add_training(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, ADD_USAGE)?;
    let training = draft_training(args, args.get(3).copied())?;
    let id = TrainingService::add(&mut context.state.ledger, training)?;
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!("Training added ({id})."));
    Ok(())
}

fn cmd_schedule_training(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 8, SCHEDULE_USAGE)?;
    let training = draft_training(args, args.get(8).copied())?;
    let request = ScheduleRequest {
        training_id: training.id.clone(),
        start_date: parse_date(args[3])?,
        weekdays: parse_weekdays(args[4])?,
        start_time: parse_time(args[5])?,
        end_time: parse_time(args[6])?,
        target_sessions: parse_count("session count", args[7])?,
    };
    let id = TrainingService::add_scheduled(&mut context.state.ledger, training, &request)?;
    context.persist(StorageEntry::Trainings)?;

    let generated = TrainingService::find(&context.state.ledger, &id)?.sessions.len();
    io::print_success(format!("Training added ({id}) with {generated} sessions."));
    if generated < request.target_sessions as usize {
        io::print_warning(format!(
            "Only {generated} of {} sessions fit in the next year.",
            request.target_sessions
        ));
    }
    Ok(())
}

fn cmd_delete_training(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, "delete-training <training-id>")?;
    let label = TrainingService::find(&context.state.ledger, args[0])?.display_label();
    if !context.confirm(&format!("Delete {label} and all of its sessions?"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let removed = TrainingService::remove(&mut context.state.ledger, args[0])?;
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!(
        "Deleted `{}` ({} sessions).",
        removed.name,
        removed.sessions.len()
    ));
    Ok(())
}

fn cmd_set_rate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "set-rate <training-id> <rate>")?;
    let rate = parse_amount("hourly rate", args[1])?;
    TrainingService::set_rate(&mut context.state.ledger, args[0], rate)?;
    context.persist(StorageEntry::Trainings)?;
    io::print_success(format!("Hourly rate set to {}.", context.money(rate)));
    Ok(())
}

fn cmd_set_extra(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "set-extra <training-id> <amount|none>")?;
    let extra = match args[1].to_lowercase().as_str() {
        "none" | "clear" | "-" => None,
        raw => Some(parse_amount("extra", raw)?),
    };
    TrainingService::set_extra(&mut context.state.ledger, args[0], extra)?;
    context.persist(StorageEntry::Trainings)?;
    match extra {
        Some(value) => io::print_success(format!("Extra set to {}.", context.money(value))),
        None => io::print_success("Extra cleared."),
    }
    Ok(())
}
