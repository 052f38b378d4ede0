use crate::cli::core::{expect_args, parse_amount, parse_date, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::AdjustmentService;
use crate::domain::{Displayable, FinancialAdjustment};
use crate::storage::StorageEntry;

const ADD_USAGE: &str = "add-adjustment <description> <value> [date]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("adjustments", "List financial adjustments", "adjustments", cmd_adjustments),
        CommandEntry::new(
            "add-adjustment",
            "Record a signed correction (negative for deductions)",
            ADD_USAGE,
            cmd_add_adjustment,
        ),
        CommandEntry::new(
            "delete-adjustment",
            "Delete an adjustment",
            "delete-adjustment <adjustment-id>",
            cmd_delete_adjustment,
        ),
    ]
}

fn cmd_adjustments(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut adjustments: Vec<&FinancialAdjustment> = context.state.ledger.adjustments.iter().collect();
    if adjustments.is_empty() {
        io::print_info("No adjustments recorded.");
        return Ok(());
    }
    adjustments.sort_by_key(|adjustment| adjustment.date);

    let range = context.state.range();
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Description").max_width(36),
        TableColumn::right("Value"),
        TableColumn::left("In period"),
    ]);
    for adjustment in adjustments {
        table.push_row(vec![
            adjustment.id.clone(),
            adjustment.date.to_string(),
            adjustment.description.clone(),
            context.money(adjustment.value),
            if range.contains(adjustment.date) { "yes".into() } else { "".into() },
        ]);
    }
    io::print_table(&table);
    Ok(())
}

fn cmd_add_adjustment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, ADD_USAGE)?;
    let value = parse_amount("value", args[1])?;
    let date = match args.get(2) {
        Some(raw) => parse_date(raw)?,
        None => context.today,
    };
    let id = AdjustmentService::add(
        &mut context.state.ledger,
        FinancialAdjustment::new(args[0], value, date),
    )?;
    context.persist(StorageEntry::Adjustments)?;
    io::print_success(format!("Adjustment {id} of {} recorded on {date}.", context.money(value)));
    Ok(())
}

fn cmd_delete_adjustment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, "delete-adjustment <adjustment-id>")?;
    let label = context
        .state
        .ledger
        .adjustment(args[0])
        .map(Displayable::display_label)
        .unwrap_or_else(|| args[0].to_string());
    if !context.confirm(&format!("Delete adjustment {label}?"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let removed = AdjustmentService::remove(&mut context.state.ledger, args[0])?;
    context.persist(StorageEntry::Adjustments)?;
    io::print_success(format!("Deleted adjustment `{}`.", removed.description));
    Ok(())
}
