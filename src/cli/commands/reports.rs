use chrono::{Datelike, Months};

use crate::cli::core::{expect_args, parse_amount, parse_month, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::{next_payment_due, project_withholding};
use crate::domain::{AnalysisMode, TaxRate, YearMonth};
use crate::storage::StorageEntry;

const PERIOD_USAGE: &str = "period [show | month [YYYY-MM] | prev | next | custom <YYYY-MM> <YYYY-MM>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("tax", "Show or set the withholding tax rate (%)", "tax [rate]", cmd_tax),
        CommandEntry::new("period", "Show or change the analyzed period", PERIOD_USAGE, cmd_period),
        CommandEntry::new("summary", "Financial summary of the current period", "summary", cmd_summary),
        CommandEntry::new("months", "Month-by-month figures of the current period", "months", cmd_months),
        CommandEntry::new("breakdown", "Income per training in the current period", "breakdown", cmd_breakdown),
        CommandEntry::new("insights", "Workload statistics of the current period", "insights", cmd_insights),
        CommandEntry::new(
            "withholding",
            "Projected advance tax payments for a year",
            "withholding [year]",
            cmd_withholding,
        ),
    ]
}

fn cmd_tax(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        io::print_info(format!("Tax rate: {}", context.state.tax_rate));
        return Ok(());
    };
    let percent = parse_amount("tax rate", raw)?;
    let rate = TaxRate::new(percent).ok_or_else(|| {
        CommandError::InvalidArguments(format!("tax rate must be between 0 and 100, got {percent}"))
    })?;
    context.state.tax_rate = rate;
    context.persist(StorageEntry::TaxRate)?;
    io::print_success(format!("Tax rate set to {rate}."));
    Ok(())
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|raw| raw.to_lowercase()).as_deref() {
        None | Some("show") => {
            print_period(context);
            return Ok(());
        }
        Some("month") => {
            let viewed = match args.get(1) {
                Some(raw) => parse_month(raw)?.first_day(),
                None => context.today,
            };
            context.state.view_month(viewed);
        }
        Some(step @ ("prev" | "next")) => {
            let month = Months::new(1);
            let current = context.state.viewed.with_day(1).unwrap_or(context.state.viewed);
            let shifted = if step == "prev" {
                current.checked_sub_months(month)
            } else {
                current.checked_add_months(month)
            };
            let viewed = shifted.ok_or_else(|| CommandError::Message("month out of range".into()))?;
            context.state.view_month(viewed);
        }
        Some("custom") => {
            expect_args(args, 3, PERIOD_USAGE)?;
            let start = parse_month(args[1])?;
            let end = parse_month(args[2])?;
            if let Err(err) = context.state.view_custom(start, end) {
                io::print_warning(format!("{err}; every figure will be zero."));
            }
        }
        Some(_) => return Err(CommandError::InvalidArguments(format!("usage: {PERIOD_USAGE}"))),
    }
    context.persist(StorageEntry::AnalysisSettings)?;
    print_period(context);
    Ok(())
}

fn print_period(context: &ShellContext) {
    let range = context.state.range();
    let mode = match context.state.analysis.mode {
        AnalysisMode::Month => "month",
        AnalysisMode::Custom => "custom",
    };
    io::print_info(format!("Period ({mode}): {range}"));
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.state.summary();
    output_section(format!("Summary {}", summary.range));
    let tax_label = format!("Tax ({})", summary.tax_rate);
    let lines = [
        ("Hours", summary.hours.to_string()),
        ("Sessions", summary.sessions.to_string()),
        ("Training income", context.money(summary.training_income)),
        ("Extras", context.money(summary.extras_total)),
        ("Adjustments", context.money(summary.adjustments_total)),
        ("Gross", context.money(summary.gross)),
        (tax_label.as_str(), context.money(summary.tax)),
        ("Net", context.money(summary.net)),
    ];
    for (label, value) in lines {
        io::print_info(format!("  {label:<16} {value:>14}"));
    }
    if !summary.adjustments.is_empty() {
        io::print_info("  Adjustments in period:");
        for adjustment in &summary.adjustments {
            io::print_info(format!(
                "    {} {:>12}  {}",
                adjustment.date,
                context.money(adjustment.value),
                adjustment.description
            ));
        }
    }
    Ok(())
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.state.summary();
    if summary.months.is_empty() {
        io::print_info("The current period contains no months.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Hours"),
        TableColumn::right("Sessions"),
        TableColumn::right("Income"),
        TableColumn::right("Extras"),
        TableColumn::right("Revenue"),
    ]);
    for bucket in &summary.months {
        table.push_row(vec![
            bucket.month.to_string(),
            bucket.hours.to_string(),
            bucket.sessions.to_string(),
            context.money(bucket.training_income),
            context.money(bucket.extras),
            context.money(bucket.revenue()),
        ]);
    }
    io::print_table(&table);
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context.state.breakdown();
    if rows.is_empty() {
        io::print_info(format!("No sessions in {}.", context.state.range()));
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Training").max_width(32),
        TableColumn::right("Rate"),
        TableColumn::right("Hours"),
        TableColumn::right("Sessions"),
        TableColumn::right("Income"),
        TableColumn::right("Extra"),
        TableColumn::right("Total"),
    ]);
    for row in &rows {
        table.push_row(vec![
            row.name.clone(),
            context.money(row.hourly_rate),
            row.hours.to_string(),
            row.sessions.to_string(),
            context.money(row.income),
            context.money(row.extras),
            context.money(row.total()),
        ]);
    }
    io::print_table(&table);
    Ok(())
}

fn cmd_insights(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let insights = context.state.insights();
    output_section(format!("Workload {}", context.state.range()));
    io::print_info(format!("  Total hours      {}", insights.total_hours));
    io::print_info(format!("  Total sessions   {}", insights.total_sessions));
    io::print_info(format!("  Total revenue    {}", context.money(insights.total_revenue)));
    io::print_info(format!("  Average hours    {:.1} per month", insights.average_hours));
    io::print_info(format!("  Busiest month    {}", month_label(insights.peak_month)));
    io::print_info(format!("  Quietest month   {}", month_label(insights.low_month)));
    io::print_info(format!("  Best paid month  {}", month_label(insights.peak_revenue_month)));

    if insights.months.len() > 1 {
        let mut table = Table::new(vec![
            TableColumn::left("Month"),
            TableColumn::right("Hours"),
            TableColumn::right("Revenue"),
            TableColumn::left("Load"),
        ]);
        for load in &insights.months {
            table.push_row(vec![
                load.month.to_string(),
                load.hours.to_string(),
                context.money(load.revenue),
                load.level.label().to_string(),
            ]);
        }
        io::print_table(&table);
    }
    Ok(())
}

fn month_label(month: Option<YearMonth>) -> String {
    month.map(|m| m.to_string()).unwrap_or_else(|| "-".into())
}

fn cmd_withholding(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let year = match args.first() {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid year `{raw}`")))?,
        None => context.state.withholding.year,
    };
    let schedule = context.state.withholding.for_year(year);
    let projections = project_withholding(&context.state.ledger.trainings, &schedule);
    if projections.is_empty() {
        io::print_info(format!("No withholding payments configured for {year}."));
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Payment"),
        TableColumn::left("Months"),
        TableColumn::right("Revenue"),
        TableColumn::right("Tax"),
        TableColumn::left("Due"),
    ]);
    for projection in &projections {
        let months: Vec<String> = projection.months.iter().map(|m| m.short_label(year)).collect();
        table.push_row(vec![
            projection.label.clone(),
            months.join(", "),
            context.money(projection.revenue),
            context.money(projection.tax),
            projection
                .due
                .map(|due| due.to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    io::print_table(&table);

    match next_payment_due(&projections, context.today) {
        Some(next) => io::print_info(format!(
            "Next payment: {} of {} due {}.",
            next.label,
            context.money(next.tax),
            next.due.map(|due| due.to_string()).unwrap_or_default(),
        )),
        None if context.today.year() >= year => io::print_info("No payments left for this schedule."),
        None => {}
    }
    Ok(())
}
