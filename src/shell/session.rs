//! Command dispatch and the interactive session.
//!
//! Every command goes through [`run_action`], the top-level handler: any
//! error is logged with its detail, reported to the user in one line, and
//! the session carries on with the next command.

use crate::{
    core::{export::ExportOutcome, report::ReportOutcome, summary::ReportReadiness},
    errors::Result,
    shell::{
        App,
        cli::{Command, SessionLine},
    },
};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::{error, info, instrument};

const PROMPT: &str = "expenses> ";
const SINGLE_CURRENCY_HINT: &str = "Charts and reports can only be generated for a single currency at a time. Use the --currency filter to select one.";

/// Runs `command`, reporting any failure instead of returning it.
///
/// Returns `true` when the command succeeded.
pub fn run_action(
    app: &mut App,
    command: Command,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> bool {
    match execute(app, command, input, out) {
        Ok(()) => true,
        Err(e) => {
            error!("Action failed: {:?}", e);
            // The user may be gone (closed pipe); the failure is logged either way.
            let _ = writeln!(out, "Error: {e}");
            false
        }
    }
}

/// Runs one command against `app`.
#[instrument(skip(app, input, out))]
pub fn execute(
    app: &mut App,
    command: Command,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Add(args) => {
            let expense = app.add_expense(&args.into())?;
            writeln!(
                out,
                "Expense added: {} {} {} {:.2} {}.",
                expense.year,
                app.config().month_name(expense.month),
                expense.category,
                expense.amount,
                expense.currency
            )?;
            app.render_view(out)
        }
        Command::List(filters) => {
            if let Some(filter) = filters.to_filter(app.config())? {
                app.apply_filters(filter);
            }
            app.render_view(out)
        }
        Command::Delete { ids, yes } => {
            if ids.is_empty() {
                writeln!(out, "Select at least one expense to delete.")?;
                return Ok(());
            }
            let question = format!("Delete {} selected expense(s)?", ids.len());
            if !yes && !confirm(input, out, &question)? {
                writeln!(out, "Nothing deleted.")?;
                return Ok(());
            }
            let outcome = app.delete_expenses(&ids);
            for (id, e) in &outcome.failures {
                writeln!(out, "Could not delete expense {id}: {e}")?;
            }
            writeln!(
                out,
                "Deleted {} of {} selected expense(s).",
                outcome.succeeded(),
                outcome.attempted.len()
            )?;
            app.render_view(out)
        }
        Command::Chart(filters) => {
            if let Some(filter) = filters.to_filter(app.config())? {
                app.apply_filters(filter);
            }
            match app.show_chart(out)? {
                ReportReadiness::Empty => {
                    writeln!(out, "No data in the current view to chart.")?;
                }
                ReportReadiness::MixedCurrencies(codes) => {
                    writeln!(out, "Multiple currencies in view ({}).", codes.join(", "))?;
                    writeln!(out, "{SINGLE_CURRENCY_HINT}")?;
                }
                ReportReadiness::Ready { .. } => {}
            }
            Ok(())
        }
        Command::Report { output, filters } => {
            if let Some(filter) = filters.to_filter(app.config())? {
                app.apply_filters(filter);
            }
            match app.export_report(&output)? {
                ReportOutcome::Empty => {
                    writeln!(out, "No data in the current view to generate the report.")?;
                }
                ReportOutcome::MixedCurrencies(codes) => {
                    writeln!(out, "Multiple currencies in view ({}).", codes.join(", "))?;
                    writeln!(out, "{SINGLE_CURRENCY_HINT}")?;
                }
                ReportOutcome::Written { pages } => {
                    writeln!(
                        out,
                        "Report exported to {} ({pages} page(s)).",
                        output.display()
                    )?;
                }
            }
            Ok(())
        }
        Command::ExportCsv { output } => {
            match app.export_csv(&output)? {
                ExportOutcome::Empty => writeln!(out, "Nothing to export.")?,
                ExportOutcome::Written { path, rows } => {
                    writeln!(out, "All {rows} expense(s) exported to {}.", path.display())?;
                }
            }
            Ok(())
        }
        Command::Reset => {
            app.reset_filters();
            app.render_view(out)
        }
        Command::Shell => {
            writeln!(out, "Already in an interactive session.")?;
            Ok(())
        }
    }
}

/// Asks a yes/no question; anything but `y`/`yes` (or end of input) is no.
fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, question: &str) -> Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Reads commands line by line until `quit`, `exit` or end of input.
///
/// Failed commands are reported and the session continues.
pub fn run_interactive(app: &mut App, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    info!("Starting interactive session.");
    writeln!(out, "Type 'help' for the list of commands, 'quit' to leave.")?;
    app.render_view(out)?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        // Shell-style quoting, so multi-word categories survive.
        let Some(words) = shlex::split(line) else {
            writeln!(out, "error: unbalanced quotes in '{line}'")?;
            continue;
        };
        match SessionLine::try_parse_from(words) {
            Ok(parsed) => {
                run_action(app, parsed.command, input, out);
            }
            Err(e) => {
                writeln!(out, "{e}")?;
            }
        }
    }

    info!("Interactive session ended.");
    Ok(())
}
