//! Command-line grammar shared by one-shot invocations and the
//! interactive session.

use crate::{
    config::AppConfig,
    core::validation::{ExpenseInput, parse_month},
    errors::Result,
    models::ExpenseFilter,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command line of the `expense-tracker` binary.
#[derive(Parser, Debug)]
#[command(author, version, about = "Personal multi-currency expense tracker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to $EXPENSES_CONFIG or ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Action to run; starts an interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line typed in the interactive session.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    /// The command on the line
    #[command(subcommand)]
    pub command: Command,
}

/// Every action the tracker offers.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a new expense
    Add(AddArgs),
    /// Show the expenses in view; given filters replace the current view
    List(FilterArgs),
    /// Delete expenses by id
    Delete {
        /// Ids of the expenses to delete
        ids: Vec<i64>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a bar chart of spending by category for the view
    Chart(FilterArgs),
    /// Write the printable report for the view
    Report {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export every expense (ignoring the view) to a CSV file
    ExportCsv {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Clear the view filters
    Reset,
    /// Start an interactive session
    Shell,
}

/// Raw fields of a new expense; validated before storing.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Year of the expense (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Month number or name
    #[arg(short, long)]
    pub month: String,
    /// Category
    #[arg(short, long)]
    pub category: String,
    /// Amount, `.` or `,` as decimal separator
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: String,
    /// Currency code (defaults to the configured default currency)
    #[arg(long)]
    pub currency: Option<String>,
}

impl From<AddArgs> for ExpenseInput {
    fn from(args: AddArgs) -> Self {
        Self {
            year: args.year,
            month: args.month,
            category: args.category,
            amount: args.amount,
            currency: args.currency,
        }
    }
}

/// View filter flags.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Only this year
    #[arg(long)]
    pub year: Option<i32>,
    /// Only this month (number or name)
    #[arg(long)]
    pub month: Option<String>,
    /// Only this category
    #[arg(long)]
    pub category: Option<String>,
    /// Only this currency code
    #[arg(long)]
    pub currency: Option<String>,
}

impl FilterArgs {
    /// The filter these flags describe, or `None` when no flag was given.
    pub fn to_filter(&self, config: &AppConfig) -> Result<Option<ExpenseFilter>> {
        if self.year.is_none()
            && self.month.is_none()
            && self.category.is_none()
            && self.currency.is_none()
        {
            return Ok(None);
        }
        let month = self
            .month
            .as_deref()
            .map(|m| parse_month(m, &config.month_names))
            .transpose()?;
        Ok(Some(ExpenseFilter {
            year: self.year,
            month,
            category: self.category.clone(),
            currency: self.currency.as_deref().map(str::to_uppercase),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
        SessionLine::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_comma_amount() -> std::result::Result<(), clap::Error> {
        let line = SessionLine::try_parse_from([
            "add", "-y", "2024", "-m", "Fevereiro", "-c", "Lazer", "-a", "10,50", "--currency",
            "USD",
        ])?;
        assert_eq!(
            line.command,
            Command::Add(AddArgs {
                year: Some(2024),
                month: "Fevereiro".to_string(),
                category: "Lazer".to_string(),
                amount: "10,50".to_string(),
                currency: Some("USD".to_string()),
            })
        );
        Ok(())
    }

    #[test]
    fn test_parse_negative_amount_reaches_validation() -> std::result::Result<(), clap::Error> {
        let line = SessionLine::try_parse_from(["add", "-m", "1", "-c", "Lazer", "-a", "-5"])?;
        let Command::Add(args) = line.command else {
            panic!("expected add");
        };
        assert_eq!(args.amount, "-5");
        Ok(())
    }

    #[test]
    fn test_delete_ids_are_optional() -> std::result::Result<(), clap::Error> {
        let empty = SessionLine::try_parse_from(["delete"])?;
        assert_eq!(
            empty.command,
            Command::Delete {
                ids: vec![],
                yes: false
            }
        );
        let line = SessionLine::try_parse_from(["delete", "1", "2", "--yes"])?;
        assert_eq!(
            line.command,
            Command::Delete {
                ids: vec![1, 2],
                yes: true
            }
        );
        Ok(())
    }

    #[test]
    fn test_filter_args_to_filter() -> Result<()> {
        let config = AppConfig::default();
        assert_eq!(FilterArgs::default().to_filter(&config)?, None);

        let args = FilterArgs {
            month: Some("março".to_string()),
            currency: Some("eur".to_string()),
            ..FilterArgs::default()
        };
        assert_eq!(
            args.to_filter(&config)?,
            Some(ExpenseFilter::all().month(3).currency("EUR"))
        );
        Ok(())
    }
}
