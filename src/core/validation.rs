//! Input validation for new expenses.
//!
//! Everything the user types is checked here before the store is touched;
//! the store itself accepts any well-typed row.

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    models::NewExpense,
};
use chrono::{Datelike, Local};

/// Raw values collected by the shell for a new expense.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    /// Year; the current year when absent
    pub year: Option<i32>,
    /// Month number (`1`-`12`) or configured month name
    pub month: String,
    /// Category name, must be a configured category
    pub category: String,
    /// Amount as typed, `,` or `.` as decimal separator
    pub amount: String,
    /// Currency code; the configured default when absent
    pub currency: Option<String>,
}

/// Parses a user-entered amount.
///
/// Accepts a comma as decimal separator (`50,75`). The amount must be a
/// finite number strictly greater than zero.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("the amount field is required"));
    }
    let amount: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| Error::validation(format!("'{trimmed}' is not a valid amount")))?;
    if !amount.is_finite() {
        return Err(Error::validation(format!("'{trimmed}' is not a valid amount")));
    }
    if amount <= 0.0 {
        return Err(Error::validation("the amount must be positive"));
    }
    Ok(amount)
}

/// Parses a month given as a number or as one of `month_names`.
pub fn parse_month(text: &str, month_names: &[String]) -> Result<u32> {
    let trimmed = text.trim();
    if let Ok(month) = trimmed.parse::<u32>() {
        return if (1..=12).contains(&month) {
            Ok(month)
        } else {
            Err(Error::validation(format!("month {month} is outside 1-12")))
        };
    }
    let wanted = trimmed.to_lowercase();
    month_names
        .iter()
        .position(|name| name.to_lowercase() == wanted)
        .and_then(|index| u32::try_from(index + 1).ok())
        .ok_or_else(|| Error::validation(format!("unknown month '{trimmed}'")))
}

/// Builds a [`NewExpense`] from shell input, checking it against the
/// configured years, categories and currencies.
pub fn validate_new_expense(input: &ExpenseInput, config: &AppConfig) -> Result<NewExpense> {
    validate_new_expense_in(input, config, Local::now().year())
}

/// Same as [`validate_new_expense`] with an explicit current year.
pub fn validate_new_expense_in(
    input: &ExpenseInput,
    config: &AppConfig,
    current_year: i32,
) -> Result<NewExpense> {
    let year = input.year.unwrap_or(current_year);
    let last_year = current_year + 1;
    if year < config.first_year || year > last_year {
        return Err(Error::validation(format!(
            "year {year} is outside {}-{last_year}",
            config.first_year
        )));
    }

    let month = parse_month(&input.month, &config.month_names)?;

    let category = input.category.trim();
    if !config.has_category(category) {
        return Err(Error::validation(format!(
            "unknown category '{category}' (expected one of: {})",
            config.categories.join(", ")
        )));
    }

    let currency = input
        .currency
        .as_deref()
        .map_or(config.default_currency.as_str(), str::trim)
        .to_uppercase();
    if config.currency(&currency).is_none() {
        return Err(Error::validation(format!("unknown currency '{currency}'")));
    }

    let amount = parse_amount(&input.amount)?;

    Ok(NewExpense {
        year,
        month,
        category: category.to_string(),
        amount,
        currency,
    })
}
