//! Tabular projection of a view for the terminal.

use crate::{config::AppConfig, core::summary::ViewTotal, models::Expense, models::ExpenseFilter};
use comfy_table::{Cell, CellAlignment, Table, TableComponent};

/// `€ 12.50`, or `12.50 JPY` when the currency has no configured symbol.
#[must_use]
pub fn format_amount(amount: f64, currency: &str, config: &AppConfig) -> String {
    match config.symbol_for(currency) {
        "" => format!("{amount:.2} {currency}"),
        symbol => format!("{symbol} {amount:.2}"),
    }
}

/// Builds the expenses table: id, year, month name, category and amount.
#[must_use]
pub fn expense_table(rows: &[Expense], config: &AppConfig) -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table.set_header(vec!["ID", "Year", "Month", "Category", "Amount"]);

    for expense in rows {
        table.add_row(vec![
            Cell::new(expense.id).set_alignment(CellAlignment::Right),
            Cell::new(expense.year).set_alignment(CellAlignment::Center),
            Cell::new(config.month_name(expense.month)).set_alignment(CellAlignment::Center),
            Cell::new(&expense.category).set_alignment(CellAlignment::Center),
            Cell::new(format_amount(expense.amount, &expense.currency, config))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// The line shown under the table.
#[must_use]
pub fn format_view_total(total: &ViewTotal, config: &AppConfig) -> String {
    match total {
        ViewTotal::Empty => "Total in view: N/A".to_string(),
        ViewTotal::MultipleCurrencies(_) => "Total in view: Multiple currencies".to_string(),
        ViewTotal::Single { currency, total } => {
            format!("Total in view: {}", format_amount(*total, currency, config))
        }
    }
}

/// Human-readable summary of the active filters.
#[must_use]
pub fn describe_filter(filter: &ExpenseFilter, config: &AppConfig) -> String {
    let mut parts = Vec::new();
    if let Some(currency) = &filter.currency {
        parts.push(format!("currency {currency}"));
    }
    if let Some(year) = filter.year {
        parts.push(format!("year {year}"));
    }
    if let Some(month) = filter.month {
        parts.push(format!("month {}", config.month_name(month)));
    }
    if let Some(category) = &filter.category {
        parts.push(format!("category {category}"));
    }
    if parts.is_empty() {
        "View: all expenses".to_string()
    } else {
        format!("View: {}", parts.join(", "))
    }
}
